pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const LANDING_PATH: &str = "/dashboard/feed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(&'static str),
}

/// Per-navigation check that keeps signed-out users out of protected pages
/// and signed-in users out of the guest-only pages.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    login_path: &'static str,
    guest_paths: Vec<&'static str>,
    landing_path: &'static str,
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self {
            login_path: LOGIN_PATH,
            guest_paths: vec![LOGIN_PATH, REGISTER_PATH],
            landing_path: LANDING_PATH,
        }
    }
}

impl NavigationGuard {
    /// `path` must already be normalized.
    pub fn evaluate(&self, path: &str, requires_auth: bool, authenticated: bool) -> GuardDecision {
        if requires_auth && !authenticated {
            GuardDecision::Redirect(self.login_path)
        } else if authenticated && self.guest_paths.contains(&path) {
            GuardDecision::Redirect(self.landing_path)
        } else {
            GuardDecision::Proceed
        }
    }
}
