use tracing::debug;

use super::flag::AuthFlag;
use super::guard::{GuardDecision, NavigationGuard};
use super::routes::{normalize, RouteEntry, RouteTable, RouteTarget};

/// Redirect hops allowed before a navigation is abandoned.
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("too many redirects while navigating to '{requested}' (last: '{last}')")]
    RedirectLoop { requested: String, last: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A view route matched.
    Route(RouteEntry),
    /// Nothing matched; the shell decides what to show.
    NotFound,
}

/// Where a navigation attempt ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub path: String,
    pub outcome: Outcome,
}

impl Navigation {
    pub fn redirected(&self) -> bool {
        self.requested != self.path
    }
}

/// Resolves navigation requests against the route table and the guard.
pub struct Navigator {
    table: RouteTable,
    guard: NavigationGuard,
    flag: AuthFlag,
}

impl Navigator {
    pub fn new(table: RouteTable, flag: AuthFlag) -> Self {
        Self {
            table,
            guard: NavigationGuard::default(),
            flag,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn auth_flag(&self) -> &AuthFlag {
        &self.flag
    }

    /// Navigates using one snapshot of the auth flag for the whole attempt.
    pub fn navigate(&self, path: &str) -> Result<Navigation, NavigationError> {
        self.resolve(path, self.flag.snapshot())
    }

    /// Record redirects apply before the guard; a guard redirect starts over
    /// at the new path with the same `authenticated` value.
    pub fn resolve(&self, path: &str, authenticated: bool) -> Result<Navigation, NavigationError> {
        let requested = normalize(path);
        let mut current = requested.clone();

        for _ in 0..MAX_REDIRECTS {
            let entry = self.table.lookup(&current);

            if let Some(RouteEntry {
                target: RouteTarget::Redirect(to),
                ..
            }) = entry
            {
                debug!(from = current.as_str(), to = *to, "route redirect");
                current = normalize(to);
                continue;
            }

            let requires_auth = entry.is_some_and(|e| e.requires_auth);
            match self.guard.evaluate(&current, requires_auth, authenticated) {
                GuardDecision::Redirect(to) => {
                    debug!(
                        from = current.as_str(),
                        to,
                        authenticated,
                        "navigation guard redirect"
                    );
                    current = normalize(to);
                }
                GuardDecision::Proceed => {
                    let outcome = match entry {
                        Some(entry) => Outcome::Route(entry.clone()),
                        None => Outcome::NotFound,
                    };
                    return Ok(Navigation {
                        requested,
                        path: current,
                        outcome,
                    });
                }
            }
        }

        Err(NavigationError::RedirectLoop {
            requested,
            last: current,
        })
    }
}
