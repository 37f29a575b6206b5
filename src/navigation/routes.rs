use serde::Serialize;

/// Page components the shell can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    Login,
    Register,
    Feed,
    Assignments,
    Chats,
    Profile,
}

impl View {
    pub fn component(&self) -> &'static str {
        match self {
            View::Login => "LoginView",
            View::Register => "RegisterView",
            View::Feed => "FeedView",
            View::Assignments => "AssignmentsView",
            View::Chats => "ChatsView",
            View::Profile => "ProfileView",
        }
    }
}

/// Frame wrapped around a subtree of views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Layout {
    App,
}

impl Layout {
    pub fn component(&self) -> &'static str {
        match self {
            Layout::App => "AppLayout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    View(View),
    Redirect(&'static str),
    /// A layout whose children supply the actual views.
    Layout(Layout),
}

/// One node of the declared route tree. Child paths are relative to the parent.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub target: RouteTarget,
    pub requires_auth: bool,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn view(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name: Some(name),
            target: RouteTarget::View(view),
            requires_auth: false,
            children: Vec::new(),
        }
    }

    pub fn redirect(path: &'static str, to: &'static str) -> Self {
        Self {
            path,
            name: None,
            target: RouteTarget::Redirect(to),
            requires_auth: false,
            children: Vec::new(),
        }
    }

    pub fn layout(path: &'static str, layout: Layout, children: Vec<RouteRecord>) -> Self {
        Self {
            path,
            name: None,
            target: RouteTarget::Layout(layout),
            requires_auth: false,
            children,
        }
    }

    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}

/// A matchable path after flattening the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    pub name: Option<&'static str>,
    pub target: RouteTarget,
    /// Innermost enclosing layout, if any.
    pub layout: Option<Layout>,
    /// Set when this record or any ancestor requires authentication.
    pub requires_auth: bool,
}

/// Immutable lookup table built once from the route tree.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(records: Vec<RouteRecord>) -> Self {
        let mut entries = Vec::new();
        for record in &records {
            flatten(record, "", None, false, &mut entries);
        }
        Self { entries }
    }

    /// The application's routes.
    pub fn campus() -> Self {
        Self::new(vec![
            RouteRecord::redirect("/", "/login"),
            RouteRecord::view("/login", "login", View::Login),
            RouteRecord::view("/register", "register", View::Register),
            RouteRecord::layout(
                "/dashboard",
                Layout::App,
                vec![
                    RouteRecord::redirect("", "/dashboard/feed"),
                    RouteRecord::view("feed", "feed", View::Feed),
                    RouteRecord::view("assignments", "assignments", View::Assignments),
                    RouteRecord::view("chats", "chats", View::Chats),
                    RouteRecord::view("profile", "profile", View::Profile),
                ],
            )
            .requires_auth(),
        ])
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Finds the entry for `path`. Matching ignores a trailing slash and ASCII case.
    pub fn lookup(&self, path: &str) -> Option<&RouteEntry> {
        let path = normalize(path);
        self.entries
            .iter()
            .find(|entry| entry.path.eq_ignore_ascii_case(&path))
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|entry| entry.name == Some(name))
    }
}

fn flatten(
    record: &RouteRecord,
    parent: &str,
    layout: Option<Layout>,
    inherited_auth: bool,
    out: &mut Vec<RouteEntry>,
) {
    let path = join(parent, record.path);
    let requires_auth = inherited_auth || record.requires_auth;

    if let RouteTarget::Layout(own) = record.target {
        // Only the children are matchable; an empty child path claims the layout's own path.
        for child in &record.children {
            flatten(child, &path, Some(own), requires_auth, out);
        }
        return;
    }

    out.push(RouteEntry {
        path,
        name: record.name,
        target: record.target.clone(),
        layout,
        requires_auth,
    });
}

fn join(parent: &str, path: &str) -> String {
    if path.starts_with('/') {
        return normalize(path);
    }
    if path.is_empty() {
        return normalize(parent);
    }
    normalize(&format!("{}/{}", parent.trim_end_matches('/'), path))
}

/// Leading slash, no trailing slash (except for the root), no query or fragment.
pub fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}
