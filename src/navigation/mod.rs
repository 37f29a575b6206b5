//! Client-side navigation: the route table, the shared authentication flag
//! and the guard that every navigation passes through.

pub mod flag;
pub mod guard;
pub mod navigator;
pub mod routes;

pub use flag::{spawn_auth_listener, AuthEvent, AuthFlag};
pub use guard::{GuardDecision, NavigationGuard, LANDING_PATH, LOGIN_PATH, REGISTER_PATH};
pub use navigator::{Navigation, NavigationError, Navigator, Outcome};
pub use routes::{Layout, RouteEntry, RouteRecord, RouteTable, RouteTarget, View};
