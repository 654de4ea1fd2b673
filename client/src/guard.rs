//! Route guard: one pure decision function for every navigation.
//!
//! Centralises what the page components used to check ad hoc, so the rules
//! can be tested without any rendering in sight.

use shared::types::Role;

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_PREFIX: &str = "/admin";
pub const SITE_ROOT: &str = "/";

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

/// Decide whether navigating to `path` is allowed for the given auth state.
///
/// Rules, in order:
/// - anonymous visitors only reach the login page;
/// - admins are pinned under the admin console;
/// - ordinary users never see the admin console.
///
/// No internal memory — re-evaluated from scratch on every navigation.
pub fn decide(authenticated: bool, role: Option<Role>, path: &str) -> RouteDecision {
    if !authenticated && !path.starts_with(LOGIN_PATH) {
        return RouteDecision::Redirect(LOGIN_PATH);
    }

    if authenticated {
        match role {
            Some(Role::Admin) if !path.starts_with(ADMIN_PREFIX) => {
                return RouteDecision::Redirect(ADMIN_PREFIX);
            }
            Some(Role::User) if path.starts_with(ADMIN_PREFIX) => {
                return RouteDecision::Redirect(SITE_ROOT);
            }
            _ => {}
        }
    }

    RouteDecision::Allow
}
