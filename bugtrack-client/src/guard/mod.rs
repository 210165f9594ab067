//! Navigation guard gating routes on auth state.
//!
//! The guard is a pure decision over the target route and whether an access
//! token is present. It never validates the token itself; an invalid token is
//! caught by the next authenticated request.

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// A navigation target with its auth requirement.
///
/// Routes require auth unless explicitly marked public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget<'a> {
    pub path: &'a str,
    pub requires_auth: bool,
}

impl<'a> RouteTarget<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            requires_auth: true,
        }
    }

    pub fn public(path: &'a str) -> Self {
        Self {
            path,
            requires_auth: false,
        }
    }
}

/// Resolve a path against the client's route table.
///
/// The login route is the only public one; everything else, including unknown
/// paths (which the router sends back to home), requires auth.
pub fn target_for(path: &str) -> RouteTarget<'_> {
    if path == LOGIN_PATH {
        RouteTarget::public(path)
    } else {
        RouteTarget::new(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(&'static str),
}

pub fn decide(target: &RouteTarget<'_>, has_token: bool) -> GuardDecision {
    if target.requires_auth && !has_token {
        return GuardDecision::Redirect(LOGIN_PATH);
    }
    if target.path == LOGIN_PATH && has_token {
        return GuardDecision::Redirect(HOME_PATH);
    }
    GuardDecision::Proceed
}

/// Navigation sink driven by the session layer and the request pipeline.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Default sink that only records the forced navigation in the log.
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "Navigation requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_route_without_token_redirects_to_login() {
        let decision = decide(&target_for("/bugs"), false);
        assert_eq!(decision, GuardDecision::Redirect(LOGIN_PATH));
    }

    #[test]
    fn login_with_token_redirects_home() {
        let decision = decide(&target_for(LOGIN_PATH), true);
        assert_eq!(decision, GuardDecision::Redirect(HOME_PATH));
    }

    #[test]
    fn login_without_token_proceeds() {
        let decision = decide(&target_for(LOGIN_PATH), false);
        assert_eq!(decision, GuardDecision::Proceed);
    }

    #[test]
    fn protected_route_with_token_proceeds() {
        for path in ["/", "/bugs", "/bugs/42", "/users", "/modules", "/profile"] {
            assert_eq!(decide(&target_for(path), true), GuardDecision::Proceed);
        }
    }

    #[test]
    fn explicitly_public_route_proceeds_without_token() {
        let target = RouteTarget::public("/about");
        assert_eq!(decide(&target, false), GuardDecision::Proceed);
    }
}
