//! Adapter seams toward the authorization and session layers
//!
//! The inspector never reaches into ambient state. The policy engine
//! sits behind [`AuthorizationPort`]; the acting user's type arrives as
//! an explicit [`UserContext`] built from a [`CurrentUserPort`] at the
//! request boundary.

use crate::UNKNOWN_USER_TYPE;

/// Policy-engine check for a single action against a subject
///
/// The subject is whatever entity the policy engine adjudicates — for
/// caseflow, the transaction the process instance operates on. A `false`
/// return is indistinguishable from "not allowed"; genuine
/// infrastructure failures are the implementation's to raise and are
/// not caught by the inspector.
pub trait AuthorizationPort {
    type Subject;

    fn is_allowed_for_instance(&self, action: &str, subject: &Self::Subject) -> bool;
}

/// Source of the acting user's type for the current request
pub trait CurrentUserPort {
    /// The user's type (e.g. `agency`, `public`), or `None` when no
    /// authenticated user is available
    fn current_user_type(&self) -> Option<String>;
}

/// The acting user, resolved once at the request boundary
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserContext {
    /// The user's type, if an authenticated user is available
    pub user_type: Option<String>,
}

impl UserContext {
    /// Context for a request without an authenticated user
    pub fn anonymous() -> Self {
        Self { user_type: None }
    }

    /// Context for a user of the given type
    pub fn of_type(user_type: impl Into<String>) -> Self {
        Self {
            user_type: Some(user_type.into()),
        }
    }

    /// Resolve the context from the session layer's port
    pub fn from_port(port: &impl CurrentUserPort) -> Self {
        Self {
            user_type: port.current_user_type(),
        }
    }

    /// The user type, or the literal `"unknown"` when unauthenticated
    ///
    /// `"unknown"` fails the default allowed-types check unless a
    /// definition explicitly admits it.
    pub fn user_type_or_unknown(&self) -> &str {
        self.user_type.as_deref().unwrap_or(UNKNOWN_USER_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedUser(Option<&'static str>);

    impl CurrentUserPort for FixedUser {
        fn current_user_type(&self) -> Option<String> {
            self.0.map(str::to_owned)
        }
    }

    #[test]
    fn test_context_from_port() {
        let ctx = UserContext::from_port(&FixedUser(Some("agency")));
        assert_eq!(ctx.user_type_or_unknown(), "agency");
    }

    #[test]
    fn test_missing_user_is_unknown() {
        let ctx = UserContext::from_port(&FixedUser(None));
        assert_eq!(ctx.user_type_or_unknown(), "unknown");
        assert_eq!(UserContext::anonymous(), ctx);
    }
}
