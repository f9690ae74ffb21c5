use std::borrow::Cow;

use thiserror::Error;

use crate::{Identity, Role};

/// What a route needs from the current identity before it may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any logged-in identity.
    Authenticated,
    /// A logged-in identity holding this role.
    Role(Role),
}

/// A route's requirement plus the feature name used in the denial notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pub requirement: Requirement,
    pub feature: Option<Cow<'static, str>>,
}

impl AccessRule {
    pub fn authenticated() -> Self {
        Self {
            requirement: Requirement::Authenticated,
            feature: None,
        }
    }

    pub fn role(role: Role) -> Self {
        Self {
            requirement: Requirement::Role(role),
            feature: None,
        }
    }

    pub fn admin() -> Self {
        Self::role(Role::Admin)
    }

    pub fn for_feature(mut self, feature: impl Into<Cow<'static, str>>) -> Self {
        self.feature = Some(feature.into());
        self
    }
}

/// Where a denied view sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    /// Nobody is logged in.
    NeedsLogin,
    /// Someone is logged in, but without the required role.
    NeedsRole(Role),
}

/// Why a route was refused, what to tell the user and where to go instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{notice}")]
pub struct Denial {
    pub kind: DenialKind,
    pub notice: String,
    pub redirect: RedirectTarget,
}

/// Decide whether `identity` may render a route guarded by `rule`.
///
/// - No IO
/// - No panics
/// - The server still enforces the same rules; this only spares a doomed request
pub fn authorize(rule: &AccessRule, identity: Option<&Identity>) -> Result<(), Denial> {
    let feature = rule.feature.as_deref();

    let Some(identity) = identity else {
        return Err(Denial {
            kind: DenialKind::NeedsLogin,
            notice: login_notice(feature),
            redirect: RedirectTarget::Login,
        });
    };

    match rule.requirement {
        Requirement::Authenticated => Ok(()),
        Requirement::Role(role) if identity.role() == role => Ok(()),
        Requirement::Role(role) => Err(Denial {
            kind: DenialKind::NeedsRole(role),
            notice: role_notice(feature, role),
            redirect: RedirectTarget::Home,
        }),
    }
}

/// Notice shown when a login is required, optionally naming the feature.
pub fn login_notice(feature: Option<&str>) -> String {
    match feature {
        Some(feature) => format!("{feature} requires you to log in."),
        None => "This service requires you to log in.".to_string(),
    }
}

fn role_notice(feature: Option<&str>, role: Role) -> String {
    let audience = match role {
        Role::Admin => "administrators",
        Role::User => "members",
    };
    match feature {
        Some(feature) => format!("{feature} is available to {audience} only."),
        None => format!("This page is available to {audience} only."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SubjectId;

    fn identity(role: Role) -> Identity {
        Identity::new(SubjectId::new("u1"), "Lee", "lee@example.com", role)
    }

    #[test]
    fn anonymous_visitor_on_admin_route_goes_to_login() {
        let denial = authorize(&AccessRule::admin(), None).unwrap_err();
        assert_eq!(denial.kind, DenialKind::NeedsLogin);
        assert_eq!(denial.redirect, RedirectTarget::Login);
    }

    #[test]
    fn user_on_admin_route_goes_home() {
        let denial = authorize(&AccessRule::admin(), Some(&identity(Role::User))).unwrap_err();
        assert_eq!(denial.kind, DenialKind::NeedsRole(Role::Admin));
        assert_eq!(denial.redirect, RedirectTarget::Home);
    }

    #[test]
    fn admin_on_admin_route_is_allowed() {
        assert!(authorize(&AccessRule::admin(), Some(&identity(Role::Admin))).is_ok());
    }

    #[test]
    fn any_identity_satisfies_authenticated() {
        let rule = AccessRule::authenticated();
        assert!(authorize(&rule, Some(&identity(Role::User))).is_ok());
        assert!(authorize(&rule, Some(&identity(Role::Admin))).is_ok());
        assert!(authorize(&rule, None).is_err());
    }

    #[test]
    fn notices_distinguish_login_from_role() {
        let rule = AccessRule::admin().for_feature("Product registration");

        let login = authorize(&rule, None).unwrap_err();
        let role = authorize(&rule, Some(&identity(Role::User))).unwrap_err();

        assert_eq!(login.notice, "Product registration requires you to log in.");
        assert_eq!(role.notice, "Product registration is available to administrators only.");
        assert_eq!(role.to_string(), role.notice);
    }
}
