//! Route guard: applies the access policy to a mounted view.
//!
//! The guard remembers what it last evaluated. Calling [`RouteGuard::check`]
//! again with the same identity and route parameter is free and silent;
//! a change in either re-runs the policy and, on denial, shows one notice
//! and redirects.

use std::sync::Arc;

use storefront_auth::{AccessRule, Identity, SessionStore, authorize};
use tokio::sync::watch;

use crate::config::RouteTable;
use crate::navigation::{Navigator, Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Evaluation {
    identity: Option<Identity>,
    param: Option<String>,
    allowed: bool,
}

pub struct RouteGuard {
    rule: AccessRule,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    routes: RouteTable,
    identity_rx: watch::Receiver<Option<Identity>>,
    last: Option<Evaluation>,
}

impl RouteGuard {
    pub fn new(
        rule: AccessRule,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        routes: RouteTable,
    ) -> Self {
        let identity_rx = session.subscribe();
        Self {
            rule,
            session,
            navigator,
            notifier,
            routes,
            identity_rx,
            last: None,
        }
    }

    pub fn rule(&self) -> &AccessRule {
        &self.rule
    }

    /// May the view render for route parameter `param`?
    pub fn check(&mut self, param: Option<&str>) -> bool {
        self.identity_rx.borrow_and_update();
        let identity = self.session.current();

        if let Some(last) = &self.last {
            if last.identity == identity && last.param.as_deref() == param {
                return last.allowed;
            }
        }

        let allowed = match authorize(&self.rule, identity.as_ref()) {
            Ok(()) => true,
            Err(denial) => {
                tracing::info!(kind = ?denial.kind, "route access denied");
                self.notifier.notify(&denial.notice);
                self.navigator.navigate(self.routes.path_for(denial.redirect));
                false
            }
        };

        self.last = Some(Evaluation {
            identity,
            param: param.map(str::to_string),
            allowed,
        });
        allowed
    }

    /// Wait for the next identity change and re-check. `None` once the
    /// session store is gone.
    pub async fn changed(&mut self, param: Option<&str>) -> Option<bool> {
        self.identity_rx.changed().await.ok()?;
        Some(self.check(param))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{EffectChannel, UiEffect, drain};
    use crate::testing::{session_with, signed_out_session};
    use storefront_auth::{Credential, Role};

    fn guard(rule: AccessRule, session: Arc<SessionStore>) -> (RouteGuard, tokio::sync::mpsc::UnboundedReceiver<UiEffect>) {
        let (ui, rx) = EffectChannel::new();
        let ui = Arc::new(ui);
        (
            RouteGuard::new(rule, session, ui.clone(), ui, RouteTable::default()),
            rx,
        )
    }

    #[test]
    fn signed_out_admin_route_redirects_to_login() {
        let rule = AccessRule::admin().for_feature("Product update");
        let (mut g, mut rx) = guard(rule, signed_out_session());

        assert!(!g.check(Some("3")));
        assert_eq!(
            drain(&mut rx),
            vec![
                UiEffect::Notice("Product update requires you to log in.".to_string()),
                UiEffect::Navigate("/member/login".to_string()),
            ]
        );
    }

    #[test]
    fn user_on_admin_route_redirects_home() {
        let (mut g, mut rx) = guard(AccessRule::admin(), session_with(Role::User, "tok"));

        assert!(!g.check(None));
        let effects = drain(&mut rx);
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[1], UiEffect::Navigate("/".to_string()));
    }

    #[test]
    fn admin_passes_without_effects() {
        let (mut g, mut rx) = guard(AccessRule::admin(), session_with(Role::Admin, "tok"));
        assert!(g.check(Some("3")));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn unchanged_inputs_do_not_repeat_the_notice() {
        let (mut g, mut rx) = guard(AccessRule::authenticated(), signed_out_session());

        assert!(!g.check(Some("1")));
        assert!(!g.check(Some("1")));
        assert_eq!(drain(&mut rx).len(), 2);

        assert!(!g.check(Some("2")));
        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[tokio::test]
    async fn logout_is_noticed_while_mounted() {
        let session = session_with(Role::Admin, "tok");
        let (mut g, mut rx) = guard(AccessRule::admin(), session.clone());
        assert!(g.check(Some("5")));

        session.clear();
        assert_eq!(g.changed(Some("5")).await, Some(false));
        assert_eq!(
            drain(&mut rx).last(),
            Some(&UiEffect::Navigate("/member/login".to_string()))
        );

        session
            .establish(crate::testing::identity(Role::Admin), Credential::new("again"))
            .unwrap();
        assert_eq!(g.changed(Some("5")).await, Some(true));
    }
}
