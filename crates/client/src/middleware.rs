//! Authorization middleware around the shared transport.
//!
//! Before dispatch the current credential (if any) is attached as a bearer
//! header; after the response arrives a 401 tears the session down and
//! sends the user to the login route. The 401 still reaches the caller as
//! [`ClientError::Unauthorized`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use storefront_auth::SessionStore;

use crate::error::ClientError;
use crate::navigation::Navigator;
use crate::transport::{AUTHORIZATION, ApiRequest, ApiResponse, HttpTransport, UNAUTHORIZED};

pub struct AuthorizedTransport<T> {
    inner: T,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    /// Number of login redirects issued so far.
    redirects: AtomicU64,
}

impl<T: HttpTransport> AuthorizedTransport<T> {
    pub fn new(
        inner: T,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            session,
            navigator,
            login_path: login_path.into(),
            redirects: AtomicU64::new(0),
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Drop the session and redirect to login, once per batch of failures.
    ///
    /// A request that carried a credential redirects only if its `clear()`
    /// removed the session. A request sent without one redirects unless a
    /// redirect was already issued after it was dispatched (`epoch` is the
    /// redirect count seen at dispatch).
    fn teardown(&self, sent_credential: bool, epoch: u64) {
        let cleared = self.session.clear();
        let first = if cleared {
            self.redirects.fetch_add(1, Ordering::SeqCst);
            true
        } else if !sent_credential {
            self.redirects
                .compare_exchange(epoch, epoch + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        } else {
            false
        };

        if first {
            tracing::info!(path = %self.login_path, cleared, "authorization failed; redirecting to login");
            self.navigator.navigate(&self.login_path);
        } else {
            tracing::debug!("authorization failed; login redirect already issued");
        }
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for AuthorizedTransport<T> {
    async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let credential = self.session.credential();
        let sent_credential = credential.is_some();
        let epoch = self.redirects.load(Ordering::SeqCst);

        match credential {
            Some(credential) => request = request.with_header(AUTHORIZATION, credential.bearer()),
            None => request.remove_header(AUTHORIZATION),
        }

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            authenticated = sent_credential,
            "dispatching request"
        );

        let response = self.inner.send(request).await?;

        if response.status == UNAUTHORIZED {
            self.teardown(sent_credential, epoch);
            return Err(ClientError::Unauthorized {
                body: response.body,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{EffectChannel, UiEffect, drain};
    use crate::testing::{ScriptedTransport, session_with, signed_out_session};
    use storefront_auth::Role;

    const LOGIN: &str = "/member/login";

    fn wrap(
        transport: Arc<ScriptedTransport>,
        session: Arc<SessionStore>,
    ) -> (
        AuthorizedTransport<Arc<ScriptedTransport>>,
        tokio::sync::mpsc::UnboundedReceiver<UiEffect>,
    ) {
        let (ui, rx) = EffectChannel::new();
        (AuthorizedTransport::new(transport, session, Arc::new(ui), LOGIN), rx)
    }

    #[tokio::test]
    async fn attaches_stored_credential() {
        let transport = Arc::new(ScriptedTransport::status(200, "[]"));
        let (client, _rx) = wrap(transport.clone(), session_with(Role::User, "tok-1"));

        client.send(ApiRequest::get("/cart/list")).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].header(AUTHORIZATION), Some("Bearer tok-1"));
    }

    #[tokio::test]
    async fn anonymous_requests_carry_no_credential() {
        let transport = Arc::new(ScriptedTransport::status(200, "[]"));
        let (client, _rx) = wrap(transport.clone(), signed_out_session());

        let req = ApiRequest::get("/product/list").with_header(AUTHORIZATION, "Bearer forged");
        client.send(req).await.unwrap();

        assert_eq!(transport.requests()[0].header(AUTHORIZATION), None);
    }

    #[tokio::test]
    async fn unauthorized_tears_down_and_redirects() {
        let transport = Arc::new(ScriptedTransport::status(401, "token expired"));
        let session = session_with(Role::Admin, "stale");
        let (client, mut rx) = wrap(transport, session.clone());

        let err = client.send(ApiRequest::get("/cart/list")).await.unwrap_err();

        assert!(matches!(err, ClientError::Unauthorized { ref body } if body == "token expired"));
        assert_eq!(session.current(), None);
        assert_eq!(session.credential(), None);
        assert_eq!(drain(&mut rx), vec![UiEffect::Navigate(LOGIN.to_string())]);
    }

    #[tokio::test]
    async fn other_statuses_pass_through() {
        let transport = Arc::new(ScriptedTransport::status(500, "boom"));
        let session = session_with(Role::User, "tok");
        let (client, mut rx) = wrap(transport, session.clone());

        let resp = client.send(ApiRequest::get("/product/list")).await.unwrap();

        assert_eq!(resp, ApiResponse::new(500, "boom"));
        assert!(session.is_authenticated());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn network_failure_keeps_session() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Err(ClientError::Network("connection refused".to_string()))
        }));
        let session = session_with(Role::User, "tok");
        let (client, mut rx) = wrap(transport, session.clone());

        let err = client.send(ApiRequest::get("/product/list")).await.unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
        assert!(session.is_authenticated());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn concurrent_failures_redirect_once() {
        let transport = Arc::new(ScriptedTransport::status(401, "").with_barrier(3));
        let session = session_with(Role::User, "tok");
        let (client, mut rx) = wrap(transport.clone(), session.clone());

        let (a, b, c) = tokio::join!(
            client.send(ApiRequest::get("/cart/list")),
            client.send(ApiRequest::get("/product/detail/1")),
            client.send(ApiRequest::get("/product/detail/2")),
        );

        assert!(a.unwrap_err().is_unauthorized());
        assert!(b.unwrap_err().is_unauthorized());
        assert!(c.unwrap_err().is_unauthorized());
        assert!(
            transport
                .requests()
                .iter()
                .all(|r| r.header(AUTHORIZATION) == Some("Bearer tok"))
        );
        assert_eq!(session.current(), None);
        assert_eq!(drain(&mut rx), vec![UiEffect::Navigate(LOGIN.to_string())]);
    }

    #[tokio::test]
    async fn anonymous_unauthorized_still_redirects() {
        let transport = Arc::new(ScriptedTransport::status(401, ""));
        let (client, mut rx) = wrap(transport, signed_out_session());

        let err = client.send(ApiRequest::get("/cart/list")).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(drain(&mut rx), vec![UiEffect::Navigate(LOGIN.to_string())]);
    }

    #[tokio::test]
    async fn concurrent_anonymous_failures_redirect_once() {
        let transport = Arc::new(ScriptedTransport::status(401, "").with_barrier(3));
        let (client, mut rx) = wrap(transport, signed_out_session());

        let (a, b, c) = tokio::join!(
            client.send(ApiRequest::get("/cart/list")),
            client.send(ApiRequest::get("/cart/list")),
            client.send(ApiRequest::get("/product/insert")),
        );

        assert!(a.unwrap_err().is_unauthorized());
        assert!(b.unwrap_err().is_unauthorized());
        assert!(c.unwrap_err().is_unauthorized());
        assert_eq!(drain(&mut rx), vec![UiEffect::Navigate(LOGIN.to_string())]);
    }

    #[tokio::test]
    async fn sequential_anonymous_failures_each_redirect() {
        let transport = Arc::new(ScriptedTransport::status(401, ""));
        let (client, mut rx) = wrap(transport, signed_out_session());

        client.send(ApiRequest::get("/cart/list")).await.unwrap_err();
        client.send(ApiRequest::get("/cart/list")).await.unwrap_err();

        assert_eq!(
            drain(&mut rx),
            vec![
                UiEffect::Navigate(LOGIN.to_string()),
                UiEffect::Navigate(LOGIN.to_string()),
            ]
        );
    }
}
