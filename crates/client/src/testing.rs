//! Test doubles shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use storefront_auth::{Credential, Identity, MemoryStorage, Role, SessionStore, SubjectId};
use tokio::sync::Barrier;

use crate::error::ClientError;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

type Responder = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse, ClientError> + Send + Sync>;

/// Records every request and answers from a closure.
///
/// With a barrier, no request is answered until that many are in flight.
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<ApiRequest>>,
    respond: Responder,
    barrier: Option<Barrier>,
}

impl ScriptedTransport {
    pub(crate) fn new(
        respond: impl Fn(&ApiRequest) -> Result<ApiResponse, ClientError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
            barrier: None,
        }
    }

    pub(crate) fn status(status: u16, body: &'static str) -> Self {
        Self::new(move |_| Ok(ApiResponse::new(status, body)))
    }

    pub(crate) fn with_barrier(mut self, in_flight: usize) -> Self {
        self.barrier = Some(Barrier::new(in_flight));
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        (self.respond)(&request)
    }
}

pub(crate) fn identity(role: Role) -> Identity {
    Identity::new(SubjectId::new("kim01"), "Kim", "kim@example.com", role)
}

pub(crate) fn signed_out_session() -> Arc<SessionStore> {
    Arc::new(SessionStore::new(Arc::new(MemoryStorage::new()), "test.session"))
}

pub(crate) fn session_with(role: Role, token: &str) -> Arc<SessionStore> {
    let store = signed_out_session();
    store
        .establish(identity(role), Credential::new(token))
        .unwrap();
    store
}
