//! Entry points used by pages and forms.
//!
//! One [`StorefrontClient`] owns the session store, the authorized
//! transport and the UI capabilities. Pages call `login`, `logout`,
//! `submit_write` and `require_auth` (plus the cart/product helpers) and never
//! touch credentials or 401 handling themselves.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use storefront_auth::{
    AccessRule, Credential, Denial, Identity, LoginResponse, SessionError, SessionStorage,
    SessionStore, authorize, login_notice,
};
use storefront_core::{AddToCart, CartLine, DomainError, Product, ProductDraft, ProductId};

use crate::api::StorefrontApi;
use crate::config::{ClientConfig, RouteTable};
use crate::error::ClientError;
use crate::gate::RouteGuard;
use crate::middleware::AuthorizedTransport;
use crate::navigation::{Navigator, Notifier};
use crate::storage::FileStorage;
use crate::transport::{HttpTransport, Method, ReqwestTransport};
use crate::validation::{ValidationErrorBag, map_write_failure};
use crate::view::ViewTicket;

pub struct StorefrontClient<T> {
    routes: RouteTable,
    session: Arc<SessionStore>,
    api: StorefrontApi<T>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl StorefrontClient<ReqwestTransport> {
    /// Production wiring: `reqwest` transport and a session file in the
    /// configured (or OS default) data directory.
    pub fn from_config(
        config: &ClientConfig,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let storage = match &config.data_dir {
            Some(dir) => FileStorage::new(dir),
            None => FileStorage::in_default_dir().map_err(SessionError::from)?,
        };
        tracing::debug!(dir = %storage.dir().display(), "using session directory");

        Ok(Self::new(
            config,
            Arc::new(storage),
            ReqwestTransport::new(&config.api_base_url),
            navigator,
            notifier,
        ))
    }
}

impl<T: HttpTransport> StorefrontClient<T> {
    /// Wire the client and restore any session persisted by a previous run.
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn SessionStorage>,
        transport: T,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(storage, config.session_key.clone()));
        session.restore();

        let transport = AuthorizedTransport::new(
            transport,
            session.clone(),
            navigator.clone(),
            config.routes.login.clone(),
        );

        Self {
            routes: config.routes.clone(),
            session,
            api: StorefrontApi::new(transport),
            navigator,
            notifier,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn api(&self) -> &StorefrontApi<T> {
        &self.api
    }

    pub fn current(&self) -> Option<Identity> {
        self.session.current()
    }

    pub fn login(&self, identity: Identity, credential: Credential) -> Result<(), ClientError> {
        self.session.establish(identity, credential)?;
        Ok(())
    }

    pub fn login_with(&self, response: LoginResponse) -> Result<Identity, ClientError> {
        let (identity, credential) = response.into_parts();
        self.login(identity.clone(), credential)?;
        Ok(identity)
    }

    /// Ask the server for a session and establish it.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ClientError> {
        let response = self.api.authenticate(email, password).await?;
        self.login_with(response)
    }

    pub fn logout(&self) {
        self.session.clear();
        self.navigator.navigate(&self.routes.login);
    }

    /// Submit a create/update. Failures come back as form errors.
    pub async fn submit_write<P: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        payload: &P,
    ) -> Result<Value, ValidationErrorBag> {
        self.api
            .write(method, endpoint, payload)
            .await
            .map_err(|err| write_failed(endpoint, &err))
    }

    /// Insert (`id == None`) or update a product from the admin form.
    pub async fn save_product(
        &self,
        id: Option<ProductId>,
        draft: &ProductDraft,
    ) -> Result<Value, ValidationErrorBag> {
        let result = match id {
            Some(id) => self.api.update_product(id, draft).await,
            None => self.api.insert_product(draft).await,
        };
        result.map_err(|err| write_failed("/product", &err))
    }

    /// Gate a view once. On denial the notice is shown and the redirect issued.
    pub fn require_auth(&self, rule: &AccessRule) -> bool {
        match authorize(rule, self.session.current().as_ref()) {
            Ok(()) => true,
            Err(denial) => {
                self.deny(&denial);
                false
            }
        }
    }

    /// A guard that re-checks `rule` for a mounted view.
    pub fn guard(&self, rule: AccessRule) -> RouteGuard {
        RouteGuard::new(
            rule,
            self.session.clone(),
            self.navigator.clone(),
            self.notifier.clone(),
            self.routes.clone(),
        )
    }

    pub async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<String, ClientError> {
        let rule = AccessRule::authenticated().for_feature("Adding to the cart");
        let identity = self.session.current();
        if let Err(denial) = authorize(&rule, identity.as_ref()) {
            self.deny(&denial);
            return Err(denial.into());
        }
        let member_id = identity.map(|i| i.subject_id().to_string()).unwrap_or_default();

        let request = match AddToCart::new(member_id, product_id, quantity) {
            Ok(request) => request,
            Err(err) => {
                self.notifier.notify(&validation_message(&err));
                return Err(err.into());
            }
        };

        match self.api.add_to_cart(&request).await {
            Ok(message) => {
                self.notifier.notify(&message);
                self.navigator.navigate(&self.routes.product_list);
                Ok(message)
            }
            Err(err) => {
                if err.is_unauthorized() {
                    self.session_ended();
                } else {
                    self.notifier.notify("Failed to add the product to the cart.");
                }
                Err(err)
            }
        }
    }

    /// Load the cart for the view holding `ticket`. On failure the user is
    /// sent back to the product list. `None` once the view has moved on.
    pub async fn load_cart(&self, ticket: &ViewTicket) -> Option<Result<Vec<CartLine>, ClientError>> {
        let result = self.api.cart_lines().await;
        self.settle(ticket, result, |client| {
            client
                .notifier
                .notify("No cart information was found; returning to the product list.");
            client.navigator.navigate(&client.routes.product_list);
        })
    }

    /// Load one product for the view holding `ticket`. On failure the user
    /// goes back to the previous view. `None` once the view has moved on.
    pub async fn load_product(
        &self,
        id: ProductId,
        ticket: &ViewTicket,
    ) -> Option<Result<Product, ClientError>> {
        let result = self.api.product_detail(id).await;
        self.settle(ticket, result, |client| {
            client
                .notifier
                .notify("An error occurred while loading the product information.");
            client.navigator.back();
        })
    }

    /// Deliver a loader result to its view. A stale view gets neither the
    /// result nor the failure effects.
    fn settle<R>(
        &self,
        ticket: &ViewTicket,
        result: Result<R, ClientError>,
        on_failure: impl FnOnce(&Self),
    ) -> Option<Result<R, ClientError>> {
        if let Err(err) = &result {
            if err.is_unauthorized() {
                // The redirect to login happened whether or not the view is
                // still current, so its notice does too.
                self.session_ended();
            } else if ticket.is_current() {
                on_failure(self);
            }
        }
        ticket.accept(result)
    }

    /// Notice for a 401; the middleware has already redirected to login.
    fn session_ended(&self) {
        self.notifier.notify(&login_notice(None));
    }

    fn deny(&self, denial: &Denial) {
        self.notifier.notify(&denial.notice);
        self.navigator.navigate(self.routes.path_for(denial.redirect));
    }
}

fn write_failed(endpoint: &str, err: &ClientError) -> ValidationErrorBag {
    tracing::warn!(endpoint, status = ?err.status(), error = %err, "write rejected");
    map_write_failure(err)
}

fn validation_message(err: &DomainError) -> String {
    match err {
        DomainError::Validation { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
