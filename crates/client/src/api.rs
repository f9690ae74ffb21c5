//! Typed storefront endpoints.
//!
//! Every call goes through the [`AuthorizedTransport`], so none of these
//! functions deals with credentials or 401 handling.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use storefront_auth::LoginResponse;
use storefront_core::{AddToCart, CartLine, Product, ProductDraft, ProductId};

use crate::error::ClientError;
use crate::middleware::AuthorizedTransport;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method};

pub struct StorefrontApi<T> {
    transport: AuthorizedTransport<T>,
}

impl<T: HttpTransport> StorefrontApi<T> {
    pub fn new(transport: AuthorizedTransport<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &AuthorizedTransport<T> {
        &self.transport
    }

    /// Send and require a 2xx status.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ClientError::Api {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    async fn get_json<R: DeserializeOwned>(&self, path: String) -> Result<R, ClientError> {
        self.execute(ApiRequest::get(path)).await?.json()
    }

    /// Create/update style call. The success body is returned as JSON, or as
    /// a JSON string when the server answers with plain text.
    pub async fn write<P: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        payload: &P,
    ) -> Result<Value, ClientError> {
        let body = serde_json::to_value(payload).map_err(|e| ClientError::Parse(e.to_string()))?;
        let response = self
            .execute(ApiRequest::new(method, endpoint).with_body(body))
            .await?;
        Ok(response.json_or_text())
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = ApiRequest::post("/member/login", json!({ "email": email, "password": password }));
        self.execute(request).await?.json()
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        self.get_json("/product/list".to_string()).await
    }

    pub async fn product_detail(&self, id: ProductId) -> Result<Product, ClientError> {
        self.get_json(format!("/product/detail/{id}")).await
    }

    /// Current values for the admin update form.
    pub async fn product_for_update(&self, id: ProductId) -> Result<Product, ClientError> {
        self.get_json(format!("/product/update/{id}")).await
    }

    pub async fn insert_product(&self, draft: &ProductDraft) -> Result<Value, ClientError> {
        draft.validate()?;
        self.write(Method::Post, "/product/insert", draft).await
    }

    pub async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<Value, ClientError> {
        draft.validate()?;
        self.write(Method::Put, &format!("/product/update/{id}"), draft).await
    }

    /// Returns the server's confirmation message.
    pub async fn add_to_cart(&self, request: &AddToCart) -> Result<String, ClientError> {
        match self.write(Method::Post, "/cart/insert", request).await? {
            Value::String(message) => Ok(message),
            other => Ok(other.to_string()),
        }
    }

    pub async fn cart_lines(&self) -> Result<Vec<CartLine>, ClientError> {
        let response = self.execute(ApiRequest::get("/cart/list")).await?;
        if response.body.trim().is_empty() {
            return Ok(Vec::new());
        }
        response.json()
    }
}
