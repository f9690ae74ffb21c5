//! `storefront-client`
//!
//! **Responsibility:** session lifecycle and request authorization for the
//! storefront UI.
//!
//! This crate provides:
//! - An authorization middleware around the shared HTTP transport
//! - A route guard that keeps protected views in step with the session
//! - Mapping of rejected writes into per-field form errors
//! - Typed product and cart endpoints
//!
//! Pages and forms are external collaborators; they talk to
//! [`StorefrontClient`] and receive navigation and notices through the
//! [`Navigator`] / [`Notifier`] capabilities they inject.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod navigation;
pub mod storage;
pub mod transport;
pub mod validation;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use api::StorefrontApi;
pub use client::StorefrontClient;
pub use config::{ClientConfig, RouteTable};
pub use error::ClientError;
pub use gate::RouteGuard;
pub use middleware::AuthorizedTransport;
pub use navigation::{EffectChannel, Navigator, Notifier, UiEffect};
pub use storage::FileStorage;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
pub use validation::{ValidationErrorBag, map_write_failure};
pub use view::{ViewScope, ViewTicket};
