//! `storefront-core` — storefront domain types.
//!
//! This crate contains **pure domain** types (no transport or storage).

pub mod cart;
pub mod error;
pub mod id;
pub mod product;

pub use cart::{AddToCart, CartLine, checked_total};
pub use error::{DomainError, DomainResult};
pub use id::{CartLineId, ProductId};
pub use product::{CATEGORY_PLACEHOLDER, Product, ProductCategory, ProductDraft};
