//! `storefront-auth` — client-side session and access policy.
//!
//! This crate is intentionally decoupled from HTTP. Durable storage is an
//! injected [`SessionStorage`] capability.

pub mod authorize;
pub mod identity;
pub mod roles;
pub mod session;
pub mod storage;

pub use authorize::{
    AccessRule, Denial, DenialKind, RedirectTarget, Requirement, authorize, login_notice,
};
pub use identity::{Credential, Identity, LoginResponse, SubjectId};
pub use roles::Role;
pub use session::{DEFAULT_SESSION_KEY, Session, SessionError, SessionStore};
pub use storage::{MemoryStorage, SessionStorage, StorageError};
