use serde::{Deserialize, Serialize};

use crate::Role;

/// Identity of the logged-in member as the backend names it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SubjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Public profile of the authenticated member.
///
/// Immutable once built; a login replaces it and a logout drops it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    subject_id: SubjectId,
    display_name: String,
    email_address: String,
    role: Role,
}

impl Identity {
    pub fn new(
        subject_id: SubjectId,
        display_name: impl Into<String>,
        email_address: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            subject_id,
            display_name: display_name.into(),
            email_address: email_address.into(),
            role,
        }
    }

    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Opaque bearer token issued at login.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Payload returned by `POST /member/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl LoginResponse {
    pub fn into_parts(self) -> (Identity, Credential) {
        let identity = Identity::new(SubjectId::new(self.id), self.name, self.email, self.role);
        (identity, Credential::new(self.access_token))
    }
}
