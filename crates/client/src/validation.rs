//! Turns a failed create/update call into per-field form errors.
//!
//! Write endpoints reject input with a body shaped like
//! `{"errors": {"<field>": "<message>", ...}, "message": "<summary>"}`.
//! Both keys are optional, and anything else (no response, HTML error page,
//! a bare string) still has to produce something the form can show.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use storefront_core::DomainError;

use crate::error::ClientError;

/// Name of the reserved slot for errors that belong to no single field.
pub const GENERAL: &str = "general";

/// Shown when a response arrived but carried no usable summary.
pub const WRITE_FAILURE_MESSAGE: &str = "An error occurred while saving.";

/// Shown when no response arrived at all.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "A communication error occurred with the server.";

/// Per-field error messages plus one general message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrorBag {
    fields: BTreeMap<String, String>,
    general: Option<String>,
}

impl ValidationErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn general_only(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            general: Some(message.into()),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        if name == GENERAL {
            return self.general();
        }
        self.fields.get(name).map(String::as_str)
    }

    pub fn general(&self) -> Option<&str> {
        self.general.as_deref()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set one slot; `general` goes to the general slot.
    pub fn set(&mut self, name: &str, message: impl Into<String>) {
        if name == GENERAL {
            self.general = Some(message.into());
        } else {
            self.fields.insert(name.to_string(), message.into());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_none()
    }

    /// Reset after a successful submission.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.general = None;
    }

    /// Flat view for renderers, with `general` as an ordinary key.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = self.fields.clone();
        if let Some(general) = &self.general {
            map.insert(GENERAL.to_string(), general.clone());
        }
        map
    }
}

/// Map a failed write into a fresh error bag. Never returns an empty bag.
pub fn map_write_failure(err: &ClientError) -> ValidationErrorBag {
    let bag = match err {
        ClientError::Api { body, .. } | ClientError::Unauthorized { body } => from_response_body(body),
        ClientError::Network(_) => ValidationErrorBag::general_only(TRANSPORT_FAILURE_MESSAGE),
        ClientError::Parse(_) => ValidationErrorBag::general_only(WRITE_FAILURE_MESSAGE),
        ClientError::Domain(DomainError::Validation { field: Some(field), message }) => {
            let mut bag = ValidationErrorBag::new();
            bag.set(field, message.clone());
            bag
        }
        ClientError::Domain(DomainError::Validation { field: None, message }) => {
            ValidationErrorBag::general_only(message.clone())
        }
        other => ValidationErrorBag::general_only(other.to_string()),
    };

    if bag.is_empty() {
        ValidationErrorBag::general_only(WRITE_FAILURE_MESSAGE)
    } else {
        bag
    }
}

fn from_response_body(body: &str) -> ValidationErrorBag {
    let Ok(Value::Object(root)) = serde_json::from_str::<Value>(body) else {
        return ValidationErrorBag::general_only(WRITE_FAILURE_MESSAGE);
    };

    let mut bag = ValidationErrorBag::new();

    if let Some(Value::Object(errors)) = root.get("errors") {
        for (field, value) in errors {
            if let Some(message) = message_text(value) {
                bag.set(field, message);
            }
        }
    }

    match root.get("message").and_then(message_text) {
        Some(message) => bag.general = Some(message),
        None if bag.general.is_none() => bag.general = Some(WRITE_FAILURE_MESSAGE.to_string()),
        None => {}
    }

    bag
}

fn message_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(message_text)
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    };
    (!text.trim().is_empty()).then_some(text)
}
