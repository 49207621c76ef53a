// Client error taxonomy
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

pub type FieldErrors = BTreeMap<String, String>;

/// Every failure a client operation can surface to a view
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never completed (connect, TLS, timeout, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response; message taken from the body when present
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        field_errors: Option<FieldErrors>,
    },

    /// Client-side form schema rejection; never sent to the server
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: FieldErrors,
    },

    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ClientError::Server {
            status,
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn validation(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        ClientError::Validation {
            message: message.into(),
            field_errors,
        }
    }

    /// Single-field validation failure
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = FieldErrors::new();
        field_errors.insert(field.to_string(), message.clone());
        ClientError::Validation { message, field_errors }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ClientError::Unauthenticated(message.into())
    }

    /// HTTP status when the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NETWORK_FAILURE",
            ClientError::Server { .. } => "SERVER_ERROR",
            ClientError::Validation { .. } => "VALIDATION_FAILURE",
            ClientError::Unauthenticated(_) => "UNAUTHENTICATED",
            ClientError::Decode(_) => "INVALID_RESPONSE",
            ClientError::Storage(_) => "SESSION_STORAGE",
            ClientError::Config(_) => "INVALID_CONFIG",
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Validation { field_errors, .. } => Some(field_errors),
            ClientError::Server { field_errors, .. } => field_errors.as_ref(),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.to_string(),
            "error_code": self.error_code(),
        });
        if let Some(status) = self.status_code() {
            response["status"] = json!(status);
        }
        if let Some(fields) = self.field_errors() {
            response["field_errors"] = json!(fields);
        }
        response
    }

    /// Build a `Server` error from a non-2xx status and its (possibly empty) body.
    ///
    /// Message precedence: `error`, then `detail`, then the first entry of the
    /// field map, then a generic `HTTP <status>` text.
    ///
    /// The field map is the `errors` object when present. A body with none of
    /// `error`, `detail` or `errors` is a bare serializer error map
    /// (`{"name": ["..."]}`) and is read as the field map itself.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let object = parsed.as_ref().and_then(Value::as_object);

        let field_map = object.and_then(|obj| match obj.get("errors") {
            Some(errors) => errors.as_object(),
            None if !obj.contains_key("error") && !obj.contains_key("detail") => Some(obj),
            None => None,
        });

        let field_errors = field_map
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(_, err)| err.is_string() || err.is_array())
                    .map(|(field, err)| (field.clone(), first_message(err)))
                    .collect::<FieldErrors>()
            })
            .filter(|fields| !fields.is_empty());

        let message = parsed
            .as_ref()
            .and_then(|v| v.get("error").or_else(|| v.get("detail")))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                field_errors
                    .as_ref()
                    .and_then(|f| f.iter().next())
                    .map(|(field, msg)| format!("{}: {}", field, msg))
            })
            .unwrap_or_else(|| format!("HTTP {}", status));

        ClientError::Server {
            status,
            message,
            field_errors,
        }
    }
}

/// DRF reports field errors either as a string or a list of strings
fn first_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.first().map(first_message).unwrap_or_default(),
        other => other.to_string(),
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::server(status.as_u16(), err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}
