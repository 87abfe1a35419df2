use serde::Deserialize;

use crate::error::FieldError;

// Shapes the backend uses for error bodies.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawErrorBody {
    Fields { errors: Vec<FieldError> },
    Message { message: String },
    Text(String),
}

/// A failed response's body, reduced to field errors plus one message.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ErrorBody {
    pub errors: Vec<FieldError>,
    pub message: String,
}

impl ErrorBody {
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<RawErrorBody>(text) {
            Ok(RawErrorBody::Fields { errors }) => {
                let message = errors
                    .iter()
                    .map(|e| e.msg.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Self { errors, message }
            }
            Ok(RawErrorBody::Message { message }) | Ok(RawErrorBody::Text(message)) => Self {
                errors: vec![],
                message,
            },
            Err(_) => Self {
                errors: vec![],
                message: text.trim().to_string(),
            },
        }
    }

    pub fn mentions_duplicate(&self) -> bool {
        self.message.to_lowercase().contains("already exists")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_validator_errors() {
        let body = ErrorBody::parse(
            r#"{"errors":[{"type":"field","msg":"Username is required","path":"Username"},{"msg":"Password is required","param":"Password"}]}"#,
        );
        assert_eq!(body.errors.len(), 2);
        assert_eq!(body.errors[1].path.as_deref(), Some("Password"));
        assert_eq!(body.message, "Username is required, Password is required");
    }

    #[test]
    fn parses_message_object_json_string_and_plain_text() {
        assert_eq!(
            ErrorBody::parse(r#"{"message":"Something is not right","user":false}"#).message,
            "Something is not right"
        );
        assert_eq!(ErrorBody::parse(r#""nope""#).message, "nope");
        let body = ErrorBody::parse("alice already exists\n");
        assert_eq!(body.message, "alice already exists");
        assert!(body.mentions_duplicate());
    }
}
