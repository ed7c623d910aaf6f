use thiserror::Error;

use crate::types::ChatRequest;

pub const DEFAULT_MAX_MESSAGE_LEN: usize = 4000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("`message` must not be empty")]
    EmptyMessage,

    #[error("`message` exceeds the maximum length of {max} characters")]
    MessageTooLong { max: usize },
}

/// Normalize and check an incoming chat request. Pure: no side effects, the
/// returned request carries the trimmed message.
pub fn validate_chat_request(
    request: ChatRequest,
    max_message_len: usize,
) -> Result<ChatRequest, ValidationError> {
    let message = request.message.trim();

    if message.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    if message.chars().count() > max_message_len {
        return Err(ValidationError::MessageTooLong {
            max: max_message_len,
        });
    }

    Ok(ChatRequest {
        message: message.to_string(),
        ..request
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_is_rejected() {
        let err = validate_chat_request(ChatRequest::new(""), DEFAULT_MAX_MESSAGE_LEN).unwrap_err();
        assert_eq!(err, ValidationError::EmptyMessage);
    }

    #[test]
    fn whitespace_only_message_is_rejected() {
        let err =
            validate_chat_request(ChatRequest::new("  \n\t "), DEFAULT_MAX_MESSAGE_LEN).unwrap_err();
        assert_eq!(err, ValidationError::EmptyMessage);
    }

    #[test]
    fn oversized_message_is_rejected() {
        let err = validate_chat_request(ChatRequest::new("abcdef"), 5).unwrap_err();
        assert_eq!(err, ValidationError::MessageTooLong { max: 5 });
    }

    #[test]
    fn valid_message_is_trimmed() {
        let request =
            validate_chat_request(ChatRequest::new("  hello  "), DEFAULT_MAX_MESSAGE_LEN).unwrap();
        assert_eq!(request.message, "hello");
    }

    #[test]
    fn hints_survive_normalization() {
        let mut request = ChatRequest::new("configure the ICAP server");
        request.product = Some("MetaDefender ICAP".to_string());

        let validated = validate_chat_request(request, DEFAULT_MAX_MESSAGE_LEN).unwrap();
        assert_eq!(validated.product.as_deref(), Some("MetaDefender ICAP"));
    }
}
