use async_graphql::{Error, ErrorExtensions};

use crate::error::AppError;

pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
pub const FORBIDDEN: &str = "FORBIDDEN";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

/// A client mistake: `extensions.code` is `BAD_USER_INPUT` and
/// `extensions.messages` lists the details.
pub fn bad_user_input(message: impl Into<String>, messages: Vec<String>) -> Error {
    Error::new(message).extend_with(|_, extensions| {
        extensions.set("code", BAD_USER_INPUT);
        extensions.set("messages", messages);
    })
}

/// A single-message client mistake.
pub fn bad_user_input_msg(message: impl Into<String>) -> Error {
    let message = message.into();
    bad_user_input(message.clone(), vec![message])
}

pub fn forbidden() -> Error {
    Error::new("Forbidden resource").extend_with(|_, extensions| {
        extensions.set("code", FORBIDDEN);
    })
}

/// Infrastructure failures are logged and reported without details.
pub fn internal(err: AppError) -> Error {
    tracing::error!(error = %err, "GraphQL request failed with an internal error");
    Error::new("Internal Server Error").extend_with(|_, extensions| {
        extensions.set("code", INTERNAL_SERVER_ERROR);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Value;

    #[test]
    fn test_bad_user_input_extensions() {
        let error = bad_user_input("invalid", vec!["a".to_string(), "b".to_string()]);
        let extensions = error.extensions.expect("extensions");

        assert_eq!(extensions.get("code"), Some(&Value::from(BAD_USER_INPUT)));
        assert_eq!(
            extensions.get("messages"),
            Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn test_internal_hides_details() {
        let error = internal(AppError::Internal(anyhow::anyhow!("disk on fire")));
        assert_eq!(error.message, "Internal Server Error");
    }
}
