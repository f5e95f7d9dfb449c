use iron::status::{self, Status};
use iron::IronError;
use serde_json::Value;
use thiserror::Error;

/// A post field that a client can be required to supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Content,
}

#[derive(Debug, PartialEq, Error)]
pub enum PostError {
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Missing fields")]
    MissingFields(Vec<Field>),
    #[error("Invalid sort field")]
    InvalidSortField,
    #[error("Invalid direction")]
    InvalidDirection,
    #[error("Invalid ID format")]
    InvalidIdFormat,
    #[error("Post not found")]
    NotFound,
}

impl PostError {
    pub fn status(&self) -> Status {
        match *self {
            PostError::NotFound => status::NotFound,
            _ => status::BadRequest,
        }
    }

    /// The JSON body sent to the client, always carrying an `error` message.
    pub fn body(&self) -> Value {
        match *self {
            PostError::MissingFields(ref fields) => {
                json!({ "error": self.to_string(), "missing_fields": fields })
            }
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl From<PostError> for IronError {
    fn from(err: PostError) -> IronError {
        let modifier = (err.status(), err.body().to_string());
        IronError::new(err, modifier)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid port {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: ::std::num::ParseIntError,
    },
    #[error("invalid bind address {0:?}")]
    InvalidAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_the_only_404() {
        assert_eq!(PostError::NotFound.status(), status::NotFound);
        assert_eq!(PostError::InvalidIdFormat.status(), status::BadRequest);
        assert_eq!(PostError::MissingFields(vec![]).status(), status::BadRequest);
    }

    #[test]
    fn missing_fields_are_listed() {
        let err = PostError::MissingFields(vec![Field::Title, Field::Content]);
        assert_eq!(err.body(),
                   json!({ "error": "Missing fields", "missing_fields": ["title", "content"] }));
    }

    #[test]
    fn other_errors_carry_only_a_message() {
        assert_eq!(PostError::InvalidDirection.body(),
                   json!({ "error": "Invalid direction" }));
        assert_eq!(PostError::NotFound.body(), json!({ "error": "Post not found" }));
    }
}
