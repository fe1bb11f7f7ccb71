use thiserror::Error;

/// Failure of a remote collaborator call.
///
/// The cart manager does not branch on the variant; it folds all of them
/// into a generic operation failure. The split exists for logs and for
/// collaborator-side retry policies.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("service error ({0}): {1}")]
    Api(u16, String),

    #[error("parse error: {0}")]
    Parse(String),
}
