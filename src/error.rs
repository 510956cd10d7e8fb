use aws_sdk_dynamodb::error::{BuildError, SdkError};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Conditional check failed: {0}")]
    ConditionalCheckFailed(String),

    #[error(
        "Transaction cancelled, please refer cancellation reasons for specific reasons [{}]",
        join_reasons(.reasons)
    )]
    TransactionCanceled { reasons: Vec<CancellationReason> },

    #[error("Max writing retries reached in DynamoDB after {attempts} attempts")]
    MaxRetriesReached {
        attempts: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Operation not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("DynamoDB error: {0}")]
    DynamoDb(String),
}

impl Error {
    /// The store reported a temporary internal condition.
    pub fn is_internal_server_error(&self) -> bool {
        matches!(self, Error::InternalServerError(_))
    }

    /// A condition expression rejected the write, either directly or as one
    /// of the reasons a transaction was cancelled.
    pub fn is_conditional_check_failed(&self) -> bool {
        match self {
            Error::ConditionalCheckFailed(_) => true,
            Error::TransactionCanceled { reasons } => reasons
                .iter()
                .any(|r| matches!(r, CancellationReason::ConditionalCheckFailed)),
            _ => false,
        }
    }

    /// A cancelled transaction that lost a race with a concurrent one and
    /// carries no conditional check failure.
    pub fn is_retryable_transaction_conflict(&self) -> bool {
        match self {
            Error::TransactionCanceled { reasons } => {
                let conflict = reasons
                    .iter()
                    .any(|r| matches!(r, CancellationReason::TransactionConflict));
                conflict && !self.is_conditional_check_failed()
            }
            _ => false,
        }
    }
}

/// Why a single item of a transactional write was cancelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancellationReason {
    None,
    ConditionalCheckFailed,
    TransactionConflict,
    Other(String),
}

impl CancellationReason {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            None | Some("None") => Self::None,
            Some("ConditionalCheckFailed") => Self::ConditionalCheckFailed,
            Some("TransactionConflict") => Self::TransactionConflict,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::ConditionalCheckFailed => f.write_str("ConditionalCheckFailed"),
            Self::TransactionConflict => f.write_str("TransactionConflict"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

fn join_reasons(reasons: &[CancellationReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl From<aws_sdk_dynamodb::Error> for Error {
    fn from(err: aws_sdk_dynamodb::Error) -> Self {
        use aws_sdk_dynamodb::Error as Dynamo;

        match err {
            Dynamo::InternalServerError(e) => Error::InternalServerError(e.to_string()),
            Dynamo::ConditionalCheckFailedException(e) => {
                Error::ConditionalCheckFailed(e.to_string())
            }
            Dynamo::TransactionCanceledException(e) => Error::TransactionCanceled {
                reasons: e
                    .cancellation_reasons
                    .unwrap_or_default()
                    .iter()
                    .map(|r| CancellationReason::from_code(r.code()))
                    .collect(),
            },
            other => Error::DynamoDb(other.to_string()),
        }
    }
}

impl<E, R> From<SdkError<E, R>> for Error
where
    aws_sdk_dynamodb::Error: From<SdkError<E, R>>,
{
    fn from(err: SdkError<E, R>) -> Self {
        Error::from(aws_sdk_dynamodb::Error::from(err))
    }
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Self {
        Error::InvalidRequest(err.to_string())
    }
}
