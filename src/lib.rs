//! PoweredDynamo - resilient writes and lazy pagination for DynamoDB
//!
//! Wraps the DynamoDB client with the two things callers otherwise write by
//! hand: writes that retry transient server errors (and, for transactions,
//! conflicts with concurrent transactions) on a fixed backoff schedule, and
//! scans/queries exposed as a cursor that follows continuation tokens on
//! demand. Batch writes are split to respect the store's per-call ceiling
//! and multi-gets are deduplicated and fanned out concurrently.
//!
//! # Example
//!
//! ```no_run
//! use powered_dynamo::{Config, PoweredDynamo};
//! use aws_sdk_dynamodb::operation::put_item::PutItemInput;
//! use aws_sdk_dynamodb::operation::scan::ScanInput;
//! use aws_sdk_dynamodb::types::AttributeValue;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let aws_config = aws_config::load_from_env().await;
//! let client = aws_sdk_dynamodb::Client::new(&aws_config);
//!
//! let dynamo = PoweredDynamo::from_client(
//!     client,
//!     Config::new(vec![
//!         Duration::from_millis(100),
//!         Duration::from_millis(500),
//!         Duration::from_millis(1000),
//!     ]),
//! );
//!
//! // Observe retries, e.g. for metrics
//! let mut retries = dynamo.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = retries.recv().await {
//!         println!("retrying after {:?}: {}", event.delay, event.error);
//!     }
//! });
//!
//! // Retried on transient server errors
//! dynamo
//!     .put(
//!         PutItemInput::builder()
//!             .table_name("users")
//!             .item("id", AttributeValue::S("123".to_string()))
//!             .build()?,
//!     )
//!     .await?;
//!
//! // Pages are fetched as the cursor advances
//! let mut users = dynamo.scan(ScanInput::builder().table_name("users").build()?);
//! while let Some(user) = users.next().await? {
//!     println!("{:?}", user);
//! }
//! # Ok(())
//! # }
//! ```

// No-op macros when tracing is disabled
#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {{}};
}
#[cfg(not(feature = "tracing"))]
macro_rules! warn {
    ($($tt:tt)*) => {{}};
}

pub mod batch;
pub mod client;
pub mod dynamodb;
pub mod error;
pub mod keys;
pub mod model;
pub mod powered_dynamo;
pub mod retry;
pub mod search;

// Re-export commonly used types
pub use client::DocumentClient;
pub use dynamodb::DynamoDbDocumentClient;
pub use error::{CancellationReason, Error};
pub use model::{
    Config, Item, Key, KeyedItems, Page, RetryCondition, RetryEvent, MAX_BATCH_GET_KEYS,
    MAX_BATCH_WRITE_ITEMS,
};
pub use powered_dynamo::PoweredDynamo;
pub use retry::Retrier;
pub use search::{SearchCursor, SearchInput};
