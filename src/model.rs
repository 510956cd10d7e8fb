use crate::error::Error;
use crate::keys::key_matches_item;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Attribute values identifying a single item
pub type Key = HashMap<String, AttributeValue>;

/// A stored item, as returned by the store
pub type Item = HashMap<String, AttributeValue>;

/// Most write requests a single BatchWriteItem call accepts
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

/// Most keys a single BatchGetItem call accepts
pub const MAX_BATCH_GET_KEYS: usize = 100;

/// One response of a scan or query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
    /// Continuation token, `None` on the last page
    pub last_evaluated_key: Option<Key>,
    pub count: Option<i32>,
}

impl Page {
    pub fn new(items: Vec<Item>, last_evaluated_key: Option<Key>) -> Self {
        let count = i32::try_from(items.len()).ok();
        Self {
            items,
            last_evaluated_key,
            count,
        }
    }

    pub fn is_last(&self) -> bool {
        self.last_evaluated_key.is_none()
    }
}

/// Items fetched by key, paired with the key that requested them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedItems {
    entries: Vec<(Key, Item)>,
}

impl KeyedItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair `item` with the first of `keys` it carries, if any.
    pub(crate) fn insert_matching(&mut self, keys: &[Key], item: Item) -> bool {
        match keys.iter().find(|key| key_matches_item(key, &item)) {
            Some(key) => {
                self.entries.push((key.clone(), item));
                true
            }
            None => false,
        }
    }

    pub(crate) fn extend(&mut self, other: KeyedItems) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &Key) -> Option<&Item> {
        self.entries
            .iter()
            .find(|(k, _)| crate::keys::same_key(k, key))
            .map(|(_, item)| item)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Item)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl IntoIterator for KeyedItems {
    type Item = (Key, Item);
    type IntoIter = std::vec::IntoIter<(Key, Item)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Failure class a retry layer recovers from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// Transient internal error reported by the store
    InternalServerError,
    /// Transaction cancelled by a concurrent transaction, with no failed condition
    TransactionConflict,
}

impl RetryCondition {
    pub fn is_retryable(&self, error: &Error) -> bool {
        match self {
            Self::InternalServerError => error.is_internal_server_error(),
            Self::TransactionConflict => error.is_retryable_transaction_conflict(),
        }
    }
}

/// Published every time a retry layer observes a retryable failure
#[derive(Debug, Clone)]
pub struct RetryEvent {
    pub condition: RetryCondition,
    /// Zero-based index of the failed attempt
    pub attempt: usize,
    /// Wait before the next attempt, `None` once the schedule is exhausted
    pub delay: Option<Duration>,
    pub error: Error,
}

/// Configuration for PoweredDynamo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Wait before each retry; its length is the retry budget
    #[serde(rename = "retryWaitTimesMs", with = "duration_millis")]
    pub retry_wait_times: Vec<Duration>,
    /// Buffered retry events per subscriber
    pub event_capacity: usize,
}

impl Config {
    pub fn new(retry_wait_times: Vec<Duration>) -> Self {
        Self {
            retry_wait_times,
            ..Self::default()
        }
    }

    pub fn with_event_capacity(mut self, event_capacity: usize) -> Self {
        self.event_capacity = event_capacity;
        self
    }

    pub fn max_retries(&self) -> usize {
        self.retry_wait_times.len()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry_wait_times: vec![
                Duration::from_millis(100),
                Duration::from_millis(500),
                Duration::from_millis(1000),
            ],
            event_capacity: 64,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        durations: &[Duration],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let millis: Vec<u64> = durations
            .iter()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Duration>, D::Error> {
        let millis = Vec::<u64>::deserialize(deserializer)?;
        Ok(millis.into_iter().map(Duration::from_millis).collect())
    }
}
