use crate::batch::chunk_write_requests;
use crate::client::DocumentClient;
use crate::dynamodb::DynamoDbDocumentClient;
use crate::error::Error;
use crate::keys::dedupe_keys;
use crate::model::{
    Config, Item, Key, KeyedItems, RetryCondition, RetryEvent, MAX_BATCH_GET_KEYS,
    MAX_BATCH_WRITE_ITEMS,
};
use crate::retry::Retrier;
use crate::search::SearchCursor;
use aws_sdk_dynamodb::operation::batch_get_item::BatchGetItemInput;
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemInput;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemInput;
use aws_sdk_dynamodb::operation::get_item::GetItemInput;
use aws_sdk_dynamodb::operation::put_item::PutItemInput;
use aws_sdk_dynamodb::operation::query::QueryInput;
use aws_sdk_dynamodb::operation::scan::ScanInput;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsInput;
use aws_sdk_dynamodb::operation::update_item::UpdateItemInput;
use aws_sdk_dynamodb::types::{KeysAndAttributes, WriteRequest};
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, warn};

/// DynamoDB access with retried writes and lazily paginated reads
pub struct PoweredDynamo {
    client: Arc<dyn DocumentClient>,
    retrier: Retrier,
}

impl PoweredDynamo {
    pub fn new(client: Arc<dyn DocumentClient>, config: Config) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            client,
            retrier: Retrier::new(config.retry_wait_times, events),
        }
    }

    pub fn from_client(client: aws_sdk_dynamodb::Client, config: Config) -> Self {
        Self::new(Arc::new(DynamoDbDocumentClient::new(client)), config)
    }

    /// Receive an event for every retryable failure observed from now on.
    ///
    /// Events are best effort: a receiver that falls behind by more than the
    /// configured capacity skips the oldest ones.
    pub fn subscribe(&self) -> broadcast::Receiver<RetryEvent> {
        self.retrier.subscribe()
    }

    /// Fetch one item. Not retried.
    #[cfg_attr(feature = "tracing", instrument(skip_all, fields(table = ?input.table_name)))]
    pub async fn get(&self, input: GetItemInput) -> Result<Option<Item>, Error> {
        self.client.get(input).await
    }

    /// Fetch items by key from one table.
    ///
    /// Repeated keys are fetched once. Keys are sent in batches of up to
    /// 100, all in flight at the same time; the first failing batch fails
    /// the whole call. Keys with no stored item are absent from the result.
    #[cfg_attr(feature = "tracing", instrument(skip(self, keys), fields(keys = keys.len())))]
    pub async fn get_list(&self, table_name: &str, keys: Vec<Key>) -> Result<KeyedItems, Error> {
        let unique_keys = dedupe_keys(keys);
        debug!(unique = unique_keys.len(), "Fetching keys");

        let batches = unique_keys
            .chunks(MAX_BATCH_GET_KEYS)
            .map(|batch| self.get_batch(table_name, batch));
        let results = try_join_all(batches).await?;

        let mut items = KeyedItems::new();
        for batch in results {
            items.extend(batch);
        }
        Ok(items)
    }

    /// Lazily page through a scan. Page fetches are not retried.
    pub fn scan(&self, input: ScanInput) -> SearchCursor<ScanInput> {
        let client = Arc::clone(&self.client);
        SearchCursor::from_fn(input, move |input| {
            let client = Arc::clone(&client);
            async move { client.scan(input).await }
        })
    }

    /// Lazily page through a query. Page fetches are not retried.
    pub fn query(&self, input: QueryInput) -> SearchCursor<QueryInput> {
        let client = Arc::clone(&self.client);
        SearchCursor::from_fn(input, move |input| {
            let client = Arc::clone(&client);
            async move { client.query(input).await }
        })
    }

    #[cfg_attr(feature = "tracing", instrument(skip_all, fields(table = ?input.table_name)))]
    pub async fn put(&self, input: PutItemInput) -> Result<Option<Item>, Error> {
        self.retrier
            .retry(RetryCondition::InternalServerError, || {
                self.client.put(input.clone())
            })
            .await
    }

    #[cfg_attr(feature = "tracing", instrument(skip_all, fields(table = ?input.table_name)))]
    pub async fn update(&self, input: UpdateItemInput) -> Result<Option<Item>, Error> {
        self.retrier
            .retry(RetryCondition::InternalServerError, || {
                self.client.update(input.clone())
            })
            .await
    }

    #[cfg_attr(feature = "tracing", instrument(skip_all, fields(table = ?input.table_name)))]
    pub async fn delete(&self, input: DeleteItemInput) -> Result<Option<Item>, Error> {
        self.retrier
            .retry(RetryCondition::InternalServerError, || {
                self.client.delete(input.clone())
            })
            .await
    }

    /// Write any number of requests across tables.
    ///
    /// Requests go out in chunks of at most 25, one chunk at a time, each
    /// retried on its own. A chunk that fails stops the call; chunks already
    /// written stay written. Returns the requests the store reported as
    /// unprocessed.
    #[cfg_attr(feature = "tracing", instrument(skip_all))]
    pub async fn batch_write(
        &self,
        mut input: BatchWriteItemInput,
    ) -> Result<HashMap<String, Vec<WriteRequest>>, Error> {
        let request_items = input.request_items.take().unwrap_or_default();
        let chunks = chunk_write_requests(request_items, MAX_BATCH_WRITE_ITEMS);
        debug!(chunks = chunks.len(), "Writing batch");

        let mut unprocessed: HashMap<String, Vec<WriteRequest>> = HashMap::new();
        for chunk in chunks {
            debug!(tables = chunk.len(), "Writing batch chunk");
            let mut request = input.clone();
            request.request_items = Some(chunk);

            let left = self
                .retrier
                .retry(RetryCondition::InternalServerError, || {
                    self.client.batch_write(request.clone())
                })
                .await?;

            for (table_name, requests) in left {
                unprocessed.entry(table_name).or_default().extend(requests);
            }
        }

        if !unprocessed.is_empty() {
            warn!(
                tables = unprocessed.len(),
                "Batch write finished with unprocessed requests"
            );
        }
        Ok(unprocessed)
    }

    /// Apply a transaction, retrying both transient server errors and
    /// conflicts with concurrent transactions. A failed condition check is
    /// returned on the first attempt.
    #[cfg_attr(feature = "tracing", instrument(skip_all))]
    pub async fn transact_write(&self, input: TransactWriteItemsInput) -> Result<(), Error> {
        let input = &input;
        self.retrier
            .retry(RetryCondition::TransactionConflict, move || {
                self.retrier
                    .retry(RetryCondition::InternalServerError, move || {
                        self.client.transact_write(input.clone())
                    })
            })
            .await
    }

    async fn get_batch(&self, table_name: &str, keys: &[Key]) -> Result<KeyedItems, Error> {
        let input = BatchGetItemInput::builder()
            .request_items(
                table_name,
                KeysAndAttributes::builder()
                    .set_keys(Some(keys.to_vec()))
                    .build()?,
            )
            .build()?;

        let mut responses = self.client.batch_get(input).await?;

        let mut items = KeyedItems::new();
        for item in responses.remove(table_name).unwrap_or_default() {
            if !items.insert_matching(keys, item) {
                warn!(table = table_name, "Returned item matches no requested key");
            }
        }
        Ok(items)
    }
}
