#![allow(dead_code)]

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::batch_get_item::BatchGetItemInput;
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemInput;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemInput;
use aws_sdk_dynamodb::operation::get_item::GetItemInput;
use aws_sdk_dynamodb::operation::put_item::PutItemInput;
use aws_sdk_dynamodb::operation::query::QueryInput;
use aws_sdk_dynamodb::operation::scan::ScanInput;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsInput;
use aws_sdk_dynamodb::operation::update_item::UpdateItemInput;
use aws_sdk_dynamodb::types::{AttributeValue, WriteRequest};
use powered_dynamo::{CancellationReason, DocumentClient, Error, Item, Key, Page};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// In-memory client with scripted failures and pages.
///
/// Failures queued with `fail_on` are returned, one per call, before the
/// operation succeeds.
#[derive(Default)]
pub struct FakeDocumentClient {
    pending_fails: Mutex<HashMap<&'static str, VecDeque<Error>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    pub items: Mutex<HashMap<String, Vec<Item>>>,
    pub scan_pages: Mutex<VecDeque<Page>>,
    pub query_pages: Mutex<VecDeque<Page>>,
    pub batch_get_inputs: Mutex<Vec<BatchGetItemInput>>,
    pub batch_write_inputs: Mutex<Vec<BatchWriteItemInput>>,
    pub unprocessed: Mutex<HashMap<String, Vec<WriteRequest>>>,
}

impl FakeDocumentClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, operation: &'static str, error: Error) {
        self.pending_fails
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    pub fn calls(&self, operation: &'static str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn with_items(self, table_name: &str, items: Vec<Item>) -> Self {
        self.items
            .lock()
            .unwrap()
            .insert(table_name.to_string(), items);
        self
    }

    pub fn with_scan_pages(self, pages: Vec<Page>) -> Self {
        *self.scan_pages.lock().unwrap() = pages.into();
        self
    }

    pub fn with_query_pages(self, pages: Vec<Page>) -> Self {
        *self.query_pages.lock().unwrap() = pages.into();
        self
    }

    fn record(&self, operation: &'static str) -> Result<(), Error> {
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;
        match self
            .pending_fails
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn find(&self, table_name: &str, key: &Key) -> Option<Item> {
        self.items
            .lock()
            .unwrap()
            .get(table_name)
            .and_then(|items| {
                items
                    .iter()
                    .find(|item| powered_dynamo::keys::key_matches_item(key, item))
                    .cloned()
            })
    }
}

#[async_trait]
impl DocumentClient for FakeDocumentClient {
    async fn get(&self, input: GetItemInput) -> Result<Option<Item>, Error> {
        self.record("get")?;
        let table_name = input.table_name.unwrap_or_default();
        Ok(input.key.and_then(|key| self.find(&table_name, &key)))
    }

    async fn batch_get(
        &self,
        input: BatchGetItemInput,
    ) -> Result<HashMap<String, Vec<Item>>, Error> {
        self.record("batch_get")?;
        self.batch_get_inputs.lock().unwrap().push(input.clone());

        let mut responses = HashMap::new();
        for (table_name, keys) in input.request_items.unwrap_or_default() {
            let found: Vec<Item> = keys
                .keys()
                .iter()
                .filter_map(|key| self.find(&table_name, key))
                .collect();
            responses.insert(table_name, found);
        }
        Ok(responses)
    }

    async fn scan(&self, _input: ScanInput) -> Result<Page, Error> {
        self.record("scan")?;
        Ok(self.scan_pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn query(&self, _input: QueryInput) -> Result<Page, Error> {
        self.record("query")?;
        Ok(self.query_pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn put(&self, _input: PutItemInput) -> Result<Option<Item>, Error> {
        self.record("put")?;
        Ok(None)
    }

    async fn update(&self, _input: UpdateItemInput) -> Result<Option<Item>, Error> {
        self.record("update")?;
        Ok(None)
    }

    async fn delete(&self, _input: DeleteItemInput) -> Result<Option<Item>, Error> {
        self.record("delete")?;
        Ok(None)
    }

    async fn batch_write(
        &self,
        input: BatchWriteItemInput,
    ) -> Result<HashMap<String, Vec<WriteRequest>>, Error> {
        self.batch_write_inputs.lock().unwrap().push(input);
        self.record("batch_write")?;
        Ok(std::mem::take(&mut *self.unprocessed.lock().unwrap()))
    }

    async fn transact_write(&self, _input: TransactWriteItemsInput) -> Result<(), Error> {
        self.record("transact_write")
    }
}

pub fn internal_server_error() -> Error {
    Error::InternalServerError("We encountered an internal error".to_string())
}

pub fn transaction_conflict() -> Error {
    Error::TransactionCanceled {
        reasons: vec![CancellationReason::None, CancellationReason::TransactionConflict],
    }
}

pub fn conditional_check_failed() -> Error {
    Error::TransactionCanceled {
        reasons: vec![
            CancellationReason::ConditionalCheckFailed,
            CancellationReason::TransactionConflict,
        ],
    }
}

pub fn key(id: &str) -> Key {
    HashMap::from([("id".to_string(), AttributeValue::S(id.to_string()))])
}

pub fn item(id: &str) -> Item {
    let mut item = key(id);
    item.insert(
        "name".to_string(),
        AttributeValue::S(format!("name-{id}")),
    );
    item
}
