use crate::model::{Item, Page};
use crate::Error;
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
use aws_sdk_dynamodb::types::WriteRequest;
use std::collections::HashMap;

/// Single-call primitives of the document store.
///
/// Implementations make exactly one request per call and report failures
/// through the classified [`Error`] variants. Operations a client does not
/// support fail with [`Error::NotImplemented`].
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Fetch one item by key
    async fn get(&self, _input: GetItemInput) -> Result<Option<Item>, Error> {
        Err(Error::NotImplemented("get"))
    }

    /// Fetch up to 100 items by key, grouped by table
    async fn batch_get(
        &self,
        _input: BatchGetItemInput,
    ) -> Result<HashMap<String, Vec<Item>>, Error> {
        Err(Error::NotImplemented("batch_get"))
    }

    /// Fetch one page of a scan
    async fn scan(&self, _input: ScanInput) -> Result<Page, Error> {
        Err(Error::NotImplemented("scan"))
    }

    /// Fetch one page of a query
    async fn query(&self, _input: QueryInput) -> Result<Page, Error> {
        Err(Error::NotImplemented("query"))
    }

    /// Create or replace an item, returning the attributes asked for by `ReturnValues`
    async fn put(&self, _input: PutItemInput) -> Result<Option<Item>, Error> {
        Err(Error::NotImplemented("put"))
    }

    async fn update(&self, _input: UpdateItemInput) -> Result<Option<Item>, Error> {
        Err(Error::NotImplemented("update"))
    }

    async fn delete(&self, _input: DeleteItemInput) -> Result<Option<Item>, Error> {
        Err(Error::NotImplemented("delete"))
    }

    /// Write up to 25 requests, returning the ones the store left unprocessed
    async fn batch_write(
        &self,
        _input: BatchWriteItemInput,
    ) -> Result<HashMap<String, Vec<WriteRequest>>, Error> {
        Err(Error::NotImplemented("batch_write"))
    }

    /// Apply every write of the transaction or none of them
    async fn transact_write(&self, _input: TransactWriteItemsInput) -> Result<(), Error> {
        Err(Error::NotImplemented("transact_write"))
    }
}
