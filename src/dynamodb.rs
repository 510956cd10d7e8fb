use crate::client::DocumentClient;
use crate::error::Error;
use crate::model::{Item, Key, Page};
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
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// DynamoDB-backed document client
#[derive(Debug, Clone)]
pub struct DynamoDbDocumentClient {
    client: Client,
}

impl DynamoDbDocumentClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client configured from the standard AWS environment
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(Client::new(&config))
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }
}

impl From<Client> for DynamoDbDocumentClient {
    fn from(client: Client) -> Self {
        Self::new(client)
    }
}

#[async_trait]
impl DocumentClient for DynamoDbDocumentClient {
    async fn get(&self, input: GetItemInput) -> Result<Option<Item>, Error> {
        let output = self
            .client
            .get_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_attributes_to_get(input.attributes_to_get)
            .set_consistent_read(input.consistent_read)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .send()
            .await?;

        Ok(output.item)
    }

    async fn batch_get(
        &self,
        input: BatchGetItemInput,
    ) -> Result<HashMap<String, Vec<Item>>, Error> {
        let output = self
            .client
            .batch_get_item()
            .set_request_items(input.request_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .send()
            .await?;

        let unprocessed: usize = output
            .unprocessed_keys
            .iter()
            .flat_map(|tables| tables.values())
            .map(|k| k.keys().len())
            .sum();
        if unprocessed > 0 {
            warn!(count = unprocessed, "BatchGetItem left keys unprocessed");
        }

        Ok(output.responses.unwrap_or_default())
    }

    async fn scan(&self, input: ScanInput) -> Result<Page, Error> {
        let output = self
            .client
            .scan()
            .set_table_name(input.table_name)
            .set_index_name(input.index_name)
            .set_attributes_to_get(input.attributes_to_get)
            .set_limit(input.limit)
            .set_select(input.select)
            .set_scan_filter(input.scan_filter)
            .set_conditional_operator(input.conditional_operator)
            .set_exclusive_start_key(input.exclusive_start_key)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_total_segments(input.total_segments)
            .set_segment(input.segment)
            .set_projection_expression(input.projection_expression)
            .set_filter_expression(input.filter_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_consistent_read(input.consistent_read)
            .send()
            .await?;

        debug!(count = output.count, "Scan page");
        Ok(Page {
            items: output.items.unwrap_or_default(),
            last_evaluated_key: continuation(output.last_evaluated_key),
            count: Some(output.count),
        })
    }

    async fn query(&self, input: QueryInput) -> Result<Page, Error> {
        let output = self
            .client
            .query()
            .set_table_name(input.table_name)
            .set_index_name(input.index_name)
            .set_select(input.select)
            .set_attributes_to_get(input.attributes_to_get)
            .set_limit(input.limit)
            .set_consistent_read(input.consistent_read)
            .set_key_conditions(input.key_conditions)
            .set_query_filter(input.query_filter)
            .set_conditional_operator(input.conditional_operator)
            .set_scan_index_forward(input.scan_index_forward)
            .set_exclusive_start_key(input.exclusive_start_key)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_projection_expression(input.projection_expression)
            .set_filter_expression(input.filter_expression)
            .set_key_condition_expression(input.key_condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .send()
            .await?;

        debug!(count = output.count, "Query page");
        Ok(Page {
            items: output.items.unwrap_or_default(),
            last_evaluated_key: continuation(output.last_evaluated_key),
            count: Some(output.count),
        })
    }

    async fn put(&self, input: PutItemInput) -> Result<Option<Item>, Error> {
        let output = self
            .client
            .put_item()
            .set_table_name(input.table_name)
            .set_item(input.item)
            .set_expected(input.expected)
            .set_return_values(input.return_values)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_conditional_operator(input.conditional_operator)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values_on_condition_check_failure(
                input.return_values_on_condition_check_failure,
            )
            .send()
            .await?;

        Ok(output.attributes)
    }

    async fn update(&self, input: UpdateItemInput) -> Result<Option<Item>, Error> {
        let output = self
            .client
            .update_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_attribute_updates(input.attribute_updates)
            .set_expected(input.expected)
            .set_conditional_operator(input.conditional_operator)
            .set_return_values(input.return_values)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_update_expression(input.update_expression)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values_on_condition_check_failure(
                input.return_values_on_condition_check_failure,
            )
            .send()
            .await?;

        Ok(output.attributes)
    }

    async fn delete(&self, input: DeleteItemInput) -> Result<Option<Item>, Error> {
        let output = self
            .client
            .delete_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_expected(input.expected)
            .set_conditional_operator(input.conditional_operator)
            .set_return_values(input.return_values)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values_on_condition_check_failure(
                input.return_values_on_condition_check_failure,
            )
            .send()
            .await?;

        Ok(output.attributes)
    }

    async fn batch_write(
        &self,
        input: BatchWriteItemInput,
    ) -> Result<HashMap<String, Vec<WriteRequest>>, Error> {
        let output = self
            .client
            .batch_write_item()
            .set_request_items(input.request_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .send()
            .await?;

        Ok(output.unprocessed_items.unwrap_or_default())
    }

    async fn transact_write(&self, input: TransactWriteItemsInput) -> Result<(), Error> {
        self.client
            .transact_write_items()
            .set_transact_items(input.transact_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_client_request_token(input.client_request_token)
            .send()
            .await?;

        Ok(())
    }
}

/// An empty key cannot be echoed back to the store, so it ends the results too.
fn continuation(last_evaluated_key: Option<Key>) -> Option<Key> {
    last_evaluated_key.filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::AttributeValue;

    #[test]
    fn test_continuation_drops_empty_key() {
        assert_eq!(continuation(None), None);
        assert_eq!(continuation(Some(HashMap::new())), None);

        let key = HashMap::from([("id".to_string(), AttributeValue::S("1".to_string()))]);
        assert_eq!(continuation(Some(key.clone())), Some(key));
    }
}
