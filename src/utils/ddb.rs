use std::collections::HashMap;
use std::time::Duration;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput, ScalarAttributeType, TableStatus};
use chrono::NaiveDateTime;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;

pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const LOCAL_ENDPOINT: &str = "http://localhost:8000";

pub(crate) async fn create_table(client: &Client,
                                 table_name: &str, pk: &str,
                                 pk_type: ScalarAttributeType) -> LibraryResult<()> {
    client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(pk)
                .key_type(KeyType::Hash)
                .build(),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(pk)
                .attribute_type(pk_type)
                .build(),
        )
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(10)
                .write_capacity_units(10)
                .build(),
        )
        .send()
        .await
        .map_err(LibraryError::from)?;
    wait_until_table_status_is_not(client, table_name, TableStatus::Creating).await;
    Ok(())
}

pub(crate) async fn delete_table(client: &Client, table_name: &str) -> LibraryResult<()> {
    match client.delete_table().table_name(table_name).send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Deleting).await;
            Ok(())
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to delete {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

async fn wait_until_table_status_is_not(client: &Client, table_name: &str, other_status: TableStatus) {
    for _i in 0..30 {
        match describe_table(client, table_name).await {
            Ok(status) => {
                if status != other_status {
                    return;
                }
            }
            Err(_err) => {
                // a deleted table no longer describes
                if other_status == TableStatus::Deleting {
                    return;
                }
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn describe_table(client: &Client, table_name: &str) -> LibraryResult<TableStatus> {
    match client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
    {
        Ok(out) => {
            if let Some(table) = out.table() {
                if let Some(status) = table.table_status() {
                    return Ok(status.clone());
                }
            }
            Err(LibraryError::runtime(format!("failed to describe {} table",
                                              table_name).as_str(), None))
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to describe {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

pub(crate) fn parse_string_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<String> {
    if let Some(AttributeValue::S(str)) = map.get(name) {
        return Some(str.clone());
    }
    None
}

// string sets come back as SS; a missing attribute is an empty set
pub(crate) fn parse_string_set_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Vec<String> {
    match map.get(name) {
        Some(AttributeValue::Ss(values)) => values.clone(),
        Some(AttributeValue::L(values)) => values.iter().filter_map(|v| match v {
            AttributeValue::S(s) => Some(s.clone()),
            _ => None,
        }).collect(),
        _ => vec![],
    }
}

pub(crate) fn parse_date_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<NaiveDateTime> {
    if let Some(AttributeValue::S(str)) = map.get(name) {
        // e.g. 2022-09-24T04:40:35.726029
        if let Ok(date) = NaiveDateTime::parse_from_str(str, DATE_FMT) {
            return Some(date);
        }
    }
    None
}

pub(crate) fn string_date(date: NaiveDateTime) -> AttributeValue {
    AttributeValue::S(format!("{}", date.format(DATE_FMT)))
}

pub(crate) fn parse_number_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<i64> {
    if let Some(AttributeValue::N(str)) = map.get(name) {
        if let Ok(n) = str.parse::<i64>() {
            return Some(n);
        }
    }
    None
}

pub(crate) fn number(n: i64) -> AttributeValue {
    AttributeValue::N(n.to_string())
}

// helper method to build db-client
pub(crate) async fn build_db_client(store: RepositoryStore) -> Client {
    match store {
        RepositoryStore::DynamoDB => {
            //Get config from environment.
            let config = aws_config::load_from_env().await;
            //Create the DynamoDB client.
            Client::new(&config)
        }
        RepositoryStore::LocalDynamoDB | RepositoryStore::InMemory => {
            // See https://docs.aws.amazon.com/sdk-for-rust/latest/dg/dynamodb-local.html
            let endpoint = std::env::var("DYNAMODB_ENDPOINT").unwrap_or_else(|_| LOCAL_ENDPOINT.to_string());
            let dynamodb_local_config = aws_sdk_dynamodb::Config::builder()
                .region(Region::new("local"))
                .credentials_provider(
                    Credentials::new("AKIDLOCALSTACK", "localstacksecret", None, None, "faked"))
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(dynamodb_local_config)
        }
    }
}

// required to enable CloudWatch error logging by the runtime
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .json()
        .init();
}

// every SDK operation error the stores surface is classified the same way
macro_rules! library_error_from_sdk {
    ($($op_err:ty),+) => {
        $(
            impl From<SdkError<$op_err>> for LibraryError {
                fn from(err: SdkError<$op_err>) -> Self {
                    let (retryable, reason) = retryable_sdk_error(&err);
                    LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
                }
            }
        )+
    };
}

library_error_from_sdk!(UpdateItemError, GetItemError, ScanError, TransactWriteItemsError, CreateTableError);

fn retryable_sdk_error<T>(err: &SdkError<T>) -> (bool, Option<String>) {
    match err {
        SdkError::ConstructionFailure(_) => { (false, Some("ConstructionFailure".to_string())) }
        SdkError::TimeoutError(_) => { (true, Some("TimeoutError".to_string())) }
        SdkError::DispatchFailure(_) => { (true, Some("DispatchFailure".to_string())) }
        SdkError::ResponseError { .. } => { (true, Some("ResponseError".to_string())) }
        SdkError::ServiceError(ctx) => {
            (ctx.raw().http().status().is_server_error() || has_exceeded_limit(ctx.raw().http().body().bytes()), Some(ctx.raw().http().status().to_string()))
        }
        _ => { (true, Some("Unknown".to_string())) }
    }
}

// throttling errors (ProvisionedThroughputExceeded, LimitExceeded, ...) are retryable
fn has_exceeded_limit(opts: Option<&[u8]>) -> bool {
    if let Some(b) = opts {
        return b.windows(6).any(|w| w == b"ceeded");
    }
    false
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use aws_sdk_dynamodb::types::AttributeValue;
    use chrono::Utc;
    use crate::utils::ddb::{has_exceeded_limit, number, parse_date_attribute, parse_number_attribute, parse_string_attribute, parse_string_set_attribute, string_date};

    #[tokio::test]
    async fn test_should_parse_attributes() {
        let now = Utc::now().naive_utc();
        let map = HashMap::from([
            ("title".to_string(), AttributeValue::S("title".to_string())),
            ("book_id".to_string(), number(42)),
            ("genre".to_string(), AttributeValue::Ss(vec!["TALE".to_string(), "FANTASY".to_string()])),
            ("book_status".to_string(), AttributeValue::L(vec![AttributeValue::S("AVAILABLE".to_string())])),
            ("created_at".to_string(), string_date(now)),
        ]);
        assert_eq!(Some("title".to_string()), parse_string_attribute("title", &map));
        assert_eq!(None, parse_string_attribute("book_id", &map));
        assert_eq!(Some(42), parse_number_attribute("book_id", &map));
        assert_eq!(None, parse_number_attribute("owner_id", &map));
        assert_eq!(2, parse_string_set_attribute("genre", &map).len());
        assert_eq!(vec!["AVAILABLE".to_string()], parse_string_set_attribute("book_status", &map));
        assert!(parse_string_set_attribute("missing", &map).is_empty());
        assert_eq!(Some(now), parse_date_attribute("created_at", &map));
    }

    #[tokio::test]
    async fn test_should_detect_exceeded_limit() {
        assert!(has_exceeded_limit(Some(&b"ProvisionedThroughputExceededException"[..])));
        assert!(!has_exceeded_limit(Some(&b"Validation"[..])));
        assert!(!has_exceeded_limit(Some(&b"abc"[..])));
        assert!(!has_exceeded_limit(None));
    }
}
