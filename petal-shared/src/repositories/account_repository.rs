use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{AttributeValue, Put, TransactWriteItem};
use chrono::Utc;
use crate::database::account_items::{
    customer_from_item, customer_pk, customer_to_item, legacy_id_claim_item, merchant_from_item, merchant_pk,
    phone_claim_from_item, phone_claim_item, phone_claim_pk, user_from_item, user_pk, user_to_item, Item,
};
use crate::models::account::{Account, Customer, Merchant, NewCustomer, Role, UserRecord};
use crate::models::errors::AccountStoreError;
use crate::utilities::fields::dynamodb;

/// Storage for merchants, customers and the unified user records.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Returns the first merchant whose stored mobile equals one of `phones`, in order.
    async fn find_merchant_by_phone(&self, phones: &[String]) -> Result<Option<Merchant>, AccountStoreError>;

    async fn find_customer_by_phone(&self, phones: &[String]) -> Result<Option<Customer>, AccountStoreError>;

    /// Creates the customer together with claims on its phone and legacy id.
    /// Fails with `PhoneAlreadyClaimed` or `LegacyIdTaken` when either claim exists.
    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, AccountStoreError>;

    /// Reads the account holding the claim on `normalized_phone`, bypassing the mobile index.
    /// Reads are strongly consistent, so an account created by a concurrent request is visible.
    async fn find_by_phone_claim(&self, normalized_phone: &str) -> Result<Option<Account>, AccountStoreError>;

    async fn upsert_user(&self, user: &UserRecord) -> Result<(), AccountStoreError>;

    async fn get_user(&self, key: &str) -> Result<Option<UserRecord>, AccountStoreError>;
}

pub struct DynamoAccountRepository {
    db: DynamoDbClient,
    table_name: String,
}

impl DynamoAccountRepository {
    pub fn new(db: DynamoDbClient, table_name: String) -> Self {
        Self { db, table_name }
    }

    async fn query_mobile(&self, mobile: &str, entity: &str) -> Result<Option<Item>, AccountStoreError> {
        let res = self
            .db
            .query()
            .table_name(&self.table_name)
            .index_name(dynamodb::MOBILE_INDEX)
            .key_condition_expression("#mobile = :mobile")
            .filter_expression("#entity = :entity")
            .expression_attribute_names("#mobile", dynamodb::MOBILE)
            .expression_attribute_names("#entity", dynamodb::ENTITY_TYPE)
            .expression_attribute_values(":mobile", AttributeValue::S(mobile.to_string()))
            .expression_attribute_values(":entity", AttributeValue::S(entity.to_string()))
            .send()
            .await
            .map_err(|e| AccountStoreError::Storage(format!("Mobile index query failed: {}", e)))?;

        Ok(res.items().first().cloned())
    }

    async fn find_by_phone(&self, phones: &[String], entity: &str) -> Result<Option<Item>, AccountStoreError> {
        for phone in phones {
            if let Some(item) = self.query_mobile(phone, entity).await? {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    async fn get_consistent(&self, pk: String, sk: &str) -> Result<Option<Item>, AccountStoreError> {
        let res = self
            .db
            .get_item()
            .table_name(&self.table_name)
            .key(dynamodb::PK, AttributeValue::S(pk.clone()))
            .key(dynamodb::SK, AttributeValue::S(sk.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| AccountStoreError::Storage(format!("Failed to fetch {}: {}", pk, e)))?;
        Ok(res.item)
    }

    fn conditional_put(&self, item: Item) -> Result<TransactWriteItem, AccountStoreError> {
        let put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", dynamodb::PK)
            .build()
            .map_err(|e| AccountStoreError::Storage(format!("Failed to build put: {}", e)))?;

        Ok(TransactWriteItem::builder().put(put).build())
    }
}

/// Position of each put inside the creation transaction.
const CLAIM_PHONE_INDEX: usize = 1;
const CLAIM_LEGACY_ID_INDEX: usize = 2;

/// Translates a cancelled creation transaction into the claim that failed.
pub fn creation_conflict(reason_codes: &[Option<&str>], phone: &str, id: u64) -> Option<AccountStoreError> {
    let failed = |index: usize| {
        reason_codes
            .get(index)
            .copied()
            .flatten()
            .map(|code| code == "ConditionalCheckFailed")
            .unwrap_or(false)
    };

    if failed(CLAIM_PHONE_INDEX) {
        Some(AccountStoreError::PhoneAlreadyClaimed(phone.to_string()))
    } else if failed(CLAIM_LEGACY_ID_INDEX) {
        Some(AccountStoreError::LegacyIdTaken(id))
    } else {
        None
    }
}

fn map_transact_error(err: SdkError<TransactWriteItemsError>, phone: &str, id: u64) -> AccountStoreError {
    if let Some(TransactWriteItemsError::TransactionCanceledException(cancelled)) = err.as_service_error() {
        let codes: Vec<Option<&str>> = cancelled
            .cancellation_reasons()
            .iter()
            .map(|reason| reason.code())
            .collect();
        if let Some(conflict) = creation_conflict(&codes, phone, id) {
            return conflict;
        }
    }
    AccountStoreError::Storage(format!("Customer creation failed: {}", err))
}

#[async_trait]
impl AccountRepository for DynamoAccountRepository {
    async fn find_merchant_by_phone(&self, phones: &[String]) -> Result<Option<Merchant>, AccountStoreError> {
        match self.find_by_phone(phones, dynamodb::MERCHANT_ENTITY).await? {
            Some(item) => Ok(Some(merchant_from_item(&item)?)),
            None => Ok(None),
        }
    }

    async fn find_customer_by_phone(&self, phones: &[String]) -> Result<Option<Customer>, AccountStoreError> {
        match self.find_by_phone(phones, dynamodb::CUSTOMER_ENTITY).await? {
            Some(item) => Ok(Some(customer_from_item(&item)?)),
            None => Ok(None),
        }
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, AccountStoreError> {
        let customer = customer.into_customer(Utc::now());

        let items = vec![
            self.conditional_put(customer_to_item(&customer))?,
            self.conditional_put(phone_claim_item(&customer.mobile, Role::Customer, &customer.document_id))?,
            self.conditional_put(legacy_id_claim_item(customer.id, &customer.document_id))?,
        ];

        self.db
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await
            .map_err(|e| map_transact_error(e, &customer.mobile, customer.id))?;

        log::info!("Created customer {} (id {})", customer.document_id, customer.id);
        Ok(customer)
    }

    async fn find_by_phone_claim(&self, normalized_phone: &str) -> Result<Option<Account>, AccountStoreError> {
        let claim = match self.get_consistent(phone_claim_pk(normalized_phone), dynamodb::CLAIM_SK).await? {
            Some(item) => phone_claim_from_item(&item)?,
            None => return Ok(None),
        };

        let account = match claim.role {
            Role::Merchant => self
                .get_consistent(merchant_pk(&claim.document_id), dynamodb::PROFILE_SK)
                .await?
                .map(|item| merchant_from_item(&item).map(Account::Merchant))
                .transpose()?,
            Role::Customer => self
                .get_consistent(customer_pk(&claim.document_id), dynamodb::PROFILE_SK)
                .await?
                .map(|item| customer_from_item(&item).map(Account::Customer))
                .transpose()?,
        };
        Ok(account)
    }

    async fn upsert_user(&self, user: &UserRecord) -> Result<(), AccountStoreError> {
        self.db
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(user_to_item(user)))
            .send()
            .await
            .map_err(|e| AccountStoreError::Storage(format!("Failed to upsert user {}: {}", user.key, e)))?;
        Ok(())
    }

    async fn get_user(&self, key: &str) -> Result<Option<UserRecord>, AccountStoreError> {
        let res = self
            .db
            .get_item()
            .table_name(&self.table_name)
            .key(dynamodb::PK, AttributeValue::S(user_pk(key)))
            .key(dynamodb::SK, AttributeValue::S(dynamodb::PROFILE_SK.to_string()))
            .send()
            .await
            .map_err(|e| AccountStoreError::Storage(format!("Failed to fetch user {}: {}", key, e)))?;

        match res.item {
            Some(item) => Ok(Some(user_from_item(&item)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::phone_claim(vec![Some("None"), Some("ConditionalCheckFailed"), Some("None")], Some("phone"))]
    #[case::legacy_id_claim(vec![Some("None"), Some("None"), Some("ConditionalCheckFailed")], Some("id"))]
    #[case::both_prefers_phone(vec![None, Some("ConditionalCheckFailed"), Some("ConditionalCheckFailed")], Some("phone"))]
    #[case::throttled(vec![Some("ThrottlingError"), None, None], None)]
    #[case::no_reasons(vec![], None)]
    fn maps_cancellation_reasons(#[case] codes: Vec<Option<&str>>, #[case] expected: Option<&str>) {
        let conflict = creation_conflict(&codes, "966501234567", 42);
        match (conflict, expected) {
            (Some(AccountStoreError::PhoneAlreadyClaimed(phone)), Some("phone")) => assert_eq!(phone, "966501234567"),
            (Some(AccountStoreError::LegacyIdTaken(id)), Some("id")) => assert_eq!(id, 42),
            (None, None) => {}
            (other, _) => panic!("Unexpected mapping: {:?}", other),
        }
    }
}
