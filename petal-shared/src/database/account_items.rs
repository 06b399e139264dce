use std::collections::HashMap;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use crate::models::account::{Customer, Merchant, Role, UserRecord};
use crate::models::errors::AccountStoreError;
use crate::utilities::fields::dynamodb;

pub type Item = HashMap<String, AttributeValue>;

pub fn merchant_pk(document_id: &str) -> String {
    format!("{}{}", dynamodb::MERCHANT_PREFIX, document_id)
}

pub fn customer_pk(document_id: &str) -> String {
    format!("{}{}", dynamodb::CUSTOMER_PREFIX, document_id)
}

pub fn user_pk(key: &str) -> String {
    format!("{}{}", dynamodb::USER_PREFIX, key)
}

pub fn phone_claim_pk(normalized_phone: &str) -> String {
    format!("{}{}", dynamodb::PHONE_CLAIM_PREFIX, normalized_phone)
}

pub fn legacy_id_claim_pk(id: u64) -> String {
    format!("{}{}", dynamodb::LEGACY_ID_CLAIM_PREFIX, id)
}

fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

fn n(value: u64) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

fn get_s(item: &Item, field: &str) -> Result<String, AccountStoreError> {
    item.get(field)
        .and_then(|v| v.as_s().ok())
        .map(|v| v.to_string())
        .ok_or_else(|| AccountStoreError::Malformed(format!("Missing {}", field)))
}

/// Optional profile fields are stored as empty strings, but older items may lack them.
fn get_s_or_empty(item: &Item, field: &str) -> String {
    item.get(field)
        .and_then(|v| v.as_s().ok())
        .map(|v| v.to_string())
        .unwrap_or_default()
}

fn get_n(item: &Item, field: &str) -> Result<u64, AccountStoreError> {
    item.get(field)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| AccountStoreError::Malformed(format!("Missing {}", field)))?
        .parse::<u64>()
        .map_err(|e| AccountStoreError::Malformed(format!("Invalid {}: {}", field, e)))
}

fn get_time(item: &Item, field: &str) -> Result<DateTime<Utc>, AccountStoreError> {
    let raw = get_s(item, field)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AccountStoreError::Malformed(format!("Invalid {}: {}", field, e)))
}

pub fn merchant_from_item(item: &Item) -> Result<Merchant, AccountStoreError> {
    Ok(Merchant {
        document_id: get_s(item, dynamodb::DOCUMENT_ID)?,
        id: get_n(item, dynamodb::LEGACY_ID)?,
        name: get_s_or_empty(item, dynamodb::NAME),
        store_name: get_s_or_empty(item, dynamodb::STORE_NAME),
        mobile: get_s(item, dynamodb::MOBILE)?,
        email: get_s_or_empty(item, dynamodb::EMAIL),
        city: get_s_or_empty(item, dynamodb::CITY),
        created_at: get_time(item, dynamodb::CREATED_AT)?,
    })
}

pub fn merchant_to_item(merchant: &Merchant) -> Item {
    HashMap::from([
        (dynamodb::PK.to_string(), s(merchant_pk(&merchant.document_id))),
        (dynamodb::SK.to_string(), s(dynamodb::PROFILE_SK)),
        (dynamodb::ENTITY_TYPE.to_string(), s(dynamodb::MERCHANT_ENTITY)),
        (dynamodb::DOCUMENT_ID.to_string(), s(merchant.document_id.clone())),
        (dynamodb::LEGACY_ID.to_string(), n(merchant.id)),
        (dynamodb::NAME.to_string(), s(merchant.name.clone())),
        (dynamodb::STORE_NAME.to_string(), s(merchant.store_name.clone())),
        (dynamodb::MOBILE.to_string(), s(merchant.mobile.clone())),
        (dynamodb::EMAIL.to_string(), s(merchant.email.clone())),
        (dynamodb::CITY.to_string(), s(merchant.city.clone())),
        (dynamodb::CREATED_AT.to_string(), s(merchant.created_at.to_rfc3339())),
    ])
}

pub fn customer_from_item(item: &Item) -> Result<Customer, AccountStoreError> {
    Ok(Customer {
        document_id: get_s(item, dynamodb::DOCUMENT_ID)?,
        id: get_n(item, dynamodb::LEGACY_ID)?,
        name: get_s_or_empty(item, dynamodb::NAME),
        mobile: get_s(item, dynamodb::MOBILE)?,
        email: get_s_or_empty(item, dynamodb::EMAIL),
        address: get_s_or_empty(item, dynamodb::ADDRESS),
        city: get_s_or_empty(item, dynamodb::CITY),
        created_at: get_time(item, dynamodb::CREATED_AT)?,
    })
}

pub fn customer_to_item(customer: &Customer) -> Item {
    HashMap::from([
        (dynamodb::PK.to_string(), s(customer_pk(&customer.document_id))),
        (dynamodb::SK.to_string(), s(dynamodb::PROFILE_SK)),
        (dynamodb::ENTITY_TYPE.to_string(), s(dynamodb::CUSTOMER_ENTITY)),
        (dynamodb::DOCUMENT_ID.to_string(), s(customer.document_id.clone())),
        (dynamodb::LEGACY_ID.to_string(), n(customer.id)),
        (dynamodb::NAME.to_string(), s(customer.name.clone())),
        (dynamodb::MOBILE.to_string(), s(customer.mobile.clone())),
        (dynamodb::EMAIL.to_string(), s(customer.email.clone())),
        (dynamodb::ADDRESS.to_string(), s(customer.address.clone())),
        (dynamodb::CITY.to_string(), s(customer.city.clone())),
        (dynamodb::CREATED_AT.to_string(), s(customer.created_at.to_rfc3339())),
    ])
}

pub fn user_from_item(item: &Item) -> Result<UserRecord, AccountStoreError> {
    let role = get_s(item, dynamodb::ROLE)?
        .parse::<Role>()
        .map_err(AccountStoreError::Malformed)?;
    let pk = get_s(item, dynamodb::PK)?;
    let key = pk
        .strip_prefix(dynamodb::USER_PREFIX)
        .ok_or_else(|| AccountStoreError::Malformed(format!("Unexpected user key {}", pk)))?
        .to_string();

    Ok(UserRecord {
        key,
        role,
        id: get_n(item, dynamodb::LEGACY_ID)?,
        name: get_s_or_empty(item, dynamodb::NAME),
        mobile: get_s(item, dynamodb::MOBILE)?,
        email: get_s_or_empty(item, dynamodb::EMAIL),
        updated_at: get_time(item, dynamodb::UPDATED_AT)?,
    })
}

pub fn user_to_item(user: &UserRecord) -> Item {
    HashMap::from([
        (dynamodb::PK.to_string(), s(user_pk(&user.key))),
        (dynamodb::SK.to_string(), s(dynamodb::PROFILE_SK)),
        (dynamodb::ENTITY_TYPE.to_string(), s(dynamodb::USER_ENTITY)),
        (dynamodb::ROLE.to_string(), s(user.role.as_str())),
        (dynamodb::LEGACY_ID.to_string(), n(user.id)),
        (dynamodb::NAME.to_string(), s(user.name.clone())),
        (dynamodb::MOBILE.to_string(), s(user.mobile.clone())),
        (dynamodb::EMAIL.to_string(), s(user.email.clone())),
        (dynamodb::UPDATED_AT.to_string(), s(user.updated_at.to_rfc3339())),
    ])
}

/// Reserves a normalized phone for one account. Claims carry no `mobile`, so they stay out of the mobile index.
pub fn phone_claim_item(normalized_phone: &str, role: Role, document_id: &str) -> Item {
    HashMap::from([
        (dynamodb::PK.to_string(), s(phone_claim_pk(normalized_phone))),
        (dynamodb::SK.to_string(), s(dynamodb::CLAIM_SK)),
        (dynamodb::ENTITY_TYPE.to_string(), s(dynamodb::CLAIM_ENTITY)),
        (dynamodb::ROLE.to_string(), s(role.as_str())),
        (dynamodb::DOCUMENT_ID.to_string(), s(document_id)),
    ])
}

/// Owner recorded on a phone claim.
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneClaim {
    pub role: Role,
    pub document_id: String,
}

pub fn phone_claim_from_item(item: &Item) -> Result<PhoneClaim, AccountStoreError> {
    let role = get_s(item, dynamodb::ROLE)?
        .parse::<Role>()
        .map_err(AccountStoreError::Malformed)?;
    Ok(PhoneClaim { role, document_id: get_s(item, dynamodb::DOCUMENT_ID)? })
}

pub fn legacy_id_claim_item(id: u64, document_id: &str) -> Item {
    HashMap::from([
        (dynamodb::PK.to_string(), s(legacy_id_claim_pk(id))),
        (dynamodb::SK.to_string(), s(dynamodb::CLAIM_SK)),
        (dynamodb::ENTITY_TYPE.to_string(), s(dynamodb::CLAIM_ENTITY)),
        (dynamodb::DOCUMENT_ID.to_string(), s(document_id)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_customer() -> Customer {
        Customer {
            document_id: "Ab3dE5gH9kLmNoPqRsTu".to_string(),
            id: 12345,
            name: "Noura".to_string(),
            mobile: "966501234567".to_string(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            created_at: DateTime::parse_from_rfc3339("2026-10-01T08:00:00Z").unwrap().with_timezone(&Utc),
        }
    }

    #[test]
    fn customer_item_is_keyed_and_typed() {
        let item = customer_to_item(&sample_customer());
        assert_eq!(item[dynamodb::PK].as_s().unwrap(), "CUSTOMER#Ab3dE5gH9kLmNoPqRsTu");
        assert_eq!(item[dynamodb::ENTITY_TYPE].as_s().unwrap(), "customer");
        assert_eq!(item[dynamodb::LEGACY_ID].as_n().unwrap(), "12345");
        assert_eq!(customer_from_item(&item).unwrap(), sample_customer());
    }

    #[test]
    fn merchant_items_tolerate_missing_optional_fields() {
        let item: Item = HashMap::from([
            (dynamodb::DOCUMENT_ID.to_string(), s("m1")),
            (dynamodb::LEGACY_ID.to_string(), n(9)),
            (dynamodb::MOBILE.to_string(), s("0501234567")),
            (dynamodb::CREATED_AT.to_string(), s("2026-10-01T08:00:00+00:00")),
        ]);
        let merchant = merchant_from_item(&item).unwrap();
        assert_eq!(merchant.mobile, "0501234567");
        assert!(merchant.store_name.is_empty());
    }

    #[test]
    fn missing_mobile_is_malformed() {
        let mut item = customer_to_item(&sample_customer());
        item.remove(dynamodb::MOBILE);
        assert!(matches!(customer_from_item(&item), Err(AccountStoreError::Malformed(_))));
    }

    #[test]
    fn user_key_comes_from_partition_key() {
        let user = UserRecord::from_account(
            &crate::models::account::Account::Customer(sample_customer()),
            Utc::now(),
        );
        let parsed = user_from_item(&user_to_item(&user)).unwrap();
        assert_eq!(parsed.key, "customer_12345");
        assert_eq!(parsed.role, Role::Customer);
    }

    #[test]
    fn claims_stay_out_of_mobile_index() {
        let claim = phone_claim_item("966501234567", Role::Customer, "doc");
        assert!(!claim.contains_key(dynamodb::MOBILE));
        assert_eq!(claim[dynamodb::PK].as_s().unwrap(), "PHONE#966501234567");
    }

    #[test]
    fn phone_claim_names_its_owner() {
        let claim = phone_claim_from_item(&phone_claim_item("966501234567", Role::Customer, "Ab3dE5gH9kLmNoPqRsTu")).unwrap();
        assert_eq!(claim, PhoneClaim { role: Role::Customer, document_id: "Ab3dE5gH9kLmNoPqRsTu".to_string() });

        let mut item = phone_claim_item("966501234567", Role::Customer, "doc");
        item.remove(dynamodb::DOCUMENT_ID);
        assert!(matches!(phone_claim_from_item(&item), Err(AccountStoreError::Malformed(_))));
    }
}
