use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use crate::models::account::{Account, Customer, Merchant, NewCustomer, UserRecord};
use crate::models::errors::AccountStoreError;
use crate::repositories::account_repository::AccountRepository;

#[derive(Default)]
struct Store {
    merchants: Vec<Merchant>,
    customers: Vec<Customer>,
    users: HashMap<String, UserRecord>,
    /// Normalized phone to the document id of the customer holding it.
    phone_claims: HashMap<String, String>,
    legacy_id_claims: HashSet<u64>,
}

/// Process-local repository with the same claim semantics as the DynamoDB one.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    store: RwLock<Store>,
    fail_writes: AtomicBool,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merchants are onboarded outside the sign-in flow, so they are seeded directly.
    pub async fn insert_merchant(&self, merchant: Merchant) {
        let mut store = self.store.write().await;
        store.legacy_id_claims.insert(merchant.id);
        store.merchants.push(merchant);
    }

    /// Seeds a customer as if it had been written by an older client, without claims.
    pub async fn insert_customer(&self, customer: Customer) {
        self.store.write().await.customers.push(customer);
    }

    /// Reserves a legacy id so the next creation using it collides.
    pub async fn claim_legacy_id(&self, id: u64) {
        self.store.write().await.legacy_id_claims.insert(id);
    }

    /// Makes every later write fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), AccountStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AccountStoreError::Storage("write rejected".to_string()));
        }
        Ok(())
    }

    pub async fn customer_count(&self) -> usize {
        self.store.read().await.customers.len()
    }

    pub async fn user_count(&self) -> usize {
        self.store.read().await.users.len()
    }
}

fn first_match<'a, T>(records: &'a [T], phones: &[String], mobile: impl Fn(&T) -> &str) -> Option<&'a T> {
    phones
        .iter()
        .find_map(|phone| records.iter().find(|r| mobile(r) == phone.as_str()))
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_merchant_by_phone(&self, phones: &[String]) -> Result<Option<Merchant>, AccountStoreError> {
        let store = self.store.read().await;
        Ok(first_match(&store.merchants, phones, |m| m.mobile.as_str()).cloned())
    }

    async fn find_customer_by_phone(&self, phones: &[String]) -> Result<Option<Customer>, AccountStoreError> {
        let store = self.store.read().await;
        Ok(first_match(&store.customers, phones, |c| c.mobile.as_str()).cloned())
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, AccountStoreError> {
        self.check_writable()?;
        let mut store = self.store.write().await;
        if store.phone_claims.contains_key(&customer.mobile) {
            return Err(AccountStoreError::PhoneAlreadyClaimed(customer.mobile));
        }
        if store.legacy_id_claims.contains(&customer.id) {
            return Err(AccountStoreError::LegacyIdTaken(customer.id));
        }

        let customer = customer.into_customer(Utc::now());
        store.phone_claims.insert(customer.mobile.clone(), customer.document_id.clone());
        store.legacy_id_claims.insert(customer.id);
        store.customers.push(customer.clone());
        Ok(customer)
    }

    async fn find_by_phone_claim(&self, normalized_phone: &str) -> Result<Option<Account>, AccountStoreError> {
        let store = self.store.read().await;
        let customer = store
            .phone_claims
            .get(normalized_phone)
            .and_then(|document_id| store.customers.iter().find(|c| &c.document_id == document_id));
        Ok(customer.cloned().map(Account::Customer))
    }

    async fn upsert_user(&self, user: &UserRecord) -> Result<(), AccountStoreError> {
        self.check_writable()?;
        self.store.write().await.users.insert(user.key.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, key: &str) -> Result<Option<UserRecord>, AccountStoreError> {
        Ok(self.store.read().await.users.get(key).cloned())
    }
}
