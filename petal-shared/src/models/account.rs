use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Merchant,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Merchant => "merchant",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merchant" => Ok(Role::Merchant),
            "customer" => Ok(Role::Customer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub document_id: String,
    pub id: u64,
    pub name: String,
    pub store_name: String,
    pub mobile: String,
    pub email: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub document_id: String,
    pub id: u64,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

/// Input for a brand-new customer created during OTP sign-in.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub document_id: String,
    pub id: u64,
    pub name: String,
    pub mobile: String,
}

impl NewCustomer {
    /// Name falls back to the phone when the caller gave none.
    pub fn new(document_id: String, id: u64, name: Option<&str>, mobile: &str) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(mobile)
            .to_string();

        Self { document_id, id, name, mobile: mobile.to_string() }
    }

    pub fn into_customer(self, created_at: DateTime<Utc>) -> Customer {
        Customer {
            document_id: self.document_id,
            id: self.id,
            name: self.name,
            mobile: self.mobile,
            email: String::new(),
            address: String::new(),
            city: String::new(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Account {
    Merchant(Merchant),
    Customer(Customer),
}

impl Account {
    pub fn role(&self) -> Role {
        match self {
            Account::Merchant(_) => Role::Merchant,
            Account::Customer(_) => Role::Customer,
        }
    }

    pub fn legacy_id(&self) -> u64 {
        match self {
            Account::Merchant(m) => m.id,
            Account::Customer(c) => c.id,
        }
    }

    pub fn document_id(&self) -> &str {
        match self {
            Account::Merchant(m) => &m.document_id,
            Account::Customer(c) => &c.document_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Account::Merchant(m) => &m.name,
            Account::Customer(c) => &c.name,
        }
    }

    pub fn mobile(&self) -> &str {
        match self {
            Account::Merchant(m) => &m.mobile,
            Account::Customer(c) => &c.mobile,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Account::Merchant(m) => &m.email,
            Account::Customer(c) => &c.email,
        }
    }
}

/// Unified user document mirrored for every merchant or customer that signs in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub key: String,
    pub role: Role,
    pub id: u64,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn key_for(role: Role, id: u64) -> String {
        format!("{}_{}", role, id)
    }

    pub fn from_account(account: &Account, updated_at: DateTime<Utc>) -> Self {
        Self {
            key: Self::key_for(account.role(), account.legacy_id()),
            role: account.role(),
            id: account.legacy_id(),
            name: account.name().to_string(),
            mobile: account.mobile().to_string(),
            email: account.email().to_string(),
            updated_at,
        }
    }
}
