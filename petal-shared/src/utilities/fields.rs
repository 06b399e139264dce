pub mod dynamodb {
    pub const PK: &str = "pk";
    pub const SK: &str = "sk";
    pub const ENTITY_TYPE: &str = "entity_type";
    pub const MOBILE: &str = "mobile";
    pub const MOBILE_INDEX: &str = "mobile-index";

    pub const DOCUMENT_ID: &str = "document_id";
    pub const LEGACY_ID: &str = "id";
    pub const NAME: &str = "name";
    pub const STORE_NAME: &str = "store_name";
    pub const EMAIL: &str = "email";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const ROLE: &str = "role";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";

    pub const PROFILE_SK: &str = "PROFILE";
    pub const CLAIM_SK: &str = "CLAIM";

    pub const MERCHANT_PREFIX: &str = "MERCHANT#";
    pub const CUSTOMER_PREFIX: &str = "CUSTOMER#";
    pub const USER_PREFIX: &str = "USER#";
    pub const PHONE_CLAIM_PREFIX: &str = "PHONE#";
    pub const LEGACY_ID_CLAIM_PREFIX: &str = "LEGACYID#";

    pub const MERCHANT_ENTITY: &str = "merchant";
    pub const CUSTOMER_ENTITY: &str = "customer";
    pub const USER_ENTITY: &str = "user";
    pub const CLAIM_ENTITY: &str = "claim";
}

pub mod secrets {
    pub const OTP_API_KEY: &str = "otp_api_key";
    pub const TAP_SECRET_KEY: &str = "tap_secret_key";
    pub const EXPO_ACCESS_TOKEN: &str = "expo_access_token";
    pub const ADMIN_API_KEY: &str = "admin_api_key";
    pub const SERVICE_ACCOUNT: &str = "service_account";
}

pub mod headers {
    pub const OTP_API_KEY: &str = "X-Authorization";
    pub const ADMIN_API_KEY: &str = "x-admin-key";
}
