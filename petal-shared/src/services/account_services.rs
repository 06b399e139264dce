use chrono::Utc;
use crate::models::account::{Account, NewCustomer, UserRecord};
use crate::models::auth::SessionClaims;
use crate::models::errors::{AccountStoreError, AuthError};
use crate::models::phone::{OtpCheckRequest, OtpCheckResponse, OtpRequest, OtpRequestResponse};
use crate::repositories::account_repository::AccountRepository;
use crate::services::otp_services::OtpProvider;
use crate::services::token_services::TokenMinter;
use crate::utilities::id_generator::{generate_document_id, legacy_id_from_document_id};
use crate::utilities::phone_numbers::{normalize_phone, phone_fingerprint, phone_lookup_variants};

/// Attempts at creating a customer before a legacy id collision is treated as fatal.
pub const MAX_ID_ATTEMPTS: usize = 3;

/// Outcome of resolving a phone to an account.
#[derive(Debug, Clone)]
pub struct ResolvedAccount {
    pub account: Account,
    pub created: bool,
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn request_otp(
    provider: &dyn OtpProvider,
    request: OtpRequest,
) -> Result<OtpRequestResponse, AuthError> {
    let raw = required(request.phone.as_deref()).ok_or(AuthError::MissingPhone)?;
    let phone = normalize_phone(raw);

    provider.send_otp(&phone).await.map_err(AuthError::OtpDelivery)?;

    log::info!("[OTP] Code sent to {}", phone_fingerprint(&phone));
    Ok(OtpRequestResponse { success: true, phone })
}

/// Verifies the code, then signs the caller in as the merchant or customer owning the phone.
pub async fn check_otp(
    provider: &dyn OtpProvider,
    repository: &dyn AccountRepository,
    minter: &TokenMinter,
    request: OtpCheckRequest,
) -> Result<(OtpCheckResponse, bool), AuthError> {
    let (raw_phone, otp) = match (required(request.phone.as_deref()), required(request.otp.as_deref())) {
        (Some(phone), Some(otp)) => (phone, otp),
        _ => return Err(AuthError::MissingOtp),
    };

    let phone = normalize_phone(raw_phone);
    provider
        .verify_otp(&phone, otp)
        .await
        .map_err(AuthError::OtpVerification)?;

    let resolved = resolve_account(repository, raw_phone, request.name.as_deref()).await?;
    let account = resolved.account;

    let user = UserRecord::from_account(&account, Utc::now());
    repository.upsert_user(&user).await?;

    let token = minter.mint(&SessionClaims {
        user_id: account.legacy_id(),
        role: account.role(),
        phone: phone.clone(),
    })?;

    log::info!(
        "[OTP] {} {} signed in ({})",
        account.role(),
        account.legacy_id(),
        phone_fingerprint(&phone)
    );

    Ok((
        OtpCheckResponse {
            token,
            role: account.role(),
            user: account,
        },
        resolved.created,
    ))
}

async fn find_existing(
    repository: &dyn AccountRepository,
    variants: &[String],
) -> Result<Option<Account>, AccountStoreError> {
    if let Some(merchant) = repository.find_merchant_by_phone(variants).await? {
        return Ok(Some(Account::Merchant(merchant)));
    }
    if let Some(customer) = repository.find_customer_by_phone(variants).await? {
        return Ok(Some(Account::Customer(customer)));
    }
    Ok(None)
}

/// Finds the merchant or customer for a phone, creating a customer when neither exists.
///
/// A merchant always wins over a customer with the same phone. Concurrent
/// sign-ins for a new phone converge on one customer: the loser of the phone
/// claim reads the claim and returns the winner's account.
pub async fn resolve_account(
    repository: &dyn AccountRepository,
    raw_phone: &str,
    name: Option<&str>,
) -> Result<ResolvedAccount, AuthError> {
    resolve_account_with(repository, raw_phone, name, generate_document_id).await
}

/// `resolve_account` with the source of new document ids supplied by the caller.
pub async fn resolve_account_with(
    repository: &dyn AccountRepository,
    raw_phone: &str,
    name: Option<&str>,
    mut next_document_id: impl FnMut() -> String + Send,
) -> Result<ResolvedAccount, AuthError> {
    let variants = phone_lookup_variants(raw_phone);
    let phone = normalize_phone(raw_phone);

    if let Some(account) = find_existing(repository, &variants).await? {
        return Ok(ResolvedAccount { account, created: false });
    }

    for attempt in 1..=MAX_ID_ATTEMPTS {
        let document_id = next_document_id();
        let id = legacy_id_from_document_id(&document_id)?;

        match repository.create_customer(NewCustomer::new(document_id, id, name, &phone)).await {
            Ok(customer) => {
                log::info!("[Accounts] Created customer {} for {}", customer.id, phone_fingerprint(&phone));
                return Ok(ResolvedAccount { account: Account::Customer(customer), created: true });
            }
            Err(AccountStoreError::PhoneAlreadyClaimed(_)) => {
                log::warn!("[Accounts] Lost creation race for {}, reading claim", phone_fingerprint(&phone));
                let winner = match repository.find_by_phone_claim(&phone).await? {
                    Some(account) => Some(account),
                    None => find_existing(repository, &variants).await?,
                };
                return winner
                    .map(|account| ResolvedAccount { account, created: false })
                    .ok_or_else(|| AuthError::Unresolved(format!(
                        "phone {} is claimed but no account was found",
                        phone_fingerprint(&phone)
                    )));
            }
            Err(AccountStoreError::LegacyIdTaken(taken)) => {
                log::warn!("[Accounts] Legacy id {} taken on attempt {}", taken, attempt);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AuthError::Unresolved(format!("no free legacy id after {} attempts", MAX_ID_ATTEMPTS)))
}
