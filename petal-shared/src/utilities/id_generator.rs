use rand::distributions::Alphanumeric;
use rand::Rng;
use crate::models::errors::IdError;

pub const DOCUMENT_ID_LENGTH: usize = 20;

/// Number of leading document id characters folded into the numeric id.
/// 36^10 stays below 2^53, so the value survives a round trip through JSON clients.
pub const LEGACY_ID_PREFIX_LENGTH: usize = 10;

/// Generates an opaque document id shaped like the document store's auto ids.
pub fn generate_document_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DOCUMENT_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Derives the numeric id shown to clients from a document id.
///
/// Not collision free: two document ids sharing a prefix map to the same value,
/// so callers must reserve the result before relying on it.
pub fn legacy_id_from_document_id(document_id: &str) -> Result<u64, IdError> {
    if document_id.is_empty() {
        return Err(IdError::Empty);
    }

    let prefix: String = document_id
        .chars()
        .take(LEGACY_ID_PREFIX_LENGTH)
        .collect::<String>()
        .to_ascii_lowercase();
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(IdError::NotBase36(document_id.to_string()));
    }

    u64::from_str_radix(&prefix, 36).map_err(|_| IdError::NotBase36(document_id.to_string()))
}
