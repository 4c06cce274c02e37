use crate::error::{WalletError, WalletResult};

/// `^0x[0-9a-f]{40}$`. Accepts mixed-case input (checksummed addresses) and
/// normalizes to lowercase, since the stored invariant is lowercase hex.
pub fn normalize_address(raw: &str) -> WalletResult<String> {
    let lower = raw.to_ascii_lowercase();
    if !lower.starts_with("0x") || lower.len() != 42 {
        return Err(WalletError::InvalidAddress(raw.to_string()));
    }
    if !lower[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::InvalidAddress(raw.to_string()));
    }
    Ok(lower)
}
