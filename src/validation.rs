use anyhow::{Result, anyhow};

pub const EVM_ADDRESS_BYTES: usize = 20;
pub const MAX_CHAIN_ID_LEN: usize = 20;
pub const MAX_TEXT_FIELD_LEN: usize = 2048;
pub const MAX_DECIMAL_LEN: usize = 96;

const _: [(); 64 - EVM_ADDRESS_BYTES] = [(); 64 - EVM_ADDRESS_BYTES];

pub fn require_non_empty(value: &str, label: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{label} cannot be empty"));
    }
    if trimmed.len() > MAX_TEXT_FIELD_LEN {
        return Err(anyhow!(
            "{label} exceeds {MAX_TEXT_FIELD_LEN} character limit"
        ));
    }
    Ok(trimmed.to_string())
}

/// Accepts `0x` followed by 40 hex digits. Casing is preserved so checksummed
/// addresses round-trip unchanged.
pub fn sanitize_evm_address(value: &str, label: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{label} cannot be empty"));
    }
    let digits = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| anyhow!("{label} must start with 0x"))?;
    let bytes =
        hex::decode(digits).map_err(|err| anyhow!("Failed to decode {label} as hex: {err}"))?;
    if bytes.len() != EVM_ADDRESS_BYTES {
        return Err(anyhow!(
            "{label} must be {EVM_ADDRESS_BYTES} bytes, got {}",
            bytes.len()
        ));
    }
    Ok(format!("0x{digits}"))
}

pub fn validate_chain_id(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("chainId cannot be empty"));
    }
    if trimmed.len() > MAX_CHAIN_ID_LEN {
        return Err(anyhow!(
            "chainId exceeds {MAX_CHAIN_ID_LEN} character limit"
        ));
    }
    if !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(anyhow!("chainId must be a decimal number, got {trimmed}"));
    }
    Ok(trimmed.to_string())
}

/// Monetary amounts travel as plain decimal strings such as `12` or `0.5`.
/// Signs, exponents and bare dots are rejected.
pub fn validate_decimal_string(value: &str, label: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{label} cannot be empty"));
    }
    if trimmed.len() > MAX_DECIMAL_LEN {
        return Err(anyhow!("{label} exceeds {MAX_DECIMAL_LEN} character limit"));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (trimmed, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || fraction.is_some_and(|part| !all_digits(part)) {
        return Err(anyhow!("{label} must be a non-negative decimal string, got {trimmed}"));
    }
    Ok(trimmed.to_string())
}

pub fn parse_user_id(value: &str) -> Result<i64> {
    let trimmed = value.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| anyhow!("userId must be an integer, got {trimmed}"))
}
