use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::validation::{require_non_empty, sanitize_evm_address, validate_chain_id};

/// Sentinel contract address standing in for a chain's native asset.
pub const NATIVE_TOKEN_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: i64,
    pub chain_id: String,
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub logo_url: Option<String>,
    pub is_native: bool,
}

/// Snake-case aliases let the same type load from TOML fixture tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewToken {
    #[serde(alias = "chain_id")]
    pub chain_id: String,
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(default, alias = "logo_url")]
    pub logo_url: Option<String>,
    #[serde(default, alias = "is_native")]
    pub is_native: bool,
}

impl NewToken {
    pub fn validate(&mut self) -> Result<()> {
        self.chain_id = validate_chain_id(&self.chain_id)?;
        self.address = sanitize_evm_address(&self.address, "address")?;
        self.symbol = require_non_empty(&self.symbol, "symbol")?;
        self.name = require_non_empty(&self.name, "name")?;
        if self.is_native && self.address != NATIVE_TOKEN_ADDRESS {
            return Err(anyhow::anyhow!(
                "Native tokens must use the zero address {NATIVE_TOKEN_ADDRESS}"
            ));
        }
        Ok(())
    }

    pub(crate) fn into_token(self, id: i64) -> Token {
        Token {
            id,
            chain_id: self.chain_id,
            address: self.address,
            symbol: self.symbol,
            name: self.name,
            decimals: self.decimals,
            logo_url: self.logo_url,
            is_native: self.is_native,
        }
    }
}
