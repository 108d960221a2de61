use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::validation::{
    require_non_empty, sanitize_evm_address, validate_chain_id, validate_decimal_string,
};

/// Advisory wait between drips, shown to users. Not enforced server-side.
pub const DEFAULT_COOLDOWN_HOURS: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faucet {
    pub id: i64,
    pub chain_id: String,
    pub token_address: String,
    pub token_symbol: String,
    pub url: String,
    pub amount: String,
    pub cooldown_hours: u32,
}

/// Snake-case aliases let the same type load from TOML fixture tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFaucet {
    #[serde(alias = "chain_id")]
    pub chain_id: String,
    #[serde(alias = "token_address")]
    pub token_address: String,
    #[serde(alias = "token_symbol")]
    pub token_symbol: String,
    pub url: String,
    pub amount: String,
    #[serde(default = "default_cooldown_hours", alias = "cooldown_hours")]
    pub cooldown_hours: u32,
}

impl NewFaucet {
    pub fn validate(&mut self) -> Result<()> {
        self.chain_id = validate_chain_id(&self.chain_id)?;
        self.token_address = sanitize_evm_address(&self.token_address, "tokenAddress")?;
        self.token_symbol = require_non_empty(&self.token_symbol, "tokenSymbol")?;
        self.url = require_non_empty(&self.url, "url")?;
        self.amount = validate_decimal_string(&self.amount, "amount")?;
        Ok(())
    }

    pub(crate) fn into_faucet(self, id: i64) -> Faucet {
        Faucet {
            id,
            chain_id: self.chain_id,
            token_address: self.token_address,
            token_symbol: self.token_symbol,
            url: self.url,
            amount: self.amount,
            cooldown_hours: self.cooldown_hours,
        }
    }
}

const fn default_cooldown_hours() -> u32 {
    DEFAULT_COOLDOWN_HOURS
}
