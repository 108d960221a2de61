use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{
    require_non_empty, sanitize_evm_address, validate_chain_id, validate_decimal_string,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Confirmed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    /// Pending may move anywhere; terminal states only accept themselves.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        !self.is_terminal() || *self == next
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub chain_id: String,
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub token_address: Option<String>,
    pub token_symbol: Option<String>,
    pub block_number: Option<i64>,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub user_id: i64,
    pub chain_id: String,
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub block_number: Option<i64>,
    #[serde(default)]
    pub status: TransactionStatus,
}

impl NewTransaction {
    pub fn validate(&mut self) -> Result<()> {
        self.chain_id = validate_chain_id(&self.chain_id)?;
        self.hash = require_non_empty(&self.hash, "hash")?;
        self.from = sanitize_evm_address(&self.from, "from")?;
        self.to = sanitize_evm_address(&self.to, "to")?;
        self.value = validate_decimal_string(&self.value, "value")?;
        if let Some(token_address) = self.token_address.as_deref() {
            self.token_address = Some(sanitize_evm_address(token_address, "tokenAddress")?);
        }
        validate_block_number(self.block_number)?;
        Ok(())
    }

    pub(crate) fn into_transaction(self, id: i64, timestamp: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            user_id: self.user_id,
            chain_id: self.chain_id,
            hash: self.hash,
            from: self.from,
            to: self.to,
            value: self.value,
            token_address: self.token_address,
            token_symbol: self.token_symbol,
            block_number: self.block_number,
            status: self.status,
            timestamp,
        }
    }
}

/// Body of `PUT /api/transactions/{hash}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: TransactionStatus,
    #[serde(default)]
    pub block_number: Option<i64>,
}

impl StatusUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_block_number(self.block_number)
    }
}

fn validate_block_number(block_number: Option<i64>) -> Result<()> {
    match block_number {
        Some(number) if number < 0 => Err(anyhow!("blockNumber cannot be negative")),
        _ => Ok(()),
    }
}
