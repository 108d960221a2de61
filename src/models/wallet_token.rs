use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::validation::{sanitize_evm_address, validate_chain_id, validate_decimal_string};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletToken {
    pub id: i64,
    pub user_id: i64,
    pub chain_id: String,
    pub token_address: String,
    /// Last balance reported by the chain, in token units.
    pub balance: String,
    pub is_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWalletToken {
    pub user_id: i64,
    pub chain_id: String,
    pub token_address: String,
    #[serde(default = "default_balance")]
    pub balance: String,
    #[serde(default = "default_visibility")]
    pub is_visible: bool,
}

impl NewWalletToken {
    pub fn validate(&mut self) -> Result<()> {
        self.chain_id = validate_chain_id(&self.chain_id)?;
        self.token_address = sanitize_evm_address(&self.token_address, "tokenAddress")?;
        self.balance = validate_decimal_string(&self.balance, "balance")?;
        Ok(())
    }

    pub(crate) fn into_wallet_token(self, id: i64) -> WalletToken {
        WalletToken {
            id,
            user_id: self.user_id,
            chain_id: self.chain_id,
            token_address: self.token_address,
            balance: self.balance,
            is_visible: self.is_visible,
        }
    }
}

/// Body of `PUT /api/wallet-tokens/{userId}/{chainId}/{tokenAddress}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BalanceUpdate {
    pub balance: String,
}

impl BalanceUpdate {
    pub fn validate(&mut self) -> Result<()> {
        self.balance = validate_decimal_string(&self.balance, "balance")?;
        Ok(())
    }
}

fn default_balance() -> String {
    "0".to_string()
}

const fn default_visibility() -> bool {
    true
}
