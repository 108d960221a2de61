use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{require_non_empty, sanitize_evm_address};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub privy_id: String,
    pub wallet_address: String,
    /// Key material exactly as supplied by the client. Not encrypted at rest.
    pub encrypted_private_key: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub privy_id: String,
    pub wallet_address: String,
    pub encrypted_private_key: String,
}

impl NewUser {
    pub fn validate(&mut self) -> Result<()> {
        self.privy_id = require_non_empty(&self.privy_id, "privyId")?;
        self.wallet_address = sanitize_evm_address(&self.wallet_address, "walletAddress")?;
        require_non_empty(&self.encrypted_private_key, "encryptedPrivateKey")?;
        Ok(())
    }

    pub(crate) fn into_user(self, id: i64, created_at: DateTime<Utc>) -> User {
        User {
            id,
            privy_id: self.privy_id,
            wallet_address: self.wallet_address,
            encrypted_private_key: self.encrypted_private_key,
            created_at,
        }
    }
}

/// Body of `PUT /api/users/{privyId}/wallet`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletUpdate {
    pub wallet_address: String,
    pub encrypted_private_key: String,
}

impl WalletUpdate {
    pub fn validate(&mut self) -> Result<()> {
        self.wallet_address = sanitize_evm_address(&self.wallet_address, "walletAddress")?;
        require_non_empty(&self.encrypted_private_key, "encryptedPrivateKey")?;
        Ok(())
    }
}
