use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::validation::{require_non_empty, validate_chain_id};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: i64,
    pub chain_id: String,
    pub name: String,
    pub symbol: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub is_testnet: bool,
    pub icon_url: Option<String>,
}

/// Snake-case aliases let the same type load from TOML fixture tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNetwork {
    #[serde(alias = "chain_id")]
    pub chain_id: String,
    pub name: String,
    pub symbol: String,
    #[serde(alias = "rpc_url")]
    pub rpc_url: String,
    #[serde(alias = "explorer_url")]
    pub explorer_url: String,
    #[serde(default = "default_is_testnet", alias = "is_testnet")]
    pub is_testnet: bool,
    #[serde(default, alias = "icon_url")]
    pub icon_url: Option<String>,
}

impl NewNetwork {
    pub fn validate(&mut self) -> Result<()> {
        self.chain_id = validate_chain_id(&self.chain_id)?;
        self.name = require_non_empty(&self.name, "name")?;
        self.symbol = require_non_empty(&self.symbol, "symbol")?;
        self.rpc_url = require_non_empty(&self.rpc_url, "rpcUrl")?;
        self.explorer_url = require_non_empty(&self.explorer_url, "explorerUrl")?;
        Ok(())
    }

    pub(crate) fn into_network(self, id: i64) -> Network {
        Network {
            id,
            chain_id: self.chain_id,
            name: self.name,
            symbol: self.symbol,
            rpc_url: self.rpc_url,
            explorer_url: self.explorer_url,
            is_testnet: self.is_testnet,
            icon_url: self.icon_url,
        }
    }
}

const fn default_is_testnet() -> bool {
    true
}
