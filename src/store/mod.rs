//! In-memory repository for wallet data.
//!
//! Each collection sits behind its own `RwLock` and every operation takes at
//! most one lock, so individual reads and writes are atomic with respect to
//! each other. Nothing is persisted; state lives for the process lifetime.

mod table;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::fixtures::Fixtures;
use crate::models::faucet::{Faucet, NewFaucet};
use crate::models::network::{NewNetwork, Network};
use crate::models::token::{NewToken, Token};
use crate::models::transaction::{NewTransaction, Transaction, TransactionStatus};
use crate::models::user::{NewUser, User, WalletUpdate};
use crate::models::wallet_token::{NewWalletToken, WalletToken};

use self::table::Table;

type TokenKey = (String, String);
type WalletTokenKey = (i64, String, String);
type FaucetKey = (String, String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, key: String },
    #[error("{entity} {key} already exists")]
    Conflict { entity: &'static str, key: String },
    #[error("Transaction {hash} cannot move from {from} to {to}")]
    InvalidTransition {
        hash: String,
        from: TransactionStatus,
        to: TransactionStatus,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub users: usize,
    pub networks: usize,
    pub tokens: usize,
    pub transactions: usize,
    pub wallet_tokens: usize,
    pub faucets: usize,
}

#[derive(Debug)]
pub struct WalletStore {
    users: RwLock<Table<String, User>>,
    networks: RwLock<Table<String, Network>>,
    tokens: RwLock<Table<TokenKey, Token>>,
    transactions: RwLock<Table<String, Transaction>>,
    wallet_tokens: RwLock<Table<WalletTokenKey, WalletToken>>,
    faucets: RwLock<Table<FaucetKey, Faucet>>,
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Table::new()),
            networks: RwLock::new(Table::new()),
            tokens: RwLock::new(Table::new()),
            transactions: RwLock::new(Table::new()),
            wallet_tokens: RwLock::new(Table::new()),
            faucets: RwLock::new(Table::new()),
        }
    }

    /// Creates a store and loads the reference data through the regular
    /// create operations, so fixture rows get ids in declaration order.
    pub async fn seeded(fixtures: &Fixtures) -> StoreResult<Self> {
        let store = Self::new();
        for network in &fixtures.networks {
            store.create_network(network.clone()).await?;
        }
        for token in &fixtures.tokens {
            store.create_token(token.clone()).await?;
        }
        for faucet in &fixtures.faucets {
            store.create_faucet(faucet.clone()).await?;
        }
        info!(
            "Seeded store with {} networks, {} tokens, {} faucets",
            fixtures.networks.len(),
            fixtures.tokens.len(),
            fixtures.faucets.len()
        );
        Ok(store)
    }

    pub async fn stats(&self) -> StoreStats {
        StoreStats {
            users: self.users.read().await.len(),
            networks: self.networks.read().await.len(),
            tokens: self.tokens.read().await.len(),
            transactions: self.transactions.read().await.len(),
            wallet_tokens: self.wallet_tokens.read().await.len(),
            faucets: self.faucets.read().await.len(),
        }
    }

    // Users

    pub async fn get_user(&self, id: i64) -> Option<User> {
        self.users.read().await.get_by_id(id).cloned()
    }

    pub async fn get_user_by_privy_id(&self, privy_id: &str) -> Option<User> {
        self.users.read().await.get(&privy_id.to_string()).cloned()
    }

    pub async fn create_user(&self, input: NewUser) -> StoreResult<User> {
        let key = input.privy_id.clone();
        let mut users = self.users.write().await;
        let user = users
            .insert_new(key.clone(), |id| input.into_user(id, Utc::now()))
            .cloned()
            .ok_or(StoreError::Conflict {
                entity: "User",
                key,
            })?;
        debug!("Created user {} for {}", user.id, user.privy_id);
        Ok(user)
    }

    pub async fn update_user_wallet(
        &self,
        privy_id: &str,
        update: WalletUpdate,
    ) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&privy_id.to_string())
            .ok_or_else(|| StoreError::NotFound {
                entity: "User",
                key: privy_id.to_string(),
            })?;
        user.wallet_address = update.wallet_address;
        user.encrypted_private_key = update.encrypted_private_key;
        debug!("Replaced wallet for user {}", user.id);
        Ok(user.clone())
    }

    // Networks

    pub async fn list_networks(&self) -> Vec<Network> {
        self.networks.read().await.values().cloned().collect()
    }

    pub async fn get_network(&self, chain_id: &str) -> Option<Network> {
        self.networks.read().await.get(&chain_id.to_string()).cloned()
    }

    pub async fn create_network(&self, input: NewNetwork) -> StoreResult<Network> {
        let key = input.chain_id.clone();
        self.networks
            .write()
            .await
            .insert_new(key.clone(), |id| input.into_network(id))
            .cloned()
            .ok_or(StoreError::Conflict {
                entity: "Network",
                key,
            })
    }

    // Tokens

    pub async fn list_tokens(&self, chain_id: &str) -> Vec<Token> {
        self.tokens
            .read()
            .await
            .filter_cloned(|token| token.chain_id == chain_id)
    }

    pub async fn get_token(&self, chain_id: &str, address: &str) -> Option<Token> {
        let key = (chain_id.to_string(), address.to_string());
        self.tokens.read().await.get(&key).cloned()
    }

    pub async fn create_token(&self, input: NewToken) -> StoreResult<Token> {
        let key = (input.chain_id.clone(), input.address.clone());
        let conflict = StoreError::Conflict {
            entity: "Token",
            key: format!("{}/{}", key.0, key.1),
        };
        self.tokens
            .write()
            .await
            .insert_new(key, |id| input.into_token(id))
            .cloned()
            .ok_or(conflict)
    }

    // Transactions

    pub async fn list_transactions(&self, user_id: i64) -> Vec<Transaction> {
        self.transactions
            .read()
            .await
            .filter_cloned(|tx| tx.user_id == user_id)
    }

    pub async fn list_transactions_on_chain(
        &self,
        user_id: i64,
        chain_id: &str,
    ) -> Vec<Transaction> {
        self.transactions
            .read()
            .await
            .filter_cloned(|tx| tx.user_id == user_id && tx.chain_id == chain_id)
    }

    pub async fn get_transaction(&self, hash: &str) -> Option<Transaction> {
        self.transactions.read().await.get(&hash.to_string()).cloned()
    }

    /// Records a submitted transaction. A hash that is already stored is
    /// refused and the existing record is left untouched.
    pub async fn create_transaction(&self, input: NewTransaction) -> StoreResult<Transaction> {
        let key = input.hash.clone();
        let mut transactions = self.transactions.write().await;
        let transaction = transactions
            .insert_new(key.clone(), |id| input.into_transaction(id, Utc::now()))
            .cloned()
            .ok_or(StoreError::Conflict {
                entity: "Transaction",
                key,
            })?;
        debug!(
            "Recorded transaction {} for user {} on chain {}",
            transaction.hash, transaction.user_id, transaction.chain_id
        );
        Ok(transaction)
    }

    pub async fn update_transaction_status(
        &self,
        hash: &str,
        status: TransactionStatus,
        block_number: Option<i64>,
    ) -> StoreResult<Transaction> {
        let mut transactions = self.transactions.write().await;
        let transaction =
            transactions
                .get_mut(&hash.to_string())
                .ok_or_else(|| StoreError::NotFound {
                    entity: "Transaction",
                    key: hash.to_string(),
                })?;
        if !transaction.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                hash: hash.to_string(),
                from: transaction.status,
                to: status,
            });
        }
        // Re-applying the same status without a block keeps the recorded one.
        if block_number.is_some() || transaction.status != status {
            transaction.block_number = block_number;
        }
        transaction.status = status;
        debug!("Transaction {hash} is now {status}");
        Ok(transaction.clone())
    }

    // Wallet tokens

    pub async fn list_wallet_tokens(&self, user_id: i64) -> Vec<WalletToken> {
        self.wallet_tokens
            .read()
            .await
            .filter_cloned(|entry| entry.user_id == user_id)
    }

    pub async fn list_wallet_tokens_on_chain(
        &self,
        user_id: i64,
        chain_id: &str,
    ) -> Vec<WalletToken> {
        self.wallet_tokens
            .read()
            .await
            .filter_cloned(|entry| entry.user_id == user_id && entry.chain_id == chain_id)
    }

    /// Overwrites the cached balance, creating a visible entry on first refresh.
    pub async fn upsert_wallet_token_balance(
        &self,
        user_id: i64,
        chain_id: &str,
        token_address: &str,
        balance: String,
    ) -> WalletToken {
        let key = (user_id, chain_id.to_string(), token_address.to_string());
        let mut wallet_tokens = self.wallet_tokens.write().await;
        let replacement = balance.clone();
        wallet_tokens
            .upsert(
                key,
                |entry| entry.balance = replacement,
                |id| WalletToken {
                    id,
                    user_id,
                    chain_id: chain_id.to_string(),
                    token_address: token_address.to_string(),
                    balance,
                    is_visible: true,
                },
            )
            .clone()
    }

    pub async fn add_wallet_token(&self, input: NewWalletToken) -> StoreResult<WalletToken> {
        let key = (
            input.user_id,
            input.chain_id.clone(),
            input.token_address.clone(),
        );
        let conflict = StoreError::Conflict {
            entity: "Wallet token",
            key: format!("{}/{}/{}", key.0, key.1, key.2),
        };
        self.wallet_tokens
            .write()
            .await
            .insert_new(key, |id| input.into_wallet_token(id))
            .cloned()
            .ok_or(conflict)
    }

    // Faucets

    pub async fn list_faucets(&self, chain_id: &str) -> Vec<Faucet> {
        self.faucets
            .read()
            .await
            .filter_cloned(|faucet| faucet.chain_id == chain_id)
    }

    pub async fn create_faucet(&self, input: NewFaucet) -> StoreResult<Faucet> {
        let key = (input.chain_id.clone(), input.token_address.clone());
        let conflict = StoreError::Conflict {
            entity: "Faucet",
            key: format!("{}/{}", key.0, key.1),
        };
        self.faucets
            .write()
            .await
            .insert_new(key, |id| input.into_faucet(id))
            .cloned()
            .ok_or(conflict)
    }
}
