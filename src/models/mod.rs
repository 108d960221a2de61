pub mod faucet;
pub mod network;
pub mod token;
pub mod transaction;
pub mod user;
pub mod wallet_token;
