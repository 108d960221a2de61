//! Reference data the store is seeded with at startup.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::faucet::{DEFAULT_COOLDOWN_HOURS, NewFaucet};
use crate::models::network::NewNetwork;
use crate::models::token::{NATIVE_TOKEN_ADDRESS, NewToken};

const SEPOLIA: &str = "11155111";
const MUMBAI: &str = "80001";
const BSC_TESTNET: &str = "97";
const FUJI: &str = "43113";

const ETH_ICON: &str = "https://cryptologos.cc/logos/ethereum-eth-logo.png";
const MATIC_ICON: &str = "https://cryptologos.cc/logos/polygon-matic-logo.png";
const BNB_ICON: &str = "https://cryptologos.cc/logos/bnb-bnb-logo.png";
const AVAX_ICON: &str = "https://cryptologos.cc/logos/avalanche-avax-logo.png";
const USDC_ICON: &str = "https://cryptologos.cc/logos/usd-coin-usdc-logo.png";

const SEPOLIA_USDC: &str = "0x94a9D9AC8a22534E3FaCa9F4e7F2E2cf85d5E4C8";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub networks: Vec<NewNetwork>,
    #[serde(default)]
    pub tokens: Vec<NewToken>,
    #[serde(default)]
    pub faucets: Vec<NewFaucet>,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::testnets()
    }
}

impl Fixtures {
    /// Sepolia, Polygon Mumbai, BSC Testnet and Avalanche Fuji.
    pub fn testnets() -> Self {
        let networks = vec![
            network(
                SEPOLIA,
                "Sepolia Testnet",
                "ETH",
                "https://sepolia.infura.io/v3/",
                "https://sepolia.etherscan.io",
                ETH_ICON,
            ),
            network(
                MUMBAI,
                "Polygon Mumbai",
                "MATIC",
                "https://rpc-mumbai.maticvigil.com",
                "https://mumbai.polygonscan.com",
                MATIC_ICON,
            ),
            network(
                BSC_TESTNET,
                "BSC Testnet",
                "BNB",
                "https://data-seed-prebsc-1-s1.binance.org:8545",
                "https://testnet.bscscan.com",
                BNB_ICON,
            ),
            network(
                FUJI,
                "Avalanche Fuji",
                "AVAX",
                "https://api.avax-test.network/ext/bc/C/rpc",
                "https://testnet.snowtrace.io",
                AVAX_ICON,
            ),
        ];

        let tokens = vec![
            native_token(SEPOLIA, "ETH", "Ethereum", ETH_ICON),
            NewToken {
                chain_id: SEPOLIA.to_string(),
                address: SEPOLIA_USDC.to_string(),
                symbol: "USDC".to_string(),
                name: "USD Coin".to_string(),
                decimals: 6,
                logo_url: Some(USDC_ICON.to_string()),
                is_native: false,
            },
            native_token(MUMBAI, "MATIC", "Polygon", MATIC_ICON),
            native_token(BSC_TESTNET, "BNB", "Binance Coin", BNB_ICON),
            native_token(FUJI, "AVAX", "Avalanche", AVAX_ICON),
        ];

        let faucets = vec![
            native_faucet(SEPOLIA, "ETH", "https://sepoliafaucet.com", "0.5"),
            native_faucet(MUMBAI, "MATIC", "https://faucet.polygon.technology", "0.1"),
            native_faucet(
                BSC_TESTNET,
                "BNB",
                "https://testnet.binance.org/faucet-smart",
                "0.1",
            ),
            native_faucet(FUJI, "AVAX", "https://faucet.avax-test.network", "2.0"),
        ];

        Self {
            networks,
            tokens,
            faucets,
        }
    }

    /// Runs every fixture row through the same checks the create endpoints use.
    pub fn validate(&mut self) -> Result<()> {
        for network in &mut self.networks {
            network
                .validate()
                .with_context(|| format!("Invalid network fixture {}", network.chain_id))?;
        }
        for token in &mut self.tokens {
            token
                .validate()
                .with_context(|| format!("Invalid token fixture {}", token.symbol))?;
        }
        for faucet in &mut self.faucets {
            faucet
                .validate()
                .with_context(|| format!("Invalid faucet fixture {}", faucet.url))?;
        }
        Ok(())
    }
}

fn network(
    chain_id: &str,
    name: &str,
    symbol: &str,
    rpc_url: &str,
    explorer_url: &str,
    icon_url: &str,
) -> NewNetwork {
    NewNetwork {
        chain_id: chain_id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        rpc_url: rpc_url.to_string(),
        explorer_url: explorer_url.to_string(),
        is_testnet: true,
        icon_url: Some(icon_url.to_string()),
    }
}

fn native_token(chain_id: &str, symbol: &str, name: &str, logo_url: &str) -> NewToken {
    NewToken {
        chain_id: chain_id.to_string(),
        address: NATIVE_TOKEN_ADDRESS.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        decimals: 18,
        logo_url: Some(logo_url.to_string()),
        is_native: true,
    }
}

fn native_faucet(chain_id: &str, symbol: &str, url: &str, amount: &str) -> NewFaucet {
    NewFaucet {
        chain_id: chain_id.to_string(),
        token_address: NATIVE_TOKEN_ADDRESS.to_string(),
        token_symbol: symbol.to_string(),
        url: url.to_string(),
        amount: amount.to_string(),
        cooldown_hours: DEFAULT_COOLDOWN_HOURS,
    }
}
