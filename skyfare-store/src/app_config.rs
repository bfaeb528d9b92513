use rust_decimal::Decimal;
use serde::Deserialize;
use skyfare_catalog::generator::DEFAULT_BATCH_SIZE;
use skyfare_catalog::offer_board::DEFAULT_OFFER_TTL_SECONDS;
use skyfare_catalog::DemandPricingConfig;
use skyfare_order::wallet::DEFAULT_INITIAL_BALANCE;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub pricing: DemandPricingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 { 3000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WalletConfig {
    /// Opening balance of every new session
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,
}

fn default_initial_balance() -> Decimal { Decimal::from(DEFAULT_INITIAL_BALANCE) }

impl Default for WalletConfig {
    fn default() -> Self {
        Self { initial_balance: default_initial_balance() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Offers generated per search leg
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// How long a searched offer stays bookable
    #[serde(default = "default_offer_ttl")]
    pub offer_ttl_seconds: i64,
}

fn default_batch_size() -> usize { DEFAULT_BATCH_SIZE }
fn default_offer_ttl() -> i64 { DEFAULT_OFFER_TTL_SECONDS }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            offer_ttl_seconds: default_offer_ttl(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `SKYFARE_WALLET__INITIAL_BALANCE=1000`
            .add_source(config::Environment::with_prefix("SKYFARE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
