use karat_catalog::PricingConfig;
use karat_shared::{Category, Design, MetalType, PurityGrade};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    pub barcode: BarcodeConfig,
    #[serde(default)]
    pub reference: ReferenceSeed,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BarcodeConfig {
    pub prefix: String,
    #[serde(default = "default_barcode_start")]
    pub start: u64,
}

fn default_barcode_start() -> u64 { 1 }

/// Master data loaded at startup.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ReferenceSeed {
    pub metal_types: Vec<MetalType>,
    pub purities: Vec<PurityGrade>,
    pub designs: Vec<Design>,
    pub categories: Vec<Category>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `KARAT__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("KARAT").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Build from an inline TOML document, without files or environment.
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
