use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::cleanup::CleanupConfig;
use super::firebase::FirebaseConfig;
use super::logging::LoggingConfig;

/// Default location of the configuration file.
pub const CONFIG_PATH: &str = "./config.yaml";

/// Prefix for environment overrides, e.g. `CAMPUSGATE_FIREBASE__API_KEY`.
pub const ENV_PREFIX: &str = "CAMPUSGATE_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: backend project, logging, app shell and cleanup settings.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub firebase: FirebaseConfig,
    pub logging: LoggingConfig,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1:5173".to_string()
}

/// Builds the figment used by both binaries: the YAML file first, then
/// environment overrides on top.
pub fn build_figment(path: &str) -> Figment {
    Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Extracts a versioned config from a figment, unwrapping the version tag.
pub fn extract_config(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Load config from "config.yaml" in the current directory plus environment overrides.
///
/// Any failure here is fatal: the error is printed and the process exits.
pub fn load_config() -> ConfigV1 {
    let config = match extract_config(build_figment(CONFIG_PATH)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.firebase.validate() {
        eprintln!("Invalid firebase configuration: {}", e);
        std::process::exit(1);
    }
    config
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
