use serde::{Deserialize, Serialize};

use self::limits::LimitsConfig;
use self::service::ServiceConfig;
use self::storage::StorageConfig;

pub mod limits;
pub mod service;
pub mod storage;


#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub limits: LimitsConfig,
}

impl Config {
    /// Build from environment variables, falling back to defaults
    pub fn new() -> Self {
        Config {
            service: ServiceConfig::new(),
            storage: StorageConfig::new(),
            limits: LimitsConfig::new(),
        }
    }
}
