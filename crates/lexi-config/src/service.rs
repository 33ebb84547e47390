use std::env;

use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    "http://localhost:8787/api/define".to_string()
}

/// Remote define service settings
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServiceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl ServiceConfig {
    pub fn new() -> Self {
        let endpoint = env::var("DEFINE_ENDPOINT").unwrap_or_else(|_| default_endpoint());

        Self { endpoint }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}
