use std::fs;
use std::path::PathBuf;

use lexi_config::Config;
use lexi_config::storage::StorageConfig;
use serde::{Deserialize, Serialize};

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

fn profile_path(storage: &StorageConfig, name: &str) -> PathBuf {
    storage.profiles_dir().join(format!("{name}.json"))
}

/// Create the profiles folder and a main profile from `defaults` if missing
pub fn init_user_config(defaults: &Config) -> anyhow::Result<()> {
    let storage = &defaults.storage;
    fs::create_dir_all(storage.profiles_dir())?;

    let main_profile = profile_path(storage, "main");
    if !main_profile.exists() {
        let profile = Profile {
            name: "main".into(),
            value: defaults.clone(),
        };
        fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
        tracing::info!("Created main profile at {:?}", main_profile);
    }

    Ok(())
}

fn read_profile(path: &PathBuf) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)?;
    let profile: Profile = serde_json::from_str(&data)?;
    Ok(profile.value)
}

/// Load a user profile by name, defaulting to main if name not found
pub fn load_user_profile(defaults: &Config, name: &str) -> anyhow::Result<Config> {
    let storage = &defaults.storage;
    let profile_file = profile_path(storage, name);

    if profile_file.exists() {
        return read_profile(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
    let main_file = profile_path(storage, "main");
    if main_file.exists() {
        read_profile(&main_file)
    } else {
        Ok(defaults.clone())
    }
}

/// Add a new profile cloned from main
pub fn add_profile_from_default(defaults: &Config, new_name: &str) -> anyhow::Result<PathBuf> {
    let value = load_user_profile(defaults, "main")?;
    let profile = Profile {
        name: new_name.into(),
        value,
    };
    let file = profile_path(&defaults.storage, new_name);
    fs::write(&file, serde_json::to_string_pretty(&profile)?)?;
    tracing::info!("Created new profile: {new_name}");
    Ok(file)
}
