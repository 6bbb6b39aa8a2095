//! Reads a customer settings file.

use std::path::{Path, PathBuf};

use log::{error, info};

use crate::config::schema::IntakeSettings;
use crate::error::ConfigError;

/// Directory searched for `<customer>.ini` when no override is set.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/mdmgr";

/// Environment variable overriding [`DEFAULT_CONFIG_DIR`].
pub const CONFIG_DIR_ENV: &str = "PLINTAKE_CONFIG_DIR";

/// Strips all whitespace from a customer name so it can be used as a file stem.
pub fn sanitize_customer(customer: &str) -> String {
    customer.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Loads the settings for `customer` from the configured directory.
pub fn load(customer: &str) -> Result<IntakeSettings, ConfigError> {
    let dir = std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));
    load_from_dir(&dir, customer)
}

pub fn load_from_dir<P: AsRef<Path>>(dir: P, customer: &str) -> Result<IntakeSettings, ConfigError> {
    let customer = sanitize_customer(customer);
    if customer.is_empty() {
        return Err(ConfigError::EmptyCustomer);
    }
    if customer.contains(['/', '\\']) || customer == ".." {
        return Err(ConfigError::Validation {
            message: format!("Customer name '{}' is not a valid file name", customer),
        });
    }

    let path = dir.as_ref().join(format!("{}.ini", customer));
    if !path.is_file() {
        error!("Configuration file not found: {}", path.display());
        return Err(ConfigError::NotFound { path });
    }

    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()).format(config::FileFormat::Ini))
        .build()
        .and_then(|c| c.try_deserialize::<IntakeSettings>())
        .map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })?;

    validate_settings(&settings)?;

    info!("Configuration file loaded: {}", path.display());
    Ok(settings)
}

pub fn load_settings_from_str(content: &str) -> Result<IntakeSettings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Ini))
        .build()
        .and_then(|c| c.try_deserialize::<IntakeSettings>())
        .map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source: e,
        })?;

    validate_settings(&settings)?;

    Ok(settings)
}

fn validate_settings(settings: &IntakeSettings) -> Result<(), ConfigError> {
    if settings.database.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "database.path must not be empty".to_string(),
        });
    }
    if settings.poller.interval_secs == 0 {
        return Err(ConfigError::Validation {
            message: "poller.interval_secs must be greater than zero".to_string(),
        });
    }
    if settings.poller.processed_capacity == 0 {
        return Err(ConfigError::Validation {
            message: "poller.processed_capacity must be greater than zero".to_string(),
        });
    }

    let logging = &settings.logging;
    for (key, name) in [
        ("logging.general_file", &logging.general_file),
        ("logging.error_file", &logging.error_file),
    ] {
        if name.trim().is_empty() || name.contains(['/', '\\']) {
            return Err(ConfigError::Validation {
                message: format!("{} must be a plain file name, got '{}'", key, name),
            });
        }
    }
    if logging.general_file == logging.error_file {
        return Err(ConfigError::Validation {
            message: "logging.general_file and logging.error_file must differ".to_string(),
        });
    }
    Ok(())
}
