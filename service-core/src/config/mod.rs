//! Layered configuration loading shared by the services.
//!
//! Sources, later ones winning: serde defaults on the target type, an optional
//! `config/base.yaml` next to the service, `APP_`-prefixed environment
//! variables (`__` separates nesting levels), then explicit overrides.

use crate::error::AppError;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Resolve the `config/` directory of a service crate, whether the process was
/// started from the workspace root or from inside the crate directory.
pub fn configuration_directory(service_dir: &str) -> Result<PathBuf, AppError> {
    let base_path = std::env::current_dir()?;

    if base_path.ends_with(service_dir) {
        Ok(base_path.join("config"))
    } else {
        Ok(base_path.join(service_dir).join("config"))
    }
}

/// Load settings of type `T` from the layered sources.
///
/// `list_keys` names the keys whose environment values are comma separated
/// lists. `overrides` are applied last; `None` values are skipped.
pub fn load<T: DeserializeOwned>(
    config_dir: &Path,
    list_keys: &[&str],
    overrides: &[(&str, Option<String>)],
) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let mut environment = Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__");
    if !list_keys.is_empty() {
        environment = environment.try_parsing(true).list_separator(",");
        for key in list_keys {
            environment = environment.with_list_parse_key(key);
        }
    }

    let mut builder = Config::builder()
        .add_source(File::from(config_dir.join("base.yaml")).required(false))
        .add_source(environment);

    for (key, value) in overrides {
        builder = builder.set_override_option(*key, value.clone())?;
    }

    Ok(builder.build()?.try_deserialize()?)
}
