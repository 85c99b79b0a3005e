mod catalog;
mod settings;

pub use catalog::CatalogItem;
pub use settings::{Business, Config, InvoiceSettings};

use crate::error::{Result, TallyError};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.tally/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tally") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        TallyError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".tally"))
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    load_toml(&config_dir.join("config.toml"))
}

/// Load items.toml as a HashMap keyed by item id
pub fn load_items(config_dir: &Path) -> Result<HashMap<String, CatalogItem>> {
    load_toml(&config_dir.join("items.toml"))
}

fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(TallyError::ConfigFileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    toml::from_str(&content).map_err(|e| TallyError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the template files into a fresh config directory
pub fn init_config_dir(config_dir: &Path) -> Result<()> {
    if config_dir.exists() {
        return Err(TallyError::AlreadyInitialized(config_dir.to_path_buf()));
    }

    fs::create_dir_all(config_dir)?;
    fs::write(config_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(config_dir.join("items.toml"), ITEMS_TEMPLATE)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[business]
name = "Your Business Name"
email = "billing@yourbusiness.com"
# address = "1 Raffles Place, Singapore 048616"   # optional
# phone = "+65 6000 0000"                          # optional

[invoice]
currency = "SGD"
currency_symbol = "S$"
due_days = 30
share_base_url = "http://localhost:3000"   # public links become <url>/i/<token>
"#;

/// Template content for items.toml
pub const ITEMS_TEMPLATE: &str = r#"# Reusable line items. The table name (e.g., [consulting]) is used as the
# item key when building invoices.
#
# Example:
#   tally new --client acme --line consulting:8 --line "discount:Loyalty:50"
#
# unit is one of: hours, days, items, units, fixed

[consulting]
description = "Technical Consulting"
rate = 150.00
unit = "hours"

[development]
description = "Software Development"
rate = 125.00
unit = "hours"

[project-setup]
description = "Project Setup & Configuration"
rate = 500.00
unit = "fixed"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn templates_parse() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.invoice.currency, "SGD");

        let items: HashMap<String, CatalogItem> = toml::from_str(ITEMS_TEMPLATE).unwrap();
        assert_eq!(items["consulting"].rate, dec!(150));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn init_refuses_existing_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = init_config_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TallyError::AlreadyInitialized(_)));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, TallyError::ConfigFileNotFound(_)));
    }
}
