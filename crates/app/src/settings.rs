//! Settings for the `labshop` binary.
//!
//! Read from an optional `labshop.toml`, then from `LABSHOP_*` environment
//! variables (`LABSHOP_APP__LEVEL=debug`, `LABSHOP_DATABASE__SQLITE=shop.db`).
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_FILE: &str = "labshop";

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("./labshop.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Self::Memory => String::from("sqlite::memory:"),
            Self::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
}

impl Settings {
    pub fn new(file: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("LABSHOP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let settings = from_toml("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.database, Database::Sqlite("./labshop.db".into()));
    }

    #[test]
    fn database_is_a_tagged_choice() {
        let settings = from_toml("database = \"memory\"\n[app]\nlevel = \"debug\"\n");
        assert_eq!(settings.database, Database::Memory);
        assert_eq!(settings.app.level, "debug");

        let settings = from_toml("[database]\nsqlite = \"/var/lib/shop.db\"\n");
        assert_eq!(
            settings.database.url(),
            "sqlite:/var/lib/shop.db?mode=rwc"
        );
    }
}
