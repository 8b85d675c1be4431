//! Runtime configuration: optional TOML file merged with CLI overrides
//!
//! ```toml
//! [catalog]
//! seed = 42
//! dehydron_donors = [1, 4, 6, 19, 23]
//!
//! [server]
//! addr = "127.0.0.1:3000"
//!
//! [logging]
//! verbosity = 1
//! file = "gosp.log"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::catalog::{bond_donors, CatalogSpec};
use crate::{GospError, Result};

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GospConfig {
    pub catalog: CatalogSpec,
    pub addr: SocketAddr,
    pub verbosity: u8,
    pub log_file: Option<PathBuf>,
}

impl Default for GospConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogSpec::default(),
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            verbosity: 0,
            log_file: None,
        }
    }
}

/// Values given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub seed: Option<u64>,
    pub addr: Option<String>,
    pub verbosity: Option<u8>,
    pub log_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialCatalogConfig {
    seed: Option<u64>,
    dehydron_donors: Option<Vec<usize>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialServerConfig {
    addr: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialLoggingConfig {
    verbosity: Option<u8>,
    file: Option<PathBuf>,
}

/// Config file contents, every key optional
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialGospConfig {
    catalog: Option<PartialCatalogConfig>,
    server: Option<PartialServerConfig>,
    logging: Option<PartialLoggingConfig>,
}

impl PartialGospConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| GospError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn merge_with_cli(self, cli: &CliOverrides) -> Result<GospConfig> {
        let defaults = GospConfig::default();
        let catalog = self.catalog.unwrap_or_default();
        let server = self.server.unwrap_or_default();
        let logging = self.logging.unwrap_or_default();

        let dehydron_donors = catalog
            .dehydron_donors
            .unwrap_or(defaults.catalog.dehydron_donors);
        if let Some(bad) = dehydron_donors.iter().find(|d| !bond_donors().any(|b| b == **d)) {
            return Err(GospError::Config(format!(
                "dehydron donor {} does not donate a helix bond (valid: 0-7, 18-25)",
                bad
            )));
        }

        let addr = match cli.addr.as_ref().or(server.addr.as_ref()) {
            Some(addr) => addr
                .parse::<SocketAddr>()
                .map_err(|e| GospError::Config(format!("invalid server address '{}': {}", addr, e)))?,
            None => defaults.addr,
        };

        Ok(GospConfig {
            catalog: CatalogSpec {
                seed: cli.seed.or(catalog.seed).unwrap_or(defaults.catalog.seed),
                dehydron_donors,
            },
            addr,
            verbosity: cli.verbosity.or(logging.verbosity).unwrap_or(defaults.verbosity),
            log_file: cli.log_file.clone().or(logging.file),
        })
    }
}

impl GospConfig {
    /// Load `path` (if any) and apply the CLI overrides on top
    pub fn load(path: Option<&Path>, cli: &CliOverrides) -> Result<Self> {
        let partial = match path {
            Some(path) => PartialGospConfig::from_file(path)?,
            None => PartialGospConfig::default(),
        };
        partial.merge_with_cli(cli)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let config = GospConfig::load(None, &CliOverrides::default()).unwrap();
        assert_eq!(config, GospConfig::default());
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
    }

    #[test]
    fn test_file_values() {
        let file = write_config(
            "[catalog]\nseed = 7\ndehydron_donors = [2, 3]\n\n[server]\naddr = \"0.0.0.0:8080\"\n\n[logging]\nverbosity = 2\n",
        );
        let config = GospConfig::load(Some(file.path()), &CliOverrides::default()).unwrap();
        assert_eq!(config.catalog.seed, 7);
        assert_eq!(config.catalog.dehydron_donors, vec![2, 3]);
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.verbosity, 2);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = write_config("[catalog]\nseed = 7\n[server]\naddr = \"0.0.0.0:8080\"\n");
        let cli = CliOverrides {
            seed: Some(99),
            addr: Some("127.0.0.1:4000".into()),
            ..CliOverrides::default()
        };
        let config = GospConfig::load(Some(file.path()), &cli).unwrap();
        assert_eq!(config.catalog.seed, 99);
        assert_eq!(config.addr.port(), 4000);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let file = write_config("[catalog]\nsead = 7\n");
        let err = GospConfig::load(Some(file.path()), &CliOverrides::default()).unwrap_err();
        assert!(matches!(err, GospError::Toml { .. }));
    }

    #[test]
    fn test_turn_region_donor_rejected() {
        let file = write_config("[catalog]\ndehydron_donors = [4, 12]\n");
        let err = GospConfig::load(Some(file.path()), &CliOverrides::default()).unwrap_err();
        assert!(matches!(err, GospError::Config(_)));
        assert!(err.to_string().contains("donor 12"));

        let file = write_config("[catalog]\ndehydron_donors = [0, 7, 18, 25]\n");
        let config = GospConfig::load(Some(file.path()), &CliOverrides::default()).unwrap();
        assert_eq!(config.catalog.dehydron_donors, vec![0, 7, 18, 25]);
    }

    #[test]
    fn test_bad_values_rejected() {
        let file = write_config("[catalog]\ndehydron_donors = [1, 400]\n");
        let err = GospConfig::load(Some(file.path()), &CliOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("400"));

        let cli = CliOverrides { addr: Some("not-an-addr".into()), ..CliOverrides::default() };
        assert!(matches!(
            GospConfig::load(None, &cli).unwrap_err(),
            GospError::Config(_)
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GospConfig::load(Some(Path::new("/nonexistent/gosp.toml")), &CliOverrides::default())
            .unwrap_err();
        assert!(matches!(err, GospError::Io(_)));
    }
}
