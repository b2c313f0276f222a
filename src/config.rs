//! Run configuration loaded from TOML.
//!
//! Every section is optional and every field inside a section falls back to
//! its default:
//!
//! ```
//! use u_hive::config::RunConfig;
//!
//! let config = RunConfig::from_toml_str(r#"
//!     [eas]
//!     elitism_factor = 10.0
//!
//!     [eas.params]
//!     num_ants = 10
//!
//!     [eas.stop]
//!     max_iterations = 300
//!
//!     [ga]
//!     population_size = 80
//! "#).unwrap();
//!
//! let eas = config.eas.unwrap();
//! assert_eq!(eas.params.num_ants, 10);
//! assert_eq!(eas.params.beta, 2.5);
//! assert_eq!(config.ga.unwrap().population_size, 80);
//! assert!(config.acs.is_none());
//! ```

use std::path::Path;

use crate::aco::{AcsConfig, EasConfig};
use crate::error::{HiveError, HiveResult};
use crate::ga::GaConfig;
use crate::hybrid::HybridConfig;

/// Per-algorithm sections of a run configuration file.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub acs: Option<AcsConfig>,
    pub eas: Option<EasConfig>,
    pub ga: Option<GaConfig>,
    pub hybrid: Option<HybridConfig>,
}

impl RunConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> HiveResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HiveError::invalid(format!(
                "config file {} not found",
                path.display()
            )),
            _ => HiveError::Io(e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> HiveResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Validates every section that is present.
    pub fn validate(&self) -> HiveResult<()> {
        if let Some(acs) = &self.acs {
            acs.validate()?;
        }
        if let Some(eas) = &self.eas {
            eas.validate()?;
        }
        if let Some(ga) = &self.ga {
            ga.validate()?;
        }
        if let Some(hybrid) = &self.hybrid {
            hybrid.validate()?;
        }
        Ok(())
    }
}
