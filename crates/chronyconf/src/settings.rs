//! Settings for the `chronyconf` tool.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`/etc/chronyconf/settings.toml` unless another is given), then
//! environment variables using the `CHRONYCONF_` prefix, then command-line
//! flags.

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chrony::{ChronyConf, DEFAULT_COMMENT_PREFIX, LoadOptions};
use crate::cli::Args;

/// Environment variable prefix for settings overrides.
pub const ENV_PREFIX: &str = "CHRONYCONF_";

/// Runtime settings for the tool.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Settings {
    /// Path to the chrony configuration file to read.
    #[serde(default = "default_conf_path")]
    pub conf_path: PathBuf,
    /// Prefix marking comment lines.
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            conf_path: default_conf_path(),
            comment_prefix: default_comment_prefix(),
        }
    }
}

fn default_conf_path() -> PathBuf {
    PathBuf::from(ChronyConf::DEFAULT_PATH)
}

fn default_comment_prefix() -> String {
    DEFAULT_COMMENT_PREFIX.to_owned()
}

impl Settings {
    /// Default location of the settings file.
    pub const DEFAULT_PATH: &'static str = "/etc/chronyconf/settings.toml";

    /// Load settings from the file named by `args`, the environment and the
    /// flags in `args`.
    ///
    /// A missing settings file is not an error.
    #[expect(clippy::result_large_err, reason = "propagate figment errors")]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut settings = Self::from_file(&args.settings)?;
        if let Some(path) = &args.conf {
            settings.conf_path = path.clone();
        }
        if let Some(prefix) = &args.comment_prefix {
            settings.comment_prefix = prefix.clone();
        }
        Ok(settings)
    }

    /// Load settings from defaults, `path` and `CHRONYCONF_*` variables.
    #[expect(clippy::result_large_err, reason = "propagate figment errors")]
    pub fn from_file(path: &Path) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
    }

    /// Options for reading the chrony configuration.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default().comment_prefix(self.comment_prefix.clone())
    }
}
