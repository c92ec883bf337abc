//! Command-line surface of the `chronyconf` tool.
//!
//! The tool reads `chrony.conf` and prints the directives it understands,
//! either as `key value` lines or as a JSON object.

use clap::Parser;
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

use lineconf::fields::FieldError;

use crate::chrony::{ChronyConf, ConfError};
use crate::settings::Settings;

/// Command line arguments for `chronyconf`.
#[derive(Debug, Clone, Parser)]
#[command(name = "chronyconf", about = "Print directives from chrony.conf")]
pub struct Args {
    /// Directives to print. All known directives are printed when omitted.
    pub keys: Vec<String>,

    /// Path to the tool's settings file.
    #[arg(long, value_name = "FILE", default_value = Settings::DEFAULT_PATH)]
    pub settings: PathBuf,

    /// Override the chrony configuration file to read.
    #[arg(short, long, value_name = "FILE")]
    pub conf: Option<PathBuf>,

    /// Override the prefix marking comment lines.
    #[arg(long, value_parser = non_empty)]
    pub comment_prefix: Option<String>,

    /// Stop reading after this directive.
    #[arg(long, value_name = "KEY")]
    pub stop_after: Option<String>,

    /// Print a JSON object instead of `key value` lines.
    #[arg(long)]
    pub json: bool,
}

fn non_empty(s: &str) -> Result<String, String> {
    if s.is_empty() {
        Err(String::from("comment prefix must not be empty"))
    } else {
        Ok(s.to_owned())
    }
}

/// Errors raised while running the tool.
#[derive(Debug, Error)]
pub enum RunError {
    /// Loading the chrony configuration failed.
    #[error(transparent)]
    Conf(#[from] ConfError),
    /// Resolving a directive failed.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Encoding JSON output failed.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

/// Read the configuration named by `settings` and write the requested
/// directives to `out`.
///
/// Requested keys that are not bound to a field fall back to the raw
/// argument text of the first matching line. Keys absent from the file are
/// skipped with a warning.
///
/// # Errors
///
/// Returns [`RunError`] if the configuration cannot be loaded or the output
/// cannot be written.
pub fn run<W: Write>(args: &Args, settings: &Settings, out: &mut W) -> Result<(), RunError> {
    let mut options = settings.load_options();
    if let Some(key) = &args.stop_after {
        options = options.stop_after(key.clone());
    }
    let conf = ChronyConf::read_with(&settings.conf_path, &options)?;

    let mut entries = Vec::new();
    if args.keys.is_empty() {
        for (key, value) in conf.values() {
            if let Some(value) = value {
                entries.push((key.to_owned(), serde_json::to_value(value)?));
            }
        }
    } else {
        for key in &args.keys {
            match lookup(&conf, key)? {
                Some(value) => entries.push((key.clone(), value)),
                None => warn!(key = key.as_str(), "directive not present"),
            }
        }
    }

    if args.json {
        let object: Map<String, Value> = entries.into_iter().collect();
        serde_json::to_writer_pretty(&mut *out, &Value::Object(object))?;
        writeln!(out).map_err(RunError::Write)?;
    } else {
        for (key, value) in entries {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            writeln!(out, "{key} {text}").map_err(RunError::Write)?;
        }
    }
    Ok(())
}

fn lookup(conf: &ChronyConf, key: &str) -> Result<Option<Value>, RunError> {
    match conf.value(key) {
        Ok(Some(value)) => Ok(Some(serde_json::to_value(value)?)),
        Ok(None) => Ok(None),
        Err(FieldError::NotFound { .. }) => Ok(conf.raw_args(key).map(Value::from)),
        Err(e) => Err(e.into()),
    }
}
