//! Reader and command-line tool for the chrony daemon's configuration.
//!
//! # Overview
//! This crate exposes:
//! - [`chrony::ChronyConf`] — the directives of `chrony.conf` bound to typed
//!   fields and loaded through the generic `lineconf` scanner.
//! - [`settings::Settings`] — the tool's own settings, layered from a TOML
//!   file, `CHRONYCONF_*` variables and command-line flags.
//! - [`cli`] and [`logging`] — the pieces used by the `chronyconf` binary.
//!
//! # Examples
//! ```rust,no_run
//! use chronyconf::chrony::ChronyConf;
//!
//! let conf = ChronyConf::read(ChronyConf::DEFAULT_PATH).expect("chrony.conf must be readable");
//! println!("logdir: {:?}", conf.logdir());
//! ```
pub mod chrony;
pub mod cli;
pub mod directive;
pub mod logging;
pub mod settings;
