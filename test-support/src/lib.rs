//! Test support utilities.
//!
//! Shared by the unit, integration and behavioural tests of the workspace.

pub mod env_guard;
pub mod fixtures;
pub mod logging;

pub use fixtures::ConfFile;
