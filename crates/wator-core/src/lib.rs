//! Core types, configuration and errors for the Wa-Tor predator/prey simulation.

pub mod types;
pub mod config;
pub mod error;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
