//! In-process developer diagnostics.
//!
//! Three independent recorders capture network calls ([`network`]), leveled
//! log events ([`console`]) and frame timings ([`performance`]) into bounded
//! in-memory buffers. Each recorder bumps a change counter on mutation so a
//! presentation layer can re-render without polling.

pub mod capture;
pub mod cli;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod logging;
pub mod network;
pub mod performance;
pub mod trace;

pub use config::Config;
pub use diagnostics::{global, Diagnostics};
pub use error::{AppError, Result};
