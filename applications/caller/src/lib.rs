//! Loteria Caller - terminal application
//!
//! Wires the presentation core to a terminal renderer, a CPAL soundtrack
//! output and a tokio event loop.

pub mod audio_output;
pub mod cli;
pub mod command;
pub mod config;
pub mod decode;
pub mod driver;
pub mod error;
pub mod render;

pub use error::{CallerError, Result};
