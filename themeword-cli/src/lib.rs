//! Support library for the themeword CLI binary.
//!
//! Exposes the command pipeline, the HTTP router and logging setup so tests
//! can drive them without forking a subprocess.

pub mod cli;
pub mod logging;
pub mod server;
