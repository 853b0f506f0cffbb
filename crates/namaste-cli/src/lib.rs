//! CLI library components for the NAMASTE terminology tools.

pub mod context;
pub mod logging;
