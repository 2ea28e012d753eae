//! Utility modules for the deputy CLI

pub mod formatting;
pub mod logging;
