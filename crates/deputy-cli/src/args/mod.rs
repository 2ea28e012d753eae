//! Shared argument types for the deputy CLI.
//!
//! Argument groups here are composed into commands with clap's
//! `#[command(flatten)]`, so every list command spells its flags the same way.

mod pagination;

pub use pagination::{ListArgs, apply_pagination};
