//! Improvisor CLI library.
//!
//! This crate provides the core functionality for the improvisor CLI:
//! spec loading and the generate, validate and pools commands.

pub mod commands;
pub mod input;
