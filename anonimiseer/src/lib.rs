// anonimiseer/src/lib.rs
//! # Anonimiseer CLI
//!
//! This crate provides the command-line interface over `anonimiseer-core`:
//! the `analyze` and `anonymize` commands for Dutch text and PDF documents.
//!
//! License: MIT OR APACHE 2.0

pub mod cli;
pub mod commands;
pub mod logger;
