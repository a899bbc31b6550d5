//! # CLI Layer
//!
//! This module is **one possible UI client** for notely. The controllers underneath do
//! not know it exists.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, prompts)
//! - Decides exit codes
//! - Installs the tracing subscriber
//!
//! ## Structure
//!
//! - `args`: clap definitions
//! - `commands`: `run()`, context setup and one `handle_*()` per command
//! - `print`: turns notices, notes and profiles into terminal output
//!
//! ## Exit codes
//!
//! `run()` returns `Ok(true)` when the command did what was asked and `Ok(false)` when the
//! service turned it down (the notice has already been printed). Local problems such as
//! invalid input or an unreadable config come back as `Err` and are printed by `main`.

mod args;
mod commands;
mod print;

pub use commands::run;
