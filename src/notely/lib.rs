//! # Notely Architecture
//!
//! Notely is a **UI-agnostic client library** for a hosted notes service. The command line
//! tool is one client of it; a desktop or web front end could drive the same controllers.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, formats output                │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over the controllers                         │
//! │  - Normalizes inputs (list positions → note ids)            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Controller Layer (controllers/*.rs)                        │
//! │  - One per screen: login, register, profile, notes          │
//! │  - Form state, validation gating, outcome notices           │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                              │
//!                 ▼                              ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Session (session.rs)         │ │  Client (client/)         │
//! │  - token + profile, persisted │ │  - request/response shape │
//! │  - KeyValueStore backends     │ │  - Transport trait        │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns Rust types. It never
//! writes to stdout/stderr and never exits the process. Diagnostics go through
//! `tracing`; what the user should see comes back as a [`controllers::Notice`].
//!
//! ## Testing Strategy
//!
//! 1. **Validation, session, client** tests run against `MemoryStorage` and the scripted
//!    `MockTransport`; no test touches the network.
//! 2. **Controllers** carry most of the behavioural tests (gating, refetch, notices).
//! 3. **API** tests check dispatch and selector resolution.
//! 4. **CLI** integration tests in `tests/` cover the paths that fail before any request.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`controllers`]: Login, register, profile and notes screens
//! - [`client`]: Remote API mapping and the `Transport` seam
//! - [`session`]: The signed-in user and its persistence
//! - [`storage`]: Durable key-value backends
//! - [`validation`]: Form rules and password strength
//! - [`model`]: Wire and session types
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing, prompts and printing for the binary (not part of the lib API)

pub mod api;
pub mod client;
pub mod config;
pub mod controllers;
pub mod error;
pub mod model;
pub mod session;
pub mod storage;
pub mod validation;
