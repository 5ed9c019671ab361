//! # cms Architecture
//!
//! cms is a small content store for blog posts. The library owns the posts,
//! how user input turns into them, and how they are persisted; the `cms`
//! binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Turns --id / --slug into a PostSelector                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs) + assembly.rs                │
//! │  - Builds and merges post fields, drives the editor         │
//! │  - Wraps errors with the operation name                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - PostStore trait                                          │
//! │  - SqliteStore (production), InMemoryStore (testing)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments, returns
//! `Result<CmdResult>`, and never prints or exits. The editor and the
//! interactive form are traits ([`editor::TextEditor`], [`form::PostForm`])
//! so the core can be driven without a terminal.
//!
//! Every store call takes an [`context::OpContext`] that carries an
//! optional deadline and a cancellation flag.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One module per operation
//! - [`assembly`]: Turning raw input into drafts, merging updates, slugs
//! - [`store`]: Storage abstraction, SQLite and in-memory backends
//! - [`model`]: `Post`, `PostDraft`, `PostSelector` and friends
//! - [`context`]: Deadlines and cancellation
//! - [`editor`]: External editor integration
//! - [`form`]: Interactive prompts for new posts
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod assembly;
pub mod commands;
pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod form;
pub mod model;
pub mod store;
