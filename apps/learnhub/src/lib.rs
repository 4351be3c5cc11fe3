//! # Learnhub
//!
//! HTTP server and CLI for the Learnhub content store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │              apps/learnhub (THE BINARY)          │
//! │                                                  │
//! │   ┌───────────┐   ┌───────────┐   ┌──────────┐   │
//! │   │    CLI    │   │ HTTP API  │   │  Config  │   │
//! │   │  (clap)   │   │  (axum)   │   │  (toml)  │   │
//! │   └─────┬─────┘   └─────┬─────┘   └────┬─────┘   │
//! │         └───────────────┼──────────────┘         │
//! │                         ▼                        │
//! │                 ┌───────────────┐                │
//! │                 │ learnhub-core │                │
//! │                 │  (THE DATA)   │                │
//! │                 └───────────────┘                │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod cli;
pub mod config;
