//! # Docuport Architecture
//!
//! Docuport is a **UI-agnostic client library** for enterprise document
//! repositories. This is not a CLI application that happens to have some
//! library code — it's a library that happens to have a CLI client.
//!
//! ## The Four-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over the engines                             │
//! │  - Owns the connector and the session handle                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine Layer (ops/*.rs)                                    │
//! │  - Pure orchestration logic: container/dialog resolution,   │
//! │    paging, transfers, merge/split, batch updates            │
//! │  - No I/O assumptions beyond the connector trait            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Connector Layer (connector/)                               │
//! │  - Abstract RepositoryConnector trait                       │
//! │  - HttpConnector (production), InMemoryConnector (testing)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sessions and staleness
//!
//! Every operation takes the Session explicitly — there is no ambient
//! connection state. Document objects go stale the moment a mutating
//! operation runs; callers must switch to the documents embedded in the
//! operation's result.
//!
//! ## Concurrency
//!
//! Everything here is synchronous and blocking: each call is one round trip
//! that either completes or returns an error. A Session and its derived
//! handles carry no internal synchronization; use one per thread of control
//! or serialize externally. Retries, backoff and timeouts belong to the
//! connector, never to the engines.
//!
//! ## Testing Strategy
//!
//! 1. **Engines** (`ops/*.rs`): thorough unit tests against
//!    `InMemoryConnector` — the lion's share of testing.
//! 2. **API** (`api.rs`): dispatch tests, not logic tests.
//! 3. **CLI** (`args.rs` + thin `main.rs`): argument parsing and exit codes.
//!
//! ## Module Overview
//!
//! - [`api`]: the API facade — entry point for all operations
//! - [`ops`]: orchestration engines (catalog, dialogs, query, transfer,
//!   merge/split, batch)
//! - [`connector`]: the repository connector boundary and implementations
//! - [`model`]: core data types (`Container`, `Document`, `Dialog`, …)
//! - [`config`]: CLI configuration management
//! - [`error`]: error types

pub mod api;
pub mod config;
pub mod connector;
pub mod error;
pub mod model;
pub mod ops;
