//! Orchestration engines, one module per concern. Every function takes the
//! connector and the session explicitly; nothing here performs I/O of its own
//! or holds state between calls.

pub mod batch;
pub mod catalog;
pub mod dialogs;
pub mod helpers;
pub mod merge_split;
pub mod query;
pub mod transfer;
