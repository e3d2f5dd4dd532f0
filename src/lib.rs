//! `namefind` - Concurrent filename search, one worker per target name.
//!
//! A search is described by a [`SearchRequest`](types::SearchRequest) and
//! run by [`coordinator::run`], which walks the root once per target on its
//! own thread and writes every match through a [`Sink`](reporter::Sink).

#![deny(
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]

pub mod coordinator;
pub mod error;
pub mod matcher;
pub mod reporter;
pub mod types;
pub mod walker;
