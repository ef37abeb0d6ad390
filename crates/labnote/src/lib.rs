//! labnote - research notes captured through a local web form
//!
//! A [`report::Report`] is edited in a [`session::Session`], saved as JSON
//! snapshots by [`snapshot::SnapshotStore`] and rendered to a printable,
//! self-contained HTML document by [`render::render_report`].

pub mod attachment;
pub mod cli;
pub mod config;
pub mod render;
pub mod report;
pub mod server;
pub mod session;
pub mod snapshot;
