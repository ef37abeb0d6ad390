//! Form server for labnote
//!
//! Serves the editing form, the printable report and a small JSON API over
//! the same session and snapshot store. Built on axum.

pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod routing;
pub mod startup;
pub mod state;
pub mod types;
