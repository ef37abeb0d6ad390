//! Command-line access to the snapshot store and renderer

pub mod commands;
pub mod display;
