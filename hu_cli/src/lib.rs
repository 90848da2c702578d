//! Internal modules for the terminal host.
//!
//! This library provides command parsing, deck loading, view rendering and
//! the logging results sink used by the hu_cli binary.

pub mod commands;
pub mod deck;
pub mod render;
pub mod sink;
