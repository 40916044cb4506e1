//! Agri Shield command-line portal.

pub mod ai;
pub mod cli;
pub mod commands;
pub mod logging;
pub mod portal;
pub mod settings;
pub mod summary;
