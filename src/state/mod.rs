/// State management module
///
/// This module handles all preview state, including:
/// - Shared data structures (data.rs)
/// - The open-file state machine and generation tickets (session.rs)
/// - User configuration (config.rs)

pub mod config;
pub mod data;
pub mod session;
