//! MCP server that hands code review, feature plan review, bug analysis and
//! code explanation to the Gemini CLI.

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod providers;
pub mod server;
pub mod tools;
