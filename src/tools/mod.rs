//! Feeding tools module
//!
//! Tool implementations behind the MCP server and the command-line utility.

pub mod feeds;
pub mod status;
