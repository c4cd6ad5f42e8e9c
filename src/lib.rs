//! Puppy Feeding Calculator Library
//!
//! Feeding chart normalization and daily amount interpolation.

pub mod build_info;
pub mod config;
pub mod feeding;
pub mod mcp;
pub mod models;
pub mod tools;
