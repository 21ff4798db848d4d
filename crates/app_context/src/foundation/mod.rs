//! Foundation module - Core utilities shared by every stage
//!
//! - Logging utilities

pub mod logging;
