//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types for screen placement
//! - Stable handle types for the callback collections
//! - Frame time management
//! - Logging setup

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
