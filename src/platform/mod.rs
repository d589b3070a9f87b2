//! Platform abstraction layer
//!
//! Translates browser/native input events into simulation intents. The
//! simulation itself never reads devices.

pub mod input;

pub use input::{InputAdapter, Intent, TouchButton};
