//! # Core Engine Module
//!
//! The cooperative engine loop and the pieces it drives.
//!
//! ## Organization
//!
//! - **Engine**: blocking main loop firing initialize/process/deinitialize
//! - **TickEngine**: the same lifecycle driven one frame at a time by a host
//! - **Module**: per-frame participants registered with either engine
//! - **Error**: the engine-level error aggregating every subsystem error

mod engine;
mod error;
mod module;
mod tick_engine;

pub use engine::{DeinitializeEventArg, Engine, EngineEvents, InitializeEventArg, ProcessEventArg};
pub use error::EngineError;
pub use module::{Module, ModuleRegistry};
pub use tick_engine::TickEngine;
