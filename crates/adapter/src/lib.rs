//! Adapter module - the engine's boundary with the outside world
//!
//! The core is pure and I/O-free; everything that touches a disk or a clock
//! lives here:
//!
//! - [`stats`]: JSON-file implementation of the keyed stats store
//! - [`runtime`]: tokio event pump delivering delayed events in real time
//!   and broadcasting state snapshots to observers

pub mod runtime;
pub mod stats;

pub use runtime::GameRuntime;
pub use stats::JsonFileStore;
