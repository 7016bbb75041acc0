//! Core systems for Fetchgrid: signals, thread affinity, and logging.
//!
//! This crate carries the ambient machinery that the `fetchgrid` crate builds
//! on. It is deliberately small and free of UI assumptions:
//!
//! - [`Signal`]: type-safe observer-pattern notifications with direct,
//!   same-thread delivery
//! - [`ThreadAffinity`]: debug-build verification that observation stays on
//!   the thread it was started on
//! - [`logging`]: `tracing` target constants and thin logging macros
//!
//! # Execution model
//!
//! Fetchgrid is single-threaded and cooperative: change notifications are
//! delivered synchronously on the thread that owns the observation, and no
//! delivery is ever deferred. The signal system therefore has no queued or
//! cross-thread connection types; emitting from a foreign thread is a
//! programmer error that [`ThreadAffinity`] catches in debug builds.

pub mod context;
pub mod logging;
pub mod signal;

pub use context::ThreadAffinity;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
