//! Tasks Module
//!
//! Long-running background tasks spawned onto the runtime.

mod control;

pub use control::{spawn_control_task, ControlRequest};
