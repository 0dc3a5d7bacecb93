//! Recorder process supervision.
//!
//! Each beam worker owns exactly one [`RecorderSupervisor`], which in turn
//! owns at most one external recorder process. The supervisor is a small
//! state machine driven by start/stop commands:
//!
//! ```text
//!            START (spawn ok)
//!   STOPPED ──────────────────► RUNNING ──┐ START (no-op)
//!      ▲  ▲                      │  ▲◄────┘
//!      │  │ STOP (killed ok)     │  │
//!      │  └──────────────────────┘  │
//!      │        STOP/START failure  │ START (spawn ok)
//!      │               ▼            │
//!      └── STOP ──── FAILED ────────┘
//! ```
//!
//! The one invariant that shapes everything here: a stopped process cannot
//! be resumed. Stopping always discards the process handle, and the next
//! start always spawns a fresh process from the immutable launch spec.

mod spec;
mod supervisor;

pub use spec::RecorderSpec;
pub use supervisor::{RecorderState, RecorderSupervisor, SupervisorError};
