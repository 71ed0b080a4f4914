//! Structured logging facility for FitDesk
//!
//! - Single initialization point via `init(profile)`
//! - Lifecycle macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for asserting on emitted events
//!
//! The repository layer owns lifecycle events. The engine and the relation
//! only emit `debug!`/`warn!` detail lines, so one call produces one
//! start/end pair.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, init_with_directive, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
