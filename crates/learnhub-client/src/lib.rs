//! # learnhub-client
//!
//! Keeps a LearnHub session visible to the presence subsystem. A
//! [`HeartbeatDriver`] decides when a session should signal, [`run_session`]
//! drives it on a timer, and a [`HeartbeatTransport`] delivers the signals.

pub mod driver;
pub mod runner;
pub mod transport;

pub use driver::{DriverState, HeartbeatDriver, Signal};
pub use runner::{SessionEvent, SessionReport, run_session};
pub use transport::{HeartbeatAck, HeartbeatTransport, HttpTransport};
