//! Addressed, sequenced transport over the half-duplex serial bus.
//!
//! One [`SerialLink`] owns the byte pipe and is the single bus master on
//! this end: it stamps source/destination addresses and the wrapping
//! sequence counter onto outgoing frames, snoops the bus for frames
//! addressed to us, and implements the synchronous send-with-acknowledge
//! discipline. No retries happen here; a timeout is returned to the caller.

pub mod error;
pub mod link;

pub use error::{LinkError, Result};
pub use link::{SerialLink, ACK_POLL_INTERVAL};
