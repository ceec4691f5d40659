//! Byte-pipe abstraction over the moistcontrol serial bus.
//!
//! The physical serial driver is not implemented here. This crate provides
//! the seam the link layer talks through:
//! - The [`BytePipe`] trait: a flushable byte stream that can report how
//!   many bytes are ready to read without blocking.
//! - [`TtyPipe`]: a `BytePipe` over an already-configured tty device.
//! - [`LineSettings`] and [`frame_duration`] for on-the-wire timing math.

pub mod error;
pub mod line;
pub mod pipe;

#[cfg(unix)]
pub mod tty;

pub use error::{Result, TransportError};
pub use line::{frame_duration, LineSettings, Parity, StopBits};
pub use pipe::BytePipe;

#[cfg(unix)]
pub use tty::TtyPipe;
