use std::io::{Read, Write};

/// A connected byte pipe to the controller bus.
///
/// The link layer drives the bus through this trait only. Besides plain
/// reads and writes, the half-duplex poll loop needs to know how many bytes
/// are already buffered so that it never blocks waiting for a frame that
/// was addressed to somebody else.
pub trait BytePipe: Read + Write {
    /// Number of bytes ready to be read without blocking.
    fn bytes_available(&mut self) -> std::io::Result<usize>;
}
