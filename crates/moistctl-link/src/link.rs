use std::time::Duration;

use moistctl_frame::{decode_frame, encode_frame, frame_len, Frame, FC_REQ_ACK};
use moistctl_transport::BytePipe;

use crate::error::{LinkError, Result};

/// Interval between receive polls while waiting for an acknowledgment.
pub const ACK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The bus endpoint on this side of the serial line.
///
/// Owns the byte pipe and all per-link state: our 4-bit bus address, the
/// fixed payload length negotiated with the firmware build, and the
/// wrapping send-sequence counter. A single `SerialLink` is the only
/// writer on the pipe; the bus is half-duplex with one outstanding
/// request at a time.
pub struct SerialLink<P> {
    pipe: P,
    local_address: u8,
    payload_len: usize,
    seq: u8,
    send_delay: Option<Duration>,
}

impl<P: BytePipe> SerialLink<P> {
    /// Create a link over `pipe` with the given local address and fixed
    /// payload length. The address is masked to 4 bits.
    pub fn new(pipe: P, local_address: u8, payload_len: usize) -> Self {
        Self {
            pipe,
            local_address: local_address & 0xF,
            payload_len,
            seq: 0,
            send_delay: None,
        }
    }

    /// Our 4-bit bus address.
    pub fn local_address(&self) -> u8 {
        self.local_address
    }

    /// Fixed payload length of this link.
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Throttle sends to one byte per `delay`, flushing after each byte.
    /// Used for debugging slow receivers; `None` sends a frame in one write.
    pub fn set_send_delay(&mut self, delay: Option<Duration>) {
        self.send_delay = delay;
    }

    /// Borrow the underlying byte pipe.
    pub fn pipe_mut(&mut self) -> &mut P {
        &mut self.pipe
    }

    /// Consume the link and return the byte pipe.
    pub fn into_pipe(self) -> P {
        self.pipe
    }

    /// Stamp addressing and sequence onto `frame` and put it on the wire.
    ///
    /// The sequence counter increments and wraps mod 256 on every send.
    pub fn send(&mut self, frame: &mut Frame, destination_address: u8) -> Result<()> {
        frame.set_sa(self.local_address);
        frame.set_da(destination_address);
        frame.seq = self.seq;
        self.seq = self.seq.wrapping_add(1);

        let wire = encode_frame(frame, self.payload_len)?;
        tracing::trace!(
            seq = frame.seq,
            da = frame.da(),
            raw = %hex(&wire),
            "sending frame"
        );

        if let Some(delay) = self.send_delay {
            for &b in wire.iter() {
                self.pipe.write_all(&[b])?;
                self.pipe.flush()?;
                std::thread::sleep(delay);
            }
        } else {
            self.pipe.write_all(&wire)?;
        }
        self.pipe.flush()?;
        Ok(())
    }

    /// Non-blocking receive.
    ///
    /// Returns `None` when fewer than one full frame's worth of bytes is
    /// buffered. Frames addressed to other stations are discarded; the
    /// scan continues within this call as long as another full frame is
    /// already available. Only frames addressed to us are returned.
    pub fn poll(&mut self) -> Result<Option<Frame>> {
        let wire_len = frame_len(self.payload_len);
        if self.pipe.bytes_available()? < wire_len {
            return Ok(None);
        }
        loop {
            let mut buf = vec![0u8; wire_len];
            self.pipe.read_exact(&mut buf)?;
            let frame = decode_frame(&buf, self.payload_len)?;
            if frame.da() == self.local_address {
                tracing::trace!(seq = frame.seq, sa = frame.sa(), raw = %hex(&buf), "received frame");
                return Ok(Some(frame));
            }
            tracing::trace!(da = frame.da(), "skipping frame addressed elsewhere");
            if self.pipe.bytes_available()? < wire_len {
                return Ok(None);
            }
        }
    }

    /// Send `frame` and, when it requests an acknowledgment, block until a
    /// reply addressed to us arrives or `timeout` elapses.
    ///
    /// On timeout the request is not retried; reissuing is the caller's
    /// decision. Frames without `FC_REQ_ACK` return `None` immediately.
    pub fn send_sync(
        &mut self,
        frame: &mut Frame,
        destination_address: u8,
        timeout: Duration,
    ) -> Result<Option<Frame>> {
        self.send(frame, destination_address)?;
        if frame.fc & FC_REQ_ACK == 0 {
            return Ok(None);
        }

        let mut remaining = timeout;
        loop {
            if let Some(reply) = self.poll()? {
                return Ok(Some(reply));
            }
            if remaining.is_zero() {
                return Err(LinkError::Timeout(timeout));
            }
            std::thread::sleep(ACK_POLL_INTERVAL);
            remaining = remaining.saturating_sub(ACK_POLL_INTERVAL);
        }
    }
}

fn hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02X}")).collect()
}
