use crate::error::ProtocolError;

/// Bounds-checked cursor over a message payload.
///
/// Every read past the declared payload length is a
/// [`ProtocolError::MessageTooShort`], never a panic.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn u8(&mut self) -> Result<u8, ProtocolError> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or(ProtocolError::MessageTooShort)?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn u16_le(&mut self) -> Result<u16, ProtocolError> {
        let lo = self.u8()?;
        let hi = self.u8()?;
        Ok(u16::from(lo) | (u16::from(hi) << 8))
    }

    pub(crate) fn u32_le(&mut self) -> Result<u32, ProtocolError> {
        let lo = self.u16_le()?;
        let hi = self.u16_le()?;
        Ok(u32::from(lo) | (u32::from(hi) << 16))
    }
}
