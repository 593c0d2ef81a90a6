use crate::{Result, RewardsError, END_MARKER_WIDTH, QUANTITY_WIDTH, TICK_WIDTH};

/// Absolute offset into the payload at which a length-prefixed sub-stream ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct EndBoundary(usize);

impl EndBoundary {
    pub fn offset(&self) -> usize {
        self.0
    }
}

/// Sequential big-endian reader over an encoded payload.
///
/// The reader is `Copy` so a caller can checkpoint it and restore the position if
/// the unit of work it is decoding fails.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CalldataReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> CalldataReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let remaining = self.remaining();
        if remaining < N {
            return Err(RewardsError::UnexpectedEndOfInput {
                needed: N,
                remaining,
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.offset..self.offset + N]);
        self.offset += N;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    /// Read a 3-byte two's complement tick and sign-extend it.
    pub fn read_i24(&mut self) -> Result<i32> {
        let [b0, b1, b2] = self.take::<TICK_WIDTH>()?;
        let raw = u32::from_be_bytes([b0, b1, b2, 0]);
        Ok((raw as i32) >> 8)
    }

    pub fn read_u24(&mut self) -> Result<u32> {
        let [b0, b1, b2] = self.take::<END_MARKER_WIDTH>()?;
        Ok(u32::from_be_bytes([0, b0, b1, b2]))
    }

    pub fn read_u128(&mut self) -> Result<u128> {
        Ok(u128::from_be_bytes(self.take::<QUANTITY_WIDTH>()?))
    }

    /// Read a 3-byte length and return the boundary it marks, measured from the
    /// byte following the length field. The boundary must lie inside the payload.
    pub fn read_u24_end(&mut self) -> Result<EndBoundary> {
        let length = self.read_u24()? as usize;
        let remaining = self.remaining();
        if length > remaining {
            return Err(RewardsError::UnexpectedEndOfInput {
                needed: length,
                remaining,
            });
        }
        Ok(EndBoundary(self.offset + length))
    }

    pub fn is_at(&self, end: EndBoundary) -> bool {
        self.offset == end.0
    }

    /// Read the next `u128` of the sub-stream ending at `end`, or zero if the
    /// sub-stream is exhausted. An exhausted sub-stream does not advance the reader.
    /// A value straddling the boundary is a malformed stream.
    pub fn read_u128_or_zero(&mut self, end: EndBoundary) -> Result<u128> {
        if self.offset >= end.0 {
            return Ok(0);
        }
        if end.0 - self.offset < QUANTITY_WIDTH {
            return Err(RewardsError::MalformedStream);
        }
        self.read_u128()
    }

    /// Assert that the sub-stream ending at `end` was consumed exactly.
    pub fn require_at_end_of(&self, end: EndBoundary) -> Result<()> {
        if !self.is_at(end) {
            return Err(RewardsError::MalformedStream);
        }
        Ok(())
    }
}
