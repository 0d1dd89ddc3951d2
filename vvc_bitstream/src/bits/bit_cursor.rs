use bitvec::prelude::*;
use std::fmt;

use crate::error::{ParseError, Result};

/// MSB-first reader over a borrowed RBSP.
///
/// The position only ever moves forward and never past the end of the
/// buffer: a read that does not fit fails with [`ParseError::OutOfData`]
/// and leaves the position where it was.
pub struct BitCursor<'a> {
    bs: &'a BitSlice<u8, Msb0>,
    offset: usize,
}

impl<'a> BitCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            bs: data.view_bits::<Msb0>(),
            offset: 0,
        }
    }

    /// Reads `n` bits (at most 32) as an unsigned big-endian value.
    #[inline(always)]
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        let val = self.peek_bits(n)?;
        self.offset += n as usize;

        Ok(val)
    }

    #[inline(always)]
    pub fn peek_bits(&self, n: u32) -> Result<u32> {
        debug_assert!(n <= 32);

        let n = n as usize;
        self.ensure_available(n)?;

        if n == 0 {
            return Ok(0);
        }

        Ok(self.bs[self.offset..self.offset + n].load_be::<u32>())
    }

    #[inline(always)]
    pub fn read_bit(&mut self) -> Result<bool> {
        self.ensure_available(1)?;

        let val = self.bs[self.offset];
        self.offset += 1;

        Ok(val)
    }

    pub fn skip_bits(&mut self, n: usize) -> Result<()> {
        self.ensure_available(n)?;
        self.offset += n;

        Ok(())
    }

    pub fn byte_aligned(&self) -> bool {
        self.offset % 8 == 0
    }

    /// False only when what is left is the rbsp_stop_one_bit and its zero padding.
    pub fn more_rbsp_data(&self) -> bool {
        match self.bs.last_one() {
            Some(stop_bit) => self.offset < stop_bit,
            None => false,
        }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn available(&self) -> usize {
        self.bs.len() - self.offset
    }

    pub fn len(&self) -> usize {
        self.bs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bs.is_empty()
    }

    fn ensure_available(&self, requested: usize) -> Result<()> {
        let available = self.available();

        if requested > available {
            return Err(ParseError::OutOfData {
                position: self.offset,
                requested,
                available,
            });
        }

        Ok(())
    }
}

impl fmt::Debug for BitCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BitCursor: {{offset: {}, len: {}}}",
            self.offset,
            self.bs.len()
        )
    }
}
