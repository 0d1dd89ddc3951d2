use super::BitCursor;
use crate::error::{ParseError, Result};

/// Longest Exp-Golomb prefix accepted before the code is rejected.
pub const MAX_LEADING_ZERO_BITS: u32 = 32;

/// Descriptor-level decoding on top of a raw bit source.
///
/// Implementors only provide `read_bits` and `bit_position`, the H.266
/// descriptors `u(n)`, `f(n)`, `ue(v)` and `se(v)` are derived from them.
pub trait SyntaxDecoder {
    fn read_bits(&mut self, n: u32) -> Result<u32>;

    fn bit_position(&self) -> usize;

    /// `u(n)`, n <= 32.
    #[inline(always)]
    fn u(&mut self, n: u32) -> Result<u32> {
        self.read_bits(n)
    }

    /// `f(n)`, fixed-pattern bits.
    #[inline(always)]
    fn f(&mut self, n: u32) -> Result<u32> {
        self.read_bits(n)
    }

    /// `u(1)` as a flag.
    #[inline(always)]
    fn flag(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// `ue(v)`: `2^leadingZeroBits - 1 + read_bits(leadingZeroBits)`.
    fn ue(&mut self) -> Result<u64> {
        let start = self.bit_position();
        let mut leading_zero_bits = 0;

        while self.read_bits(1)? == 0 {
            leading_zero_bits += 1;

            if leading_zero_bits > MAX_LEADING_ZERO_BITS {
                return Err(ParseError::MalformedCode {
                    position: start,
                    leading_zeros: MAX_LEADING_ZERO_BITS,
                });
            }
        }

        let suffix = self.read_bits(leading_zero_bits)? as u64;

        Ok((1u64 << leading_zero_bits) - 1 + suffix)
    }

    /// `se(v)`: odd code numbers map to positive values.
    fn se(&mut self) -> Result<i64> {
        let k = self.ue()?;
        let m = k.div_ceil(2) as i64;

        if k % 2 == 1 {
            Ok(m)
        } else {
            Ok(-m)
        }
    }
}

impl SyntaxDecoder for BitCursor<'_> {
    #[inline(always)]
    fn read_bits(&mut self, n: u32) -> Result<u32> {
        BitCursor::read_bits(self, n)
    }

    fn bit_position(&self) -> usize {
        self.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitVecWriter;

    #[test]
    fn ue_known_codes() {
        // 1, 010, 011, 00100, 00111
        let data = [0b1010_0110, 0b0100_0011, 0b1000_0000];
        let mut bs = BitCursor::new(&data);

        assert_eq!(bs.ue().unwrap(), 0);
        assert_eq!(bs.ue().unwrap(), 1);
        assert_eq!(bs.ue().unwrap(), 2);
        assert_eq!(bs.ue().unwrap(), 3);
        assert_eq!(bs.ue().unwrap(), 6);
        assert_eq!(bs.position(), 17);
    }

    #[test]
    fn se_mapping() {
        let mut writer = BitVecWriter::new();
        for k in 0..5 {
            writer.write_ue(k);
        }

        let data = writer.into_inner();
        let mut bs = BitCursor::new(&data);

        let values: Vec<i64> = (0..5).map(|_| bs.se().unwrap()).collect();
        assert_eq!(values, vec![0, 1, -1, 2, -2]);
    }

    #[test]
    fn ue_se_round_trip() {
        let unsigned = [0, 1, 2, 7, 8, 254, 255, 65535, 1 << 31, (1u64 << 32) - 2];
        let signed = [0, 1, -1, 63, -64, 100_000, -100_000, i32::MAX as i64];

        let mut writer = BitVecWriter::new();
        unsigned.iter().for_each(|v| writer.write_ue(*v));
        signed.iter().for_each(|v| writer.write_se(*v));

        let data = writer.into_inner();
        let mut bs = BitCursor::new(&data);

        for v in unsigned {
            assert_eq!(bs.ue().unwrap(), v);
        }
        for v in signed {
            assert_eq!(bs.se().unwrap(), v);
        }
    }

    #[test]
    fn ue_longest_accepted_code() {
        let mut writer = BitVecWriter::new();
        writer.write_ue(u32::MAX as u64);
        writer.write_ue((1u64 << 33) - 2);

        let data = writer.into_inner();
        let mut bs = BitCursor::new(&data);

        assert_eq!(bs.ue().unwrap(), u32::MAX as u64);
        assert_eq!(bs.ue().unwrap(), (1u64 << 33) - 2);
    }

    #[test]
    fn ue_rejects_long_prefix() {
        let data = [0, 0, 0, 0, 0, 0x80];
        let mut bs = BitCursor::new(&data);

        assert_eq!(
            bs.ue(),
            Err(ParseError::MalformedCode {
                position: 0,
                leading_zeros: 32
            })
        );
    }

    #[test]
    fn ue_out_of_data() {
        // Five leading zeros, suffix truncated
        let data = [0b0000_0100];
        let mut bs = BitCursor::new(&data);

        assert_eq!(
            bs.ue(),
            Err(ParseError::OutOfData {
                position: 6,
                requested: 5,
                available: 2
            })
        );

        let mut bs = BitCursor::new(&[0, 0]);
        assert!(matches!(bs.ue(), Err(ParseError::OutOfData { position: 16, .. })));
    }
}
