use bitvec::prelude::*;

/// MSB-first bit writer, the inverse of [`super::BitCursor`].
#[derive(Debug, Default)]
pub struct BitVecWriter {
    bs: BitVec<u8, Msb0>,
}

impl BitVecWriter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn write(&mut self, v: bool) {
        self.bs.push(v);
    }

    /// Writes the `n` low bits of `v`, n <= 64.
    #[inline(always)]
    pub fn write_n(&mut self, v: u64, n: u32) {
        for i in (0..n).rev() {
            self.bs.push((v >> i) & 1 == 1);
        }
    }

    /// Values up to `u64::MAX - 1`.
    pub fn write_ue(&mut self, v: u64) {
        let code_num = v + 1;
        let len = u64::BITS - code_num.leading_zeros();

        self.write_n(0, len - 1);
        self.write_n(code_num, len);
    }

    pub fn write_se(&mut self, v: i64) {
        let code_num = if v > 0 {
            2 * v.unsigned_abs() - 1
        } else {
            2 * v.unsigned_abs()
        };

        self.write_ue(code_num);
    }

    /// rbsp_stop_one_bit, then rbsp_alignment_zero_bit up to the byte boundary.
    pub fn write_rbsp_trailing_bits(&mut self) {
        self.write(true);
        self.byte_align();
    }

    pub fn byte_align(&mut self) {
        while !self.is_aligned() {
            self.write(false);
        }
    }

    pub fn is_aligned(&self) -> bool {
        self.bs.len() % 8 == 0
    }

    pub fn len(&self) -> usize {
        self.bs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bs.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.bs.as_raw_slice()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bs.into_vec()
    }
}
