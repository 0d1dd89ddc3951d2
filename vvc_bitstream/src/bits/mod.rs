//! Bit-level reading and writing on top of `bitvec`.
//!
//! `bitvec_helpers` readers report a short read as an untyped I/O error.
//! Parsing here needs a typed [`ParseError::OutOfData`] carrying the bit
//! position, with the cursor left where it was, so the reader and the test
//! writer are kept local.
//!
//! [`ParseError::OutOfData`]: crate::ParseError::OutOfData

pub mod bit_cursor;
pub mod bitvec_writer;
pub mod syntax;

pub use bit_cursor::BitCursor;
pub use bitvec_writer::BitVecWriter;
pub use syntax::SyntaxDecoder;

/// `Ceil(Log2(v))`, with 0 for inputs below 2.
pub fn ceil_log2(v: u64) -> u32 {
    if v <= 1 {
        0
    } else {
        u64::BITS - (v - 1).leading_zeros()
    }
}
