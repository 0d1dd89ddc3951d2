use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::store::ParameterSetKind;
use crate::vvc::NalUnitType;

/// Failure of a single NAL unit.
///
/// Every variant is scoped to the unit being parsed, the stream scan always
/// continues with the next start code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ParseError {
    #[error("out of data at bit {position}: requested {requested} bits, {available} available")]
    OutOfData {
        position: usize,
        requested: usize,
        available: usize,
    },

    #[error("invalid NAL unit header: {0}")]
    InvalidHeader(&'static str),

    #[error("malformed Exp-Golomb code at bit {position}: more than {leading_zeros} leading zero bits")]
    MalformedCode { position: usize, leading_zeros: u32 },

    #[error("referenced {kind} id {id} is not in the parameter set store")]
    UnresolvedReference { kind: ParameterSetKind, id: u8 },

    #[error("NAL unit type {0} is not parsed")]
    UnsupportedType(NalUnitType),

    #[error("invalid value {value} for {field}")]
    InvalidValue { field: &'static str, value: i64 },
}

impl ParseError {
    /// Short name of the failure kind, stable for summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::OutOfData { .. } => "OutOfData",
            ParseError::InvalidHeader(_) => "InvalidHeader",
            ParseError::MalformedCode { .. } => "MalformedCode",
            ParseError::UnresolvedReference { .. } => "UnresolvedReference",
            ParseError::UnsupportedType(_) => "UnsupportedType",
            ParseError::InvalidValue { .. } => "InvalidValue",
        }
    }

    pub(crate) fn invalid<T: TryInto<i64>>(field: &'static str, value: T) -> ParseError {
        ParseError::InvalidValue {
            field,
            value: value.try_into().unwrap_or(i64::MAX),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
