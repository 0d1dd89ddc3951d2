//! Demuxing of VVC (H.266) Annex B byte streams and parsing of their
//! video, sequence and picture parameter sets.

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::Serialize;

pub mod bits;
pub mod demuxer;
pub mod error;
pub mod store;
pub mod utils;
pub mod vvc;

#[cfg(test)]
mod tests;

use bits::BitCursor;
use demuxer::{NalDemuxer, NalSpan};
use vvc::pps::Pps;
use vvc::sps::Sps;
use vvc::vps::Vps;
use vvc::{NalHeader, NalUnit, NalUnitType};

pub use error::ParseError;
pub use store::{ParameterSet, ParameterSetKind, ParameterSetStore};

/// Outcome of one NAL unit of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NalReport {
    pub offset: usize,
    pub length: usize,
    /// Absent when the header itself could not be decoded.
    pub header: Option<NalHeader>,
    pub outcome: NalOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum NalOutcome {
    Parsed(ParameterSet),
    Skipped(NalUnitType),
    Failed(ParseError),
}

/// Sequential parser of one stream.
///
/// Owns the parameter set store, so independent streams are parsed with
/// independent instances.
#[derive(Debug, Default)]
pub struct VvcBitstream {
    store: ParameterSetStore,
}

impl VvcBitstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ParameterSetStore {
        &self.store
    }

    pub fn into_store(self) -> ParameterSetStore {
        self.store
    }

    /// Parses every NAL unit of `data` in stream order.
    pub fn parse_stream(&mut self, data: &[u8]) -> Vec<NalReport> {
        self.reports(data).collect()
    }

    /// Lazily parses the units of `data`, one per iteration.
    pub fn reports<'a>(&'a mut self, data: &'a [u8]) -> impl Iterator<Item = NalReport> + 'a {
        NalDemuxer::new(data).map(move |span| self.process_span(span))
    }

    pub fn process_span(&mut self, span: NalSpan) -> NalReport {
        let nal = match NalUnit::parse(span.offset, span.data) {
            Ok(nal) => nal,
            Err(e) => {
                warn!("NAL unit at offset {}: {}", span.offset, e);

                return NalReport {
                    offset: span.offset,
                    length: span.len(),
                    header: None,
                    outcome: NalOutcome::Failed(e),
                };
            }
        };

        let nal_type = nal.nal_unit_type();

        let outcome = if nal_type.is_parameter_set() {
            match self.parse_nal(&nal) {
                Ok(set) => {
                    debug!(
                        "NAL unit at offset {}: parsed {} id {}",
                        nal.offset,
                        set.kind(),
                        set.id()
                    );
                    NalOutcome::Parsed(set)
                }
                Err(e) => {
                    warn!("NAL unit at offset {} ({}): {}", nal.offset, nal_type, e);
                    NalOutcome::Failed(e)
                }
            }
        } else {
            debug!("NAL unit at offset {}: skipped {}", nal.offset, nal_type);
            NalOutcome::Skipped(nal_type)
        };

        NalReport {
            offset: nal.offset,
            length: nal.length,
            header: Some(nal.header),
            outcome,
        }
    }

    /// Parses a parameter set NAL unit and stores it.
    ///
    /// Nothing is stored when parsing fails.
    pub fn parse_nal(&mut self, nal: &NalUnit) -> Result<ParameterSet, ParseError> {
        let mut bs = BitCursor::new(&nal.rbsp);

        let set = match nal.nal_unit_type() {
            NalUnitType::VpsNut => ParameterSet::Vps(Box::new(Vps::parse(&mut bs)?)),
            NalUnitType::SpsNut => ParameterSet::Sps(Box::new(Sps::parse(&mut bs, &self.store)?)),
            NalUnitType::PpsNut => ParameterSet::Pps(Box::new(Pps::parse(&mut bs, &self.store)?)),

            nal_type @ (NalUnitType::TrailNut
            | NalUnitType::StsaNut
            | NalUnitType::RadlNut
            | NalUnitType::RaslNut
            | NalUnitType::RsvVcl4
            | NalUnitType::RsvVcl5
            | NalUnitType::RsvVcl6
            | NalUnitType::IdrWRadl
            | NalUnitType::IdrNLp
            | NalUnitType::CraNut
            | NalUnitType::GdrNut
            | NalUnitType::RsvIrap11
            | NalUnitType::OpiNut
            | NalUnitType::DciNut
            | NalUnitType::PrefixApsNut
            | NalUnitType::SuffixApsNut
            | NalUnitType::PhNut
            | NalUnitType::AudNut
            | NalUnitType::EosNut
            | NalUnitType::EobNut
            | NalUnitType::PrefixSeiNut
            | NalUnitType::SuffixSeiNut
            | NalUnitType::FdNut
            | NalUnitType::RsvNvcl26
            | NalUnitType::RsvNvcl27
            | NalUnitType::Unspec28
            | NalUnitType::Unspec29
            | NalUnitType::Unspec30
            | NalUnitType::Unspec31) => return Err(ParseError::UnsupportedType(nal_type)),
        };

        self.store.insert(set.clone());

        Ok(set)
    }
}

impl NalReport {
    pub fn is_parsed(&self) -> bool {
        matches!(self.outcome, NalOutcome::Parsed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, NalOutcome::Failed(_))
    }
}
