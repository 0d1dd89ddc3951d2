use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::bits::{BitCursor, SyntaxDecoder};
use super::error::{ParseError, Result};
use super::utils::{clear_start_code_emulation_prevention_3_byte, trim_trailing_zero_bytes};

pub mod dpb_parameters;
pub mod general_constraints_info;
pub mod hrd_parameters;
pub mod pic_partition;
pub mod pps;
pub mod profile_tier_level;
pub mod ref_pic_list;
pub mod sps;
pub mod vps;
pub mod vui_parameters;

/// NAL unit types, H.266 Table 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[repr(u8)]
pub enum NalUnitType {
    TrailNut = 0,
    StsaNut = 1,
    RadlNut = 2,
    RaslNut = 3,
    RsvVcl4 = 4,
    RsvVcl5 = 5,
    RsvVcl6 = 6,
    IdrWRadl = 7,
    IdrNLp = 8,
    CraNut = 9,
    GdrNut = 10,
    RsvIrap11 = 11,
    OpiNut = 12,
    DciNut = 13,
    VpsNut = 14,
    SpsNut = 15,
    PpsNut = 16,
    PrefixApsNut = 17,
    SuffixApsNut = 18,
    PhNut = 19,
    AudNut = 20,
    EosNut = 21,
    EobNut = 22,
    PrefixSeiNut = 23,
    SuffixSeiNut = 24,
    FdNut = 25,
    RsvNvcl26 = 26,
    RsvNvcl27 = 27,
    Unspec28 = 28,
    Unspec29 = 29,
    Unspec30 = 30,
    Unspec31 = 31,
}

impl NalUnitType {
    pub fn from_u8(v: u8) -> Option<Self> {
        use NalUnitType::*;

        let nal_type = match v {
            0 => TrailNut,
            1 => StsaNut,
            2 => RadlNut,
            3 => RaslNut,
            4 => RsvVcl4,
            5 => RsvVcl5,
            6 => RsvVcl6,
            7 => IdrWRadl,
            8 => IdrNLp,
            9 => CraNut,
            10 => GdrNut,
            11 => RsvIrap11,
            12 => OpiNut,
            13 => DciNut,
            14 => VpsNut,
            15 => SpsNut,
            16 => PpsNut,
            17 => PrefixApsNut,
            18 => SuffixApsNut,
            19 => PhNut,
            20 => AudNut,
            21 => EosNut,
            22 => EobNut,
            23 => PrefixSeiNut,
            24 => SuffixSeiNut,
            25 => FdNut,
            26 => RsvNvcl26,
            27 => RsvNvcl27,
            28 => Unspec28,
            29 => Unspec29,
            30 => Unspec30,
            31 => Unspec31,
            _ => return None,
        };

        Some(nal_type)
    }

    /// Types 0 to 11 carry coded slice data.
    pub fn is_vcl(self) -> bool {
        (self as u8) <= NalUnitType::RsvIrap11 as u8
    }

    pub fn is_parameter_set(self) -> bool {
        matches!(
            self,
            NalUnitType::VpsNut | NalUnitType::SpsNut | NalUnitType::PpsNut
        )
    }

    pub fn name(self) -> &'static str {
        use NalUnitType::*;

        match self {
            TrailNut => "TRAIL_NUT",
            StsaNut => "STSA_NUT",
            RadlNut => "RADL_NUT",
            RaslNut => "RASL_NUT",
            RsvVcl4 => "RSV_VCL_4",
            RsvVcl5 => "RSV_VCL_5",
            RsvVcl6 => "RSV_VCL_6",
            IdrWRadl => "IDR_W_RADL",
            IdrNLp => "IDR_N_LP",
            CraNut => "CRA_NUT",
            GdrNut => "GDR_NUT",
            RsvIrap11 => "RSV_IRAP_11",
            OpiNut => "OPI_NUT",
            DciNut => "DCI_NUT",
            VpsNut => "VPS_NUT",
            SpsNut => "SPS_NUT",
            PpsNut => "PPS_NUT",
            PrefixApsNut => "PREFIX_APS_NUT",
            SuffixApsNut => "SUFFIX_APS_NUT",
            PhNut => "PH_NUT",
            AudNut => "AUD_NUT",
            EosNut => "EOS_NUT",
            EobNut => "EOB_NUT",
            PrefixSeiNut => "PREFIX_SEI_NUT",
            SuffixSeiNut => "SUFFIX_SEI_NUT",
            FdNut => "FD_NUT",
            RsvNvcl26 => "RSV_NVCL_26",
            RsvNvcl27 => "RSV_NVCL_27",
            Unspec28 => "UNSPEC_28",
            Unspec29 => "UNSPEC_29",
            Unspec30 => "UNSPEC_30",
            Unspec31 => "UNSPEC_31",
        }
    }
}

impl fmt::Display for NalUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), *self as u8)
    }
}

/// The two-byte `nal_unit_header()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NalHeader {
    pub forbidden_zero_bit: bool,
    pub nuh_reserved_zero_bit: bool,
    pub nuh_layer_id: u8,
    pub nal_unit_type: NalUnitType,
    pub nuh_temporal_id_plus1: u8,
}

impl NalHeader {
    pub const SIZE: usize = 2;

    pub fn parse(data: &[u8]) -> Result<NalHeader> {
        if data.len() < Self::SIZE {
            return Err(ParseError::InvalidHeader("NAL unit shorter than its header"));
        }

        let mut bs = BitCursor::new(&data[..Self::SIZE]);

        let forbidden_zero_bit = bs.flag()?;
        if forbidden_zero_bit {
            return Err(ParseError::InvalidHeader("forbidden_zero_bit is set"));
        }

        let nuh_reserved_zero_bit = bs.flag()?;
        let nuh_layer_id = bs.u(6)? as u8;

        let nal_unit_type = NalUnitType::from_u8(bs.u(5)? as u8)
            .ok_or(ParseError::InvalidHeader("undefined nal_unit_type"))?;

        let nuh_temporal_id_plus1 = bs.u(3)? as u8;
        if nuh_temporal_id_plus1 == 0 {
            return Err(ParseError::InvalidHeader("nuh_temporal_id_plus1 is zero"));
        }

        Ok(NalHeader {
            forbidden_zero_bit,
            nuh_reserved_zero_bit,
            nuh_layer_id,
            nal_unit_type,
            nuh_temporal_id_plus1,
        })
    }

    pub fn temporal_id(&self) -> u8 {
        self.nuh_temporal_id_plus1 - 1
    }
}

/// A located NAL unit with its header decoded and payload unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NalUnit {
    /// Offset of the header's first byte in the stream.
    pub offset: usize,
    /// Escaped size including the header, up to the next start code.
    pub length: usize,
    pub header: NalHeader,
    pub rbsp: Vec<u8>,
}

impl NalUnit {
    pub fn parse(offset: usize, data: &[u8]) -> Result<NalUnit> {
        let header = NalHeader::parse(data)?;
        let payload = trim_trailing_zero_bytes(&data[NalHeader::SIZE..]);

        Ok(NalUnit {
            offset,
            length: data.len(),
            header,
            rbsp: clear_start_code_emulation_prevention_3_byte(payload),
        })
    }

    pub fn nal_unit_type(&self) -> NalUnitType {
        self.header.nal_unit_type
    }
}

/// `rbsp_trailing_bits()`
pub(crate) fn rbsp_trailing_bits(bs: &mut BitCursor) -> Result<()> {
    if !bs.flag()? {
        return Err(ParseError::invalid("rbsp_stop_one_bit", 0));
    }

    while !bs.byte_aligned() {
        if bs.flag()? {
            return Err(ParseError::invalid("rbsp_alignment_zero_bit", 1));
        }
    }

    Ok(())
}

/// Reads alignment bits up to the next byte boundary, whatever their value.
pub(crate) fn byte_alignment_bits(bs: &mut BitCursor) -> Result<()> {
    while !bs.byte_aligned() {
        bs.f(1)?;
    }

    Ok(())
}

/// Reads a `ue(v)` that must not exceed `max`.
pub(crate) fn ue_max(bs: &mut BitCursor, field: &'static str, max: u64) -> Result<u64> {
    let v = bs.ue()?;

    if v > max {
        return Err(ParseError::invalid(field, v));
    }

    Ok(v)
}

/// Reads `*_extension_data_flag` bits until the trailing bits, returning their count.
pub(crate) fn extension_data_bits(bs: &mut BitCursor) -> Result<usize> {
    let mut count = 0;

    while bs.more_rbsp_data() {
        bs.flag()?;
        count += 1;
    }

    Ok(count)
}
