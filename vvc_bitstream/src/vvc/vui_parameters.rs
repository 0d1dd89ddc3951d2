#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bits::{BitCursor, SyntaxDecoder};
use crate::error::{ParseError, Result};

const EXTENDED_SAR: u8 = 255;

/// `vui_parameters(payloadSize)` as carried in `vui_payload()`.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VuiParameters {
    pub vui_progressive_source_flag: bool,
    pub vui_interlaced_source_flag: bool,
    pub vui_non_packed_constraint_flag: bool,
    pub vui_non_projected_constraint_flag: bool,

    pub vui_aspect_ratio_info_present_flag: bool,
    pub vui_aspect_ratio_constant_flag: Option<bool>,
    pub vui_aspect_ratio_idc: Option<u8>,
    pub vui_sar_width: Option<u16>,
    pub vui_sar_height: Option<u16>,

    pub vui_overscan_info_present_flag: bool,
    pub vui_overscan_appropriate_flag: Option<bool>,

    pub vui_colour_description_present_flag: bool,
    pub vui_colour_primaries: Option<u8>,
    pub vui_transfer_characteristics: Option<u8>,
    pub vui_matrix_coeffs: Option<u8>,
    pub vui_full_range_flag: Option<bool>,

    pub vui_chroma_loc_info_present_flag: bool,
    pub vui_chroma_sample_loc_type_frame: Option<u64>,
    pub vui_chroma_sample_loc_type_top_field: Option<u64>,
    pub vui_chroma_sample_loc_type_bottom_field: Option<u64>,

    /// Payload bits following the known syntax elements, skipped.
    pub vui_extension_bits: usize,
}

impl VuiParameters {
    /// Parses `vui_payload(payloadSize)` and leaves the cursor at its end.
    pub fn parse_payload(bs: &mut BitCursor, payload_size: u64) -> Result<VuiParameters> {
        let start = bs.position();
        let payload_bits = usize::try_from(payload_size)
            .ok()
            .and_then(|size| size.checked_mul(8))
            .ok_or_else(|| ParseError::invalid("sps_vui_payload_size_minus1", payload_size))?;

        let mut vui = VuiParameters::parse(bs)?;

        let consumed = bs.position() - start;
        if consumed > payload_bits {
            return Err(ParseError::invalid(
                "sps_vui_payload_size_minus1",
                payload_size - 1,
            ));
        }

        vui.vui_extension_bits = payload_bits - consumed;
        bs.skip_bits(vui.vui_extension_bits)?;

        Ok(vui)
    }

    pub fn parse(bs: &mut BitCursor) -> Result<VuiParameters> {
        let mut vui = VuiParameters {
            vui_progressive_source_flag: bs.flag()?,
            vui_interlaced_source_flag: bs.flag()?,
            vui_non_packed_constraint_flag: bs.flag()?,
            vui_non_projected_constraint_flag: bs.flag()?,
            vui_aspect_ratio_info_present_flag: bs.flag()?,
            ..Default::default()
        };

        if vui.vui_aspect_ratio_info_present_flag {
            vui.vui_aspect_ratio_constant_flag = Some(bs.flag()?);

            let idc = bs.u(8)? as u8;
            vui.vui_aspect_ratio_idc = Some(idc);

            if idc == EXTENDED_SAR {
                vui.vui_sar_width = Some(bs.u(16)? as u16);
                vui.vui_sar_height = Some(bs.u(16)? as u16);
            }
        }

        vui.vui_overscan_info_present_flag = bs.flag()?;
        if vui.vui_overscan_info_present_flag {
            vui.vui_overscan_appropriate_flag = Some(bs.flag()?);
        }

        vui.vui_colour_description_present_flag = bs.flag()?;
        if vui.vui_colour_description_present_flag {
            vui.vui_colour_primaries = Some(bs.u(8)? as u8);
            vui.vui_transfer_characteristics = Some(bs.u(8)? as u8);
            vui.vui_matrix_coeffs = Some(bs.u(8)? as u8);
            vui.vui_full_range_flag = Some(bs.flag()?);
        }

        vui.vui_chroma_loc_info_present_flag = bs.flag()?;
        if vui.vui_chroma_loc_info_present_flag {
            if vui.vui_progressive_source_flag && !vui.vui_interlaced_source_flag {
                vui.vui_chroma_sample_loc_type_frame = Some(bs.ue()?);
            } else {
                vui.vui_chroma_sample_loc_type_top_field = Some(bs.ue()?);
                vui.vui_chroma_sample_loc_type_bottom_field = Some(bs.ue()?);
            }
        }

        Ok(vui)
    }
}
