#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bits::{BitCursor, SyntaxDecoder};
use crate::error::Result;

use super::ue_max;

const MAX_CPB_CNT_MINUS1: u64 = 31;

/// `general_timing_hrd_parameters()`
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GeneralTimingHrdParameters {
    pub num_units_in_tick: u32,
    pub time_scale: u32,
    pub general_nal_hrd_params_present_flag: bool,
    pub general_vcl_hrd_params_present_flag: bool,
    pub general_same_pic_timing_in_all_ols_flag: Option<bool>,
    pub general_du_hrd_params_present_flag: Option<bool>,
    pub tick_divisor_minus2: Option<u8>,
    pub bit_rate_scale: Option<u8>,
    pub cpb_size_scale: Option<u8>,
    pub cpb_size_du_scale: Option<u8>,
    pub hrd_cpb_cnt_minus1: Option<u64>,
}

/// `ols_timing_hrd_parameters(firstSubLayer, MaxSubLayersVal)`
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OlsTimingHrdParameters {
    pub first_sub_layer: u8,
    /// One entry per sublayer from `first_sub_layer` up.
    pub sublayers: Vec<SublayerTimingHrd>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SublayerTimingHrd {
    pub fixed_pic_rate_general_flag: bool,
    pub fixed_pic_rate_within_cvs_flag: Option<bool>,
    pub elemental_duration_in_tc_minus1: Option<u64>,
    pub low_delay_hrd_flag: Option<bool>,
    pub nal_sublayer_hrd_parameters: Option<SublayerHrdParameters>,
    pub vcl_sublayer_hrd_parameters: Option<SublayerHrdParameters>,
}

/// `sublayer_hrd_parameters(subLayerId)`, one entry per CPB.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SublayerHrdParameters {
    pub cpbs: Vec<CpbParameters>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CpbParameters {
    pub bit_rate_value_minus1: u64,
    pub cpb_size_value_minus1: u64,
    pub cpb_size_du_value_minus1: Option<u64>,
    pub bit_rate_du_value_minus1: Option<u64>,
    pub cbr_flag: bool,
}

impl GeneralTimingHrdParameters {
    pub fn parse(bs: &mut BitCursor) -> Result<GeneralTimingHrdParameters> {
        let mut hrd = GeneralTimingHrdParameters {
            num_units_in_tick: bs.u(32)?,
            time_scale: bs.u(32)?,
            general_nal_hrd_params_present_flag: bs.flag()?,
            general_vcl_hrd_params_present_flag: bs.flag()?,
            ..Default::default()
        };

        if hrd.hrd_params_present() {
            hrd.general_same_pic_timing_in_all_ols_flag = Some(bs.flag()?);

            let du_params_present = bs.flag()?;
            hrd.general_du_hrd_params_present_flag = Some(du_params_present);

            if du_params_present {
                hrd.tick_divisor_minus2 = Some(bs.u(8)? as u8);
            }

            hrd.bit_rate_scale = Some(bs.u(4)? as u8);
            hrd.cpb_size_scale = Some(bs.u(4)? as u8);

            if du_params_present {
                hrd.cpb_size_du_scale = Some(bs.u(4)? as u8);
            }

            hrd.hrd_cpb_cnt_minus1 = Some(ue_max(bs, "hrd_cpb_cnt_minus1", MAX_CPB_CNT_MINUS1)?);
        }

        Ok(hrd)
    }

    pub fn hrd_params_present(&self) -> bool {
        self.general_nal_hrd_params_present_flag || self.general_vcl_hrd_params_present_flag
    }

    pub fn du_hrd_params_present(&self) -> bool {
        self.general_du_hrd_params_present_flag.unwrap_or(false)
    }

    pub fn cpb_cnt(&self) -> u64 {
        self.hrd_cpb_cnt_minus1.unwrap_or(0) + 1
    }
}

impl OlsTimingHrdParameters {
    pub fn parse(
        bs: &mut BitCursor,
        first_sub_layer: u8,
        max_sub_layers_val: u8,
        general: &GeneralTimingHrdParameters,
    ) -> Result<OlsTimingHrdParameters> {
        let mut ols_hrd = OlsTimingHrdParameters {
            first_sub_layer,
            sublayers: Vec::new(),
        };

        for _ in first_sub_layer..=max_sub_layers_val {
            let mut sublayer = SublayerTimingHrd {
                fixed_pic_rate_general_flag: bs.flag()?,
                ..Default::default()
            };

            if !sublayer.fixed_pic_rate_general_flag {
                sublayer.fixed_pic_rate_within_cvs_flag = Some(bs.flag()?);
            }

            // Inferred set when the rate is fixed in general
            let fixed_within_cvs = sublayer.fixed_pic_rate_within_cvs_flag.unwrap_or(true);

            if fixed_within_cvs {
                sublayer.elemental_duration_in_tc_minus1 = Some(bs.ue()?);
            } else if general.hrd_params_present() && general.hrd_cpb_cnt_minus1 == Some(0) {
                sublayer.low_delay_hrd_flag = Some(bs.flag()?);
            }

            if general.general_nal_hrd_params_present_flag {
                sublayer.nal_sublayer_hrd_parameters =
                    Some(SublayerHrdParameters::parse(bs, general)?);
            }

            if general.general_vcl_hrd_params_present_flag {
                sublayer.vcl_sublayer_hrd_parameters =
                    Some(SublayerHrdParameters::parse(bs, general)?);
            }

            ols_hrd.sublayers.push(sublayer);
        }

        Ok(ols_hrd)
    }
}

impl SublayerHrdParameters {
    pub fn parse(
        bs: &mut BitCursor,
        general: &GeneralTimingHrdParameters,
    ) -> Result<SublayerHrdParameters> {
        let du_params_present = general.du_hrd_params_present();
        let mut cpbs = Vec::new();

        for _ in 0..general.cpb_cnt() {
            let mut cpb = CpbParameters {
                bit_rate_value_minus1: bs.ue()?,
                cpb_size_value_minus1: bs.ue()?,
                ..Default::default()
            };

            if du_params_present {
                cpb.cpb_size_du_value_minus1 = Some(bs.ue()?);
                cpb.bit_rate_du_value_minus1 = Some(bs.ue()?);
            }

            cpb.cbr_flag = bs.flag()?;
            cpbs.push(cpb);
        }

        Ok(SublayerHrdParameters { cpbs })
    }
}
