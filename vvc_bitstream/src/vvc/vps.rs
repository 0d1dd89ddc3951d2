#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bits::{BitCursor, SyntaxDecoder};
use crate::error::{ParseError, Result};

use super::dpb_parameters::DpbParameters;
use super::hrd_parameters::{GeneralTimingHrdParameters, OlsTimingHrdParameters};
use super::profile_tier_level::ProfileTierLevel;
use super::{byte_alignment_bits, extension_data_bits, rbsp_trailing_bits};

/// `video_parameter_set_rbsp()`
///
/// Per-layer vectors are indexed by layer, `[i][j]` matrices by
/// `(layer, reference layer)`. Elements that are not signalled are `None`,
/// the accessors apply the inference rules.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Vps {
    pub vps_video_parameter_set_id: u8,
    pub vps_max_layers_minus1: u8,
    pub vps_max_sublayers_minus1: u8,
    pub vps_default_ptl_dpb_hrd_max_tid_flag: Option<bool>,
    pub vps_all_independent_layers_flag: Option<bool>,

    pub vps_layer_id: Vec<u8>,
    pub vps_independent_layer_flag: Vec<Option<bool>>,
    pub vps_max_tid_ref_present_flag: Vec<Option<bool>>,
    pub vps_direct_ref_layer_flag: Vec<Vec<bool>>,
    pub vps_max_tid_il_ref_pics_plus1: Vec<Vec<Option<u8>>>,

    pub vps_each_layer_is_an_ols_flag: Option<bool>,
    pub vps_ols_mode_idc: Option<u8>,
    pub vps_num_output_layer_sets_minus2: Option<u8>,
    /// Indexed by OLS, the first OLS has no signalled flags.
    pub vps_ols_output_layer_flag: Vec<Vec<bool>>,

    pub vps_num_ptls_minus1: Option<u8>,
    pub vps_pt_present_flag: Vec<Option<bool>>,
    pub vps_ptl_max_tid: Vec<Option<u8>>,
    pub profile_tier_level: Vec<ProfileTierLevel>,
    pub vps_ols_ptl_idx: Vec<u8>,

    pub vps_num_dpb_params_minus1: Option<u64>,
    pub vps_sublayer_dpb_params_present_flag: Option<bool>,
    pub vps_dpb_max_tid: Vec<Option<u8>>,
    pub dpb_parameters: Vec<DpbParameters>,
    /// One entry per multi-layer OLS.
    pub vps_ols_dpb: Vec<OlsDpbInfo>,

    pub vps_timing_hrd_params_present_flag: Option<bool>,
    pub general_timing_hrd_parameters: Option<GeneralTimingHrdParameters>,
    pub vps_sublayer_cpb_params_present_flag: Option<bool>,
    pub vps_num_ols_timing_hrd_params_minus1: Option<u64>,
    pub vps_hrd_max_tid: Vec<Option<u8>>,
    pub ols_timing_hrd_parameters: Vec<OlsTimingHrdParameters>,
    pub vps_ols_timing_hrd_idx: Vec<u64>,

    pub vps_extension_flag: bool,
    pub vps_extension_data_bits: usize,

    pub derived: VpsDerived,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OlsDpbInfo {
    pub vps_ols_dpb_pic_width: u64,
    pub vps_ols_dpb_pic_height: u64,
    pub vps_ols_dpb_chroma_format: u8,
    pub vps_ols_dpb_bitdepth_minus8: u64,
    pub vps_ols_dpb_params_idx: Option<u64>,
}

/// Variables derived from the layer and OLS signalling.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VpsDerived {
    pub num_direct_ref_layers: Vec<usize>,
    pub num_ref_layers: Vec<usize>,
    /// Direct and indirect reference layers of each layer.
    pub reference_layer_idx: Vec<Vec<usize>>,

    pub total_num_olss: usize,
    pub num_output_layers_in_ols: Vec<usize>,
    pub num_layers_in_ols: Vec<usize>,
    pub num_multi_layer_olss: usize,

    pub vps_num_dpb_params: usize,
}

impl Vps {
    pub fn parse(bs: &mut BitCursor) -> Result<Vps> {
        let mut vps = Vps {
            vps_video_parameter_set_id: bs.u(4)? as u8,
            vps_max_layers_minus1: bs.u(6)? as u8,
            vps_max_sublayers_minus1: bs.u(3)? as u8,
            ..Default::default()
        };

        let max_layers_minus1 = vps.vps_max_layers_minus1;
        let max_sublayers_minus1 = vps.vps_max_sublayers_minus1;

        if max_layers_minus1 > 0 && max_sublayers_minus1 > 0 {
            vps.vps_default_ptl_dpb_hrd_max_tid_flag = Some(bs.flag()?);
        }

        if max_layers_minus1 > 0 {
            vps.vps_all_independent_layers_flag = Some(bs.flag()?);
        }

        vps.parse_layers(bs)?;
        vps.parse_output_layer_sets(bs)?;

        vps.derived = vps.derive_output_layer_sets()?;

        vps.parse_profile_tier_levels(bs)?;

        if !vps.each_layer_is_an_ols() {
            vps.parse_dpb_and_hrd(bs)?;
        }

        vps.vps_extension_flag = bs.flag()?;
        if vps.vps_extension_flag {
            vps.vps_extension_data_bits = extension_data_bits(bs)?;
        }

        rbsp_trailing_bits(bs)?;

        Ok(vps)
    }

    fn parse_layers(&mut self, bs: &mut BitCursor) -> Result<()> {
        let num_layers = self.num_layers();
        let all_independent = self.all_independent_layers();

        self.vps_direct_ref_layer_flag = vec![vec![false; num_layers]; num_layers];
        self.vps_max_tid_il_ref_pics_plus1 = vec![vec![None; num_layers]; num_layers];

        for i in 0..num_layers {
            self.vps_layer_id.push(bs.u(6)? as u8);

            let mut independent = None;
            let mut max_tid_ref_present = None;

            if i > 0 && !all_independent {
                let independent_layer = bs.flag()?;
                independent = Some(independent_layer);

                if !independent_layer {
                    let present = bs.flag()?;
                    max_tid_ref_present = Some(present);

                    for j in 0..i {
                        let direct_ref = bs.flag()?;
                        self.vps_direct_ref_layer_flag[i][j] = direct_ref;

                        if present && direct_ref {
                            self.vps_max_tid_il_ref_pics_plus1[i][j] = Some(bs.u(3)? as u8);
                        }
                    }
                }
            }

            self.vps_independent_layer_flag.push(independent);
            self.vps_max_tid_ref_present_flag.push(max_tid_ref_present);
        }

        Ok(())
    }

    fn parse_output_layer_sets(&mut self, bs: &mut BitCursor) -> Result<()> {
        if self.vps_max_layers_minus1 == 0 {
            return Ok(());
        }

        if self.all_independent_layers() {
            self.vps_each_layer_is_an_ols_flag = Some(bs.flag()?);
        }

        if !self.each_layer_is_an_ols() {
            if !self.all_independent_layers() {
                self.vps_ols_mode_idc = Some(bs.u(2)? as u8);
            }

            if self.ols_mode_idc() == 2 {
                let num_output_layer_sets_minus2 = bs.u(8)? as u8;
                self.vps_num_output_layer_sets_minus2 = Some(num_output_layer_sets_minus2);

                self.vps_ols_output_layer_flag.push(Vec::new());

                for _ in 1..=num_output_layer_sets_minus2 as usize + 1 {
                    let flags = (0..self.num_layers())
                        .map(|_| bs.flag())
                        .collect::<Result<Vec<_>>>()?;

                    self.vps_ols_output_layer_flag.push(flags);
                }
            }
        }

        self.vps_num_ptls_minus1 = Some(bs.u(8)? as u8);

        Ok(())
    }

    fn parse_profile_tier_levels(&mut self, bs: &mut BitCursor) -> Result<()> {
        let num_ptls = self.num_ptls();
        let default_max_tid = self.default_ptl_dpb_hrd_max_tid();

        for i in 0..num_ptls {
            let pt_present = if i > 0 { Some(bs.flag()?) } else { None };
            let ptl_max_tid = if !default_max_tid {
                Some(bs.u(3)? as u8)
            } else {
                None
            };

            self.vps_pt_present_flag.push(pt_present);
            self.vps_ptl_max_tid.push(ptl_max_tid);
        }

        // vps_ptl_alignment_zero_bit
        byte_alignment_bits(bs)?;

        for i in 0..num_ptls {
            let pt_present = self.vps_pt_present_flag[i].unwrap_or(true);
            let max_tid = self.vps_ptl_max_tid[i].unwrap_or(self.vps_max_sublayers_minus1);

            let ptl = ProfileTierLevel::parse(bs, pt_present, max_tid)?;
            self.profile_tier_level.push(ptl);
        }

        let total_num_olss = self.derived.total_num_olss;
        if num_ptls > 1 && num_ptls != total_num_olss {
            for _ in 0..total_num_olss {
                self.vps_ols_ptl_idx.push(bs.u(8)? as u8);
            }
        }

        Ok(())
    }

    fn parse_dpb_and_hrd(&mut self, bs: &mut BitCursor) -> Result<()> {
        let max_sublayers_minus1 = self.vps_max_sublayers_minus1;
        let default_max_tid = self.default_ptl_dpb_hrd_max_tid();
        let num_multi_layer_olss = self.derived.num_multi_layer_olss;

        let num_dpb_params_minus1 = bs.ue()?;
        self.vps_num_dpb_params_minus1 = Some(num_dpb_params_minus1);
        self.derived.vps_num_dpb_params = usize::try_from(num_dpb_params_minus1 + 1)
            .map_err(|_| ParseError::invalid("vps_num_dpb_params_minus1", num_dpb_params_minus1))?;

        if max_sublayers_minus1 > 0 {
            self.vps_sublayer_dpb_params_present_flag = Some(bs.flag()?);
        }
        let sublayer_dpb_params = self.vps_sublayer_dpb_params_present_flag.unwrap_or(false);

        for _ in 0..self.derived.vps_num_dpb_params {
            let dpb_max_tid = if !default_max_tid {
                Some(bs.u(3)? as u8)
            } else {
                None
            };

            let max_tid = dpb_max_tid.unwrap_or(max_sublayers_minus1);
            let dpb = DpbParameters::parse(bs, max_tid, sublayer_dpb_params)?;

            self.vps_dpb_max_tid.push(dpb_max_tid);
            self.dpb_parameters.push(dpb);
        }

        let num_dpb_params = self.derived.vps_num_dpb_params;
        for _ in 0..num_multi_layer_olss {
            let mut ols_dpb = OlsDpbInfo {
                vps_ols_dpb_pic_width: bs.ue()?,
                vps_ols_dpb_pic_height: bs.ue()?,
                vps_ols_dpb_chroma_format: bs.u(2)? as u8,
                vps_ols_dpb_bitdepth_minus8: bs.ue()?,
                vps_ols_dpb_params_idx: None,
            };

            if num_dpb_params > 1 && num_dpb_params != num_multi_layer_olss {
                ols_dpb.vps_ols_dpb_params_idx = Some(bs.ue()?);
            }

            self.vps_ols_dpb.push(ols_dpb);
        }

        let timing_hrd_params_present = bs.flag()?;
        self.vps_timing_hrd_params_present_flag = Some(timing_hrd_params_present);

        if timing_hrd_params_present {
            let general = GeneralTimingHrdParameters::parse(bs)?;

            if max_sublayers_minus1 > 0 {
                self.vps_sublayer_cpb_params_present_flag = Some(bs.flag()?);
            }
            let sublayer_cpb_params = self.vps_sublayer_cpb_params_present_flag.unwrap_or(false);

            let num_ols_timing_hrd_params_minus1 = bs.ue()?;
            self.vps_num_ols_timing_hrd_params_minus1 = Some(num_ols_timing_hrd_params_minus1);

            for _ in 0..=num_ols_timing_hrd_params_minus1 {
                let hrd_max_tid = if !default_max_tid {
                    Some(bs.u(3)? as u8)
                } else {
                    None
                };

                let max_tid = hrd_max_tid.unwrap_or(max_sublayers_minus1);
                let first_sub_layer = if sublayer_cpb_params { 0 } else { max_tid };

                let ols_hrd = OlsTimingHrdParameters::parse(bs, first_sub_layer, max_tid, &general)?;

                self.vps_hrd_max_tid.push(hrd_max_tid);
                self.ols_timing_hrd_parameters.push(ols_hrd);
            }

            if num_ols_timing_hrd_params_minus1 > 0
                && num_ols_timing_hrd_params_minus1 + 1 != num_multi_layer_olss as u64
            {
                for _ in 0..num_multi_layer_olss {
                    self.vps_ols_timing_hrd_idx.push(bs.ue()?);
                }
            }

            self.general_timing_hrd_parameters = Some(general);
        }

        Ok(())
    }

    /// Layer dependencies, then OLS sizes.
    fn derive_output_layer_sets(&self) -> Result<VpsDerived> {
        let num_layers = self.num_layers();
        let direct_ref = &self.vps_direct_ref_layer_flag;

        let mut dependency = vec![vec![false; num_layers]; num_layers];
        for i in 0..num_layers {
            for j in 0..num_layers {
                dependency[i][j] = direct_ref[i][j];

                for k in 0..i {
                    if direct_ref[i][k] && dependency[k][j] {
                        dependency[i][j] = true;
                    }
                }
            }
        }

        let num_direct_ref_layers = direct_ref
            .iter()
            .map(|row| row.iter().filter(|flag| **flag).count())
            .collect();

        let reference_layer_idx: Vec<Vec<usize>> = dependency
            .iter()
            .map(|row| (0..num_layers).filter(|j| row[*j]).collect())
            .collect();

        let num_ref_layers = reference_layer_idx.iter().map(Vec::len).collect();

        let each_layer_is_an_ols = self.each_layer_is_an_ols();
        let ols_mode_idc = self.ols_mode_idc();

        let total_num_olss = if self.vps_max_layers_minus1 == 0 {
            1
        } else if each_layer_is_an_ols || ols_mode_idc == 0 || ols_mode_idc == 1 {
            num_layers
        } else if ols_mode_idc == 2 {
            self.vps_num_output_layer_sets_minus2.unwrap_or(0) as usize + 2
        } else {
            return Err(ParseError::invalid("vps_ols_mode_idc", ols_mode_idc));
        };

        let mut num_output_layers_in_ols = vec![1; total_num_olss];
        let mut num_layers_in_ols = vec![1; total_num_olss];
        let mut num_multi_layer_olss = 0;

        for i in 1..total_num_olss {
            if each_layer_is_an_ols {
                num_layers_in_ols[i] = 1;
                num_output_layers_in_ols[i] = 1;
            } else if ols_mode_idc == 0 || ols_mode_idc == 1 {
                num_layers_in_ols[i] = i + 1;
                num_output_layers_in_ols[i] = if ols_mode_idc == 0 { 1 } else { i + 1 };
            } else {
                let output_layer_flags = &self.vps_ols_output_layer_flag[i];
                let mut layer_included = vec![false; num_layers];

                for (k, output) in output_layer_flags.iter().enumerate() {
                    if *output {
                        layer_included[k] = true;
                        reference_layer_idx[k]
                            .iter()
                            .for_each(|r| layer_included[*r] = true);
                    }
                }

                num_output_layers_in_ols[i] = output_layer_flags.iter().filter(|f| **f).count();
                num_layers_in_ols[i] = layer_included.iter().filter(|f| **f).count();
            }

            if num_layers_in_ols[i] > 1 {
                num_multi_layer_olss += 1;
            }
        }

        Ok(VpsDerived {
            num_direct_ref_layers,
            num_ref_layers,
            reference_layer_idx,
            total_num_olss,
            num_output_layers_in_ols,
            num_layers_in_ols,
            num_multi_layer_olss,
            vps_num_dpb_params: 0,
        })
    }

    pub fn num_layers(&self) -> usize {
        self.vps_max_layers_minus1 as usize + 1
    }

    pub fn default_ptl_dpb_hrd_max_tid(&self) -> bool {
        self.vps_default_ptl_dpb_hrd_max_tid_flag.unwrap_or(true)
    }

    pub fn all_independent_layers(&self) -> bool {
        self.vps_all_independent_layers_flag.unwrap_or(true)
    }

    pub fn independent_layer(&self, i: usize) -> bool {
        self.vps_independent_layer_flag
            .get(i)
            .copied()
            .flatten()
            .unwrap_or(true)
    }

    /// Inferred set for a single-layer VPS, clear otherwise.
    pub fn each_layer_is_an_ols(&self) -> bool {
        self.vps_each_layer_is_an_ols_flag
            .unwrap_or(self.vps_max_layers_minus1 == 0)
    }

    pub fn ols_mode_idc(&self) -> u8 {
        self.vps_ols_mode_idc.unwrap_or(2)
    }

    pub fn num_ptls(&self) -> usize {
        self.vps_num_ptls_minus1.unwrap_or(0) as usize + 1
    }

    /// PTL used by OLS `i`.
    pub fn ols_ptl_idx(&self, i: usize) -> usize {
        if let Some(idx) = self.vps_ols_ptl_idx.get(i) {
            *idx as usize
        } else if self.num_ptls() == self.derived.total_num_olss {
            i
        } else {
            0
        }
    }
}
