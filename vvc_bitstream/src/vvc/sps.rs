use log::warn;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bits::{ceil_log2, BitCursor, SyntaxDecoder};
use crate::error::{ParseError, Result};
use crate::store::ParameterSetStore;

use super::dpb_parameters::DpbParameters;
use super::hrd_parameters::{GeneralTimingHrdParameters, OlsTimingHrdParameters};
use super::profile_tier_level::ProfileTierLevel;
use super::ref_pic_list::{RefPicListContext, RefPicListStruct};
use super::vui_parameters::VuiParameters;
use super::{byte_alignment_bits, extension_data_bits, rbsp_trailing_bits, ue_max};

/// Upper bound for picture dimensions, in luma samples.
pub const MAX_PIC_SIZE_IN_LUMA_SAMPLES: u64 = 1 << 16;

const MAX_SUBPIC_ID_LEN_MINUS1: u64 = 15;
const MAX_NUM_REF_PIC_LISTS: u64 = 64;
const MAX_NUM_VIRTUAL_BOUNDARIES: u64 = 3;

/// `seq_parameter_set_rbsp()`
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Sps {
    pub sps_seq_parameter_set_id: u8,
    pub sps_video_parameter_set_id: u8,
    pub sps_max_sublayers_minus1: u8,
    pub sps_chroma_format_idc: u8,
    pub sps_log2_ctu_size_minus5: u8,
    pub sps_ptl_dpb_hrd_params_present_flag: bool,
    pub profile_tier_level: Option<ProfileTierLevel>,

    pub sps_gdr_enabled_flag: bool,
    pub sps_ref_pic_resampling_enabled_flag: bool,
    pub sps_res_change_in_clvs_allowed_flag: Option<bool>,
    pub sps_pic_width_max_in_luma_samples: u64,
    pub sps_pic_height_max_in_luma_samples: u64,
    pub sps_conformance_window_flag: bool,
    pub conformance_window: Option<ConformanceWindow>,

    pub sps_subpic_info_present_flag: bool,
    pub subpic_info: Option<SubpicInfo>,

    pub sps_bitdepth_minus8: u64,
    pub sps_entropy_coding_sync_enabled_flag: bool,
    pub sps_entry_point_offsets_present_flag: bool,
    pub sps_log2_max_pic_order_cnt_lsb_minus4: u8,
    pub sps_poc_msb_cycle_flag: bool,
    pub sps_poc_msb_cycle_len_minus1: Option<u64>,
    pub sps_num_extra_ph_bytes: u8,
    pub sps_extra_ph_bit_present_flag: Vec<bool>,
    pub sps_num_extra_sh_bytes: u8,
    pub sps_extra_sh_bit_present_flag: Vec<bool>,

    pub sps_sublayer_dpb_params_flag: Option<bool>,
    pub dpb_parameters: Option<DpbParameters>,

    pub sps_log2_min_luma_coding_block_size_minus2: u64,
    pub sps_partition_constraints_override_enabled_flag: bool,
    pub sps_log2_diff_min_qt_min_cb_intra_slice_luma: u64,
    pub sps_max_mtt_hierarchy_depth_intra_slice_luma: u64,
    pub sps_log2_diff_max_bt_min_qt_intra_slice_luma: Option<u64>,
    pub sps_log2_diff_max_tt_min_qt_intra_slice_luma: Option<u64>,
    pub sps_qtbtt_dual_tree_intra_flag: Option<bool>,
    pub sps_log2_diff_min_qt_min_cb_intra_slice_chroma: Option<u64>,
    pub sps_max_mtt_hierarchy_depth_intra_slice_chroma: Option<u64>,
    pub sps_log2_diff_max_bt_min_qt_intra_slice_chroma: Option<u64>,
    pub sps_log2_diff_max_tt_min_qt_intra_slice_chroma: Option<u64>,
    pub sps_log2_diff_min_qt_min_cb_inter_slice: u64,
    pub sps_max_mtt_hierarchy_depth_inter_slice: u64,
    pub sps_log2_diff_max_bt_min_qt_inter_slice: Option<u64>,
    pub sps_log2_diff_max_tt_min_qt_inter_slice: Option<u64>,

    pub sps_max_luma_transform_size_64_flag: Option<bool>,
    pub sps_transform_skip_enabled_flag: bool,
    pub sps_log2_transform_skip_max_size_minus2: Option<u64>,
    pub sps_bdpcm_enabled_flag: Option<bool>,
    pub sps_mts_enabled_flag: bool,
    pub sps_explicit_mts_intra_enabled_flag: Option<bool>,
    pub sps_explicit_mts_inter_enabled_flag: Option<bool>,
    pub sps_lfnst_enabled_flag: bool,

    pub sps_joint_cbcr_enabled_flag: Option<bool>,
    pub sps_same_qp_table_for_chroma_flag: Option<bool>,
    pub chroma_qp_tables: Vec<ChromaQpTable>,

    pub sps_sao_enabled_flag: bool,
    pub sps_alf_enabled_flag: bool,
    pub sps_ccalf_enabled_flag: Option<bool>,
    pub sps_lmcs_enabled_flag: bool,
    pub sps_weighted_pred_flag: bool,
    pub sps_weighted_bipred_flag: bool,
    pub sps_long_term_ref_pics_flag: bool,
    pub sps_inter_layer_prediction_enabled_flag: Option<bool>,
    pub sps_idr_rpl_present_flag: bool,
    pub sps_rpl1_same_as_rpl0_flag: bool,
    /// One entry per signalled list, two unless list 1 mirrors list 0.
    pub sps_num_ref_pic_lists: Vec<u64>,
    pub ref_pic_list_struct: Vec<Vec<RefPicListStruct>>,

    pub sps_ref_wraparound_enabled_flag: bool,
    pub sps_temporal_mvp_enabled_flag: bool,
    pub sps_sbtmvp_enabled_flag: Option<bool>,
    pub sps_amvr_enabled_flag: bool,
    pub sps_bdof_enabled_flag: bool,
    pub sps_bdof_control_present_in_ph_flag: Option<bool>,
    pub sps_smvd_enabled_flag: bool,
    pub sps_dmvr_enabled_flag: bool,
    pub sps_dmvr_control_present_in_ph_flag: Option<bool>,
    pub sps_mmvd_enabled_flag: bool,
    pub sps_mmvd_fullpel_only_enabled_flag: Option<bool>,
    pub sps_six_minus_max_num_merge_cand: u64,
    pub sps_sbt_enabled_flag: bool,
    pub sps_affine_enabled_flag: bool,
    pub sps_five_minus_max_num_subblock_merge_cand: Option<u64>,
    pub sps_6param_affine_enabled_flag: Option<bool>,
    pub sps_affine_amvr_enabled_flag: Option<bool>,
    pub sps_affine_prof_enabled_flag: Option<bool>,
    pub sps_prof_control_present_in_ph_flag: Option<bool>,
    pub sps_bcw_enabled_flag: bool,
    pub sps_ciip_enabled_flag: bool,
    pub sps_gpm_enabled_flag: Option<bool>,
    pub sps_max_num_merge_cand_minus_max_num_gpm_cand: Option<u64>,
    pub sps_log2_parallel_merge_level_minus2: u64,

    pub sps_isp_enabled_flag: bool,
    pub sps_mrl_enabled_flag: bool,
    pub sps_mip_enabled_flag: bool,
    pub sps_cclm_enabled_flag: Option<bool>,
    pub sps_chroma_horizontal_collocated_flag: Option<bool>,
    pub sps_chroma_vertical_collocated_flag: Option<bool>,
    pub sps_palette_enabled_flag: bool,
    pub sps_act_enabled_flag: Option<bool>,
    pub sps_min_qp_prime_ts: Option<u64>,
    pub sps_ibc_enabled_flag: bool,
    pub sps_six_minus_max_num_ibc_merge_cand: Option<u64>,

    pub sps_ladf_enabled_flag: bool,
    pub sps_num_ladf_intervals_minus2: Option<u8>,
    pub sps_ladf_lowest_interval_qp_offset: Option<i64>,
    pub sps_ladf_qp_offset: Vec<i64>,
    pub sps_ladf_delta_threshold_minus1: Vec<u64>,

    pub sps_explicit_scaling_list_enabled_flag: bool,
    pub sps_scaling_matrix_for_lfnst_disabled_flag: Option<bool>,
    pub sps_scaling_matrix_for_alternative_colour_space_disabled_flag: Option<bool>,
    pub sps_scaling_matrix_designated_colour_space_flag: Option<bool>,
    pub sps_dep_quant_enabled_flag: bool,
    pub sps_sign_data_hiding_enabled_flag: bool,

    pub sps_virtual_boundaries_enabled_flag: bool,
    pub sps_virtual_boundaries_present_flag: Option<bool>,
    pub sps_num_ver_virtual_boundaries: Option<u8>,
    pub sps_virtual_boundary_pos_x_minus1: Vec<u64>,
    pub sps_num_hor_virtual_boundaries: Option<u8>,
    pub sps_virtual_boundary_pos_y_minus1: Vec<u64>,

    pub sps_timing_hrd_params_present_flag: Option<bool>,
    pub general_timing_hrd_parameters: Option<GeneralTimingHrdParameters>,
    pub sps_sublayer_cpb_params_present_flag: Option<bool>,
    pub ols_timing_hrd_parameters: Option<OlsTimingHrdParameters>,

    pub sps_field_seq_flag: bool,
    pub sps_vui_parameters_present_flag: bool,
    pub sps_vui_payload_size_minus1: Option<u64>,
    pub vui_parameters: Option<VuiParameters>,

    pub sps_extension_flag: bool,
    pub sps_extension_data_bits: usize,

    pub derived: SpsDerived,
}

/// Offsets in chroma sample units.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ConformanceWindow {
    pub left_offset: u64,
    pub right_offset: u64,
    pub top_offset: u64,
    pub bottom_offset: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SubpicInfo {
    pub sps_num_subpics_minus1: u64,
    pub sps_independent_subpics_flag: Option<bool>,
    pub sps_subpic_same_size_flag: Option<bool>,
    /// Empty for a single subpicture.
    pub subpics: Vec<SubpicLayout>,
    pub sps_subpic_id_len_minus1: u8,
    pub sps_subpic_id_mapping_explicitly_signalled_flag: bool,
    pub sps_subpic_id_mapping_present_flag: Option<bool>,
    pub sps_subpic_id: Vec<u32>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SubpicLayout {
    pub sps_subpic_ctu_top_left_x: Option<u32>,
    pub sps_subpic_ctu_top_left_y: Option<u32>,
    pub sps_subpic_width_minus1: Option<u32>,
    pub sps_subpic_height_minus1: Option<u32>,
    pub sps_subpic_treated_as_pic_flag: Option<bool>,
    pub sps_loop_filter_across_subpic_enabled_flag: Option<bool>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ChromaQpTable {
    pub sps_qp_table_start_minus26: i64,
    pub sps_num_points_in_qp_table_minus1: u64,
    pub sps_delta_qp_in_val_minus1: Vec<u64>,
    pub sps_delta_qp_diff_val: Vec<u64>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpsDerived {
    pub ctb_log2_size_y: u8,
    pub ctb_size_y: u32,
    pub min_cb_log2_size_y: u64,
    pub pic_width_in_ctbs_y: u64,
    pub pic_height_in_ctbs_y: u64,
    pub max_num_merge_cand: i64,
    pub num_qp_tables: usize,
    /// Layer count of the referenced VPS, none when the SPS stands alone.
    pub vps_num_layers: Option<usize>,
}

impl Sps {
    pub fn parse(bs: &mut BitCursor, store: &ParameterSetStore) -> Result<Sps> {
        let mut sps = Sps {
            sps_seq_parameter_set_id: bs.u(4)? as u8,
            sps_video_parameter_set_id: bs.u(4)? as u8,
            ..Default::default()
        };

        // Id 0 means the SPS does not refer to a VPS. No SPS syntax depends
        // on the VPS, a missing one only leaves the layer count unknown.
        if sps.sps_video_parameter_set_id > 0 {
            match store.vps(sps.sps_video_parameter_set_id) {
                Some(vps) => sps.derived.vps_num_layers = Some(vps.num_layers()),
                None => warn!(
                    "SPS {} refers to VPS {} which has not been seen",
                    sps.sps_seq_parameter_set_id, sps.sps_video_parameter_set_id
                ),
            }
        }

        sps.sps_max_sublayers_minus1 = bs.u(3)? as u8;
        sps.sps_chroma_format_idc = bs.u(2)? as u8;
        sps.sps_log2_ctu_size_minus5 = bs.u(2)? as u8;

        sps.derived.ctb_log2_size_y = sps.sps_log2_ctu_size_minus5 + 5;
        sps.derived.ctb_size_y = 1 << sps.derived.ctb_log2_size_y;

        sps.sps_ptl_dpb_hrd_params_present_flag = bs.flag()?;
        if sps.sps_ptl_dpb_hrd_params_present_flag {
            sps.profile_tier_level = Some(ProfileTierLevel::parse(
                bs,
                true,
                sps.sps_max_sublayers_minus1,
            )?);
        }

        sps.sps_gdr_enabled_flag = bs.flag()?;
        sps.sps_ref_pic_resampling_enabled_flag = bs.flag()?;
        if sps.sps_ref_pic_resampling_enabled_flag {
            sps.sps_res_change_in_clvs_allowed_flag = Some(bs.flag()?);
        }

        sps.sps_pic_width_max_in_luma_samples = pic_size(bs, "sps_pic_width_max_in_luma_samples")?;
        sps.sps_pic_height_max_in_luma_samples =
            pic_size(bs, "sps_pic_height_max_in_luma_samples")?;

        let ctb_size_y = sps.derived.ctb_size_y as u64;
        sps.derived.pic_width_in_ctbs_y = sps.sps_pic_width_max_in_luma_samples.div_ceil(ctb_size_y);
        sps.derived.pic_height_in_ctbs_y = sps.sps_pic_height_max_in_luma_samples.div_ceil(ctb_size_y);

        sps.sps_conformance_window_flag = bs.flag()?;
        if sps.sps_conformance_window_flag {
            sps.conformance_window = Some(ConformanceWindow::parse(bs)?);
        }

        sps.sps_subpic_info_present_flag = bs.flag()?;
        if sps.sps_subpic_info_present_flag {
            sps.subpic_info = Some(SubpicInfo::parse(bs, &sps)?);
        }

        sps.sps_bitdepth_minus8 = bs.ue()?;
        sps.sps_entropy_coding_sync_enabled_flag = bs.flag()?;
        sps.sps_entry_point_offsets_present_flag = bs.flag()?;
        sps.sps_log2_max_pic_order_cnt_lsb_minus4 = bs.u(4)? as u8;

        sps.sps_poc_msb_cycle_flag = bs.flag()?;
        if sps.sps_poc_msb_cycle_flag {
            sps.sps_poc_msb_cycle_len_minus1 = Some(bs.ue()?);
        }

        sps.sps_num_extra_ph_bytes = bs.u(2)? as u8;
        for _ in 0..sps.sps_num_extra_ph_bytes as usize * 8 {
            sps.sps_extra_ph_bit_present_flag.push(bs.flag()?);
        }

        sps.sps_num_extra_sh_bytes = bs.u(2)? as u8;
        for _ in 0..sps.sps_num_extra_sh_bytes as usize * 8 {
            sps.sps_extra_sh_bit_present_flag.push(bs.flag()?);
        }

        if sps.sps_ptl_dpb_hrd_params_present_flag {
            if sps.sps_max_sublayers_minus1 > 0 {
                sps.sps_sublayer_dpb_params_flag = Some(bs.flag()?);
            }

            sps.dpb_parameters = Some(DpbParameters::parse(
                bs,
                sps.sps_max_sublayers_minus1,
                sps.sps_sublayer_dpb_params_flag.unwrap_or(false),
            )?);
        }

        sps.parse_partitioning(bs)?;
        sps.parse_transform_and_chroma(bs)?;
        sps.parse_inter_tools(bs)?;
        sps.parse_intra_and_residual_tools(bs)?;

        if sps.sps_ptl_dpb_hrd_params_present_flag {
            let timing_hrd_params_present = bs.flag()?;
            sps.sps_timing_hrd_params_present_flag = Some(timing_hrd_params_present);

            if timing_hrd_params_present {
                let general = GeneralTimingHrdParameters::parse(bs)?;

                if sps.sps_max_sublayers_minus1 > 0 {
                    sps.sps_sublayer_cpb_params_present_flag = Some(bs.flag()?);
                }

                let first_sub_layer = if sps.sps_sublayer_cpb_params_present_flag.unwrap_or(false) {
                    0
                } else {
                    sps.sps_max_sublayers_minus1
                };

                sps.ols_timing_hrd_parameters = Some(OlsTimingHrdParameters::parse(
                    bs,
                    first_sub_layer,
                    sps.sps_max_sublayers_minus1,
                    &general,
                )?);
                sps.general_timing_hrd_parameters = Some(general);
            }
        }

        sps.sps_field_seq_flag = bs.flag()?;
        sps.sps_vui_parameters_present_flag = bs.flag()?;

        if sps.sps_vui_parameters_present_flag {
            let payload_size_minus1 = bs.ue()?;
            sps.sps_vui_payload_size_minus1 = Some(payload_size_minus1);

            // sps_vui_alignment_zero_bit
            byte_alignment_bits(bs)?;

            sps.vui_parameters = Some(VuiParameters::parse_payload(bs, payload_size_minus1 + 1)?);
        }

        sps.sps_extension_flag = bs.flag()?;
        if sps.sps_extension_flag {
            sps.sps_extension_data_bits = extension_data_bits(bs)?;
        }

        rbsp_trailing_bits(bs)?;

        Ok(sps)
    }

    fn parse_partitioning(&mut self, bs: &mut BitCursor) -> Result<()> {
        self.sps_log2_min_luma_coding_block_size_minus2 = bs.ue()?;
        self.derived.min_cb_log2_size_y = self.sps_log2_min_luma_coding_block_size_minus2 + 2;

        self.sps_partition_constraints_override_enabled_flag = bs.flag()?;

        self.sps_log2_diff_min_qt_min_cb_intra_slice_luma = bs.ue()?;
        self.sps_max_mtt_hierarchy_depth_intra_slice_luma = bs.ue()?;
        if self.sps_max_mtt_hierarchy_depth_intra_slice_luma != 0 {
            self.sps_log2_diff_max_bt_min_qt_intra_slice_luma = Some(bs.ue()?);
            self.sps_log2_diff_max_tt_min_qt_intra_slice_luma = Some(bs.ue()?);
        }

        if self.sps_chroma_format_idc != 0 {
            self.sps_qtbtt_dual_tree_intra_flag = Some(bs.flag()?);
        }

        if self.sps_qtbtt_dual_tree_intra_flag.unwrap_or(false) {
            self.sps_log2_diff_min_qt_min_cb_intra_slice_chroma = Some(bs.ue()?);

            let max_mtt_depth = bs.ue()?;
            self.sps_max_mtt_hierarchy_depth_intra_slice_chroma = Some(max_mtt_depth);

            if max_mtt_depth != 0 {
                self.sps_log2_diff_max_bt_min_qt_intra_slice_chroma = Some(bs.ue()?);
                self.sps_log2_diff_max_tt_min_qt_intra_slice_chroma = Some(bs.ue()?);
            }
        }

        self.sps_log2_diff_min_qt_min_cb_inter_slice = bs.ue()?;
        self.sps_max_mtt_hierarchy_depth_inter_slice = bs.ue()?;
        if self.sps_max_mtt_hierarchy_depth_inter_slice != 0 {
            self.sps_log2_diff_max_bt_min_qt_inter_slice = Some(bs.ue()?);
            self.sps_log2_diff_max_tt_min_qt_inter_slice = Some(bs.ue()?);
        }

        if self.derived.ctb_size_y > 32 {
            self.sps_max_luma_transform_size_64_flag = Some(bs.flag()?);
        }

        Ok(())
    }

    fn parse_transform_and_chroma(&mut self, bs: &mut BitCursor) -> Result<()> {
        self.sps_transform_skip_enabled_flag = bs.flag()?;
        if self.sps_transform_skip_enabled_flag {
            self.sps_log2_transform_skip_max_size_minus2 = Some(bs.ue()?);
            self.sps_bdpcm_enabled_flag = Some(bs.flag()?);
        }

        self.sps_mts_enabled_flag = bs.flag()?;
        if self.sps_mts_enabled_flag {
            self.sps_explicit_mts_intra_enabled_flag = Some(bs.flag()?);
            self.sps_explicit_mts_inter_enabled_flag = Some(bs.flag()?);
        }

        self.sps_lfnst_enabled_flag = bs.flag()?;

        if self.sps_chroma_format_idc != 0 {
            let joint_cbcr = bs.flag()?;
            let same_qp_table = bs.flag()?;

            self.sps_joint_cbcr_enabled_flag = Some(joint_cbcr);
            self.sps_same_qp_table_for_chroma_flag = Some(same_qp_table);

            self.derived.num_qp_tables = if same_qp_table {
                1
            } else if joint_cbcr {
                3
            } else {
                2
            };

            for _ in 0..self.derived.num_qp_tables {
                self.chroma_qp_tables.push(ChromaQpTable::parse(bs)?);
            }
        }

        self.sps_sao_enabled_flag = bs.flag()?;
        self.sps_alf_enabled_flag = bs.flag()?;
        if self.sps_alf_enabled_flag && self.sps_chroma_format_idc != 0 {
            self.sps_ccalf_enabled_flag = Some(bs.flag()?);
        }

        self.sps_lmcs_enabled_flag = bs.flag()?;

        Ok(())
    }

    fn parse_inter_tools(&mut self, bs: &mut BitCursor) -> Result<()> {
        self.sps_weighted_pred_flag = bs.flag()?;
        self.sps_weighted_bipred_flag = bs.flag()?;
        self.sps_long_term_ref_pics_flag = bs.flag()?;

        if self.sps_video_parameter_set_id > 0 {
            self.sps_inter_layer_prediction_enabled_flag = Some(bs.flag()?);
        }

        self.sps_idr_rpl_present_flag = bs.flag()?;
        self.sps_rpl1_same_as_rpl0_flag = bs.flag()?;

        let num_lists = if self.sps_rpl1_same_as_rpl0_flag { 1 } else { 2 };

        for _ in 0..num_lists {
            let num_ref_pic_lists = ue_max(bs, "sps_num_ref_pic_lists", MAX_NUM_REF_PIC_LISTS)?;
            let ctx = self.ref_pic_list_context(num_ref_pic_lists);

            let lists = (0..num_ref_pic_lists)
                .map(|rpls_idx| RefPicListStruct::parse(bs, rpls_idx, &ctx))
                .collect::<Result<Vec<_>>>()?;

            self.sps_num_ref_pic_lists.push(num_ref_pic_lists);
            self.ref_pic_list_struct.push(lists);
        }

        self.sps_ref_wraparound_enabled_flag = bs.flag()?;

        self.sps_temporal_mvp_enabled_flag = bs.flag()?;
        if self.sps_temporal_mvp_enabled_flag {
            self.sps_sbtmvp_enabled_flag = Some(bs.flag()?);
        }

        self.sps_amvr_enabled_flag = bs.flag()?;

        self.sps_bdof_enabled_flag = bs.flag()?;
        if self.sps_bdof_enabled_flag {
            self.sps_bdof_control_present_in_ph_flag = Some(bs.flag()?);
        }

        self.sps_smvd_enabled_flag = bs.flag()?;

        self.sps_dmvr_enabled_flag = bs.flag()?;
        if self.sps_dmvr_enabled_flag {
            self.sps_dmvr_control_present_in_ph_flag = Some(bs.flag()?);
        }

        self.sps_mmvd_enabled_flag = bs.flag()?;
        if self.sps_mmvd_enabled_flag {
            self.sps_mmvd_fullpel_only_enabled_flag = Some(bs.flag()?);
        }

        self.sps_six_minus_max_num_merge_cand = bs.ue()?;
        self.derived.max_num_merge_cand = 6 - self.sps_six_minus_max_num_merge_cand.min(6) as i64;

        self.sps_sbt_enabled_flag = bs.flag()?;

        self.sps_affine_enabled_flag = bs.flag()?;
        if self.sps_affine_enabled_flag {
            self.sps_five_minus_max_num_subblock_merge_cand = Some(bs.ue()?);
            self.sps_6param_affine_enabled_flag = Some(bs.flag()?);

            if self.sps_amvr_enabled_flag {
                self.sps_affine_amvr_enabled_flag = Some(bs.flag()?);
            }

            let prof = bs.flag()?;
            self.sps_affine_prof_enabled_flag = Some(prof);

            if prof {
                self.sps_prof_control_present_in_ph_flag = Some(bs.flag()?);
            }
        }

        self.sps_bcw_enabled_flag = bs.flag()?;
        self.sps_ciip_enabled_flag = bs.flag()?;

        if self.derived.max_num_merge_cand >= 2 {
            let gpm = bs.flag()?;
            self.sps_gpm_enabled_flag = Some(gpm);

            if gpm && self.derived.max_num_merge_cand >= 3 {
                self.sps_max_num_merge_cand_minus_max_num_gpm_cand = Some(bs.ue()?);
            }
        }

        self.sps_log2_parallel_merge_level_minus2 = bs.ue()?;

        Ok(())
    }

    fn parse_intra_and_residual_tools(&mut self, bs: &mut BitCursor) -> Result<()> {
        self.sps_isp_enabled_flag = bs.flag()?;
        self.sps_mrl_enabled_flag = bs.flag()?;
        self.sps_mip_enabled_flag = bs.flag()?;

        if self.sps_chroma_format_idc != 0 {
            self.sps_cclm_enabled_flag = Some(bs.flag()?);
        }

        if self.sps_chroma_format_idc == 1 {
            self.sps_chroma_horizontal_collocated_flag = Some(bs.flag()?);
            self.sps_chroma_vertical_collocated_flag = Some(bs.flag()?);
        }

        self.sps_palette_enabled_flag = bs.flag()?;

        if self.sps_chroma_format_idc == 3 && !self.sps_max_luma_transform_size_64_flag.unwrap_or(false) {
            self.sps_act_enabled_flag = Some(bs.flag()?);
        }

        if self.sps_transform_skip_enabled_flag || self.sps_palette_enabled_flag {
            self.sps_min_qp_prime_ts = Some(bs.ue()?);
        }

        self.sps_ibc_enabled_flag = bs.flag()?;
        if self.sps_ibc_enabled_flag {
            self.sps_six_minus_max_num_ibc_merge_cand = Some(bs.ue()?);
        }

        self.sps_ladf_enabled_flag = bs.flag()?;
        if self.sps_ladf_enabled_flag {
            let num_intervals_minus2 = bs.u(2)? as u8;

            self.sps_num_ladf_intervals_minus2 = Some(num_intervals_minus2);
            self.sps_ladf_lowest_interval_qp_offset = Some(bs.se()?);

            for _ in 0..num_intervals_minus2 + 1 {
                self.sps_ladf_qp_offset.push(bs.se()?);
                self.sps_ladf_delta_threshold_minus1.push(bs.ue()?);
            }
        }

        self.sps_explicit_scaling_list_enabled_flag = bs.flag()?;
        let explicit_scaling_list = self.sps_explicit_scaling_list_enabled_flag;

        if self.sps_lfnst_enabled_flag && explicit_scaling_list {
            self.sps_scaling_matrix_for_lfnst_disabled_flag = Some(bs.flag()?);
        }

        if self.sps_act_enabled_flag.unwrap_or(false) && explicit_scaling_list {
            self.sps_scaling_matrix_for_alternative_colour_space_disabled_flag = Some(bs.flag()?);
        }

        if self
            .sps_scaling_matrix_for_alternative_colour_space_disabled_flag
            .unwrap_or(false)
        {
            self.sps_scaling_matrix_designated_colour_space_flag = Some(bs.flag()?);
        }

        self.sps_dep_quant_enabled_flag = bs.flag()?;
        self.sps_sign_data_hiding_enabled_flag = bs.flag()?;

        self.sps_virtual_boundaries_enabled_flag = bs.flag()?;
        if self.sps_virtual_boundaries_enabled_flag {
            // Clear when the boundaries are carried in the picture headers
            let present = bs.flag()?;
            self.sps_virtual_boundaries_present_flag = Some(present);

            if present {
                let num_ver = ue_max(
                    bs,
                    "sps_num_ver_virtual_boundaries",
                    MAX_NUM_VIRTUAL_BOUNDARIES,
                )? as u8;
                self.sps_num_ver_virtual_boundaries = Some(num_ver);
                for _ in 0..num_ver {
                    self.sps_virtual_boundary_pos_x_minus1.push(bs.ue()?);
                }

                let num_hor = ue_max(
                    bs,
                    "sps_num_hor_virtual_boundaries",
                    MAX_NUM_VIRTUAL_BOUNDARIES,
                )? as u8;
                self.sps_num_hor_virtual_boundaries = Some(num_hor);
                for _ in 0..num_hor {
                    self.sps_virtual_boundary_pos_y_minus1.push(bs.ue()?);
                }
            }
        }

        Ok(())
    }

    fn ref_pic_list_context(&self, num_ref_pic_lists: u64) -> RefPicListContext {
        RefPicListContext {
            long_term_ref_pics: self.sps_long_term_ref_pics_flag,
            inter_layer_prediction: self.sps_inter_layer_prediction_enabled_flag.unwrap_or(false),
            weighted_prediction: self.sps_weighted_pred_flag || self.sps_weighted_bipred_flag,
            num_ref_pic_lists,
            poc_lsb_bits: self.sps_log2_max_pic_order_cnt_lsb_minus4 as u32 + 4,
        }
    }

    pub fn num_subpics(&self) -> u64 {
        self.subpic_info
            .as_ref()
            .map_or(1, |info| info.sps_num_subpics_minus1 + 1)
    }

    pub fn bit_depth(&self) -> u64 {
        self.sps_bitdepth_minus8 + 8
    }
}

impl ConformanceWindow {
    pub fn parse(bs: &mut BitCursor) -> Result<ConformanceWindow> {
        Ok(ConformanceWindow {
            left_offset: bs.ue()?,
            right_offset: bs.ue()?,
            top_offset: bs.ue()?,
            bottom_offset: bs.ue()?,
        })
    }
}

impl SubpicInfo {
    fn parse(bs: &mut BitCursor, sps: &Sps) -> Result<SubpicInfo> {
        let pic_size_in_ctbs = sps.derived.pic_width_in_ctbs_y * sps.derived.pic_height_in_ctbs_y;

        let mut info = SubpicInfo {
            sps_num_subpics_minus1: ue_max(bs, "sps_num_subpics_minus1", pic_size_in_ctbs - 1)?,
            ..Default::default()
        };

        let num_subpics_minus1 = info.sps_num_subpics_minus1;

        if num_subpics_minus1 > 0 {
            info.sps_independent_subpics_flag = Some(bs.flag()?);
            info.sps_subpic_same_size_flag = Some(bs.flag()?);

            let independent = info.sps_independent_subpics_flag.unwrap_or(true);
            let same_size = info.sps_subpic_same_size_flag.unwrap_or(false);

            let ctb_size_y = sps.derived.ctb_size_y as u64;
            let wide = sps.sps_pic_width_max_in_luma_samples > ctb_size_y;
            let tall = sps.sps_pic_height_max_in_luma_samples > ctb_size_y;

            let width_bits = ceil_log2(sps.derived.pic_width_in_ctbs_y);
            let height_bits = ceil_log2(sps.derived.pic_height_in_ctbs_y);

            for i in 0..=num_subpics_minus1 {
                let mut subpic = SubpicLayout::default();

                if !same_size || i == 0 {
                    if i > 0 && wide {
                        subpic.sps_subpic_ctu_top_left_x = Some(bs.u(width_bits)?);
                    }
                    if i > 0 && tall {
                        subpic.sps_subpic_ctu_top_left_y = Some(bs.u(height_bits)?);
                    }
                    if i < num_subpics_minus1 && wide {
                        subpic.sps_subpic_width_minus1 = Some(bs.u(width_bits)?);
                    }
                    if i < num_subpics_minus1 && tall {
                        subpic.sps_subpic_height_minus1 = Some(bs.u(height_bits)?);
                    }
                }

                if !independent {
                    subpic.sps_subpic_treated_as_pic_flag = Some(bs.flag()?);
                    subpic.sps_loop_filter_across_subpic_enabled_flag = Some(bs.flag()?);
                }

                info.subpics.push(subpic);
            }
        }

        info.sps_subpic_id_len_minus1 =
            ue_max(bs, "sps_subpic_id_len_minus1", MAX_SUBPIC_ID_LEN_MINUS1)? as u8;
        info.sps_subpic_id_mapping_explicitly_signalled_flag = bs.flag()?;

        if info.sps_subpic_id_mapping_explicitly_signalled_flag {
            let mapping_present = bs.flag()?;
            info.sps_subpic_id_mapping_present_flag = Some(mapping_present);

            if mapping_present {
                let id_len = info.sps_subpic_id_len_minus1 as u32 + 1;

                for _ in 0..=num_subpics_minus1 {
                    info.sps_subpic_id.push(bs.u(id_len)?);
                }
            }
        }

        Ok(info)
    }
}

impl ChromaQpTable {
    fn parse(bs: &mut BitCursor) -> Result<ChromaQpTable> {
        let mut table = ChromaQpTable {
            sps_qp_table_start_minus26: bs.se()?,
            sps_num_points_in_qp_table_minus1: bs.ue()?,
            ..Default::default()
        };

        for _ in 0..=table.sps_num_points_in_qp_table_minus1 {
            table.sps_delta_qp_in_val_minus1.push(bs.ue()?);
            table.sps_delta_qp_diff_val.push(bs.ue()?);
        }

        Ok(table)
    }
}

fn pic_size(bs: &mut BitCursor, field: &'static str) -> Result<u64> {
    let size = bs.ue()?;

    if size == 0 || size > MAX_PIC_SIZE_IN_LUMA_SAMPLES {
        return Err(ParseError::invalid(field, size));
    }

    Ok(size)
}
