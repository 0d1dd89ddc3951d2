#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bits::{BitCursor, SyntaxDecoder};
use crate::error::Result;

use super::byte_alignment_bits;

/// Number of additional bits carrying the version 2 constraint flags.
const NUM_EXTENSION_FLAG_BITS: u8 = 6;

/// `general_constraints_info()`
///
/// All flags are zero when `gci_present_flag` is not set.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GeneralConstraintsInfo {
    pub gci_present_flag: bool,
    // general
    pub gci_intra_only_constraint_flag: bool,
    pub gci_all_layers_independent_constraint_flag: bool,
    pub gci_one_au_only_constraint_flag: bool,

    // picture format
    pub gci_sixteen_minus_max_bitdepth_constraint_idc: u8,
    pub gci_three_minus_max_chroma_format_constraint_idc: u8,

    // NAL unit type related
    pub gci_no_mixed_nalu_types_in_pic_constraint_flag: bool,
    pub gci_no_trail_constraint_flag: bool,
    pub gci_no_stsa_constraint_flag: bool,
    pub gci_no_rasl_constraint_flag: bool,
    pub gci_no_radl_constraint_flag: bool,
    pub gci_no_idr_constraint_flag: bool,
    pub gci_no_cra_constraint_flag: bool,
    pub gci_no_gdr_constraint_flag: bool,
    pub gci_no_aps_constraint_flag: bool,
    pub gci_no_idr_rpl_constraint_flag: bool,

    // tile, slice, subpicture partitioning
    pub gci_one_tile_per_pic_constraint_flag: bool,
    pub gci_pic_header_in_slice_header_constraint_flag: bool,
    pub gci_one_slice_per_pic_constraint_flag: bool,
    pub gci_no_rectangular_slice_constraint_flag: bool,
    pub gci_one_slice_per_subpic_constraint_flag: bool,
    pub gci_no_subpic_info_constraint_flag: bool,

    // CTU and block partitioning
    pub gci_three_minus_max_log2_ctu_size_constraint_idc: u8,
    pub gci_no_partition_constraints_override_constraint_flag: bool,
    pub gci_no_mtt_constraint_flag: bool,
    pub gci_no_qtbtt_dual_tree_intra_constraint_flag: bool,

    // intra
    pub gci_no_palette_constraint_flag: bool,
    pub gci_no_ibc_constraint_flag: bool,
    pub gci_no_isp_constraint_flag: bool,
    pub gci_no_mrl_constraint_flag: bool,
    pub gci_no_mip_constraint_flag: bool,
    pub gci_no_cclm_constraint_flag: bool,

    // inter
    pub gci_no_ref_pic_resampling_constraint_flag: bool,
    pub gci_no_res_change_in_clvs_constraint_flag: bool,
    pub gci_no_weighted_prediction_constraint_flag: bool,
    pub gci_no_ref_wraparound_constraint_flag: bool,
    pub gci_no_temporal_mvp_constraint_flag: bool,
    pub gci_no_sbtmvp_constraint_flag: bool,
    pub gci_no_amvr_constraint_flag: bool,
    pub gci_no_bdof_constraint_flag: bool,
    pub gci_no_smvd_constraint_flag: bool,
    pub gci_no_dmvr_constraint_flag: bool,
    pub gci_no_mmvd_constraint_flag: bool,
    pub gci_no_affine_motion_constraint_flag: bool,
    pub gci_no_prof_constraint_flag: bool,
    pub gci_no_bcw_constraint_flag: bool,
    pub gci_no_ciip_constraint_flag: bool,
    pub gci_no_gpm_constraint_flag: bool,

    // transform, quantization, residual
    pub gci_no_luma_transform_size_64_constraint_flag: bool,
    pub gci_no_transform_skip_constraint_flag: bool,
    pub gci_no_bdpcm_constraint_flag: bool,
    pub gci_no_mts_constraint_flag: bool,
    pub gci_no_lfnst_constraint_flag: bool,
    pub gci_no_joint_cbcr_constraint_flag: bool,
    pub gci_no_sbt_constraint_flag: bool,
    pub gci_no_act_constraint_flag: bool,
    pub gci_no_explicit_scaling_list_constraint_flag: bool,
    pub gci_no_dep_quant_constraint_flag: bool,
    pub gci_no_sign_data_hiding_constraint_flag: bool,
    pub gci_no_cu_qp_delta_constraint_flag: bool,
    pub gci_no_chroma_qp_offset_constraint_flag: bool,

    // loop filter
    pub gci_no_sao_constraint_flag: bool,
    pub gci_no_alf_constraint_flag: bool,
    pub gci_no_ccalf_constraint_flag: bool,
    pub gci_no_lmcs_constraint_flag: bool,
    pub gci_no_ladf_constraint_flag: bool,
    pub gci_no_virtual_boundaries_constraint_flag: bool,

    pub gci_num_additional_bits: u8,
    pub gci_all_rap_pictures_constraint_flag: Option<bool>,
    pub gci_no_extended_precision_processing_constraint_flag: Option<bool>,
    pub gci_no_ts_residual_coding_rice_constraint_flag: Option<bool>,
    pub gci_no_rrc_rice_extension_constraint_flag: Option<bool>,
    pub gci_no_persistent_rice_adaptation_constraint_flag: Option<bool>,
    pub gci_no_reverse_last_sig_coeff_constraint_flag: Option<bool>,
}

impl GeneralConstraintsInfo {
    pub fn parse(bs: &mut BitCursor) -> Result<GeneralConstraintsInfo> {
        let mut gci = GeneralConstraintsInfo {
            gci_present_flag: bs.flag()?,
            ..Default::default()
        };

        if gci.gci_present_flag {
            gci.parse_flags(bs)?;
        }

        byte_alignment_bits(bs)?;

        Ok(gci)
    }

    fn parse_flags(&mut self, bs: &mut BitCursor) -> Result<()> {
        // general
        self.gci_intra_only_constraint_flag = bs.flag()?;
        self.gci_all_layers_independent_constraint_flag = bs.flag()?;
        self.gci_one_au_only_constraint_flag = bs.flag()?;

        // picture format
        self.gci_sixteen_minus_max_bitdepth_constraint_idc = bs.u(4)? as u8;
        self.gci_three_minus_max_chroma_format_constraint_idc = bs.u(2)? as u8;

        // NAL unit type related
        self.gci_no_mixed_nalu_types_in_pic_constraint_flag = bs.flag()?;
        self.gci_no_trail_constraint_flag = bs.flag()?;
        self.gci_no_stsa_constraint_flag = bs.flag()?;
        self.gci_no_rasl_constraint_flag = bs.flag()?;
        self.gci_no_radl_constraint_flag = bs.flag()?;
        self.gci_no_idr_constraint_flag = bs.flag()?;
        self.gci_no_cra_constraint_flag = bs.flag()?;
        self.gci_no_gdr_constraint_flag = bs.flag()?;
        self.gci_no_aps_constraint_flag = bs.flag()?;
        self.gci_no_idr_rpl_constraint_flag = bs.flag()?;

        // tile, slice, subpicture partitioning
        self.gci_one_tile_per_pic_constraint_flag = bs.flag()?;
        self.gci_pic_header_in_slice_header_constraint_flag = bs.flag()?;
        self.gci_one_slice_per_pic_constraint_flag = bs.flag()?;
        self.gci_no_rectangular_slice_constraint_flag = bs.flag()?;
        self.gci_one_slice_per_subpic_constraint_flag = bs.flag()?;
        self.gci_no_subpic_info_constraint_flag = bs.flag()?;

        // CTU and block partitioning
        self.gci_three_minus_max_log2_ctu_size_constraint_idc = bs.u(2)? as u8;
        self.gci_no_partition_constraints_override_constraint_flag = bs.flag()?;
        self.gci_no_mtt_constraint_flag = bs.flag()?;
        self.gci_no_qtbtt_dual_tree_intra_constraint_flag = bs.flag()?;

        // intra
        self.gci_no_palette_constraint_flag = bs.flag()?;
        self.gci_no_ibc_constraint_flag = bs.flag()?;
        self.gci_no_isp_constraint_flag = bs.flag()?;
        self.gci_no_mrl_constraint_flag = bs.flag()?;
        self.gci_no_mip_constraint_flag = bs.flag()?;
        self.gci_no_cclm_constraint_flag = bs.flag()?;

        // inter
        self.gci_no_ref_pic_resampling_constraint_flag = bs.flag()?;
        self.gci_no_res_change_in_clvs_constraint_flag = bs.flag()?;
        self.gci_no_weighted_prediction_constraint_flag = bs.flag()?;
        self.gci_no_ref_wraparound_constraint_flag = bs.flag()?;
        self.gci_no_temporal_mvp_constraint_flag = bs.flag()?;
        self.gci_no_sbtmvp_constraint_flag = bs.flag()?;
        self.gci_no_amvr_constraint_flag = bs.flag()?;
        self.gci_no_bdof_constraint_flag = bs.flag()?;
        self.gci_no_smvd_constraint_flag = bs.flag()?;
        self.gci_no_dmvr_constraint_flag = bs.flag()?;
        self.gci_no_mmvd_constraint_flag = bs.flag()?;
        self.gci_no_affine_motion_constraint_flag = bs.flag()?;
        self.gci_no_prof_constraint_flag = bs.flag()?;
        self.gci_no_bcw_constraint_flag = bs.flag()?;
        self.gci_no_ciip_constraint_flag = bs.flag()?;
        self.gci_no_gpm_constraint_flag = bs.flag()?;

        // transform, quantization, residual
        self.gci_no_luma_transform_size_64_constraint_flag = bs.flag()?;
        self.gci_no_transform_skip_constraint_flag = bs.flag()?;
        self.gci_no_bdpcm_constraint_flag = bs.flag()?;
        self.gci_no_mts_constraint_flag = bs.flag()?;
        self.gci_no_lfnst_constraint_flag = bs.flag()?;
        self.gci_no_joint_cbcr_constraint_flag = bs.flag()?;
        self.gci_no_sbt_constraint_flag = bs.flag()?;
        self.gci_no_act_constraint_flag = bs.flag()?;
        self.gci_no_explicit_scaling_list_constraint_flag = bs.flag()?;
        self.gci_no_dep_quant_constraint_flag = bs.flag()?;
        self.gci_no_sign_data_hiding_constraint_flag = bs.flag()?;
        self.gci_no_cu_qp_delta_constraint_flag = bs.flag()?;
        self.gci_no_chroma_qp_offset_constraint_flag = bs.flag()?;

        // loop filter
        self.gci_no_sao_constraint_flag = bs.flag()?;
        self.gci_no_alf_constraint_flag = bs.flag()?;
        self.gci_no_ccalf_constraint_flag = bs.flag()?;
        self.gci_no_lmcs_constraint_flag = bs.flag()?;
        self.gci_no_ladf_constraint_flag = bs.flag()?;
        self.gci_no_virtual_boundaries_constraint_flag = bs.flag()?;

        self.gci_num_additional_bits = bs.u(8)? as u8;

        let num_additional_bits_used = if self.gci_num_additional_bits > 5 {
            self.gci_all_rap_pictures_constraint_flag = Some(bs.flag()?);
            self.gci_no_extended_precision_processing_constraint_flag = Some(bs.flag()?);
            self.gci_no_ts_residual_coding_rice_constraint_flag = Some(bs.flag()?);
            self.gci_no_rrc_rice_extension_constraint_flag = Some(bs.flag()?);
            self.gci_no_persistent_rice_adaptation_constraint_flag = Some(bs.flag()?);
            self.gci_no_reverse_last_sig_coeff_constraint_flag = Some(bs.flag()?);

            NUM_EXTENSION_FLAG_BITS
        } else {
            0
        };

        // gci_reserved_bit
        bs.skip_bits((self.gci_num_additional_bits - num_additional_bits_used) as usize)?;

        Ok(())
    }
}
