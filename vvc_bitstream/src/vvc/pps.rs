#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bits::{BitCursor, SyntaxDecoder};
use crate::error::{ParseError, Result};
use crate::store::ParameterSetStore;

use super::pic_partition::{parse_rect_slices, RectSlice, SliceLayout, TileLayout};
use super::sps::ConformanceWindow;
use super::{extension_data_bits, rbsp_trailing_bits, ue_max};

const MAX_SUBPIC_ID_LEN_MINUS1: u64 = 15;
const MAX_CHROMA_QP_OFFSET_LIST_LEN_MINUS1: u64 = 5;

/// `pic_parameter_set_rbsp()`
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Pps {
    pub pps_pic_parameter_set_id: u8,
    pub pps_seq_parameter_set_id: u8,
    pub pps_mixed_nalu_types_in_pic_flag: bool,
    pub pps_pic_width_in_luma_samples: u64,
    pub pps_pic_height_in_luma_samples: u64,
    pub pps_conformance_window_flag: bool,
    pub conformance_window: Option<ConformanceWindow>,
    pub pps_scaling_window_explicit_signalling_flag: bool,
    pub scaling_window: Option<ScalingWindow>,
    pub pps_output_flag_present_flag: bool,
    pub pps_no_pic_partition_flag: bool,

    pub pps_subpic_id_mapping_present_flag: bool,
    pub pps_num_subpics_minus1: Option<u64>,
    pub pps_subpic_id_len_minus1: Option<u8>,
    pub pps_subpic_id: Vec<u32>,

    pub pps_log2_ctu_size_minus5: Option<u8>,
    pub pps_num_exp_tile_columns_minus1: Option<u64>,
    pub pps_num_exp_tile_rows_minus1: Option<u64>,
    pub pps_tile_column_width_minus1: Vec<u64>,
    pub pps_tile_row_height_minus1: Vec<u64>,
    pub pps_loop_filter_across_tiles_enabled_flag: Option<bool>,
    pub pps_rect_slice_flag: Option<bool>,
    pub pps_single_slice_per_subpic_flag: Option<bool>,
    pub pps_num_slices_in_pic_minus1: Option<u64>,
    pub pps_tile_idx_delta_present_flag: Option<bool>,
    pub rect_slices: Vec<RectSlice>,
    pub pps_loop_filter_across_slices_enabled_flag: Option<bool>,

    pub pps_cabac_init_present_flag: bool,
    pub pps_num_ref_idx_default_active_minus1: [u64; 2],
    pub pps_rpl1_idx_present_flag: bool,
    pub pps_weighted_pred_flag: bool,
    pub pps_weighted_bipred_flag: bool,
    pub pps_ref_wraparound_enabled_flag: bool,
    pub pps_pic_width_minus_wraparound_offset: Option<u64>,
    pub pps_init_qp_minus26: i64,
    pub pps_cu_qp_delta_enabled_flag: bool,

    pub pps_chroma_tool_offsets_present_flag: bool,
    pub chroma_tool_offsets: Option<ChromaToolOffsets>,

    pub pps_deblocking_filter_control_present_flag: bool,
    pub deblocking_filter_control: Option<DeblockingFilterControl>,

    pub pps_rpl_info_in_ph_flag: Option<bool>,
    pub pps_sao_info_in_ph_flag: Option<bool>,
    pub pps_alf_info_in_ph_flag: Option<bool>,
    pub pps_wp_info_in_ph_flag: Option<bool>,
    pub pps_qp_delta_info_in_ph_flag: Option<bool>,

    pub pps_picture_header_extension_present_flag: bool,
    pub pps_slice_header_extension_present_flag: bool,
    pub pps_extension_flag: bool,
    pub pps_extension_data_bits: usize,

    pub derived: PpsDerived,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ScalingWindow {
    pub left_offset: i64,
    pub right_offset: i64,
    pub top_offset: i64,
    pub bottom_offset: i64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ChromaToolOffsets {
    pub pps_cb_qp_offset: i64,
    pub pps_cr_qp_offset: i64,
    pub pps_joint_cbcr_qp_offset_present_flag: bool,
    pub pps_joint_cbcr_qp_offset_value: Option<i64>,
    pub pps_slice_chroma_qp_offsets_present_flag: bool,
    pub pps_cu_chroma_qp_offset_list_enabled_flag: bool,
    pub pps_chroma_qp_offset_list_len_minus1: Option<u64>,
    pub pps_cb_qp_offset_list: Vec<i64>,
    pub pps_cr_qp_offset_list: Vec<i64>,
    pub pps_joint_cbcr_qp_offset_list: Vec<i64>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DeblockingFilterControl {
    pub pps_deblocking_filter_override_enabled_flag: bool,
    pub pps_deblocking_filter_disabled_flag: bool,
    pub pps_dbf_info_in_ph_flag: Option<bool>,
    pub pps_luma_beta_offset_div2: Option<i64>,
    pub pps_luma_tc_offset_div2: Option<i64>,
    pub pps_cb_beta_offset_div2: Option<i64>,
    pub pps_cb_tc_offset_div2: Option<i64>,
    pub pps_cr_beta_offset_div2: Option<i64>,
    pub pps_cr_tc_offset_div2: Option<i64>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PpsDerived {
    /// Taken from the referenced SPS.
    pub ctb_log2_size_y: u8,
    pub pic_width_in_ctbs_y: u64,
    pub pic_height_in_ctbs_y: u64,
    pub tiles: TileLayout,
    pub num_slices_in_pic: u64,
    /// Empty unless rectangular slices are signalled explicitly.
    pub slices: SliceLayout,
}

impl Pps {
    pub fn parse(bs: &mut BitCursor, store: &ParameterSetStore) -> Result<Pps> {
        let mut pps = Pps {
            pps_pic_parameter_set_id: bs.u(6)? as u8,
            pps_seq_parameter_set_id: bs.u(4)? as u8,
            ..Default::default()
        };

        let sps = store.resolve_sps(pps.pps_seq_parameter_set_id)?;

        pps.pps_mixed_nalu_types_in_pic_flag = bs.flag()?;

        pps.pps_pic_width_in_luma_samples = ue_max(
            bs,
            "pps_pic_width_in_luma_samples",
            sps.sps_pic_width_max_in_luma_samples,
        )?;
        pps.pps_pic_height_in_luma_samples = ue_max(
            bs,
            "pps_pic_height_in_luma_samples",
            sps.sps_pic_height_max_in_luma_samples,
        )?;

        let ctb_log2_size_y = sps.derived.ctb_log2_size_y;
        let ctb_size_y = 1u64 << ctb_log2_size_y;

        pps.derived.ctb_log2_size_y = ctb_log2_size_y;
        pps.derived.pic_width_in_ctbs_y = pps.pps_pic_width_in_luma_samples.div_ceil(ctb_size_y);
        pps.derived.pic_height_in_ctbs_y = pps.pps_pic_height_in_luma_samples.div_ceil(ctb_size_y);

        pps.pps_conformance_window_flag = bs.flag()?;
        if pps.pps_conformance_window_flag {
            pps.conformance_window = Some(ConformanceWindow::parse(bs)?);
        }

        pps.pps_scaling_window_explicit_signalling_flag = bs.flag()?;
        if pps.pps_scaling_window_explicit_signalling_flag {
            pps.scaling_window = Some(ScalingWindow {
                left_offset: bs.se()?,
                right_offset: bs.se()?,
                top_offset: bs.se()?,
                bottom_offset: bs.se()?,
            });
        }

        pps.pps_output_flag_present_flag = bs.flag()?;
        pps.pps_no_pic_partition_flag = bs.flag()?;
        pps.pps_subpic_id_mapping_present_flag = bs.flag()?;

        let pic_size_in_ctbs = pps.derived.pic_width_in_ctbs_y * pps.derived.pic_height_in_ctbs_y;

        if pps.pps_subpic_id_mapping_present_flag {
            if !pps.pps_no_pic_partition_flag {
                pps.pps_num_subpics_minus1 = Some(ue_max(
                    bs,
                    "pps_num_subpics_minus1",
                    pic_size_in_ctbs.saturating_sub(1),
                )?);
            }

            let id_len_minus1 = ue_max(bs, "pps_subpic_id_len_minus1", MAX_SUBPIC_ID_LEN_MINUS1)?;
            pps.pps_subpic_id_len_minus1 = Some(id_len_minus1 as u8);

            for _ in 0..=pps.pps_num_subpics_minus1.unwrap_or(0) {
                pps.pps_subpic_id.push(bs.u(id_len_minus1 as u32 + 1)?);
            }
        }

        pps.derived.tiles = TileLayout::single(
            pps.derived.pic_width_in_ctbs_y,
            pps.derived.pic_height_in_ctbs_y,
        );
        pps.derived.num_slices_in_pic = 1;

        if !pps.pps_no_pic_partition_flag {
            pps.parse_partition(bs, sps.num_subpics() - 1)?;
        }

        pps.pps_cabac_init_present_flag = bs.flag()?;
        pps.pps_num_ref_idx_default_active_minus1 = [bs.ue()?, bs.ue()?];
        pps.pps_rpl1_idx_present_flag = bs.flag()?;
        pps.pps_weighted_pred_flag = bs.flag()?;
        pps.pps_weighted_bipred_flag = bs.flag()?;

        pps.pps_ref_wraparound_enabled_flag = bs.flag()?;
        if pps.pps_ref_wraparound_enabled_flag {
            pps.pps_pic_width_minus_wraparound_offset = Some(bs.ue()?);
        }

        pps.pps_init_qp_minus26 = bs.se()?;
        pps.pps_cu_qp_delta_enabled_flag = bs.flag()?;

        pps.pps_chroma_tool_offsets_present_flag = bs.flag()?;
        if pps.pps_chroma_tool_offsets_present_flag {
            pps.chroma_tool_offsets = Some(ChromaToolOffsets::parse(bs)?);
        }

        pps.pps_deblocking_filter_control_present_flag = bs.flag()?;
        if pps.pps_deblocking_filter_control_present_flag {
            pps.deblocking_filter_control = Some(DeblockingFilterControl::parse(
                bs,
                pps.pps_no_pic_partition_flag,
                pps.pps_chroma_tool_offsets_present_flag,
            )?);
        }

        if !pps.pps_no_pic_partition_flag {
            let rpl_info_in_ph = bs.flag()?;

            pps.pps_rpl_info_in_ph_flag = Some(rpl_info_in_ph);
            pps.pps_sao_info_in_ph_flag = Some(bs.flag()?);
            pps.pps_alf_info_in_ph_flag = Some(bs.flag()?);

            if (pps.pps_weighted_pred_flag || pps.pps_weighted_bipred_flag) && rpl_info_in_ph {
                pps.pps_wp_info_in_ph_flag = Some(bs.flag()?);
            }

            pps.pps_qp_delta_info_in_ph_flag = Some(bs.flag()?);
        }

        pps.pps_picture_header_extension_present_flag = bs.flag()?;
        pps.pps_slice_header_extension_present_flag = bs.flag()?;

        pps.pps_extension_flag = bs.flag()?;
        if pps.pps_extension_flag {
            pps.pps_extension_data_bits = extension_data_bits(bs)?;
        }

        rbsp_trailing_bits(bs)?;

        Ok(pps)
    }

    fn parse_partition(&mut self, bs: &mut BitCursor, sps_num_subpics_minus1: u64) -> Result<()> {
        let pic_width_in_ctbs = self.derived.pic_width_in_ctbs_y;
        let pic_height_in_ctbs = self.derived.pic_height_in_ctbs_y;

        let log2_ctu_size_minus5 = bs.u(2)? as u8;
        if log2_ctu_size_minus5 + 5 != self.derived.ctb_log2_size_y {
            return Err(ParseError::invalid("pps_log2_ctu_size_minus5", log2_ctu_size_minus5));
        }
        self.pps_log2_ctu_size_minus5 = Some(log2_ctu_size_minus5);

        let num_exp_tile_columns_minus1 = ue_max(
            bs,
            "pps_num_exp_tile_columns_minus1",
            pic_width_in_ctbs.saturating_sub(1),
        )?;
        let num_exp_tile_rows_minus1 = ue_max(
            bs,
            "pps_num_exp_tile_rows_minus1",
            pic_height_in_ctbs.saturating_sub(1),
        )?;

        self.pps_num_exp_tile_columns_minus1 = Some(num_exp_tile_columns_minus1);
        self.pps_num_exp_tile_rows_minus1 = Some(num_exp_tile_rows_minus1);

        for _ in 0..=num_exp_tile_columns_minus1 {
            self.pps_tile_column_width_minus1.push(bs.ue()?);
        }
        for _ in 0..=num_exp_tile_rows_minus1 {
            self.pps_tile_row_height_minus1.push(bs.ue()?);
        }

        self.derived.tiles = TileLayout::derive(
            pic_width_in_ctbs,
            pic_height_in_ctbs,
            &self.pps_tile_column_width_minus1,
            &self.pps_tile_row_height_minus1,
        )?;

        if self.derived.tiles.num_tiles_in_pic() > 1 {
            self.pps_loop_filter_across_tiles_enabled_flag = Some(bs.flag()?);
            self.pps_rect_slice_flag = Some(bs.flag()?);
        }

        let rect_slice = self.rect_slice();
        if rect_slice {
            self.pps_single_slice_per_subpic_flag = Some(bs.flag()?);
        }

        let single_slice_per_subpic = self.pps_single_slice_per_subpic_flag.unwrap_or(false);

        if rect_slice && !single_slice_per_subpic {
            let pic_size_in_ctbs = pic_width_in_ctbs * pic_height_in_ctbs;
            let num_slices_in_pic_minus1 = ue_max(
                bs,
                "pps_num_slices_in_pic_minus1",
                pic_size_in_ctbs.saturating_sub(1),
            )?;
            self.pps_num_slices_in_pic_minus1 = Some(num_slices_in_pic_minus1);

            if num_slices_in_pic_minus1 > 1 {
                self.pps_tile_idx_delta_present_flag = Some(bs.flag()?);
            }

            let (slices, layout) = parse_rect_slices(
                bs,
                &self.derived.tiles,
                num_slices_in_pic_minus1,
                self.pps_tile_idx_delta_present_flag.unwrap_or(false),
            )?;

            self.rect_slices = slices;
            self.derived.slices = layout;
            self.derived.num_slices_in_pic = num_slices_in_pic_minus1 + 1;
        } else if single_slice_per_subpic {
            self.derived.num_slices_in_pic = sps_num_subpics_minus1 + 1;
        }

        let num_slices_in_pic_minus1 = self.derived.num_slices_in_pic - 1;
        if !rect_slice || single_slice_per_subpic || num_slices_in_pic_minus1 > 0 {
            self.pps_loop_filter_across_slices_enabled_flag = Some(bs.flag()?);
        }

        Ok(())
    }

    /// Inferred set when not signalled.
    pub fn rect_slice(&self) -> bool {
        self.pps_rect_slice_flag.unwrap_or(true)
    }

    pub fn num_tiles_in_pic(&self) -> usize {
        self.derived.tiles.num_tiles_in_pic()
    }
}

impl ChromaToolOffsets {
    fn parse(bs: &mut BitCursor) -> Result<ChromaToolOffsets> {
        let mut offsets = ChromaToolOffsets {
            pps_cb_qp_offset: bs.se()?,
            pps_cr_qp_offset: bs.se()?,
            pps_joint_cbcr_qp_offset_present_flag: bs.flag()?,
            ..Default::default()
        };

        if offsets.pps_joint_cbcr_qp_offset_present_flag {
            offsets.pps_joint_cbcr_qp_offset_value = Some(bs.se()?);
        }

        offsets.pps_slice_chroma_qp_offsets_present_flag = bs.flag()?;
        offsets.pps_cu_chroma_qp_offset_list_enabled_flag = bs.flag()?;

        if offsets.pps_cu_chroma_qp_offset_list_enabled_flag {
            let len_minus1 = ue_max(
                bs,
                "pps_chroma_qp_offset_list_len_minus1",
                MAX_CHROMA_QP_OFFSET_LIST_LEN_MINUS1,
            )?;
            offsets.pps_chroma_qp_offset_list_len_minus1 = Some(len_minus1);

            for _ in 0..=len_minus1 {
                offsets.pps_cb_qp_offset_list.push(bs.se()?);
                offsets.pps_cr_qp_offset_list.push(bs.se()?);

                if offsets.pps_joint_cbcr_qp_offset_present_flag {
                    offsets.pps_joint_cbcr_qp_offset_list.push(bs.se()?);
                }
            }
        }

        Ok(offsets)
    }
}

impl DeblockingFilterControl {
    fn parse(
        bs: &mut BitCursor,
        no_pic_partition: bool,
        chroma_tool_offsets_present: bool,
    ) -> Result<DeblockingFilterControl> {
        let mut dbf = DeblockingFilterControl {
            pps_deblocking_filter_override_enabled_flag: bs.flag()?,
            pps_deblocking_filter_disabled_flag: bs.flag()?,
            ..Default::default()
        };

        if !no_pic_partition && dbf.pps_deblocking_filter_override_enabled_flag {
            dbf.pps_dbf_info_in_ph_flag = Some(bs.flag()?);
        }

        if !dbf.pps_deblocking_filter_disabled_flag {
            dbf.pps_luma_beta_offset_div2 = Some(bs.se()?);
            dbf.pps_luma_tc_offset_div2 = Some(bs.se()?);

            if chroma_tool_offsets_present {
                dbf.pps_cb_beta_offset_div2 = Some(bs.se()?);
                dbf.pps_cb_tc_offset_div2 = Some(bs.se()?);
                dbf.pps_cr_beta_offset_div2 = Some(bs.se()?);
                dbf.pps_cr_tc_offset_div2 = Some(bs.se()?);
            }
        }

        Ok(dbf)
    }
}
