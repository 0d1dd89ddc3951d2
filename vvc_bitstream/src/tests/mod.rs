//! Bitstream builders shared by the unit tests.

mod pps;
mod vps;

use crate::bits::BitVecWriter;
use crate::utils::add_start_code_emulation_prevention_3_byte;
use crate::vvc::NalUnitType;

/// Escaped NAL unit preceded by a four-byte start code.
pub fn nal_unit(nal_type: NalUnitType, nuh_layer_id: u8, rbsp: &[u8]) -> Vec<u8> {
    let mut data = vec![0, 0, 0, 1, nuh_layer_id & 0x3F, ((nal_type as u8) << 3) | 1];
    data.extend(add_start_code_emulation_prevention_3_byte(rbsp));

    data
}

/// Concatenates units, returning the stream and the offset of each header.
pub fn stream(units: &[Vec<u8>]) -> (Vec<u8>, Vec<usize>) {
    let mut data = Vec::new();
    let mut offsets = Vec::new();

    for unit in units {
        offsets.push(data.len() + 4);
        data.extend_from_slice(unit);
    }

    (data, offsets)
}

/// Main 10 profile, no constraint info, no sublayers.
pub fn write_ptl(w: &mut BitVecWriter, level_idc: u8) {
    w.write_n(1, 7); // general_profile_idc
    w.write(false); // general_tier_flag
    w.write_n(level_idc as u64, 8);
    w.write(true); // ptl_frame_only_constraint_flag
    w.write(false); // ptl_multilayer_enabled_flag
    w.write(false); // gci_present_flag
    w.byte_align();
    w.write_n(0, 8); // ptl_num_sub_profiles
}

pub fn single_layer_vps(vps_id: u8) -> Vec<u8> {
    let mut w = BitVecWriter::new();

    w.write_n(vps_id as u64, 4);
    w.write_n(0, 6); // vps_max_layers_minus1
    w.write_n(0, 3); // vps_max_sublayers_minus1
    w.write_n(0, 6); // vps_layer_id[0]
    w.byte_align();
    write_ptl(&mut w, 51);
    w.write(false); // vps_extension_flag
    w.write_rbsp_trailing_bits();

    w.into_inner()
}

/// Three dependent layers, two output layer sets signalled explicitly,
/// one DPB and HRD parameter set.
pub fn multi_layer_vps(vps_id: u8) -> Vec<u8> {
    let mut w = BitVecWriter::new();

    w.write_n(vps_id as u64, 4);
    w.write_n(2, 6); // vps_max_layers_minus1
    w.write_n(0, 3); // vps_max_sublayers_minus1
    w.write(false); // vps_all_independent_layers_flag

    // layer 0
    w.write_n(0, 6);
    // layer 1, predicted from layer 0
    w.write_n(1, 6);
    w.write(false); // vps_independent_layer_flag
    w.write(false); // vps_max_tid_ref_present_flag
    w.write(true); // vps_direct_ref_layer_flag[1][0]
    // layer 2, predicted from layer 1
    w.write_n(2, 6);
    w.write(false);
    w.write(true);
    w.write(false); // [2][0]
    w.write(true); // [2][1]
    w.write_n(1, 3); // vps_max_tid_il_ref_pics_plus1[2][1]

    w.write_n(2, 2); // vps_ols_mode_idc
    w.write_n(1, 8); // vps_num_output_layer_sets_minus2
    for flags in [[false, true, false], [false, false, true]] {
        flags.iter().for_each(|f| w.write(*f));
    }
    w.write_n(0, 8); // vps_num_ptls_minus1

    w.byte_align();
    write_ptl(&mut w, 83);

    w.write_ue(0); // vps_num_dpb_params_minus1
    w.write_ue(4);
    w.write_ue(0);
    w.write_ue(0);

    for _ in 0..2 {
        w.write_ue(1920);
        w.write_ue(1080);
        w.write_n(1, 2);
        w.write_ue(2);
    }

    w.write(true); // vps_timing_hrd_params_present_flag
    w.write_n(1001, 32);
    w.write_n(60000, 32);
    w.write(true); // general_nal_hrd_params_present_flag
    w.write(false); // general_vcl_hrd_params_present_flag
    w.write(true); // general_same_pic_timing_in_all_ols_flag
    w.write(false); // general_du_hrd_params_present_flag
    w.write_n(2, 4); // bit_rate_scale
    w.write_n(3, 4); // cpb_size_scale
    w.write_ue(0); // hrd_cpb_cnt_minus1
    w.write_ue(0); // vps_num_ols_timing_hrd_params_minus1
    w.write(true); // fixed_pic_rate_general_flag
    w.write_ue(0); // elemental_duration_in_tc_minus1
    w.write_ue(100); // bit_rate_value_minus1
    w.write_ue(200); // cpb_size_value_minus1
    w.write(false); // cbr_flag

    w.write(false); // vps_extension_flag
    w.write_rbsp_trailing_bits();

    w.into_inner()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpsOptions {
    pub sps_id: u8,
    pub vps_id: u8,
    pub two_subpics: bool,
    pub long_term_refs: bool,
}

/// 1920x1080 4:2:0 10-bit with 128x128 CTUs.
pub fn sps_rbsp(opts: SpsOptions) -> Vec<u8> {
    let mut w = BitVecWriter::new();

    w.write_n(opts.sps_id as u64, 4);
    w.write_n(opts.vps_id as u64, 4);
    w.write_n(0, 3); // sps_max_sublayers_minus1
    w.write_n(1, 2); // sps_chroma_format_idc
    w.write_n(2, 2); // sps_log2_ctu_size_minus5
    w.write(true); // sps_ptl_dpb_hrd_params_present_flag
    write_ptl(&mut w, 51);

    w.write(false); // sps_gdr_enabled_flag
    w.write(false); // sps_ref_pic_resampling_enabled_flag
    w.write_ue(1920);
    w.write_ue(1080);
    w.write(true); // sps_conformance_window_flag
    [0, 0, 0, 4].iter().for_each(|v| w.write_ue(*v));

    w.write(opts.two_subpics);
    if opts.two_subpics {
        w.write_ue(1); // sps_num_subpics_minus1
        w.write(false); // sps_independent_subpics_flag
        w.write(false); // sps_subpic_same_size_flag

        // Left half
        w.write_n(6, 4); // sps_subpic_width_minus1
        w.write_n(8, 4); // sps_subpic_height_minus1
        w.write(true);
        w.write(false);

        // Right half
        w.write_n(7, 4); // sps_subpic_ctu_top_left_x
        w.write_n(0, 4); // sps_subpic_ctu_top_left_y
        w.write(true);
        w.write(false);

        w.write_ue(3); // sps_subpic_id_len_minus1
        w.write(true); // sps_subpic_id_mapping_explicitly_signalled_flag
        w.write(true); // sps_subpic_id_mapping_present_flag
        w.write_n(5, 4);
        w.write_n(9, 4);
    }

    w.write_ue(2); // sps_bitdepth_minus8
    w.write(false); // sps_entropy_coding_sync_enabled_flag
    w.write(true); // sps_entry_point_offsets_present_flag
    w.write_n(4, 4); // sps_log2_max_pic_order_cnt_lsb_minus4
    w.write(false); // sps_poc_msb_cycle_flag
    w.write_n(0, 2); // sps_num_extra_ph_bytes
    w.write_n(0, 2); // sps_num_extra_sh_bytes

    // dpb_parameters
    w.write_ue(5);
    w.write_ue(2);
    w.write_ue(0);

    w.write_ue(0); // sps_log2_min_luma_coding_block_size_minus2
    w.write(true); // sps_partition_constraints_override_enabled_flag
    [1, 2, 2, 1].iter().for_each(|v| w.write_ue(*v)); // intra luma
    w.write(true); // sps_qtbtt_dual_tree_intra_flag
    [1, 1, 1, 0].iter().for_each(|v| w.write_ue(*v)); // intra chroma
    [1, 3, 3, 2].iter().for_each(|v| w.write_ue(*v)); // inter

    w.write(true); // sps_max_luma_transform_size_64_flag
    w.write(true); // sps_transform_skip_enabled_flag
    w.write_ue(3);
    w.write(true); // sps_bdpcm_enabled_flag
    w.write(true); // sps_mts_enabled_flag
    w.write(true);
    w.write(true);
    w.write(true); // sps_lfnst_enabled_flag

    w.write(true); // sps_joint_cbcr_enabled_flag
    w.write(true); // sps_same_qp_table_for_chroma_flag
    w.write_se(-9); // sps_qp_table_start_minus26
    w.write_ue(1); // sps_num_points_in_qp_table_minus1
    [16, 1, 10, 2].iter().for_each(|v| w.write_ue(*v));

    w.write(true); // sps_sao_enabled_flag
    w.write(true); // sps_alf_enabled_flag
    w.write(true); // sps_ccalf_enabled_flag
    w.write(true); // sps_lmcs_enabled_flag
    w.write(false); // sps_weighted_pred_flag
    w.write(false); // sps_weighted_bipred_flag
    w.write(opts.long_term_refs);
    if opts.vps_id > 0 {
        w.write(false); // sps_inter_layer_prediction_enabled_flag
    }
    w.write(false); // sps_idr_rpl_present_flag
    w.write(true); // sps_rpl1_same_as_rpl0_flag
    w.write_ue(1); // sps_num_ref_pic_lists[0]

    // ref_pic_list_struct(0, 0)
    w.write_ue(2);
    if opts.long_term_refs {
        w.write(false); // ltrp_in_header_flag
        w.write(true); // st_ref_pic_flag
        w.write_ue(0);
        w.write(false);
        w.write(false); // st_ref_pic_flag
        w.write_n(17, 8); // rpls_poc_lsb_lt
    } else {
        w.write_ue(0);
        w.write(false);
        w.write_ue(1);
        w.write(true);
    }

    w.write(false); // sps_ref_wraparound_enabled_flag
    w.write(true); // sps_temporal_mvp_enabled_flag
    w.write(true); // sps_sbtmvp_enabled_flag
    w.write(true); // sps_amvr_enabled_flag
    w.write(true); // sps_bdof_enabled_flag
    w.write(false);
    w.write(true); // sps_smvd_enabled_flag
    w.write(true); // sps_dmvr_enabled_flag
    w.write(false);
    w.write(true); // sps_mmvd_enabled_flag
    w.write(false);
    w.write_ue(0); // sps_six_minus_max_num_merge_cand
    w.write(true); // sps_sbt_enabled_flag
    w.write(true); // sps_affine_enabled_flag
    w.write_ue(0);
    w.write(true); // sps_6param_affine_enabled_flag
    w.write(true); // sps_affine_amvr_enabled_flag
    w.write(true); // sps_affine_prof_enabled_flag
    w.write(false);
    w.write(true); // sps_bcw_enabled_flag
    w.write(true); // sps_ciip_enabled_flag
    w.write(true); // sps_gpm_enabled_flag
    w.write_ue(1);
    w.write_ue(0); // sps_log2_parallel_merge_level_minus2

    w.write(true); // sps_isp_enabled_flag
    w.write(true); // sps_mrl_enabled_flag
    w.write(true); // sps_mip_enabled_flag
    w.write(true); // sps_cclm_enabled_flag
    w.write(true); // sps_chroma_horizontal_collocated_flag
    w.write(false); // sps_chroma_vertical_collocated_flag
    w.write(false); // sps_palette_enabled_flag
    w.write_ue(2); // sps_min_qp_prime_ts
    w.write(false); // sps_ibc_enabled_flag
    w.write(false); // sps_ladf_enabled_flag
    w.write(false); // sps_explicit_scaling_list_enabled_flag
    w.write(true); // sps_dep_quant_enabled_flag
    w.write(false); // sps_sign_data_hiding_enabled_flag
    w.write(false); // sps_virtual_boundaries_enabled_flag
    w.write(false); // sps_timing_hrd_params_present_flag
    w.write(false); // sps_field_seq_flag

    w.write(true); // sps_vui_parameters_present_flag
    w.write_ue(5); // sps_vui_payload_size_minus1
    w.byte_align();
    w.write(true); // vui_progressive_source_flag
    w.write(false);
    w.write(false);
    w.write(false);
    w.write(true); // vui_aspect_ratio_info_present_flag
    w.write(true);
    w.write_n(1, 8);
    w.write(false); // vui_overscan_info_present_flag
    w.write(true); // vui_colour_description_present_flag
    w.write_n(9, 8);
    w.write_n(16, 8);
    w.write_n(9, 8);
    w.write(false);
    w.write(false); // vui_chroma_loc_info_present_flag
    w.write(true); // vui_payload_bit_equal_to_one
    w.byte_align();

    w.write(false); // sps_extension_flag
    w.write_rbsp_trailing_bits();

    w.into_inner()
}

fn write_pps_tail(w: &mut BitVecWriter, no_pic_partition: bool) {
    w.write(false); // pps_cabac_init_present_flag
    w.write_ue(0);
    w.write_ue(0);
    w.write(false); // pps_rpl1_idx_present_flag
    w.write(false); // pps_weighted_pred_flag
    w.write(false); // pps_weighted_bipred_flag
    w.write(false); // pps_ref_wraparound_enabled_flag
    w.write_se(0); // pps_init_qp_minus26
    w.write(true); // pps_cu_qp_delta_enabled_flag

    w.write(true); // pps_chroma_tool_offsets_present_flag
    w.write_se(-1); // pps_cb_qp_offset
    w.write_se(1); // pps_cr_qp_offset
    w.write(false); // pps_joint_cbcr_qp_offset_present_flag
    w.write(false); // pps_slice_chroma_qp_offsets_present_flag
    w.write(false); // pps_cu_chroma_qp_offset_list_enabled_flag

    w.write(true); // pps_deblocking_filter_control_present_flag
    w.write(false); // pps_deblocking_filter_override_enabled_flag
    w.write(false); // pps_deblocking_filter_disabled_flag
    for _ in 0..6 {
        w.write_se(0);
    }

    if !no_pic_partition {
        w.write(true); // pps_rpl_info_in_ph_flag
        w.write(false); // pps_sao_info_in_ph_flag
        w.write(false); // pps_alf_info_in_ph_flag
        w.write(false); // pps_qp_delta_info_in_ph_flag
    }

    w.write(false); // pps_picture_header_extension_present_flag
    w.write(false); // pps_slice_header_extension_present_flag
    w.write(false); // pps_extension_flag
    w.write_rbsp_trailing_bits();
}

/// Whole picture as one tile and one slice.
pub fn single_tile_pps(pps_id: u8, sps_id: u8) -> Vec<u8> {
    sized_pps(pps_id, sps_id, 1920, 1080)
}

pub fn sized_pps(pps_id: u8, sps_id: u8, width: u64, height: u64) -> Vec<u8> {
    let mut w = BitVecWriter::new();

    w.write_n(pps_id as u64, 6);
    w.write_n(sps_id as u64, 4);
    w.write(false); // pps_mixed_nalu_types_in_pic_flag
    w.write_ue(width);
    w.write_ue(height);
    w.write(false); // pps_conformance_window_flag
    w.write(false); // pps_scaling_window_explicit_signalling_flag
    w.write(false); // pps_output_flag_present_flag
    w.write(true); // pps_no_pic_partition_flag
    w.write(false); // pps_subpic_id_mapping_present_flag

    write_pps_tail(&mut w, true);

    w.into_inner()
}

/// 4x3 tiles over a 15x9 CTB picture, six rectangular slices:
///
/// ```text
/// | s0 s0 | s1 s1 |
/// | s0 s0 | s1 s1 |
/// | s2-s4 | s5 s5 s5 |
/// ```
pub fn tiled_pps(pps_id: u8, sps_id: u8) -> Vec<u8> {
    let mut w = BitVecWriter::new();

    w.write_n(pps_id as u64, 6);
    w.write_n(sps_id as u64, 4);
    w.write(false);
    w.write_ue(1920);
    w.write_ue(1080);
    w.write(false);
    w.write(false);
    w.write(false);
    w.write(false); // pps_no_pic_partition_flag
    w.write(false);

    w.write_n(2, 2); // pps_log2_ctu_size_minus5
    w.write_ue(1); // pps_num_exp_tile_columns_minus1
    w.write_ue(0); // pps_num_exp_tile_rows_minus1
    w.write_ue(3);
    w.write_ue(4);
    w.write_ue(2);
    w.write(true); // pps_loop_filter_across_tiles_enabled_flag
    w.write(true); // pps_rect_slice_flag
    w.write(false); // pps_single_slice_per_subpic_flag
    w.write_ue(5); // pps_num_slices_in_pic_minus1
    w.write(false); // pps_tile_idx_delta_present_flag

    // slice 0: 2x2 tiles
    w.write_ue(1);
    w.write_ue(1);
    // slice 1: 2 tiles wide, height inherited
    w.write_ue(1);
    // slices 2 to 4: one tile split into CTU rows
    w.write_ue(0);
    w.write_ue(1); // pps_num_exp_slices_in_tile
    w.write_ue(0);

    w.write(false); // pps_loop_filter_across_slices_enabled_flag

    write_pps_tail(&mut w, false);

    w.into_inner()
}
