use anyhow::Result;

use super::{nal_unit, single_tile_pps, sized_pps, sps_rbsp, tiled_pps, SpsOptions};
use crate::bits::{BitCursor, BitVecWriter};
use crate::vvc::pic_partition::{parse_rect_slices, RectSlice, TileLayout};
use crate::vvc::pps::Pps;
use crate::vvc::NalUnitType;
use crate::{ParameterSetStore, ParseError, VvcBitstream};

fn store_with_sps() -> ParameterSetStore {
    let mut parser = VvcBitstream::new();
    let reports = parser.parse_stream(&nal_unit(
        NalUnitType::SpsNut,
        0,
        &sps_rbsp(SpsOptions::default()),
    ));
    assert!(reports[0].is_parsed());

    parser.into_store()
}

#[test]
fn single_tile() -> Result<()> {
    let rbsp = single_tile_pps(3, 0);
    let pps = Pps::parse(&mut BitCursor::new(&rbsp), &store_with_sps())?;

    assert_eq!(pps.pps_pic_parameter_set_id, 3);
    assert!(pps.pps_no_pic_partition_flag);
    assert_eq!(pps.pps_rect_slice_flag, None);
    assert!(pps.rect_slice());
    assert_eq!(pps.num_tiles_in_pic(), 1);
    assert_eq!(pps.derived.num_slices_in_pic, 1);
    assert_eq!(pps.derived.tiles.col_width_val, vec![15]);
    assert_eq!(pps.pps_rpl_info_in_ph_flag, None);

    let offsets = pps.chroma_tool_offsets.as_ref().unwrap();
    assert_eq!(offsets.pps_cb_qp_offset, -1);
    assert_eq!(offsets.pps_cr_qp_offset, 1);

    let dbf = pps.deblocking_filter_control.as_ref().unwrap();
    assert_eq!(dbf.pps_dbf_info_in_ph_flag, None);
    assert_eq!(dbf.pps_cr_tc_offset_div2, Some(0));

    Ok(())
}

#[test]
fn tiles_and_rect_slices() -> Result<()> {
    let rbsp = tiled_pps(0, 0);
    let pps = Pps::parse(&mut BitCursor::new(&rbsp), &store_with_sps())?;

    let tiles = &pps.derived.tiles;
    assert_eq!(tiles.col_width_val, vec![4, 5, 5, 1]);
    assert_eq!(tiles.row_height_val, vec![3, 3, 3]);
    assert_eq!(pps.num_tiles_in_pic(), 12);

    assert_eq!(pps.pps_num_slices_in_pic_minus1, Some(5));
    assert_eq!(pps.pps_tile_idx_delta_present_flag, Some(false));
    assert_eq!(pps.derived.num_slices_in_pic, 6);

    let slices = &pps.derived.slices;
    assert_eq!(slices.slice_top_left_tile_idx, vec![0, 2, 8, 8, 8, 9]);
    assert_eq!(slices.num_slices_in_tile, vec![1, 1, 3, 0, 0, 1]);

    // Height inherited from the previous slice
    assert_eq!(pps.rect_slices[1].pps_slice_height_in_tiles_minus1, None);
    assert_eq!(pps.rect_slices[2].pps_num_exp_slices_in_tile, Some(1));

    assert_eq!(pps.pps_loop_filter_across_slices_enabled_flag, Some(false));
    assert_eq!(pps.pps_rpl_info_in_ph_flag, Some(true));
    assert_eq!(pps.pps_wp_info_in_ph_flag, None);

    Ok(())
}

#[test]
fn larger_than_sps() {
    let rbsp = sized_pps(0, 0, 3840, 1080);

    let res = Pps::parse(&mut BitCursor::new(&rbsp), &store_with_sps());
    assert_eq!(
        res,
        Err(ParseError::InvalidValue {
            field: "pps_pic_width_in_luma_samples",
            value: 3840
        })
    );
}

fn tile_grid() -> TileLayout {
    TileLayout::derive(15, 9, &[3, 4], &[2]).unwrap()
}

#[test]
fn explicit_tile_index_deltas() -> Result<()> {
    let mut w = BitVecWriter::new();

    for delta in [5, 6] {
        w.write_ue(0);
        w.write_ue(0);
        w.write_ue(0); // pps_num_exp_slices_in_tile
        w.write_se(delta);
    }

    let data = w.into_inner();
    let mut bs = BitCursor::new(&data);
    let (slices, layout) = parse_rect_slices(&mut bs, &tile_grid(), 2, true)?;

    assert_eq!(layout.slice_top_left_tile_idx, vec![0, 5, 11]);
    assert_eq!(slices[1].pps_tile_idx_delta_val, Some(6));
    assert_eq!(slices[2], RectSlice::default());

    Ok(())
}

#[test]
fn tile_index_delta_before_first_tile() {
    let mut w = BitVecWriter::new();
    w.write_ue(0);
    w.write_ue(0);
    w.write_ue(0);
    w.write_se(-1);

    let data = w.into_inner();
    let res = parse_rect_slices(&mut BitCursor::new(&data), &tile_grid(), 2, true);

    assert_eq!(
        res,
        Err(ParseError::InvalidValue {
            field: "pps_tile_idx_delta_val",
            value: -1
        })
    );
}

#[test]
fn tile_index_delta_past_last_tile() {
    let mut w = BitVecWriter::new();
    w.write_ue(0);
    w.write_ue(0);
    w.write_ue(0);
    w.write_se(20);

    let data = w.into_inner();
    let res = parse_rect_slices(&mut BitCursor::new(&data), &tile_grid(), 2, true);

    assert_eq!(
        res,
        Err(ParseError::InvalidValue {
            field: "SliceTopLeftTileIdx",
            value: 20
        })
    );
}

#[test]
fn truncated_slice_loop() {
    let mut w = BitVecWriter::new();

    w.write_n(0, 6); // pps_pic_parameter_set_id
    w.write_n(0, 4); // pps_seq_parameter_set_id
    w.write(false);
    w.write_ue(1920);
    w.write_ue(1080);
    w.write(false);
    w.write(false);
    w.write(false);
    w.write(false); // pps_no_pic_partition_flag
    w.write(false);

    // One CTB per tile, 15x9 tiles
    w.write_n(2, 2);
    w.write_ue(0);
    w.write_ue(0);
    w.write_ue(0);
    w.write_ue(0);
    w.write(true);
    w.write(true); // pps_rect_slice_flag
    w.write(false);
    w.write_ue(134); // pps_num_slices_in_pic_minus1
    w.write(false);

    // First slice only, then the unit ends
    w.write_ue(0);
    w.write_ue(0);

    let rbsp = w.into_inner();
    let res = Pps::parse(&mut BitCursor::new(&rbsp), &store_with_sps());

    assert!(matches!(res, Err(ParseError::OutOfData { .. })));
}

#[test]
fn slice_count_beyond_carried_syntax() {
    // No slice syntax at all for a count that could never be allocated
    let res = parse_rect_slices(&mut BitCursor::new(&[]), &tile_grid(), 1 << 40, false);

    assert!(matches!(res, Err(ParseError::OutOfData { .. })));
}
