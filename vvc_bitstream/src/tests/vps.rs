use anyhow::Result;

use super::{multi_layer_vps, single_layer_vps};
use crate::bits::BitCursor;
use crate::vvc::vps::Vps;
use crate::ParseError;

#[test]
fn single_layer() -> Result<()> {
    let rbsp = single_layer_vps(1);
    let vps = Vps::parse(&mut BitCursor::new(&rbsp))?;

    assert_eq!(vps.vps_video_parameter_set_id, 1);
    assert_eq!(vps.num_layers(), 1);
    assert!(vps.each_layer_is_an_ols());
    assert!(vps.all_independent_layers());
    assert_eq!(vps.vps_num_ptls_minus1, None);
    assert_eq!(vps.num_ptls(), 1);

    assert_eq!(vps.derived.total_num_olss, 1);
    assert_eq!(vps.derived.num_layers_in_ols, vec![1]);
    assert_eq!(vps.derived.num_multi_layer_olss, 0);
    assert!(vps.dpb_parameters.is_empty());

    let ptl = &vps.profile_tier_level[0];
    assert_eq!(ptl.general_profile_idc, Some(1));
    assert_eq!(ptl.general_level_idc, 51);
    assert!(ptl.ptl_frame_only_constraint_flag);

    Ok(())
}

#[test]
fn explicit_output_layer_sets() -> Result<()> {
    let rbsp = multi_layer_vps(2);
    let vps = Vps::parse(&mut BitCursor::new(&rbsp))?;

    assert_eq!(vps.num_layers(), 3);
    assert!(!vps.each_layer_is_an_ols());
    assert_eq!(vps.ols_mode_idc(), 2);
    assert_eq!(vps.vps_max_tid_il_ref_pics_plus1[2][1], Some(1));

    let derived = &vps.derived;
    assert_eq!(derived.num_direct_ref_layers, vec![0, 1, 1]);
    assert_eq!(derived.num_ref_layers, vec![0, 1, 2]);
    assert_eq!(derived.reference_layer_idx[2], vec![0, 1]);

    assert_eq!(derived.total_num_olss, 3);
    assert_eq!(derived.num_layers_in_ols, vec![1, 2, 3]);
    assert_eq!(derived.num_output_layers_in_ols, vec![1, 1, 1]);
    assert_eq!(derived.num_multi_layer_olss, 2);
    assert_eq!(derived.vps_num_dpb_params, 1);

    assert_eq!(vps.dpb_parameters[0].max_dec_pic_buffering(), Some(5));
    assert_eq!(vps.vps_ols_dpb.len(), 2);
    assert_eq!(vps.vps_ols_dpb[1].vps_ols_dpb_pic_width, 1920);
    assert_eq!(vps.vps_ols_dpb[1].vps_ols_dpb_params_idx, None);

    let general = vps.general_timing_hrd_parameters.as_ref().unwrap();
    assert_eq!(general.time_scale, 60000);
    assert_eq!(general.cpb_cnt(), 1);

    let ols_hrd = &vps.ols_timing_hrd_parameters[0];
    let nal_hrd = ols_hrd.sublayers[0].nal_sublayer_hrd_parameters.as_ref().unwrap();
    assert_eq!(nal_hrd.cpbs[0].bit_rate_value_minus1, 100);
    assert_eq!(nal_hrd.cpbs[0].cpb_size_value_minus1, 200);
    assert!(vps.vps_ols_timing_hrd_idx.is_empty());

    Ok(())
}

#[test]
fn missing_trailing_bits() {
    let mut rbsp = single_layer_vps(0);
    // Extension flag and stop bit share the last byte
    *rbsp.last_mut().unwrap() = 0x00;

    let res = Vps::parse(&mut BitCursor::new(&rbsp));
    assert_eq!(
        res,
        Err(ParseError::InvalidValue {
            field: "rbsp_stop_one_bit",
            value: 0
        })
    );
}
