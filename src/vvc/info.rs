use std::io::{stdout, Write};

use anyhow::Result;

use vvc_bitstream::vvc::pps::Pps;
use vvc_bitstream::vvc::sps::Sps;
use vvc_bitstream::vvc::vps::Vps;
use vvc_bitstream::{NalOutcome, NalReport, ParameterSet, ParameterSetStore};

use super::{input_from_either, parse_vvc_file};
use crate::commands::InfoArgs;

pub struct VvcInfo;

impl VvcInfo {
    pub fn info(args: InfoArgs) -> Result<()> {
        let InfoArgs {
            input,
            input_pos,
            json,
        } = args;

        let input = input_from_either("info", input, input_pos)?;

        if !json {
            println!("Parsing VVC file...");
            stdout().flush().ok();
        }

        let (reports, store) = parse_vvc_file(&input)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            print_units(&reports);
            print_summary(&reports, &store);
        }

        Ok(())
    }
}

fn print_units(reports: &[NalReport]) {
    println!("NAL units: {}", reports.len());

    for report in reports {
        let location = format!("  offset {}, length {}", report.offset, report.length);

        let header = match &report.header {
            Some(h) => format!(
                "{}, layer {}, tid {}",
                h.nal_unit_type,
                h.nuh_layer_id,
                h.temporal_id()
            ),
            None => String::from("no header"),
        };

        let outcome = match &report.outcome {
            NalOutcome::Parsed(set) => format!("{} {}", set.kind(), set.id()),
            NalOutcome::Skipped(_) => String::from("skipped"),
            NalOutcome::Failed(e) => format!("failed ({}): {}", e.kind(), e),
        };

        println!("{location}: {header}: {outcome}");
    }
}

fn print_summary(reports: &[NalReport], store: &ParameterSetStore) {
    let count = |f: fn(&NalReport) -> bool| reports.iter().filter(|r| f(r)).count();

    println!("\nSummary:");
    println!("  Parsed: {}", count(NalReport::is_parsed));
    println!(
        "  Skipped: {}",
        count(|r| matches!(r.outcome, NalOutcome::Skipped(_)))
    );
    println!("  Failed: {}", count(NalReport::is_failed));

    for set in store.sorted() {
        let description = match set {
            ParameterSet::Vps(vps) => describe_vps(vps),
            ParameterSet::Sps(sps) => describe_sps(sps),
            ParameterSet::Pps(pps) => describe_pps(pps),
        };

        println!("  {} {}: {}", set.kind(), set.id(), description);
    }
}

fn describe_vps(vps: &Vps) -> String {
    format!(
        "{} layer(s), {} sublayer(s), {} OLS(s)",
        vps.num_layers(),
        vps.vps_max_sublayers_minus1 + 1,
        vps.derived.total_num_olss
    )
}

fn describe_sps(sps: &Sps) -> String {
    let chroma_format = match sps.sps_chroma_format_idc {
        0 => "4:0:0",
        1 => "4:2:0",
        2 => "4:2:2",
        _ => "4:4:4",
    };

    let mut description = format!(
        "{}x{}, {} {}-bit, CTB {}",
        sps.sps_pic_width_max_in_luma_samples,
        sps.sps_pic_height_max_in_luma_samples,
        chroma_format,
        sps.bit_depth(),
        sps.derived.ctb_size_y
    );

    if let Some(ptl) = &sps.profile_tier_level {
        description.push_str(&format!(
            ", profile {}, level {}",
            ptl.general_profile_idc.unwrap_or(0),
            ptl.general_level_idc
        ));
    }

    if sps.num_subpics() > 1 {
        description.push_str(&format!(", {} subpictures", sps.num_subpics()));
    }

    description
}

fn describe_pps(pps: &Pps) -> String {
    format!(
        "{}x{}, SPS {}, {} tile(s), {} slice(s)",
        pps.pps_pic_width_in_luma_samples,
        pps.pps_pic_height_in_luma_samples,
        pps.pps_seq_parameter_set_id,
        pps.num_tiles_in_pic(),
        pps.derived.num_slices_in_pic
    )
}
