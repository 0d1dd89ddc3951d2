#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bits::{BitCursor, SyntaxDecoder};
use crate::error::Result;

use super::ue_max;

/// `MaxDpbSize + 13` for the largest DPB any level allows.
const MAX_NUM_REF_ENTRIES: u64 = 29;

/// SPS state that `ref_pic_list_struct()` depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefPicListContext {
    pub long_term_ref_pics: bool,
    pub inter_layer_prediction: bool,
    /// `sps_weighted_pred_flag || sps_weighted_bipred_flag`
    pub weighted_prediction: bool,
    pub num_ref_pic_lists: u64,
    /// Width of `rpls_poc_lsb_lt`, `sps_log2_max_pic_order_cnt_lsb_minus4 + 4`.
    pub poc_lsb_bits: u32,
}

/// `ref_pic_list_struct(listIdx, rplsIdx)`
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RefPicListStruct {
    pub num_ref_entries: u64,
    pub ltrp_in_header_flag: Option<bool>,
    pub entries: Vec<RefPicEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum RefPicEntry {
    ShortTerm {
        abs_delta_poc_st: u64,
        strp_entry_sign_flag: Option<bool>,
    },
    LongTerm {
        /// Absent when the POC LSBs are carried in the slice header.
        rpls_poc_lsb_lt: Option<u32>,
    },
    InterLayer {
        ilrp_idx: u64,
    },
}

impl RefPicListStruct {
    pub fn parse(
        bs: &mut BitCursor,
        rpls_idx: u64,
        ctx: &RefPicListContext,
    ) -> Result<RefPicListStruct> {
        let mut rpl = RefPicListStruct {
            num_ref_entries: ue_max(bs, "num_ref_entries", MAX_NUM_REF_ENTRIES)?,
            ..Default::default()
        };

        if ctx.long_term_ref_pics && rpls_idx < ctx.num_ref_pic_lists && rpl.num_ref_entries > 0 {
            rpl.ltrp_in_header_flag = Some(bs.flag()?);
        }
        let ltrp_in_header = rpl.ltrp_in_header_flag.unwrap_or(false);

        for i in 0..rpl.num_ref_entries {
            let inter_layer_ref_pic = ctx.inter_layer_prediction && bs.flag()?;

            let entry = if inter_layer_ref_pic {
                RefPicEntry::InterLayer { ilrp_idx: bs.ue()? }
            } else {
                let st_ref_pic = !ctx.long_term_ref_pics || bs.flag()?;

                if st_ref_pic {
                    let abs_delta_poc_st = bs.ue()?;

                    let abs_delta_poc = if ctx.weighted_prediction && i != 0 {
                        abs_delta_poc_st
                    } else {
                        abs_delta_poc_st + 1
                    };

                    let strp_entry_sign_flag = if abs_delta_poc > 0 {
                        Some(bs.flag()?)
                    } else {
                        None
                    };

                    RefPicEntry::ShortTerm {
                        abs_delta_poc_st,
                        strp_entry_sign_flag,
                    }
                } else if !ltrp_in_header {
                    RefPicEntry::LongTerm {
                        rpls_poc_lsb_lt: Some(bs.u(ctx.poc_lsb_bits)?),
                    }
                } else {
                    RefPicEntry::LongTerm {
                        rpls_poc_lsb_lt: None,
                    }
                }
            };

            rpl.entries.push(entry);
        }

        Ok(rpl)
    }
}

impl RefPicEntry {
    /// `DeltaPocValSt` contribution of a short-term entry.
    pub fn delta_poc_st(&self, weighted_prediction: bool, i: usize) -> Option<i64> {
        match self {
            RefPicEntry::ShortTerm {
                abs_delta_poc_st,
                strp_entry_sign_flag,
            } => {
                let abs = if weighted_prediction && i != 0 {
                    *abs_delta_poc_st as i64
                } else {
                    *abs_delta_poc_st as i64 + 1
                };

                if strp_entry_sign_flag.unwrap_or(false) {
                    Some(-abs)
                } else {
                    Some(abs)
                }
            }
            _ => None,
        }
    }
}
