#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bits::{BitCursor, SyntaxDecoder};
use crate::error::Result;

/// `dpb_parameters(MaxSubLayersMinus1, subLayerInfoFlag)`
///
/// Only the highest sublayer is signalled unless `subLayerInfoFlag` is set.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DpbParameters {
    pub first_sub_layer: u8,
    pub dpb_max_dec_pic_buffering_minus1: Vec<u64>,
    pub dpb_max_num_reorder_pics: Vec<u64>,
    pub dpb_max_latency_increase_plus1: Vec<u64>,
}

impl DpbParameters {
    pub fn parse(
        bs: &mut BitCursor,
        max_sub_layers_minus1: u8,
        sub_layer_info: bool,
    ) -> Result<DpbParameters> {
        let first_sub_layer = if sub_layer_info {
            0
        } else {
            max_sub_layers_minus1
        };

        let mut dpb = DpbParameters {
            first_sub_layer,
            ..Default::default()
        };

        for _ in first_sub_layer..=max_sub_layers_minus1 {
            dpb.dpb_max_dec_pic_buffering_minus1.push(bs.ue()?);
            dpb.dpb_max_num_reorder_pics.push(bs.ue()?);
            dpb.dpb_max_latency_increase_plus1.push(bs.ue()?);
        }

        Ok(dpb)
    }

    /// `MaxDecPicBuffering` of the highest sublayer.
    pub fn max_dec_pic_buffering(&self) -> Option<u64> {
        self.dpb_max_dec_pic_buffering_minus1.last().map(|v| v + 1)
    }
}
