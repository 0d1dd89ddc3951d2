#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bits::{BitCursor, SyntaxDecoder};
use crate::error::Result;

use super::byte_alignment_bits;
use super::general_constraints_info::GeneralConstraintsInfo;

/// `profile_tier_level(profileTierPresentFlag, MaxNumSubLayersMinus1)`
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProfileTierLevel {
    pub general_profile_idc: Option<u8>,
    pub general_tier_flag: Option<bool>,
    pub general_level_idc: u8,
    pub ptl_frame_only_constraint_flag: bool,
    pub ptl_multilayer_enabled_flag: bool,
    pub general_constraints_info: Option<GeneralConstraintsInfo>,

    /// Indexed by sublayer, `MaxNumSubLayersMinus1` entries.
    pub ptl_sublayer_level_present_flag: Vec<bool>,
    pub sublayer_level_idc: Vec<Option<u8>>,

    pub ptl_num_sub_profiles: Option<u8>,
    pub general_sub_profile_idc: Vec<u32>,
}

impl ProfileTierLevel {
    pub fn parse(
        bs: &mut BitCursor,
        profile_tier_present: bool,
        max_num_sub_layers_minus1: u8,
    ) -> Result<ProfileTierLevel> {
        let mut ptl = ProfileTierLevel::default();

        if profile_tier_present {
            ptl.general_profile_idc = Some(bs.u(7)? as u8);
            ptl.general_tier_flag = Some(bs.flag()?);
        }

        ptl.general_level_idc = bs.u(8)? as u8;
        ptl.ptl_frame_only_constraint_flag = bs.flag()?;
        ptl.ptl_multilayer_enabled_flag = bs.flag()?;

        if profile_tier_present {
            ptl.general_constraints_info = Some(GeneralConstraintsInfo::parse(bs)?);
        }

        // Sublayer entries are signalled from the highest sublayer down
        let num_sub_layers = max_num_sub_layers_minus1 as usize;

        ptl.ptl_sublayer_level_present_flag = vec![false; num_sub_layers];
        for i in (0..num_sub_layers).rev() {
            ptl.ptl_sublayer_level_present_flag[i] = bs.flag()?;
        }

        // ptl_reserved_zero_bit
        byte_alignment_bits(bs)?;

        ptl.sublayer_level_idc = vec![None; num_sub_layers];
        for i in (0..num_sub_layers).rev() {
            if ptl.ptl_sublayer_level_present_flag[i] {
                ptl.sublayer_level_idc[i] = Some(bs.u(8)? as u8);
            }
        }

        if profile_tier_present {
            let num_sub_profiles = bs.u(8)? as u8;
            ptl.ptl_num_sub_profiles = Some(num_sub_profiles);

            for _ in 0..num_sub_profiles {
                ptl.general_sub_profile_idc.push(bs.u(32)?);
            }
        }

        Ok(ptl)
    }

    /// Level of sublayer `i`, inherited from the next higher sublayer when absent.
    pub fn sublayer_level(&self, i: usize) -> u8 {
        match self.sublayer_level_idc.get(i) {
            Some(Some(level)) => *level,
            Some(None) => self.sublayer_level(i + 1),
            None => self.general_level_idc,
        }
    }
}
