use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{ParseError, Result};
use crate::vvc::{pps::Pps, sps::Sps, vps::Vps};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ParameterSetKind {
    Vps,
    Sps,
    Pps,
}

/// A successfully parsed parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ParameterSet {
    Vps(Box<Vps>),
    Sps(Box<Sps>),
    Pps(Box<Pps>),
}

/// Parameter sets keyed by kind and id, the latest one of each key wins.
#[derive(Debug, Default, Clone)]
pub struct ParameterSetStore {
    sets: HashMap<(ParameterSetKind, u8), ParameterSet>,
}

impl ParameterSet {
    pub fn kind(&self) -> ParameterSetKind {
        match self {
            ParameterSet::Vps(_) => ParameterSetKind::Vps,
            ParameterSet::Sps(_) => ParameterSetKind::Sps,
            ParameterSet::Pps(_) => ParameterSetKind::Pps,
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            ParameterSet::Vps(vps) => vps.vps_video_parameter_set_id,
            ParameterSet::Sps(sps) => sps.sps_seq_parameter_set_id,
            ParameterSet::Pps(pps) => pps.pps_pic_parameter_set_id,
        }
    }
}

impl ParameterSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `set`, returning the set it replaced.
    pub fn insert(&mut self, set: ParameterSet) -> Option<ParameterSet> {
        self.sets.insert((set.kind(), set.id()), set)
    }

    pub fn get(&self, kind: ParameterSetKind, id: u8) -> Option<&ParameterSet> {
        self.sets.get(&(kind, id))
    }

    pub fn vps(&self, id: u8) -> Option<&Vps> {
        match self.get(ParameterSetKind::Vps, id) {
            Some(ParameterSet::Vps(vps)) => Some(vps.as_ref()),
            _ => None,
        }
    }

    pub fn sps(&self, id: u8) -> Option<&Sps> {
        match self.get(ParameterSetKind::Sps, id) {
            Some(ParameterSet::Sps(sps)) => Some(sps.as_ref()),
            _ => None,
        }
    }

    pub fn pps(&self, id: u8) -> Option<&Pps> {
        match self.get(ParameterSetKind::Pps, id) {
            Some(ParameterSet::Pps(pps)) => Some(pps.as_ref()),
            _ => None,
        }
    }

    pub fn resolve_sps(&self, id: u8) -> Result<&Sps> {
        self.sps(id).ok_or(ParseError::UnresolvedReference {
            kind: ParameterSetKind::Sps,
            id,
        })
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Stored sets ordered by kind, then id.
    pub fn sorted(&self) -> Vec<&ParameterSet> {
        let mut keys: Vec<_> = self.sets.keys().collect();
        keys.sort();

        keys.into_iter().filter_map(|k| self.sets.get(k)).collect()
    }
}

impl fmt::Display for ParameterSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterSetKind::Vps => "VPS",
            ParameterSetKind::Sps => "SPS",
            ParameterSetKind::Pps => "PPS",
        };

        f.write_str(name)
    }
}
