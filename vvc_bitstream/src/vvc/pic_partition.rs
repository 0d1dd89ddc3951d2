#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bits::{BitCursor, SyntaxDecoder};
use crate::error::{ParseError, Result};

/// Tile grid of a picture, in CTBs.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TileLayout {
    pub col_width_val: Vec<u64>,
    pub row_height_val: Vec<u64>,
}

/// Rectangular slice syntax of one slice index. Every element is absent
/// for indices covered by a preceding slice of the same tile.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RectSlice {
    pub pps_slice_width_in_tiles_minus1: Option<u64>,
    pub pps_slice_height_in_tiles_minus1: Option<u64>,
    pub pps_num_exp_slices_in_tile: Option<u64>,
    pub pps_exp_slice_height_in_ctus_minus1: Vec<u64>,
    pub pps_tile_idx_delta_val: Option<i64>,
}

/// Per-slice positions derived while walking the rectangular slices.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SliceLayout {
    pub slice_top_left_tile_idx: Vec<usize>,
    /// Slices sharing the tile of the first slice of a run, zero for the
    /// other slices of that run.
    pub num_slices_in_tile: Vec<usize>,
}

impl TileLayout {
    /// The whole picture as a single tile.
    pub fn single(pic_width_in_ctbs: u64, pic_height_in_ctbs: u64) -> TileLayout {
        TileLayout {
            col_width_val: vec![pic_width_in_ctbs],
            row_height_val: vec![pic_height_in_ctbs],
        }
    }

    pub fn derive(
        pic_width_in_ctbs: u64,
        pic_height_in_ctbs: u64,
        tile_column_width_minus1: &[u64],
        tile_row_height_minus1: &[u64],
    ) -> Result<TileLayout> {
        Ok(TileLayout {
            col_width_val: uniform_spacing(
                pic_width_in_ctbs,
                tile_column_width_minus1,
                "pps_tile_column_width_minus1",
            )?,
            row_height_val: uniform_spacing(
                pic_height_in_ctbs,
                tile_row_height_minus1,
                "pps_tile_row_height_minus1",
            )?,
        })
    }

    pub fn num_tile_columns(&self) -> usize {
        self.col_width_val.len()
    }

    pub fn num_tile_rows(&self) -> usize {
        self.row_height_val.len()
    }

    pub fn num_tiles_in_pic(&self) -> usize {
        self.num_tile_columns() * self.num_tile_rows()
    }
}

/// Explicit sizes first, then the last explicit size repeated while it
/// fits, then the remainder.
fn uniform_spacing(total: u64, explicit_minus1: &[u64], field: &'static str) -> Result<Vec<u64>> {
    let mut sizes = Vec::with_capacity(explicit_minus1.len());
    let mut remaining = total;

    for &size_minus1 in explicit_minus1 {
        let size = size_minus1 + 1;

        remaining = remaining
            .checked_sub(size)
            .ok_or_else(|| ParseError::invalid(field, size_minus1))?;
        sizes.push(size);
    }

    if let Some(&uniform) = sizes.last() {
        while remaining >= uniform {
            sizes.push(uniform);
            remaining -= uniform;
        }
    }

    if remaining > 0 {
        sizes.push(remaining);
    }

    Ok(sizes)
}

/// Number of slices a tile row of `row_height` CTUs is split into.
pub fn num_slices_in_tile(row_height: u64, exp_slice_height_minus1: &[u64]) -> Result<usize> {
    Ok(uniform_spacing(
        row_height,
        exp_slice_height_minus1,
        "pps_exp_slice_height_in_ctus_minus1",
    )?
    .len())
}

/// Reads the rectangular slice loop of the PPS.
///
/// Every slice index below `pps_num_slices_in_pic_minus1` either gets its
/// own syntax or is covered by a multi-slice tile. The last slice only
/// receives a derived position.
pub fn parse_rect_slices(
    bs: &mut BitCursor,
    tiles: &TileLayout,
    num_slices_in_pic_minus1: u64,
    tile_idx_delta_present: bool,
) -> Result<(Vec<RectSlice>, SliceLayout)> {
    let num_slices = usize::try_from(num_slices_in_pic_minus1 + 1)
        .map_err(|_| ParseError::invalid("pps_num_slices_in_pic_minus1", num_slices_in_pic_minus1))?;
    let last = num_slices - 1;

    let num_tile_columns = tiles.num_tile_columns();
    let num_tile_rows = tiles.num_tile_rows();
    let num_tiles = tiles.num_tiles_in_pic();

    // Entries are pushed as the syntax is read, a truncated loop only pays
    // for the slices it actually carried
    let mut slices: Vec<RectSlice> = Vec::new();
    let mut layout = SliceLayout::default();

    let mut tile_idx: usize = 0;
    let mut prev_height_minus1 = 0;
    let mut i = 0;

    while i < last {
        if tile_idx >= num_tiles {
            return Err(ParseError::invalid("SliceTopLeftTileIdx", tile_idx));
        }

        let tile_x = tile_idx % num_tile_columns;
        let tile_y = tile_idx / num_tile_columns;
        let first = i;

        let mut slice = RectSlice::default();

        if tile_x != num_tile_columns - 1 {
            slice.pps_slice_width_in_tiles_minus1 = Some(bs.ue()?);
        }

        if tile_y != num_tile_rows - 1 && (tile_idx_delta_present || tile_x == 0) {
            slice.pps_slice_height_in_tiles_minus1 = Some(bs.ue()?);
        }

        let width_minus1 = slice.pps_slice_width_in_tiles_minus1.unwrap_or(0);
        let height_minus1 = match slice.pps_slice_height_in_tiles_minus1 {
            Some(v) => v,
            None if tile_y == num_tile_rows - 1 => 0,
            None => prev_height_minus1,
        };

        let mut slice_width_in_tiles = width_minus1 as usize + 1;
        let mut slice_height_in_tiles = height_minus1 as usize + 1;
        let mut slices_in_tile = 1;

        let row_height = tiles.row_height_val[tile_y];

        if width_minus1 == 0 && height_minus1 == 0 && row_height > 1 {
            let num_exp = bs.ue()?;
            if num_exp > row_height {
                return Err(ParseError::invalid("pps_num_exp_slices_in_tile", num_exp));
            }

            slice.pps_num_exp_slices_in_tile = Some(num_exp);
            for _ in 0..num_exp {
                slice.pps_exp_slice_height_in_ctus_minus1.push(bs.ue()?);
            }

            if num_exp > 0 {
                slices_in_tile = num_slices_in_tile(row_height, &slice.pps_exp_slice_height_in_ctus_minus1)?;
            }
        }

        if first + slices_in_tile - 1 > last {
            return Err(ParseError::invalid("NumSlicesInTile", slices_in_tile));
        }

        slices.push(slice);
        layout.slice_top_left_tile_idx.push(tile_idx);
        layout.num_slices_in_tile.push(slices_in_tile);

        for _ in 1..slices_in_tile {
            slices.push(RectSlice::default());
            layout.slice_top_left_tile_idx.push(tile_idx);
            layout.num_slices_in_tile.push(0);
        }

        if slices_in_tile > 1 {
            i += slices_in_tile - 1;
            slice_width_in_tiles = 1;
            slice_height_in_tiles = 1;
            prev_height_minus1 = 0;
        } else {
            prev_height_minus1 = height_minus1;
        }

        if tile_idx_delta_present && i < last {
            let delta = bs.se()?;
            slices[i].pps_tile_idx_delta_val = Some(delta);

            tile_idx = tile_idx
                .checked_add_signed(delta as isize)
                .ok_or_else(|| ParseError::invalid("pps_tile_idx_delta_val", delta))?;
        } else {
            tile_idx += slice_width_in_tiles;

            if tile_idx % num_tile_columns == 0 {
                tile_idx += (slice_height_in_tiles - 1) * num_tile_columns;
            }
        }

        i += 1;
    }

    // Last slice, unless a multi-slice tile already covers it
    if i == last {
        if tile_idx >= num_tiles {
            return Err(ParseError::invalid("SliceTopLeftTileIdx", tile_idx));
        }

        slices.push(RectSlice::default());
        layout.slice_top_left_tile_idx.push(tile_idx);
        layout.num_slices_in_tile.push(1);
    }

    Ok((slices, layout))
}
