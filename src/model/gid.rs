//! Global tile identifiers and their flip-flag bit packing.
//!
//! A cell's tile is identified by a 32-bit value whose top three bits
//! are independent flip flags and whose low 29 bits are a 1-based index
//! into the union of all tile sets' ranges. Value 0 is the empty cell.
//! This packing is the only place flip orientation is represented; it is
//! a per-cell (or per-object) attribute, not a tile-set attribute.

/// Horizontal flip flag bit.
pub const FLIP_HORIZONTAL: u32 = 1 << 31;

/// Vertical flip flag bit.
pub const FLIP_VERTICAL: u32 = 1 << 30;

/// Diagonal (anti-diagonal axis) flip flag bit.
pub const FLIP_DIAGONAL: u32 = 1 << 29;

/// Mask of all three flip flag bits.
pub const FLIP_MASK: u32 = FLIP_HORIZONTAL | FLIP_VERTICAL | FLIP_DIAGONAL;

/// Mask of the tile index bits.
pub const ID_MASK: u32 = !FLIP_MASK;

/// Largest representable global tile index.
pub const MAX_TILE_ID: u32 = ID_MASK;

/// Per-cell flip flags, applied in fixed order when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
}

impl Flip {
    /// No flips, the default for every freshly placed tile.
    pub const NONE: Flip = Flip { horizontal: false, vertical: false, diagonal: false };

    /// Check whether any flag is set.
    #[inline]
    pub const fn any(self) -> bool {
        self.horizontal || self.vertical || self.diagonal
    }
}

/// A global tile id: a 1-based tile index plus flip flags.
///
/// `id == 0` means "no tile"; the empty cell carries no flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Gid {
    pub id: u32,
    pub flip: Flip,
}

impl Gid {
    /// The unique empty-cell value.
    pub const EMPTY: Gid = Gid { id: 0, flip: Flip::NONE };

    /// A tile reference with no flips.
    pub const fn new(id: u32) -> Self {
        Self { id, flip: Flip::NONE }
    }

    /// A tile reference with explicit flip flags.
    pub const fn with_flip(id: u32, flip: Flip) -> Self {
        Self { id, flip }
    }

    /// Check whether this is the empty cell.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.id == 0
    }

    /// Pack into the on-disk 32-bit form.
    ///
    /// Returns `None` if the index exceeds [`MAX_TILE_ID`]. The empty
    /// cell packs to 0 with all flag bits clear.
    pub fn pack(self) -> Option<u32> {
        if self.id > MAX_TILE_ID {
            return None;
        }

        let mut raw = self.id;
        if self.flip.horizontal {
            raw |= FLIP_HORIZONTAL;
        }
        if self.flip.vertical {
            raw |= FLIP_VERTICAL;
        }
        if self.flip.diagonal {
            raw |= FLIP_DIAGONAL;
        }
        Some(raw)
    }

    /// Unpack the on-disk 32-bit form: flag bits are masked out first,
    /// then the remaining bits are the bare index.
    ///
    /// Returns `None` for an index of 0 with any flag bit set; a flipped
    /// empty cell has no meaning and is rejected rather than normalized.
    pub fn unpack(raw: u32) -> Option<Gid> {
        let flip = Flip {
            horizontal: raw & FLIP_HORIZONTAL != 0,
            vertical: raw & FLIP_VERTICAL != 0,
            diagonal: raw & FLIP_DIAGONAL != 0,
        };
        let id = raw & ID_MASK;

        if id == 0 && flip.any() {
            return None;
        }
        Some(Gid { id, flip })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits_are_disjoint() {
        assert_eq!(FLIP_HORIZONTAL & FLIP_VERTICAL, 0);
        assert_eq!(FLIP_HORIZONTAL & FLIP_DIAGONAL, 0);
        assert_eq!(FLIP_VERTICAL & FLIP_DIAGONAL, 0);
        assert_eq!(FLIP_MASK & ID_MASK, 0);
        assert_eq!(FLIP_MASK | ID_MASK, u32::MAX);
    }

    #[test]
    fn test_pack_unpack_round_trip() {
        let flips = [
            Flip::NONE,
            Flip { horizontal: true, ..Flip::NONE },
            Flip { vertical: true, ..Flip::NONE },
            Flip { diagonal: true, ..Flip::NONE },
            Flip { horizontal: true, vertical: true, diagonal: false },
            Flip { horizontal: true, vertical: true, diagonal: true },
        ];

        for id in [1, 2, 1000, MAX_TILE_ID - 1, MAX_TILE_ID] {
            for flip in flips {
                let gid = Gid::with_flip(id, flip);
                let raw = gid.pack().unwrap();
                assert_eq!(Gid::unpack(raw), Some(gid));
            }
        }
    }

    #[test]
    fn test_empty_cell_is_unique() {
        assert_eq!(Gid::EMPTY.pack(), Some(0));
        assert_eq!(Gid::unpack(0), Some(Gid::EMPTY));
    }

    #[test]
    fn test_flipped_empty_cell_rejected() {
        assert_eq!(Gid::unpack(FLIP_HORIZONTAL), None);
        assert_eq!(Gid::unpack(FLIP_MASK), None);
    }

    #[test]
    fn test_pack_rejects_out_of_range_index() {
        assert_eq!(Gid::new(MAX_TILE_ID + 1).pack(), None);
        assert_eq!(Gid::new(u32::MAX).pack(), None);
    }

    #[test]
    fn test_concrete_flipped_value() {
        // index 3 with the horizontal-flip bit set
        let gid = Gid::with_flip(3, Flip { horizontal: true, ..Flip::NONE });
        assert_eq!(gid.pack(), Some(2_147_483_651));
        assert_eq!(Gid::unpack(2_147_483_651), Some(gid));
    }
}
