//! Alignment arithmetic shared by the cursors and the size calculations.

/// Returns the number of padding bytes needed to move `offset` to the next multiple of
/// `alignment`.
///
/// An alignment of 0 or 1 never requires padding.
#[inline]
pub const fn padding(offset: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        return 0;
    }
    (alignment - (offset % alignment)) % alignment
}

/// Rounds `offset` up to the next multiple of `alignment`.
#[inline]
pub const fn align_up(offset: usize, alignment: usize) -> usize {
    offset + padding(offset, alignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        assert_eq!(padding(0, 4), 0);
        assert_eq!(padding(1, 4), 3);
        assert_eq!(padding(3, 4), 1);
        assert_eq!(padding(4, 4), 0);
        assert_eq!(padding(5, 8), 3);
        assert_eq!(padding(7, 1), 0);
        assert_eq!(padding(7, 0), 0);
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 2), 2);
        assert_eq!(align_up(9, 4), 12);
    }
}
