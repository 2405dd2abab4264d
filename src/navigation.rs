//! Jumping between changes as pure functions over the chunk list.

use crate::models::{Chunk, Direction, Side};

// ============================================================================
// Single chunk list
// ============================================================================

/// Last line of the nearest chunk that ends before `line` on `side`.
/// Returns None if no chunk ends before `line`.
pub fn find_prev_chunk_boundary(chunks: &[Chunk], line: usize, side: Side) -> Option<usize> {
    chunks
        .iter()
        .rev()
        .map(|chunk| chunk.to(side).saturating_sub(1))
        .find(|&last| last < line)
}

/// First line of the nearest chunk that starts after `line` on `side`.
/// Returns None if no chunk starts after `line`.
pub fn find_next_chunk_boundary(chunks: &[Chunk], line: usize, side: Side) -> Option<usize> {
    chunks
        .iter()
        .map(|chunk| chunk.from(side))
        .find(|&first| first > line)
}

pub fn find_chunk_boundary(
    chunks: &[Chunk],
    line: usize,
    side: Side,
    direction: Direction,
) -> Option<usize> {
    match direction {
        Direction::Previous => find_prev_chunk_boundary(chunks, line, side),
        Direction::Next => find_next_chunk_boundary(chunks, line, side),
    }
}

// ============================================================================
// Several sessions on one editor
// ============================================================================

/// Nearest boundary across several chunk lists: the closest one before
/// `line` for `Previous`, the closest one after it for `Next`.
pub fn nearest_boundary<'a, I>(lists: I, line: usize, side: Side, direction: Direction) -> Option<usize>
where
    I: IntoIterator<Item = &'a [Chunk]>,
{
    let candidates = lists
        .into_iter()
        .filter_map(|chunks| find_chunk_boundary(chunks, line, side, direction));
    match direction {
        Direction::Previous => candidates.max(),
        Direction::Next => candidates.min(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks() -> Vec<Chunk> {
        vec![
            Chunk::new(2, 4, 2, 3),
            Chunk::new(8, 8, 7, 9),
            Chunk::new(12, 14, 13, 13),
        ]
    }

    #[test]
    fn test_next_boundary_edited_side() {
        assert_eq!(find_next_chunk_boundary(&chunks(), 0, Side::Edited), Some(2));
        assert_eq!(find_next_chunk_boundary(&chunks(), 2, Side::Edited), Some(7));
        assert_eq!(find_next_chunk_boundary(&chunks(), 7, Side::Edited), Some(13));
    }

    #[test]
    fn test_next_boundary_original_side() {
        assert_eq!(find_next_chunk_boundary(&chunks(), 5, Side::Original), Some(8));
        assert_eq!(find_next_chunk_boundary(&chunks(), 8, Side::Original), Some(12));
    }

    #[test]
    fn test_next_boundary_none_after_last() {
        assert_eq!(find_next_chunk_boundary(&chunks(), 13, Side::Edited), None);
    }

    #[test]
    fn test_prev_boundary_edited_side() {
        assert_eq!(find_prev_chunk_boundary(&chunks(), 20, Side::Edited), Some(12));
        assert_eq!(find_prev_chunk_boundary(&chunks(), 12, Side::Edited), Some(8));
        assert_eq!(find_prev_chunk_boundary(&chunks(), 8, Side::Edited), Some(2));
    }

    #[test]
    fn test_prev_boundary_original_side() {
        assert_eq!(find_prev_chunk_boundary(&chunks(), 10, Side::Original), Some(7));
        assert_eq!(find_prev_chunk_boundary(&chunks(), 3, Side::Original), None);
    }

    #[test]
    fn test_prev_boundary_none_before_first() {
        assert_eq!(find_prev_chunk_boundary(&chunks(), 2, Side::Edited), None);
    }

    #[test]
    fn test_empty_chunk_list() {
        assert_eq!(find_chunk_boundary(&[], 5, Side::Edited, Direction::Next), None);
        assert_eq!(find_chunk_boundary(&[], 5, Side::Edited, Direction::Previous), None);
    }

    #[test]
    fn test_nearest_boundary_across_lists() {
        let first = vec![Chunk::new(3, 4, 3, 4), Chunk::new(20, 21, 20, 21)];
        let second = vec![Chunk::new(9, 10, 9, 10)];
        let lists = [first.as_slice(), second.as_slice()];

        assert_eq!(nearest_boundary(lists, 5, Side::Edited, Direction::Next), Some(9));
        assert_eq!(nearest_boundary(lists, 15, Side::Edited, Direction::Previous), Some(9));
        assert_eq!(nearest_boundary(lists, 25, Side::Edited, Direction::Next), None);
    }
}
