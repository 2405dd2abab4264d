//! Value types shared by the diff, annotation and navigation modules.

use std::fmt;

/// Which buffer a line index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Original,
    Edited,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Original => write!(f, "original"),
            Side::Edited => write!(f, "edited"),
        }
    }
}

/// Direction for chunk navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// A line-aligned change region. Both ranges are half-open line ranges:
/// `orig_from..orig_to` in the original buffer is replaced by
/// `edit_from..edit_to` in the edited buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub orig_from: usize,
    pub orig_to: usize,
    pub edit_from: usize,
    pub edit_to: usize,
}

impl Chunk {
    pub fn new(orig_from: usize, orig_to: usize, edit_from: usize, edit_to: usize) -> Self {
        Chunk {
            orig_from,
            orig_to,
            edit_from,
            edit_to,
        }
    }

    /// Start line of this chunk on the given side
    pub fn from(&self, side: Side) -> usize {
        match side {
            Side::Original => self.orig_from,
            Side::Edited => self.edit_from,
        }
    }

    /// End line (exclusive) of this chunk on the given side
    pub fn to(&self, side: Side) -> usize {
        match side {
            Side::Original => self.orig_to,
            Side::Edited => self.edit_to,
        }
    }

    /// Content was added with nothing removed.
    pub fn is_insertion(&self) -> bool {
        self.orig_from == self.orig_to
    }

    /// Content was removed with nothing added in its place.
    pub fn is_deletion(&self) -> bool {
        self.edit_from == self.edit_to
    }
}

/// Half-open range of line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineRange {
    pub from: usize,
    pub to: usize,
}

impl LineRange {
    pub fn new(from: usize, to: usize) -> Self {
        LineRange { from, to }
    }

    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.from && line < self.to
    }
}

/// Kind of gutter annotation placed on an edited-buffer line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GutterMark {
    /// The line belongs to a changed or inserted region.
    Changed,
    /// Content was deleted right after this line (or at the start of the
    /// buffer when placed on line 0).
    Removed,
}
