//! Gutter annotations for the visible part of the edited buffer.
//!
//! Only lines inside the viewport are annotated. The [`AnnotationWindow`]
//! remembers which lines are already done so that scrolling annotates just
//! the newly exposed lines.

use std::collections::BTreeMap;

use crate::host::EditorHost;
use crate::models::{Chunk, GutterMark, LineRange};

/// Lines of the edited buffer that currently carry an annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationWindow {
    pub from: usize,
    pub to: usize,
    pub marked: BTreeMap<usize, GutterMark>,
}

impl AnnotationWindow {
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn range(&self) -> LineRange {
        LineRange::new(self.from, self.to)
    }

    /// Forget the annotated range so the next pass starts from scratch.
    /// Marks stay on the host until that pass clears them.
    pub fn invalidate(&mut self) {
        self.from = 0;
        self.to = 0;
    }
}

/// How an annotate call brought the gutter up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationPass {
    /// Everything cleared and re-derived for the visible range
    Full,
    /// Only lines exposed since the last pass were annotated
    Incremental,
}

#[derive(Debug, Clone, Copy)]
pub struct ViewportAnnotator {
    /// Distance the viewport may move past the window before a full rebuild
    pub slack: usize,
}

impl Default for ViewportAnnotator {
    fn default() -> Self {
        ViewportAnnotator { slack: 20 }
    }
}

impl ViewportAnnotator {
    pub fn new(slack: usize) -> Self {
        ViewportAnnotator { slack }
    }

    /// Bring the host's gutter up to date for `visible`, as one batch.
    pub fn annotate<H: EditorHost>(
        &self,
        host: &mut H,
        chunks: &[Chunk],
        window: &mut AnnotationWindow,
        visible: LineRange,
    ) -> AnnotationPass {
        let far_below = visible.from.saturating_sub(window.to) > self.slack;
        let far_above = window.from.saturating_sub(visible.to) > self.slack;

        if window.is_empty() || far_below || far_above {
            let marks = mark_changes(chunks, visible);
            host.batch(|host| {
                host.clear_all_annotations();
                window.marked.clear();
                apply_marks(host, &mut window.marked, &marks);
            });
            window.from = visible.from;
            window.to = visible.to;
            log::trace!(
                "full annotation of lines {}..{}: {} marks",
                visible.from,
                visible.to,
                marks.len()
            );
            return AnnotationPass::Full;
        }

        let mut marks = Vec::new();
        if visible.from < window.from {
            marks.extend(mark_changes(chunks, LineRange::new(visible.from, window.from)));
            window.from = visible.from;
        }
        if visible.to > window.to {
            marks.extend(mark_changes(chunks, LineRange::new(window.to, visible.to)));
            window.to = visible.to;
        }
        if !marks.is_empty() {
            host.batch(|host| apply_marks(host, &mut window.marked, &marks));
        }
        AnnotationPass::Incremental
    }
}

fn apply_marks<H: EditorHost>(
    host: &mut H,
    marked: &mut BTreeMap<usize, GutterMark>,
    marks: &[(usize, GutterMark)],
) {
    for &(line, mark) in marks {
        host.set_line_annotation(line, mark);
        marked.insert(line, mark);
    }
}

/// Annotations for edited lines in `range` derived from `chunks`.
///
/// Lines inside a chunk's edited range are `Changed`. A chunk with an empty
/// edited range that lies within `range` marks the line before the
/// deletion point (line 0 for a deletion at the very start) as `Removed`.
pub fn mark_changes(chunks: &[Chunk], range: LineRange) -> Vec<(usize, GutterMark)> {
    let mut marks = Vec::new();
    for chunk in chunks {
        let (start, end) = (chunk.edit_from, chunk.edit_to);
        if start > range.to {
            break;
        }
        let bfrom = range.from.max(start);
        let bto = range.to.min(end);
        for line in bfrom..bto {
            marks.push((line, GutterMark::Changed));
        }
        if start == end && bfrom == end && bto == end {
            marks.push((bfrom.saturating_sub(1), GutterMark::Removed));
        }
    }
    marks
}

#[cfg(test)]
mod mark_tests {
    use super::*;

    #[test]
    fn test_changed_lines_inside_range() {
        let chunks = [Chunk::new(1, 2, 1, 3)];
        assert_eq!(
            mark_changes(&chunks, LineRange::new(0, 10)),
            vec![(1, GutterMark::Changed), (2, GutterMark::Changed)]
        );
    }

    #[test]
    fn test_changed_lines_clipped_to_range() {
        let chunks = [Chunk::new(0, 10, 0, 10)];
        let marks = mark_changes(&chunks, LineRange::new(4, 6));
        assert_eq!(marks, vec![(4, GutterMark::Changed), (5, GutterMark::Changed)]);
    }

    #[test]
    fn test_pure_insertion_has_no_removed_marker() {
        let chunks = [Chunk::new(2, 2, 2, 3)];
        assert_eq!(
            mark_changes(&chunks, LineRange::new(0, 4)),
            vec![(2, GutterMark::Changed)]
        );
    }

    #[test]
    fn test_pure_deletion_marks_line_before() {
        let chunks = [Chunk::new(1, 2, 1, 1)];
        assert_eq!(
            mark_changes(&chunks, LineRange::new(0, 3)),
            vec![(0, GutterMark::Removed)]
        );
    }

    #[test]
    fn test_deletion_at_start_marks_line_zero() {
        let chunks = [Chunk::new(0, 2, 0, 0)];
        assert_eq!(
            mark_changes(&chunks, LineRange::new(0, 3)),
            vec![(0, GutterMark::Removed)]
        );
    }

    #[test]
    fn test_deletion_at_range_end_is_marked() {
        let chunks = [Chunk::new(5, 6, 5, 5)];
        assert_eq!(
            mark_changes(&chunks, LineRange::new(0, 5)),
            vec![(4, GutterMark::Removed)]
        );
    }

    #[test]
    fn test_deletion_before_range_is_not_marked() {
        let chunks = [Chunk::new(1, 2, 1, 1)];
        assert!(mark_changes(&chunks, LineRange::new(2, 5)).is_empty());
    }

    #[test]
    fn test_chunks_after_range_are_skipped() {
        let chunks = [Chunk::new(1, 2, 1, 2), Chunk::new(20, 21, 20, 21)];
        assert_eq!(
            mark_changes(&chunks, LineRange::new(0, 10)),
            vec![(1, GutterMark::Changed)]
        );
    }

    #[test]
    fn test_no_chunks_no_marks() {
        assert!(mark_changes(&[], LineRange::new(0, 100)).is_empty());
    }
}
