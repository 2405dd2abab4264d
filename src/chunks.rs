//! Projection of a character diff onto line-aligned chunks.
//!
//! An equal run only separates two chunks when it starts and ends on clean
//! line boundaries. A run whose first or last line is touched by an
//! adjoining change gives that line up to the chunk next to it.

use crate::diff::{DiffKind, DiffOp, DiffSequence};
use crate::models::Chunk;
use crate::position::TextPos;

/// Walk the diff and return the ordered, non-overlapping list of chunks.
///
/// The diff must reconstruct both texts; this is not checked here.
pub fn extract_chunks(diff: &DiffSequence) -> Vec<Chunk> {
    let ops = diff.ops();
    let mut chunks = Vec::new();
    if ops.is_empty() {
        return chunks;
    }

    let mut start_edit = 0;
    let mut start_orig = 0;
    let mut edit = TextPos::default();
    let mut orig = TextPos::default();

    for (i, op) in ops.iter().enumerate() {
        match op.kind {
            DiffKind::Equal => {
                // A boundary that sits inside the pending chunk's first line
                // is not a separator even when the texts line up there
                let start_off = if !start_of_line_clean(ops, i)
                    || edit.line < start_edit
                    || orig.line < start_orig
                {
                    1
                } else {
                    0
                };
                let clean_from_edit = edit.line + start_off;
                let clean_from_orig = orig.line + start_off;

                edit.move_over(&op.text, Some(&mut orig));

                let end_off = if end_of_line_clean(ops, i) { 1 } else { 0 };
                let clean_to_edit = edit.line + end_off;
                let clean_to_orig = orig.line + end_off;

                if clean_to_edit > clean_from_edit {
                    if i > 0 {
                        push_chunk(
                            &mut chunks,
                            Chunk::new(start_orig, clean_from_orig, start_edit, clean_from_edit),
                        );
                    }
                    start_edit = clean_to_edit;
                    start_orig = clean_to_orig;
                }
            }
            DiffKind::Insert => edit.move_over(&op.text, None),
            DiffKind::Delete => orig.move_over(&op.text, None),
        }
    }

    if start_edit <= edit.line || start_orig <= orig.line {
        let orig_to = line_end(orig);
        let edit_to = line_end(edit);
        // A clean run ending the text may have claimed the line after the
        // final break; give that line back on both sides together
        let overshoot = start_orig
            .saturating_sub(orig_to)
            .max(start_edit.saturating_sub(edit_to));
        push_chunk(
            &mut chunks,
            Chunk::new(
                start_orig.saturating_sub(overshoot),
                orig_to,
                start_edit.saturating_sub(overshoot),
                edit_to,
            ),
        );
    }

    chunks
}

/// Exclusive end line of the text ending at `pos`. A trailing line break
/// does not open another line.
fn line_end(pos: TextPos) -> usize {
    if pos.ch > 0 { pos.line + 1 } else { pos.line }
}

fn push_chunk(chunks: &mut Vec<Chunk>, chunk: Chunk) {
    if chunk.is_insertion() && chunk.is_deletion() {
        return;
    }
    chunks.push(chunk);
}

/// A line boundary sits right before the equal run at `i`.
fn start_of_line_clean(ops: &[DiffOp], i: usize) -> bool {
    if i == 0 {
        return true;
    }
    if !ops[i - 1].text.ends_with('\n') {
        return false;
    }
    if i == 1 {
        return true;
    }
    ops[i - 2].text.ends_with('\n')
}

/// A line boundary sits right after the equal run at `i`.
fn end_of_line_clean(ops: &[DiffOp], i: usize) -> bool {
    if i == ops.len() - 1 {
        return true;
    }
    let next = &ops[i + 1].text;
    if next.len() == 1 || !next.starts_with('\n') {
        return false;
    }
    if i == ops.len() - 2 {
        return true;
    }
    let after = &ops[i + 2].text;
    after.len() > 1 && after.starts_with('\n')
}
