//! Capabilities a diff session needs from the editor it annotates.
//!
//! The session never touches editor internals directly. Everything goes
//! through [`EditorHost`], so the core runs against a terminal buffer, a
//! GUI widget or a test fake alike.

use crate::diff::DiffSequence;
use crate::error::HostError;
use crate::models::{GutterMark, LineRange};

pub trait EditorHost {
    /// Current content of the edited buffer.
    fn text(&self) -> Result<String, HostError>;

    /// Visible line range of the edited buffer, end exclusive.
    fn visible_range(&self) -> Result<LineRange, HostError>;

    /// Clamp `line` to an existing line index.
    fn clip_line(&self, line: usize) -> usize;

    fn line_count(&self) -> usize;

    fn set_line_annotation(&mut self, line: usize, mark: GutterMark);

    fn clear_all_annotations(&mut self);

    /// Apply all gutter updates made by `apply` as one visual update.
    fn batch<F: FnOnce(&mut Self)>(&mut self, apply: F)
    where
        Self: Sized,
    {
        apply(self);
    }

    /// Notifications queued by the editor since the last call.
    fn drain_events(&mut self) -> Vec<HostEvent> {
        Vec::new()
    }

    /// Called after every successful recompute.
    fn diff_updated(&mut self, _diff: &DiffSequence) {}
}

/// An edit of the buffer: lines `from_line..=to_line` were replaced by
/// text spanning `inserted_lines` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub from_line: usize,
    pub to_line: usize,
    pub inserted_lines: usize,
}

impl ChangeEvent {
    pub fn new(from_line: usize, to_line: usize, replacement: &str) -> Self {
        ChangeEvent {
            from_line,
            to_line,
            inserted_lines: replacement.split('\n').count(),
        }
    }

    /// The edit added or removed line breaks.
    pub fn changes_line_count(&self) -> bool {
        self.inserted_lines.saturating_sub(1) != self.to_line.saturating_sub(self.from_line)
    }
}

/// Notifications delivered by the host editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Changed(ChangeEvent),
    MarkerAdded,
    MarkerCleared,
    ViewportChanged,
}
