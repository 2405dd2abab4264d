//! Editor host backed by an in-memory buffer, rendered to a terminal.

use crossterm::{
    queue,
    style::{Print, ResetColor, SetForegroundColor},
};
use std::collections::BTreeMap;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

use crate::error::HostError;
use crate::host::{ChangeEvent, EditorHost, HostEvent};
use crate::models::{GutterMark, LineRange};
use crate::theme::Theme;

const CHANGED_GLYPH: &str = "▌";
const REMOVED_GLYPH: &str = "▁";

#[derive(Debug)]
pub struct TerminalHost {
    text: String,
    viewport: LineRange,
    gutter: BTreeMap<usize, GutterMark>,
    events: Vec<HostEvent>,
    /// Number of completed gutter batches
    redraws: usize,
}

impl TerminalHost {
    pub fn new(text: impl Into<String>, viewport: LineRange) -> Self {
        TerminalHost {
            text: text.into(),
            viewport,
            gutter: BTreeMap::new(),
            events: Vec::new(),
            redraws: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.text
    }

    pub fn viewport(&self) -> LineRange {
        self.viewport
    }

    pub fn gutter(&self) -> &BTreeMap<usize, GutterMark> {
        &self.gutter
    }

    pub fn redraws(&self) -> usize {
        self.redraws
    }

    pub fn set_visible_range(&mut self, range: LineRange) {
        if range != self.viewport {
            self.viewport = range;
            self.events.push(HostEvent::ViewportChanged);
        }
    }

    /// Replace lines `from_line..=to_line` with `replacement` (which may span
    /// several lines) and queue the change notification.
    pub fn replace_lines(&mut self, from_line: usize, to_line: usize, replacement: &str) {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let last = lines.len() - 1;
        let from = from_line.min(last);
        let to = to_line.clamp(from, last);

        let mut replaced: Vec<&str> = lines[..from].to_vec();
        replaced.extend(replacement.split('\n'));
        replaced.extend_from_slice(&lines[to + 1..]);
        self.text = replaced.join("\n");
        self.events.push(HostEvent::Changed(ChangeEvent::new(from, to, replacement)));
    }

    /// Print the visible lines with their gutter marks.
    pub fn render<W: Write>(&self, out: &mut W, theme: Theme, width: u16) -> io::Result<()> {
        let colors = theme.colors();
        let lines: Vec<&str> = self.text.split('\n').collect();
        let end = self.viewport.to.min(lines.len());
        let number_width = end.max(1).to_string().len();
        // mark column, number, one space
        let text_width = (width as usize).saturating_sub(number_width + 2);

        for line in self.viewport.from.min(end)..end {
            match self.gutter.get(&line) {
                Some(GutterMark::Changed) => queue!(
                    out,
                    SetForegroundColor(colors.changed_fg),
                    Print(CHANGED_GLYPH),
                    ResetColor
                )?,
                Some(GutterMark::Removed) => queue!(
                    out,
                    SetForegroundColor(colors.removed_fg),
                    Print(REMOVED_GLYPH),
                    ResetColor
                )?,
                None => queue!(out, Print(" "))?,
            }
            queue!(
                out,
                SetForegroundColor(colors.line_number_fg),
                Print(format!("{:>width$} ", line + 1, width = number_width)),
                SetForegroundColor(colors.text_fg),
                Print(truncate_to_width(lines[line], text_width)),
                ResetColor,
                Print("\n")
            )?;
        }
        out.flush()
    }
}

impl EditorHost for TerminalHost {
    fn text(&self) -> Result<String, HostError> {
        Ok(self.text.clone())
    }

    fn visible_range(&self) -> Result<LineRange, HostError> {
        Ok(self.viewport)
    }

    fn clip_line(&self, line: usize) -> usize {
        line.min(self.line_count().saturating_sub(1))
    }

    fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    fn set_line_annotation(&mut self, line: usize, mark: GutterMark) {
        if self.gutter.insert(line, mark) != Some(mark) {
            self.events.push(HostEvent::MarkerAdded);
        }
    }

    fn clear_all_annotations(&mut self) {
        if !self.gutter.is_empty() {
            self.gutter.clear();
            self.events.push(HostEvent::MarkerCleared);
        }
    }

    fn batch<F: FnOnce(&mut Self)>(&mut self, apply: F) {
        apply(self);
        self.redraws += 1;
    }

    fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Cut `text` to at most `max_width` terminal columns.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let char_width = ch.width().unwrap_or(0);
        if current_width + char_width > max_width {
            break;
        }
        result.push(ch);
        current_width += char_width;
    }

    result
}
