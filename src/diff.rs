//! Character-level diff between the original and edited text.
//!
//! The raw diff comes from `similar`; [`normalize`] turns it into a
//! [`DiffSequence`] with no empty operations and no two adjacent operations
//! of the same kind, which is what the chunk extractor expects.

use similar::{Algorithm, ChangeTag, TextDiff};
use std::time::Duration;

use crate::error::DiffError;
use crate::models::Side;

/// Kind of a diff operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Equal,
    Insert,
    Delete,
}

impl From<ChangeTag> for DiffKind {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Equal => DiffKind::Equal,
            ChangeTag::Insert => DiffKind::Insert,
            ChangeTag::Delete => DiffKind::Delete,
        }
    }
}

/// A run of text that is kept, inserted or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOp {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffOp {
    pub fn new(kind: DiffKind, text: impl Into<String>) -> Self {
        DiffOp {
            kind,
            text: text.into(),
        }
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(DiffKind::Equal, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(DiffKind::Insert, text)
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(DiffKind::Delete, text)
    }
}

/// Normalized diff: no empty operations, no adjacent operations of the
/// same kind. Only constructed through [`normalize`] or [`compute_diff`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffSequence {
    ops: Vec<DiffOp>,
}

impl DiffSequence {
    pub fn ops(&self) -> &[DiffOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// True when both sides are the same text.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| op.kind == DiffKind::Equal)
    }

    /// Concatenation of the equal and deleted text.
    pub fn original_text(&self) -> String {
        self.side_text(DiffKind::Insert)
    }

    /// Concatenation of the equal and inserted text.
    pub fn edited_text(&self) -> String {
        self.side_text(DiffKind::Delete)
    }

    /// Check that this diff transforms `original` into `edited`.
    pub fn verify(&self, original: &str, edited: &str) -> Result<(), DiffError> {
        if !self.reconstructs(original, DiffKind::Insert) {
            return Err(DiffError::Inconsistent(Side::Original));
        }
        if !self.reconstructs(edited, DiffKind::Delete) {
            return Err(DiffError::Inconsistent(Side::Edited));
        }
        Ok(())
    }

    fn side_text(&self, skip: DiffKind) -> String {
        self.ops
            .iter()
            .filter(|op| op.kind != skip)
            .map(|op| op.text.as_str())
            .collect()
    }

    fn reconstructs(&self, text: &str, skip: DiffKind) -> bool {
        let mut rest = text;
        for op in self.ops.iter().filter(|op| op.kind != skip) {
            match rest.strip_prefix(op.text.as_str()) {
                Some(remaining) => rest = remaining,
                None => return false,
            }
        }
        rest.is_empty()
    }
}

impl FromIterator<DiffOp> for DiffSequence {
    fn from_iter<I: IntoIterator<Item = DiffOp>>(iter: I) -> Self {
        normalize(iter)
    }
}

/// Drop empty operations and merge adjacent operations of the same kind.
/// Normalizing an already normalized sequence returns it unchanged.
pub fn normalize<I: IntoIterator<Item = DiffOp>>(raw: I) -> DiffSequence {
    let mut ops: Vec<DiffOp> = Vec::new();
    for op in raw {
        if op.text.is_empty() {
            continue;
        }
        match ops.last_mut() {
            Some(last) if last.kind == op.kind => last.text.push_str(&op.text),
            _ => ops.push(op),
        }
    }
    DiffSequence { ops }
}

/// Character diff straight from the diff primitive, one operation per
/// character.
pub fn raw_diff(original: &str, edited: &str, timeout: Duration) -> Vec<DiffOp> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .timeout(timeout)
        .diff_chars(original, edited);

    diff.iter_all_changes()
        .map(|change| DiffOp::new(change.tag().into(), change.value()))
        .collect()
}

/// Normalized character diff from `original` to `edited`.
pub fn compute_diff(original: &str, edited: &str, timeout: Duration) -> DiffSequence {
    normalize(raw_diff(original, edited, timeout))
}


#[cfg(test)]
mod compute_tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    const PAIRS: &[(&str, &str)] = &[
        ("a\nb\nc\n", "a\nx\nc\n"),
        ("a\nb\n", "a\nb\nc\n"),
        ("a\nb\nc\n", "a\nc\n"),
        ("", "hello\n"),
        ("hello\n", ""),
        ("fn main() {\n    println!(\"hi\");\n}\n", "fn main() {\n    let x = 1;\n    println!(\"{x}\");\n}\n"),
        ("héllo wörld\n", "hello world\n"),
        ("same\n", "same\n"),
    ];

    fn assert_normalized(diff: &DiffSequence) {
        assert!(diff.ops().iter().all(|op| !op.text.is_empty()));
        assert!(diff.ops().windows(2).all(|pair| pair[0].kind != pair[1].kind));
    }

    #[test]
    fn test_compute_diff_reconstructs_both_sides() {
        for (original, edited) in PAIRS {
            let diff = compute_diff(original, edited, TIMEOUT);
            assert_eq!(diff.original_text(), *original);
            assert_eq!(diff.edited_text(), *edited);
            assert!(diff.verify(original, edited).is_ok());
            assert_normalized(&diff);
        }
    }

    #[test]
    fn test_raw_diff_is_one_char_per_op() {
        for (original, edited) in PAIRS {
            let raw = raw_diff(original, edited, TIMEOUT);
            assert!(raw.iter().all(|op| op.text.chars().count() == 1));
            assert!(raw.len() >= compute_diff(original, edited, TIMEOUT).len());
        }
    }

    #[test]
    fn test_single_line_replacement() {
        let diff = compute_diff("a\nb\nc\n", "a\nx\nc\n", TIMEOUT);
        assert_eq!(
            diff.ops(),
            &[
                DiffOp::equal("a\n"),
                DiffOp::delete("b"),
                DiffOp::insert("x"),
                DiffOp::equal("\nc\n"),
            ]
        );
    }

    #[test]
    fn test_identical_text_is_identity() {
        let diff = compute_diff("same\n", "same\n", TIMEOUT);
        assert!(diff.is_identity());
        assert_eq!(diff.len(), 1);
    }

    #[test]
    fn test_both_empty() {
        let diff = compute_diff("", "", TIMEOUT);
        assert!(diff.is_empty());
        assert!(diff.is_identity());
    }

    #[test]
    fn test_verify_rejects_wrong_text() {
        let diff = compute_diff("a\n", "b\n", TIMEOUT);
        assert_eq!(
            diff.verify("z\n", "b\n"),
            Err(DiffError::Inconsistent(Side::Original))
        );
        assert_eq!(
            diff.verify("a\n", "b\nextra"),
            Err(DiffError::Inconsistent(Side::Edited))
        );
    }
}
