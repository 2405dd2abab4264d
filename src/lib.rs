//! Line-level change gutter for an editor buffer.
//!
//! A [`Session`] diffs an original text snapshot against the live text of an
//! [`EditorHost`], projects the character diff onto line-aligned
//! [`Chunk`]s and keeps gutter annotations for the visible lines in sync as
//! the buffer is edited and scrolled.

pub mod annotator;
pub mod chunks;
pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod host;
pub mod models;
pub mod navigation;
pub mod position;
pub mod scheduler;
pub mod session;
pub mod terminal;
pub mod theme;

pub use annotator::{AnnotationWindow, ViewportAnnotator};
pub use chunks::extract_chunks;
pub use config::GutterConfig;
pub use diff::{DiffKind, DiffOp, DiffSequence, compute_diff, normalize};
pub use error::{ConfigError, DiffError, HostError, SessionError};
pub use host::{ChangeEvent, EditorHost, HostEvent};
pub use models::{Chunk, Direction, GutterMark, LineRange, Side};
pub use navigation::{find_next_chunk_boundary, find_prev_chunk_boundary};
pub use session::{Session, SessionState};
