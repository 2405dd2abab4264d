//! A diff session between an original text snapshot and a live editor.
//!
//! The session owns the current diff, its chunks and the annotation window,
//! reacts to host notifications, and recomputes on a debounce timer. All
//! entry points run synchronously on the caller's thread.

use std::time::{Duration, Instant};

use crate::annotator::{AnnotationWindow, ViewportAnnotator};
use crate::chunks::extract_chunks;
use crate::config::GutterConfig;
use crate::diff::{DiffSequence, compute_diff};
use crate::error::{DiffError, SessionError};
use crate::host::{EditorHost, HostEvent};
use crate::models::{Chunk, Direction, LineRange, Side};
use crate::navigation::find_chunk_boundary;
use crate::scheduler::{UpdateScheduler, UpdateSpeed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Diff and chunks match the edited text
    Clean,
    /// The edited text changed since the last recompute
    Stale,
    /// The host failed; nothing is scheduled any more
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateMode {
    Full,
    Incremental,
}

/// Diff, chunks and annotation window of one session.
#[derive(Debug)]
pub struct DiffState {
    original: String,
    diff: DiffSequence,
    chunks: Vec<Chunk>,
    window: AnnotationWindow,
    state: SessionState,
    /// A diff has been installed at least once
    computed: bool,
}

impl DiffState {
    fn new(original: String) -> Self {
        DiffState {
            original,
            diff: DiffSequence::default(),
            chunks: Vec::new(),
            window: AnnotationWindow::default(),
            state: SessionState::Stale,
            computed: false,
        }
    }

    fn recompute(&mut self, edited: &str, timeout: Duration) -> Result<(), DiffError> {
        let diff = compute_diff(&self.original, edited, timeout);
        self.apply(diff, edited)
    }

    /// Install `diff` and its chunks. A diff that does not describe the two
    /// texts is rejected and the last good result stays current, as Clean
    /// once there has been one.
    fn apply(&mut self, diff: DiffSequence, edited: &str) -> Result<(), DiffError> {
        if let Err(err) = diff.verify(&self.original, edited) {
            if self.computed {
                self.state = SessionState::Clean;
            }
            return Err(err);
        }
        self.chunks = extract_chunks(&diff);
        self.diff = diff;
        self.state = SessionState::Clean;
        self.computed = true;
        Ok(())
    }
}

pub struct Session<H: EditorHost> {
    host: H,
    config: GutterConfig,
    diff_state: DiffState,
    annotator: ViewportAnnotator,
    scheduler: UpdateScheduler,
    show_differences: bool,
    /// Set while an update pass runs; scheduling requests are dropped
    updating: bool,
}

impl<H: EditorHost> Session<H> {
    /// Start a session comparing `original` with the host's live text, and
    /// annotate the current viewport.
    pub fn new(original: impl Into<String>, host: H, config: GutterConfig) -> Result<Self, SessionError> {
        let mut session = Session {
            host,
            annotator: ViewportAnnotator::new(config.viewport_slack),
            scheduler: UpdateScheduler::new(config.fast_delay(), config.slow_delay()),
            show_differences: config.show_differences,
            config,
            diff_state: DiffState::new(original.into()),
            updating: false,
        };
        session.update(UpdateMode::Incremental)?;
        Ok(session)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &GutterConfig {
        &self.config
    }

    pub fn original(&self) -> &str {
        &self.diff_state.original
    }

    pub fn state(&self) -> SessionState {
        self.diff_state.state
    }

    pub fn is_valid(&self) -> bool {
        self.diff_state.state != SessionState::Invalid
    }

    /// Last computed diff; may lag behind the host while the session is stale.
    pub fn diff(&self) -> &DiffSequence {
        &self.diff_state.diff
    }

    pub fn window(&self) -> &AnnotationWindow {
        &self.diff_state.window
    }

    pub fn annotations_enabled(&self) -> bool {
        self.show_differences
    }

    /// Turning annotations off clears the gutter right away; turning them on
    /// recomputes the diff and annotates the viewport from scratch.
    pub fn set_annotations_enabled(&mut self, enabled: bool) -> Result<(), SessionError> {
        self.ensure_valid()?;
        if enabled == self.show_differences {
            return Ok(());
        }
        self.show_differences = enabled;
        if enabled {
            self.diff_state.state = SessionState::Stale;
        }
        self.update(UpdateMode::Full)
    }

    /// Rebuild the annotations from scratch now, without waiting for the timer.
    pub fn force_update(&mut self) -> Result<(), SessionError> {
        self.ensure_valid()?;
        self.scheduler.cancel();
        self.update(UpdateMode::Full)
    }

    /// Chunks for the current edited text, recomputing first if stale.
    pub fn chunks(&mut self) -> Result<&[Chunk], SessionError> {
        self.ensure_valid()?;
        let result = self.ensure_diff();
        self.check_host(result)?;
        Ok(&self.diff_state.chunks)
    }

    /// Nearest chunk boundary before or after `line` on `side`.
    pub fn find_chunk_boundary(
        &mut self,
        line: usize,
        side: Side,
        direction: Direction,
    ) -> Result<Option<usize>, SessionError> {
        let chunks = self.chunks()?;
        Ok(find_chunk_boundary(chunks, line, side, direction))
    }

    /// React to one host notification.
    pub fn handle_event(&mut self, event: HostEvent, now: Instant) {
        if !self.is_valid() {
            return;
        }
        let speed = self.absorb_event(event);
        if self.updating {
            log::trace!("ignoring {:?} raised by our own update", event);
            return;
        }
        self.scheduler.schedule(now, speed);
    }

    /// Deliver queued host notifications, then run the update if it is due.
    /// Returns whether an update ran.
    pub fn pump(&mut self, now: Instant) -> Result<bool, SessionError> {
        for event in self.host.drain_events() {
            self.handle_event(event, now);
        }
        self.poll(now)
    }

    /// Run the pending update if its deadline has passed.
    /// Returns whether an update ran.
    pub fn poll(&mut self, now: Instant) -> Result<bool, SessionError> {
        self.ensure_valid()?;
        if !self.scheduler.take_due(now) {
            return Ok(false);
        }
        self.update(UpdateMode::Incremental)?;
        Ok(true)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// How long the host may wait for input before calling [`Session::poll`].
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.scheduler.timeout(now)
    }

    /// Tear the session down, cancelling any pending update.
    pub fn end(mut self) -> H {
        self.scheduler.cancel();
        log::debug!("diff session ended");
        self.host
    }

    /// State changes caused by `event`, and the debounce it asks for.
    fn absorb_event(&mut self, event: HostEvent) -> UpdateSpeed {
        match event {
            HostEvent::Changed(change) => {
                if self.diff_state.state == SessionState::Clean {
                    self.diff_state.state = SessionState::Stale;
                    self.diff_state.window.invalidate();
                }
                if change.changes_line_count() {
                    UpdateSpeed::Fast
                } else {
                    UpdateSpeed::Slow
                }
            }
            HostEvent::MarkerAdded | HostEvent::MarkerCleared | HostEvent::ViewportChanged => {
                UpdateSpeed::Slow
            }
        }
    }

    fn update(&mut self, mode: UpdateMode) -> Result<(), SessionError> {
        self.updating = true;
        let result = self.run_update(mode);
        for event in self.host.drain_events() {
            if self.is_valid() {
                self.absorb_event(event);
            }
        }
        self.updating = false;
        self.check_host(result)
    }

    fn run_update(&mut self, mode: UpdateMode) -> Result<(), SessionError> {
        if mode == UpdateMode::Full {
            self.diff_state.window.invalidate();
            if !self.show_differences {
                let marked = &mut self.diff_state.window.marked;
                self.host.batch(|host| host.clear_all_annotations());
                marked.clear();
            }
        }

        self.ensure_diff()?;

        if self.show_differences {
            let visible = self.visible_range()?;
            self.annotator.annotate(
                &mut self.host,
                &self.diff_state.chunks,
                &mut self.diff_state.window,
                visible,
            );
        }
        Ok(())
    }

    fn ensure_diff(&mut self) -> Result<(), SessionError> {
        if self.diff_state.state != SessionState::Stale {
            return Ok(());
        }
        let edited = self.host.text()?;
        if let Err(err) = self.diff_state.recompute(&edited, self.config.diff_timeout()) {
            log::warn!("keeping previous chunks: {}", err);
            return Err(err.into());
        }
        self.host.diff_updated(&self.diff_state.diff);
        log::debug!(
            "recomputed diff: {} chunks over {} lines",
            self.diff_state.chunks.len(),
            self.host.line_count()
        );
        Ok(())
    }

    /// Host viewport clamped to existing lines.
    fn visible_range(&self) -> Result<LineRange, SessionError> {
        let range = self.host.visible_range()?;
        let to = if range.to == 0 {
            0
        } else {
            self.host.clip_line(range.to - 1) + 1
        };
        Ok(LineRange::new(range.from.min(to), to))
    }

    fn ensure_valid(&self) -> Result<(), SessionError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(SessionError::Invalid)
        }
    }

    /// A host failure invalidates the session for good.
    fn check_host<T>(&mut self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(SessionError::Host(err)) = &result {
            log::warn!("host failed, stopping diff session: {}", err);
            self.diff_state.state = SessionState::Invalid;
            self.scheduler.cancel();
        }
        result
    }
}


#[cfg(test)]
mod scheduling_tests {
    use super::*;
    use crate::host::ChangeEvent;
    use crate::host::fake::FakeHost;
    use crate::models::GutterMark;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn session(original: &str) -> Session<FakeHost> {
        let host = FakeHost::new(original, LineRange::new(0, 50));
        Session::new(original, host, GutterConfig::default()).unwrap()
    }

    #[test]
    fn test_in_line_edit_uses_slow_debounce() {
        let t0 = Instant::now();
        let mut session = session("a\nb\n");
        session.host_mut().edit("a\nbx\n", ChangeEvent::new(1, 1, "x"));
        session.pump(t0).unwrap();

        assert_eq!(session.state(), SessionState::Stale);
        assert_eq!(session.next_deadline(), Some(t0 + ms(250)));
    }

    #[test]
    fn test_newline_edit_uses_fast_debounce() {
        let t0 = Instant::now();
        let mut session = session("a\nb\n");
        session.host_mut().edit("a\n\nb\n", ChangeEvent::new(1, 1, "\n"));
        session.pump(t0).unwrap();

        assert_eq!(session.next_deadline(), Some(t0 + ms(20)));
        assert!(session.poll(t0 + ms(20)).unwrap());
        assert_eq!(session.state(), SessionState::Clean);
        assert_eq!(session.host().marked_lines(), vec![(1, GutterMark::Changed)]);
    }

    #[test]
    fn test_rapid_edits_coalesce_into_one_recompute() {
        let t0 = Instant::now();
        let mut session = session("abc\n");
        let mut text = String::from("abc");
        for i in 0..5u64 {
            text.push('x');
            let edited = format!("{}\n", text);
            session.host_mut().edit(&edited, ChangeEvent::new(0, 0, "x"));
            assert!(!session.pump(t0 + ms(i * 40)).unwrap());
        }

        assert!(!session.poll(t0 + ms(160 + 249)).unwrap());
        assert!(session.poll(t0 + ms(160 + 250)).unwrap());
        assert!(!session.poll(t0 + ms(2000)).unwrap());
        // one recompute at creation, one for the burst
        assert_eq!(session.host().diff_updates, 2);
        assert_eq!(session.host().marked_lines(), vec![(0, GutterMark::Changed)]);
    }

    #[test]
    fn test_change_resets_window() {
        let t0 = Instant::now();
        let mut session = session("a\nb\n");
        assert!(!session.window().is_empty());

        session.handle_event(HostEvent::Changed(ChangeEvent::new(0, 0, "z")), t0);
        assert!(session.window().is_empty());
    }

    #[test]
    fn test_viewport_change_does_not_mark_stale() {
        let t0 = Instant::now();
        let mut session = session("a\nb\n");
        session.handle_event(HostEvent::ViewportChanged, t0);

        assert_eq!(session.state(), SessionState::Clean);
        assert_eq!(session.next_deadline(), Some(t0 + ms(250)));
        assert!(session.poll(t0 + ms(250)).unwrap());
        assert_eq!(session.host().diff_updates, 1);
    }

    #[test]
    fn test_marker_event_schedules_without_invalidating() {
        let t0 = Instant::now();
        let mut session = session("a\n");
        session.handle_event(HostEvent::MarkerAdded, t0);
        assert_eq!(session.state(), SessionState::Clean);
        assert!(!session.window().is_empty());
        assert_eq!(session.next_deadline(), Some(t0 + ms(250)));
    }

    #[test]
    fn test_own_marker_churn_does_not_reschedule() {
        let t0 = Instant::now();
        let mut host = FakeHost::new("a\nb\nc\n", LineRange::new(0, 10));
        host.echo_markers = true;
        let mut session = Session::new("a\nc\n", host, GutterConfig::default()).unwrap();
        assert!(session.next_deadline().is_none());

        session.host_mut().edit("a\nB\nc\n", ChangeEvent::new(1, 1, "B"));
        session.pump(t0).unwrap();
        assert!(session.poll(t0 + ms(250)).unwrap());

        assert!(session.host().events.is_empty());
        assert!(session.next_deadline().is_none());
    }

    #[test]
    fn test_scrolling_annotates_new_lines() {
        let t0 = Instant::now();
        let original: String = (0..60).map(|i| format!("line {}\n", i)).collect();
        let edited = original.replace("line 5\n", "LINE 5\n").replace("line 40\n", "LINE 40\n");
        let host = FakeHost::new(&edited, LineRange::new(0, 20));
        let mut session = Session::new(original, host, GutterConfig::default()).unwrap();
        assert_eq!(session.host().marked_lines(), vec![(5, GutterMark::Changed)]);

        session.host_mut().visible = LineRange::new(25, 45);
        session.handle_event(HostEvent::ViewportChanged, t0);
        session.poll(t0 + ms(250)).unwrap();

        assert_eq!(
            session.host().marked_lines(),
            vec![(5, GutterMark::Changed), (40, GutterMark::Changed)]
        );
        assert_eq!(session.window().range(), LineRange::new(0, 45));
    }
}


#[cfg(test)]
mod diff_state_tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn test_rejected_diff_keeps_last_good_chunks() {
        let mut state = DiffState::new("a\nb\n".to_string());
        state.recompute("a\nx\n", TIMEOUT).unwrap();
        let good = state.chunks.clone();

        state.state = SessionState::Stale;
        let mismatched = compute_diff("a\nb\n", "a\ny\n", TIMEOUT);
        assert_eq!(
            state.apply(mismatched, "a\nz\n"),
            Err(DiffError::Inconsistent(Side::Edited))
        );
        assert_eq!(state.state, SessionState::Clean);
        assert_eq!(state.chunks, good);
        assert_eq!(state.diff.edited_text(), "a\nx\n");
    }

    #[test]
    fn test_rejected_first_diff_stays_stale() {
        let mut state = DiffState::new("a\n".to_string());
        let mismatched = compute_diff("b\n", "a\n", TIMEOUT);

        assert_eq!(
            state.apply(mismatched, "a\n"),
            Err(DiffError::Inconsistent(Side::Original))
        );
        assert_eq!(state.state, SessionState::Stale);
        assert!(state.chunks.is_empty());
    }
}
