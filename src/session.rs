//! Playback session: the glue between pages, chunks, timing and the
//! scheduler.
//!
//! One session exists per actively read article. It owns the flattened
//! chunk list and the only scheduler instance, tracks how long the current
//! continuous play stretch has lasted (the ramp input), and reports the
//! chunk index the host persists as "last read".

use crate::models::{Chunk, Page};
use crate::paginate::{clamp_chunk_index, flatten_chunks};
use crate::scheduler::{PlaybackScheduler, PlaybackSource, TickOutcome};
use crate::settings::PacerSettings;
use crate::timing::{effective_wpm, saccade_line_duration_ms};
use log::debug;

pub struct PlaybackSession {
    pages: Vec<Page>,
    chunks: Vec<Chunk>,
    cursor: usize,
    scheduler: PlaybackScheduler,
    settings: PacerSettings,
    /// Start of the current continuous play stretch. Ramp progress is
    /// measured from here and starts over on every resume.
    play_started_ms: Option<f64>,
}

/// Adapter presenting the cursor/chunk list to the scheduler.
struct CursorSource<'a> {
    chunks: &'a [Chunk],
    cursor: &'a mut usize,
    wpm: f64,
}

impl PlaybackSource for CursorSource<'_> {
    fn next_duration_ms(&mut self) -> Option<f64> {
        self.chunks
            .get(*self.cursor)
            .map(|chunk| saccade_line_duration_ms(chunk.char_len(), self.wpm))
    }

    fn advance(&mut self) {
        *self.cursor += 1;
    }
}

impl PlaybackSession {
    pub fn new(pages: Vec<Page>, settings: PacerSettings) -> Self {
        let chunks = flatten_chunks(&pages);
        debug!(
            "session created: {} pages, {} chunks",
            pages.len(),
            chunks.len()
        );
        Self {
            pages,
            chunks,
            cursor: 0,
            scheduler: PlaybackScheduler::new(settings.min_delay_factor),
            settings,
            play_started_ms: None,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Index of the chunk currently on screen; what the host persists.
    pub fn chunk_index(&self) -> usize {
        clamp_chunk_index(self.cursor, self.chunks.len())
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn current_chunk(&self) -> Option<&Chunk> {
        self.chunks.get(self.cursor)
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn deadline_ms(&self) -> Option<f64> {
        self.scheduler.deadline_ms()
    }

    /// Milliseconds of the current continuous play stretch. Zero while
    /// paused: pausing ends the stretch and the ramp warms up again on
    /// resume.
    pub fn elapsed_play_ms(&self, now_ms: f64) -> f64 {
        match self.play_started_ms {
            Some(started) => (now_ms - started).max(0.0),
            None => 0.0,
        }
    }

    /// Effective WPM at `now_ms`, with the session ramp applied.
    pub fn wpm_at(&self, now_ms: f64) -> f64 {
        effective_wpm(
            self.settings.wpm,
            self.elapsed_play_ms(now_ms),
            &self.settings.ramp,
        )
    }

    pub fn play(&mut self, now_ms: f64) -> bool {
        let started = self.scheduler.play();
        if started {
            self.play_started_ms = Some(now_ms);
        }
        started
    }

    pub fn pause(&mut self) {
        self.scheduler.pause();
        self.play_started_ms = None;
    }

    pub fn toggle(&mut self, now_ms: f64) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now_ms);
        }
    }

    /// Drive playback. The host calls this when its timer fires (and once
    /// right after `play`), then sleeps until `deadline_ms`.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        let wpm = self.wpm_at(now_ms);
        let mut source = CursorSource {
            chunks: &self.chunks,
            cursor: &mut self.cursor,
            wpm,
        };
        let outcome = self.scheduler.tick(now_ms, &mut source);
        if outcome == TickOutcome::Stopped {
            self.play_started_ms = None;
        }
        outcome
    }

    /// Jump to a stored chunk index; out-of-range values saturate.
    pub fn seek(&mut self, index: usize) {
        self.cursor = clamp_chunk_index(index, self.chunks.len());
    }

    /// Duration the current chunk would stay on screen at `now_ms`.
    pub fn current_duration_ms(&self, now_ms: f64) -> Option<f64> {
        self.current_chunk()
            .map(|chunk| saccade_line_duration_ms(chunk.char_len(), self.wpm_at(now_ms)))
    }

    /// Replace the laid-out material (article or display-mode change).
    /// Scheduler state and play-time tracking are discarded, never carried
    /// across layouts.
    pub fn set_pages(&mut self, pages: Vec<Page>) {
        self.chunks = flatten_chunks(&pages);
        self.pages = pages;
        self.cursor = 0;
        self.scheduler = PlaybackScheduler::new(self.settings.min_delay_factor);
        self.play_started_ms = None;
        debug!("session reset: {} chunks", self.chunks.len());
    }

    pub fn settings(&self) -> &PacerSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Line;
    use crate::paginate::{paginate, PageOptions};

    fn session_with_lines(texts: &[&str]) -> PlaybackSession {
        let lines: Vec<Line> = texts.iter().map(|text| Line::body(*text)).collect();
        let pages = paginate(lines, &PageOptions::default());
        let mut settings = PacerSettings::default();
        settings.wpm = 300.0;
        PlaybackSession::new(pages, settings)
    }

    #[test]
    fn test_session_advances_through_chunks() {
        // Two 5-char lines at 300 WPM: 200ms each.
        let mut session = session_with_lines(&["alpha", "betas"]);
        assert_eq!(session.chunk_count(), 2);

        session.play(0.0);
        assert_eq!(session.tick(0.0), TickOutcome::Scheduled);
        assert_eq!(session.chunk_index(), 0);
        assert_eq!(session.deadline_ms(), Some(200.0));

        assert_eq!(session.tick(200.0), TickOutcome::Advanced);
        assert_eq!(session.chunk_index(), 1);

        // Advancing past the last chunk stops playback cleanly.
        assert_eq!(session.tick(400.0), TickOutcome::Stopped);
        assert!(!session.is_playing());
    }

    #[test]
    fn test_empty_session_stops_immediately() {
        let mut session = PlaybackSession::new(Vec::new(), PacerSettings::default());
        session.play(0.0);
        assert_eq!(session.tick(0.0), TickOutcome::Stopped);
        assert_eq!(session.chunk_index(), 0);
    }

    #[test]
    fn test_pause_resets_ramp_stretch() {
        let mut session = session_with_lines(&["alpha", "betas", "gamma"]);
        session.play(0.0);
        assert_eq!(session.elapsed_play_ms(5_000.0), 5_000.0);

        session.pause();
        assert_eq!(session.elapsed_play_ms(9_000.0), 0.0);

        // Resuming starts a fresh continuous stretch.
        session.play(10_000.0);
        assert_eq!(session.elapsed_play_ms(12_500.0), 2_500.0);
    }

    #[test]
    fn test_ramp_applies_to_chunk_durations() {
        let mut session = session_with_lines(&["alpha", "betas"]);
        session.settings.ramp.rate = 30.0;
        session.settings.ramp.interval_secs = 10.0;
        session.settings.ramp.start_percent = 50.0;

        // Not playing: no stretch, ramp at its start percentage.
        assert_eq!(session.wpm_at(0.0), 150.0);
        session.play(0.0);
        assert_eq!(session.wpm_at(0.0), 150.0);
        // 150 WPM on a 5-char chunk: 400ms.
        assert_eq!(session.current_duration_ms(0.0), Some(400.0));
        assert!(session.wpm_at(30_000.0) > 150.0);
    }

    #[test]
    fn test_seek_saturates() {
        let mut session = session_with_lines(&["alpha", "betas", "gamma"]);
        session.seek(999);
        assert_eq!(session.chunk_index(), 2);
        session.seek(1);
        assert_eq!(session.chunk_index(), 1);
    }

    #[test]
    fn test_set_pages_discards_scheduler_state() {
        let mut session = session_with_lines(&["alpha", "betas"]);
        session.play(0.0);
        session.tick(0.0);
        session.tick(200.0);
        assert_eq!(session.chunk_index(), 1);

        let pages = paginate(vec![Line::body("fresh content")], &PageOptions::default());
        session.set_pages(pages);
        assert_eq!(session.chunk_index(), 0);
        assert!(!session.is_playing());
        assert_eq!(session.deadline_ms(), None);
        assert_eq!(session.elapsed_play_ms(1_000.0), 0.0);
    }
}
