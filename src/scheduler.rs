//! Drift-corrected playback scheduling.
//!
//! The scheduler is the only stateful piece of the crate. It is clocked
//! externally: the host calls [`PlaybackScheduler::tick`] with its notion of
//! "now" in milliseconds (wall clock in production, a counter in tests) and
//! sleeps until [`PlaybackScheduler::deadline_ms`]. Expected completion
//! times accumulate against a fixed origin instead of being recomputed from
//! `now` on every pass, so per-tick rounding and late wakeups never compound.

use log::debug;

pub const DEFAULT_MIN_DELAY_FACTOR: f64 = 0.75;

/// Host-side content the scheduler paces through.
pub trait PlaybackSource {
    /// Display duration of the current chunk, in milliseconds. `None` or a
    /// non-positive value signals that nothing is left to display; the
    /// scheduler stops cleanly.
    fn next_duration_ms(&mut self) -> Option<f64>;

    /// Move to the next chunk. Invoked exactly once per elapsed deadline.
    fn advance(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing, or the pending deadline has not elapsed yet.
    Idle,
    /// First pass after play: a deadline was scheduled, nothing advanced.
    Scheduled,
    /// A deadline elapsed: the source advanced and the next deadline is set.
    Advanced,
    /// The source ran out of durations; playback stopped. May directly
    /// follow a final advance.
    Stopped,
}

#[derive(Debug)]
pub struct PlaybackScheduler {
    playing: bool,
    first_pass_since_resume: bool,
    expected_completion_ms: f64,
    deadline_ms: Option<f64>,
    min_delay_factor: f64,
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DELAY_FACTOR)
    }
}

impl PlaybackScheduler {
    /// `min_delay_factor` bounds how fast playback may catch up after a
    /// late tick: the scheduled delay never drops below `factor × nominal`.
    /// Values outside `[0, 1]` (or non-finite ones) are saturated.
    pub fn new(min_delay_factor: f64) -> Self {
        let factor = if min_delay_factor.is_finite() {
            min_delay_factor.clamp(0.0, 1.0)
        } else {
            DEFAULT_MIN_DELAY_FACTOR
        };
        Self {
            playing: false,
            first_pass_since_resume: true,
            expected_completion_ms: 0.0,
            deadline_ms: None,
            min_delay_factor: factor,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn min_delay_factor(&self) -> f64 {
        self.min_delay_factor
    }

    /// The pending deadline the host should wake at, if any.
    pub fn deadline_ms(&self) -> Option<f64> {
        self.deadline_ms
    }

    /// Start playback. A no-op when already playing. The next scheduling
    /// pass re-bases the expected-completion origin at its `now`, so a
    /// resume never chases a deadline left over from before the pause.
    pub fn play(&mut self) -> bool {
        if self.playing {
            return false;
        }
        self.playing = true;
        self.first_pass_since_resume = true;
        self.deadline_ms = None;
        debug!("playback started");
        true
    }

    /// Stop playback and cancel the pending deadline. Idempotent; after
    /// this, no deadline exists and `tick` does nothing.
    pub fn pause(&mut self) {
        if self.playing {
            debug!("playback paused");
        }
        self.playing = false;
        self.deadline_ms = None;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// External gate (display mode switches, focus loss). Disabling behaves
    /// like pause; re-enabling restarts the timing origin from "now" with no
    /// attempt to catch up time lost while disabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.play();
        } else {
            self.pause();
        }
    }

    /// Drive the state machine. Call whenever the host timer fires (and once
    /// right after `play`). Fires at most one advance per call; exactly one
    /// deadline is pending afterwards unless playback stopped.
    pub fn tick<S: PlaybackSource>(&mut self, now_ms: f64, source: &mut S) -> TickOutcome {
        if !self.playing {
            return TickOutcome::Idle;
        }
        match self.deadline_ms {
            None => self.schedule_pass(now_ms, source, TickOutcome::Scheduled),
            Some(deadline) if now_ms >= deadline => {
                source.advance();
                self.schedule_pass(now_ms, source, TickOutcome::Advanced)
            }
            Some(_) => TickOutcome::Idle,
        }
    }

    fn schedule_pass<S: PlaybackSource>(
        &mut self,
        now_ms: f64,
        source: &mut S,
        outcome: TickOutcome,
    ) -> TickOutcome {
        let duration = source.next_duration_ms().unwrap_or(0.0);
        if !duration.is_finite() || duration <= 0.0 {
            // Normal end-of-content signal, not an error.
            debug!("no duration left; stopping playback");
            self.playing = false;
            self.deadline_ms = None;
            return TickOutcome::Stopped;
        }

        self.expected_completion_ms = if self.first_pass_since_resume {
            now_ms + duration
        } else {
            self.expected_completion_ms + duration
        };
        self.first_pass_since_resume = false;

        // Replacing the deadline is the cancellation: at most one timer is
        // ever outstanding. Catching up after a slow tick is bounded below
        // by factor × nominal; when behind schedule the delay shrinks toward
        // that bound, when on time it equals the nominal duration.
        let delay = (duration * self.min_delay_factor).max(self.expected_completion_ms - now_ms);
        self.deadline_ms = Some(now_ms + delay);
        outcome
    }
}
