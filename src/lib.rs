//! readpace — the pacing core of a speed-reading trainer.
//!
//! Given raw article text and a target reading speed, this crate lays the
//! text into fixed-width lines and pages, computes where within each line a
//! reader's gaze should be guided to fixate, derives how long each line
//! stays on screen, and drives a drift-corrected playback clock through the
//! material. Every reading mode the host offers (passive sweep, word-by-word
//! flash, recall drills) shares these functions.
//!
//! The crate performs no I/O and persists nothing. Layout, scoring and
//! timing are pure functions, recomputed whenever an input parameter
//! changes; the playback scheduler is the single stateful component and is
//! clocked externally by the host, which also makes every behavior testable
//! under a fake clock.

pub mod fixation;
pub mod lineflow;
pub mod models;
pub mod paginate;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sweep;
pub mod timing;

pub use fixation::line_fixations;
pub use lineflow::{layout_lines, AssetContext, LayoutOptions, DEFAULT_LINE_WIDTH};
pub use models::{Chunk, Line, LineType, PacingMode, Page, SaccadeSpan};
pub use paginate::{clamp_chunk_index, flatten_chunks, paginate, PageOptions};
pub use scheduler::{
    PlaybackScheduler, PlaybackSource, TickOutcome, DEFAULT_MIN_DELAY_FACTOR,
};
pub use session::PlaybackSession;
pub use settings::{PacerSettings, PageSettings};
pub use sweep::{sweep_segments, SweepSegment};
pub use timing::{
    effective_wpm, saccade_line_duration_ms, RampCurve, RampSettings, MAX_WPM, MIN_WPM,
};
