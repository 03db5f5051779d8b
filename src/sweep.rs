//! Sweep animation keyframes.
//!
//! The renderer animates a highlight resting on each fixation in turn, and
//! a second pass decolors the text behind it. Both consume the same
//! `(offset, onset, duration)` segments, derived here, so they can never
//! fall out of sync. The host maps the segments onto whatever animation
//! primitive its platform offers.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSegment {
    /// Fixation offset this segment rests on, in chars.
    pub offset: usize,
    /// Milliseconds after line onset at which the segment activates.
    pub onset_ms: f64,
    pub duration_ms: f64,
}

/// Split a line's display duration across its fixations, proportional to
/// the char span each fixation covers (its offset up to the next one; the
/// last runs to end of line). Onsets are cumulative from zero and the
/// segments sum exactly to `duration_ms`.
pub fn sweep_segments(text: &str, fixations: &[usize], duration_ms: f64) -> Vec<SweepSegment> {
    if fixations.is_empty() || !duration_ms.is_finite() || duration_ms <= 0.0 {
        return Vec::new();
    }
    let char_len = text.chars().count();
    let clamp = |offset: usize| offset.min(char_len.saturating_sub(1));

    let first = clamp(fixations[0]);
    let total_span = char_len.saturating_sub(first).max(1) as f64;

    let mut segments = Vec::with_capacity(fixations.len());
    let mut onset = 0.0;
    for (i, &raw_offset) in fixations.iter().enumerate() {
        let offset = clamp(raw_offset);
        let duration = if i + 1 == fixations.len() {
            // Last segment absorbs floating-point remainder.
            (duration_ms - onset).max(0.0)
        } else {
            let end = clamp(fixations[i + 1]);
            let span = end.saturating_sub(offset).max(1) as f64;
            duration_ms * span / total_span
        };
        segments.push(SweepSegment {
            offset,
            onset_ms: onset,
            duration_ms: duration,
        });
        onset += duration;
    }
    segments
}
