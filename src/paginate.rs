//! Span-weighted pagination and chunk construction.
//!
//! Lines are packed greedily into pages under a line budget. Figures and
//! equations reserve extra vertical span so a rendered image plus its
//! caption never gets clipped against the viewport bottom; whichever line
//! would overflow the budget starts a fresh page instead.

use crate::fixation::{orp_offset, word_tokens};
use crate::models::{Chunk, Line, LineType, PacingMode, Page, SaccadeSpan};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    /// Span budget per page, in ordinary-line units.
    pub lines_per_page: usize,
    /// Fraction of the page a figure image reserves.
    pub figure_span_ratio: f64,
    /// Minimum span a figure reserves regardless of page size.
    pub figure_span_floor: usize,
    /// Upper bound on extra span granted for a wrapped caption.
    pub caption_overflow_cap: usize,
    /// Width used to estimate how many lines a caption wraps to.
    pub line_width: usize,
    pub mode: PacingMode,
    /// Recall mode: figure lines become blanks with no chunks.
    pub suppress_figures: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            lines_per_page: 18,
            figure_span_ratio: 0.4,
            figure_span_floor: 5,
            caption_overflow_cap: 4,
            line_width: crate::lineflow::DEFAULT_LINE_WIDTH,
            mode: PacingMode::Line,
            suppress_figures: false,
        }
    }
}

/// Vertical span a line occupies when packing: 1 for ordinary lines, 2 for
/// equations, and for figures the reserved image span plus capped caption
/// overflow.
fn line_span(line: &Line, opts: &PageOptions) -> usize {
    match line.kind {
        LineType::Figure if line.is_equation => 2,
        LineType::Figure => {
            let base = ((opts.lines_per_page as f64 * opts.figure_span_ratio).round() as usize)
                .max(opts.figure_span_floor);
            let caption_lines = line
                .char_len()
                .div_ceil(opts.line_width.max(1))
                .max(1);
            let extra = (caption_lines - 1).min(opts.caption_overflow_cap);
            (base + extra).max(1)
        }
        _ => 1,
    }
}

/// Pack lines into pages under the span budget. A page only exceeds the
/// budget when a single line is itself over-budget: every page holds at
/// least one line, never zero.
pub fn paginate(lines: Vec<Line>, opts: &PageOptions) -> Vec<Page> {
    let budget = opts.lines_per_page.max(1);

    let mut grouped: Vec<Vec<Line>> = Vec::new();
    let mut current: Vec<Line> = Vec::new();
    let mut used = 0usize;
    for line in lines {
        let span = line_span(&line, opts);
        if !current.is_empty() && used + span > budget {
            grouped.push(std::mem::take(&mut current));
            used = 0;
        }
        used += span;
        current.push(line);
    }
    if !current.is_empty() {
        grouped.push(current);
    }

    let pages: Vec<Page> = grouped
        .into_iter()
        .enumerate()
        .map(|(page_index, mut lines)| {
            if opts.suppress_figures {
                for line in &mut lines {
                    if line.kind == LineType::Figure {
                        *line = Line::blank();
                    }
                }
            }
            let line_chunks = lines
                .iter()
                .enumerate()
                .map(|(line_index, line)| chunk_line(line, page_index, line_index, opts.mode))
                .collect();
            Page { lines, line_chunks }
        })
        .collect();

    debug!(
        "packed {} lines into {} pages (budget {})",
        pages.iter().map(Page::line_count).sum::<usize>(),
        pages.len(),
        budget
    );
    pages
}

/// Chunks for one line: none for blanks, the whole line in line-pacing
/// mode, one chunk per word in word-pacing mode. Ranges never overlap and
/// cover every visible token.
fn chunk_line(line: &Line, page_index: usize, line_index: usize, mode: PacingMode) -> Vec<Chunk> {
    if line.is_blank() {
        return Vec::new();
    }
    let tokens = word_tokens(&line.text);
    if tokens.is_empty() {
        return Vec::new();
    }

    match mode {
        PacingMode::Line => {
            let first = &tokens[0];
            vec![Chunk {
                text: line.text.clone(),
                word_count: tokens.len(),
                orp_index: first.char_start + orp_offset(first.char_len),
                saccade: Some(SaccadeSpan {
                    page_index,
                    line_index,
                    start_char: 0,
                    end_char: line.char_len(),
                }),
            }]
        }
        PacingMode::Word => tokens
            .iter()
            .map(|token| Chunk {
                text: token.as_str(&line.text).to_string(),
                word_count: 1,
                orp_index: orp_offset(token.char_len),
                saccade: Some(SaccadeSpan {
                    page_index,
                    line_index,
                    start_char: token.char_start,
                    end_char: token.char_end(),
                }),
            })
            .collect(),
    }
}

/// All chunks across all pages, in reading order; the index space the
/// host's "last read chunk" persistence refers to.
pub fn flatten_chunks(pages: &[Page]) -> Vec<Chunk> {
    pages
        .iter()
        .flat_map(|page| page.line_chunks.iter().flatten().cloned())
        .collect()
}

/// Clamp a stored chunk index into the valid range. An empty chunk list
/// clamps to 0.
pub fn clamp_chunk_index(index: usize, chunk_count: usize) -> usize {
    if chunk_count == 0 {
        0
    } else {
        index.min(chunk_count - 1)
    }
}
