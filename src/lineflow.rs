//! Text layout: normalization, block structure and word wrapping.
//!
//! `layout_lines` turns raw article text (already extracted and cleaned by
//! the host's extraction pipeline) into typed display lines. Markdown-style
//! headings and the `[FIGURE:…]` / `[EQN_IMAGE:…]` marker mini-format are
//! recognized per block; anything malformed degrades to plain wrapped text.
//! The function is total: it never fails, and empty input yields no lines.

use crate::models::{Line, LineType};
use log::debug;
use regex::Regex;
use std::path::Path;
use textwrap::{Options, WordSeparator, WordSplitter, WrapAlgorithm};

pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Resolves figure and equation markers to renderable asset references.
/// Pure string manipulation; the host decides whether the paths exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetContext {
    /// Base URL prepended to id-based figure references.
    pub figure_base_url: Option<String>,
    /// Path of the source document; its file stem names the per-chapter
    /// equation image directory.
    pub source_path: Option<String>,
}

impl AssetContext {
    fn figure_src(&self, id: &str) -> String {
        let relative = format!("images/{}.jpg", id.trim());
        match self.figure_base_url.as_deref() {
            Some(base) if !base.is_empty() => {
                format!("{}/{}", base.trim_end_matches('/'), relative)
            }
            _ => relative,
        }
    }

    fn equation_src(&self, index: u32) -> String {
        let chapter = self
            .source_path
            .as_deref()
            .and_then(|p| Path::new(p).file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("chapter");
        format!("equation-images/{}/eqn_{:03}.jpg", chapter, index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub width: usize,
    pub assets: AssetContext,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_LINE_WIDTH,
            assets: AssetContext::default(),
        }
    }
}

/// Repair extraction artifacts before any structural parsing: normalize
/// newlines, drop BOMs, collapse horizontal whitespace and blank-line runs,
/// and re-separate run-together sentences ("end.Next" but not "U.S.A.").
fn normalize_text(text: &str) -> String {
    let mut normalized = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{feff}', "");

    let horizontal_ws = Regex::new(r"[ \t]+").unwrap();
    normalized = horizontal_ws.replace_all(&normalized, " ").to_string();

    let blank_runs = Regex::new(r"\n{3,}").unwrap();
    normalized = blank_runs.replace_all(&normalized, "\n\n").to_string();

    // A sentence-ending mark glued to an uppercase letter gets a space, but
    // only when the char before the mark is not itself uppercase, which
    // leaves abbreviations like "U.S.A." alone.
    let glued_sentence = Regex::new(r"([^\sA-Z])([.!?])([A-Z])").unwrap();
    normalized = glued_sentence
        .replace_all(&normalized, "${1}${2} ${3}")
        .to_string();

    normalized.trim().to_string()
}

/// Greedy wrap at `width`: words accumulate while they fit, and a single
/// word wider than the whole line is emitted alone rather than split.
fn wrap_paragraph(block: &str, width: usize) -> Vec<Line> {
    let joined = block.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        return Vec::new();
    }
    let options = Options::new(width.max(1))
        .wrap_algorithm(WrapAlgorithm::FirstFit)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation)
        .break_words(false);
    textwrap::wrap(&joined, options)
        .into_iter()
        .map(|wrapped| Line::body(wrapped.into_owned()))
        .collect()
}

/// `(level, title, rest-of-block)` for a block opening with `#`×1-6 + space.
fn parse_heading(block: &str) -> Option<(u8, String, Option<String>)> {
    let (first, rest) = match block.find('\n') {
        Some(idx) => (&block[..idx], Some(&block[idx + 1..])),
        None => (block, None),
    };
    let heading_re = Regex::new(r"^(#{1,6})\s+(.+)$").unwrap();
    let caps = heading_re.captures(first.trim())?;
    let level = caps[1].len() as u8;
    let title = caps[2].trim().to_string();
    let rest = rest
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    Some((level, title, rest))
}

/// Append a blank separator unless the output is empty or already ends in
/// one; adjacent blanks are never emitted.
fn push_separator(lines: &mut Vec<Line>) {
    if lines.last().is_some_and(|line| !line.is_blank()) {
        lines.push(Line::blank());
    }
}

/// Lay raw text out as typed display lines at the configured width.
pub fn layout_lines(text: &str, opts: &LayoutOptions) -> Vec<Line> {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    let block_re = Regex::new(r"\n\s*\n").unwrap();
    let blocks: Vec<&str> = block_re
        .split(&normalized)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect();

    let figure_id_re = Regex::new(r"(?i)^\[FIGURE:([^\]]+)\]$").unwrap();
    let figure_url_re = Regex::new(r"(?i)^\[FIGURE_URL:([^\]]+)\]$").unwrap();
    let caption_re = Regex::new(r"(?i)^\[FIGURE\s+(.+)\]$").unwrap();
    let equation_re = Regex::new(r"(?i)^\[EQN_IMAGE:(\d+)\]\s*(?:\[(.+)\])?$").unwrap();
    let eqn_label_re = Regex::new(r"(?i)^\[EQN_LABEL:(.+)\]$").unwrap();

    let block_count = blocks.len();
    let mut lines: Vec<Line> = Vec::new();
    let mut i = 0;
    while i < blocks.len() {
        let block = blocks[i];
        push_separator(&mut lines);

        if let Some((level, title, rest)) = parse_heading(block) {
            lines.push(Line::heading(title, level));
            lines.push(Line::blank());
            if let Some(rest) = rest {
                lines.extend(wrap_paragraph(&rest, opts.width));
            }
        } else if let Some(caps) = figure_id_re.captures(block) {
            let id = caps[1].trim().to_string();
            let caption = consume_caption(&blocks, &mut i, &caption_re);
            let display = caption
                .clone()
                .unwrap_or_else(|| format!("Figure {}", id));
            lines.push(Line {
                text: display,
                kind: LineType::Figure,
                level: None,
                figure_id: Some(id.clone()),
                figure_src: Some(opts.assets.figure_src(&id)),
                figure_caption: caption,
                is_equation: false,
                equation_index: None,
            });
        } else if let Some(caps) = figure_url_re.captures(block) {
            let url = caps[1].trim().to_string();
            let caption = consume_caption(&blocks, &mut i, &caption_re);
            let display = caption.clone().unwrap_or_else(|| "Figure".to_string());
            lines.push(Line {
                text: display,
                kind: LineType::Figure,
                level: None,
                figure_id: None,
                figure_src: Some(url),
                figure_caption: caption,
                is_equation: false,
                equation_index: None,
            });
        } else if let Some(caps) = equation_re.captures(block) {
            // Equation markers always carry a numeric index; a label can be
            // inline after the marker or in a following [EQN_LABEL:…] block.
            let index: u32 = caps[1].parse().unwrap_or(0);
            let inline_label = caps.get(2).map(|m| m.as_str().trim().to_string());
            let block_label = consume_label(&blocks, &mut i, &eqn_label_re);
            let label = inline_label.or(block_label);
            let display = label
                .clone()
                .unwrap_or_else(|| format!("Equation {}", index));
            lines.push(Line {
                text: display,
                kind: LineType::Figure,
                level: None,
                figure_id: None,
                figure_src: Some(opts.assets.equation_src(index)),
                figure_caption: label,
                is_equation: true,
                equation_index: Some(index),
            });
        } else {
            lines.extend(wrap_paragraph(block, opts.width));
        }

        i += 1;
    }

    while lines.last().is_some_and(Line::is_blank) {
        lines.pop();
    }

    debug!("laid out {} lines from {} blocks", lines.len(), block_count);
    lines
}

fn consume_caption(blocks: &[&str], i: &mut usize, caption_re: &Regex) -> Option<String> {
    let next = blocks.get(*i + 1)?;
    let caps = caption_re.captures(next)?;
    *i += 1;
    Some(caps[1].trim().to_string())
}

fn consume_label(blocks: &[&str], i: &mut usize, label_re: &Regex) -> Option<String> {
    let next = blocks.get(*i + 1)?;
    let caps = label_re.captures(next)?;
    *i += 1;
    Some(caps[1].trim().to_string())
}
