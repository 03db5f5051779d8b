use serde::{Deserialize, Serialize};

/// How the playback engine steps through a page: one chunk per line
/// (sweep display) or one chunk per word (flash display).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacingMode {
    Line,
    Word,
}

impl Default for PacingMode {
    fn default() -> Self {
        PacingMode::Line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineType {
    Body,
    Heading,
    Blank,
    Figure,
}

/// One laid-out display line. Produced once per layout pass and never
/// mutated afterwards; a width or marker change recomputes the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub kind: LineType,
    /// Heading level 1-6, headings only.
    pub level: Option<u8>,
    pub figure_id: Option<String>,
    pub figure_src: Option<String>,
    pub figure_caption: Option<String>,
    pub is_equation: bool,
    pub equation_index: Option<u32>,
}

impl Line {
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: LineType::Body,
            level: None,
            figure_id: None,
            figure_src: None,
            figure_caption: None,
            is_equation: false,
            equation_index: None,
        }
    }

    pub fn blank() -> Self {
        let mut line = Self::body("");
        line.kind = LineType::Blank;
        line
    }

    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        let mut line = Self::body(text);
        line.kind = LineType::Heading;
        line.level = Some(level.clamp(1, 6));
        line
    }

    pub fn is_blank(&self) -> bool {
        self.kind == LineType::Blank
    }

    /// Length in Unicode scalar values. Fixation offsets and chunk ranges
    /// are indices into this count, not into the byte representation.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Character range a chunk occupies within one laid-out line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaccadeSpan {
    pub page_index: usize,
    pub line_index: usize,
    pub start_char: usize,
    /// Exclusive end offset.
    pub end_char: usize,
}

impl SaccadeSpan {
    pub fn is_valid(&self) -> bool {
        self.start_char <= self.end_char
    }

    pub fn char_len(&self) -> usize {
        self.end_char.saturating_sub(self.start_char)
    }
}

/// The unit the playback scheduler advances through: a whole line in
/// line-pacing mode, a single word in word-pacing mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub word_count: usize,
    /// Optimal-reading-position offset into `text`, in chars.
    pub orp_index: usize,
    pub saccade: Option<SaccadeSpan>,
}

impl Chunk {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// One display page: lines plus a parallel per-line chunk list. Blank lines
/// (and figure lines suppressed in recall mode) carry an empty chunk list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    pub lines: Vec<Line>,
    pub line_chunks: Vec<Vec<Chunk>>,
}

impl Page {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn chunk_count(&self) -> usize {
        self.line_chunks.iter().map(|chunks| chunks.len()).sum()
    }
}
