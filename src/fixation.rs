//! Gaze-stop placement for a single laid-out line.
//!
//! Rather than landing on every word, a trained reader fixates a sparse
//! subset and lets peripheral vision cover the rest. `line_fixations`
//! simulates that: it walks the line greedily, jumping roughly one saccade
//! length at a time and preferring content words over cheap function words.
//! The scoring constants are tuned values carried over from the production
//! pacer; they are intentionally not re-derived here.

/// Slack added past the saccade target when collecting candidate words.
const CANDIDATE_WINDOW_SLACK: usize = 6;

/// Surcharge for common function words (articles, prepositions, pronouns,
/// conjunctions) that skilled readers skip almost for free.
const FUNCTION_WORD_PENALTY: f64 = 1.25;

/// Lower-cased function words, sorted for binary search.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "had", "has", "he",
    "her", "his", "i", "in", "is", "it", "its", "me", "my", "nor", "of", "on", "or", "our", "she",
    "so", "that", "the", "their", "them", "they", "this", "to", "us", "was", "we", "were", "with",
    "you", "your",
];

/// A whitespace-delimited token with both char-indexed and byte-indexed
/// positions. Char indices are the public offset unit; byte indices exist
/// only so the token text can be sliced back out of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WordToken {
    pub char_start: usize,
    pub char_len: usize,
    pub byte_start: usize,
    pub byte_end: usize,
}

impl WordToken {
    pub fn as_str<'a>(&self, line: &'a str) -> &'a str {
        &line[self.byte_start..self.byte_end]
    }

    pub fn char_end(&self) -> usize {
        self.char_start + self.char_len
    }
}

/// Split a line into whitespace-delimited tokens, tracking char offsets.
pub(crate) fn word_tokens(text: &str) -> Vec<WordToken> {
    let mut tokens = Vec::new();
    let mut current: Option<WordToken> = None;

    for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
        if ch.is_whitespace() {
            if let Some(token) = current.take() {
                tokens.push(token);
            }
        } else {
            match current.as_mut() {
                Some(token) => {
                    token.char_len += 1;
                    token.byte_end = byte_idx + ch.len_utf8();
                }
                None => {
                    current = Some(WordToken {
                        char_start: char_idx,
                        char_len: 1,
                        byte_start: byte_idx,
                        byte_end: byte_idx + ch.len_utf8(),
                    });
                }
            }
        }
    }
    if let Some(token) = current.take() {
        tokens.push(token);
    }
    tokens
}

/// Optimal reading position within a word of `len` characters, as a relative
/// offset: very short words are fixated at the start, everything else a bit
/// past a third of the way in.
pub(crate) fn orp_offset(len: usize) -> usize {
    if len <= 1 {
        0
    } else if len <= 3 {
        1
    } else {
        (0.35 * len as f64).floor() as usize
    }
}

/// Absolute ORP of a token within the line, nudged left off whitespace.
/// A single token never contains whitespace, but the nudge keeps the rule
/// safe for any future multi-word chunk reuse.
fn orp_abs(token: &WordToken, chars: &[char]) -> usize {
    let mut pos = (token.char_start + orp_offset(token.char_len)).min(chars.len().saturating_sub(1));
    while pos > 0 && chars[pos].is_whitespace() {
        pos -= 1;
    }
    pos
}

/// Skip cost of fixating a word: cheap for long content words, expensive for
/// short ones, with a flat surcharge for function words.
fn word_penalty(token: &WordToken, line: &str) -> f64 {
    let length_penalty = match token.char_len {
        0 | 1 => 5.0,
        2 => 4.0,
        3 => 2.5,
        4 => 1.5,
        5 => 0.5,
        _ => 0.0,
    };

    let normalized: String = token
        .as_str(line)
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(|c| c.to_lowercase())
        .collect();
    let function_penalty = if FUNCTION_WORDS.binary_search(&normalized.as_str()).is_ok() {
        FUNCTION_WORD_PENALTY
    } else {
        0.0
    };

    length_penalty + function_penalty
}

/// Larger target saccades tolerate skipping function words more cheaply.
fn skip_scale(saccade_length: usize) -> f64 {
    let t = ((saccade_length as f64 - 7.0) / 8.0).clamp(0.0, 1.0);
    0.8 + 0.4 * t
}

/// Compute the fixation offsets for one line of text.
///
/// Offsets are char indices into `text`, strictly increasing, each landing
/// on a non-whitespace character. Pure and deterministic in
/// `(text, saccade_length)`: the sweep highlight and the decolor animation
/// both re-derive the same offsets and must stay in sync.
pub fn line_fixations(text: &str, saccade_length: usize) -> Vec<usize> {
    let words = word_tokens(text);
    if words.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    let scale = skip_scale(saccade_length);

    // Skip a trivially short opening word when there is anything after it.
    let mut word_idx = if words[0].char_len <= 3 && words.len() > 1 {
        1
    } else {
        0
    };
    let mut last_pos = orp_abs(&words[word_idx], &chars);
    let mut fixations = vec![last_pos];

    while word_idx + 1 < words.len() {
        let target = last_pos + saccade_length;
        let window_end = target + CANDIDATE_WINDOW_SLACK;

        let cost_of = |token: &WordToken| {
            let orp = orp_abs(token, &chars);
            let distance = (orp as f64 - target as f64).abs();
            (distance + scale * word_penalty(token, text), orp)
        };

        // Prefer candidates inside the saccade window; fall back to scanning
        // every remaining word so the walk always makes forward progress at
        // the tail of the line.
        let mut best: Option<(f64, usize, usize)> = None;
        for pass_all in [false, true] {
            for (idx, token) in words.iter().enumerate().skip(word_idx + 1) {
                let (cost, orp) = cost_of(token);
                if !pass_all && orp > window_end {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((best_cost, best_idx, _)) => {
                        cost < best_cost
                            || (cost == best_cost && token.char_len > words[best_idx].char_len)
                    }
                };
                if better {
                    best = Some((cost, idx, orp));
                }
            }
            if best.is_some() {
                break;
            }
        }

        match best {
            Some((_, idx, orp)) => {
                word_idx = idx;
                last_pos = orp;
                fixations.push(orp);
            }
            None => break,
        }
    }

    fixations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_has_no_fixations() {
        for saccade in [0, 1, 7, 10, 25] {
            assert!(line_fixations("", saccade).is_empty());
        }
        assert!(line_fixations("   \t  ", 10).is_empty());
    }

    #[test]
    fn test_fixations_are_in_bounds_and_increasing() {
        let samples = [
            "The quick brown fox jumps over the lazy dog",
            "a",
            "internationalization",
            "it was the best of times, it was the worst of times",
            "short mid sized words only here now",
        ];
        for text in samples {
            for saccade in [4, 7, 10, 15] {
                let fixations = line_fixations(text, saccade);
                assert!(!fixations.is_empty(), "no fixations for {text:?}");
                let char_len = text.chars().count();
                let chars: Vec<char> = text.chars().collect();
                let mut last = None;
                for &offset in &fixations {
                    assert!(offset < char_len, "offset {offset} out of bounds in {text:?}");
                    assert!(
                        !chars[offset].is_whitespace(),
                        "offset {offset} lands on whitespace in {text:?}"
                    );
                    if let Some(prev) = last {
                        assert!(offset > prev, "non-increasing fixations in {text:?}");
                    }
                    last = Some(offset);
                }
            }
        }
    }

    #[test]
    fn test_short_first_word_is_skipped() {
        let fixations = line_fixations("A wonderful day", 10);
        assert!(fixations[0] > 0);
        // "wonderful" starts at char 2; its ORP is 2 + floor(0.35 * 9) = 5.
        assert_eq!(fixations[0], 5);
    }

    #[test]
    fn test_single_fixation_lands_on_long_word() {
        let fixations = line_fixations("a pharmaceutical", 10);
        assert_eq!(fixations.len(), 1);
        // ORP of "pharmaceutical": 2 + floor(0.35 * 14) = 6.
        assert_eq!(fixations, vec![6]);
    }

    #[test]
    fn test_single_word_line_fixates_once() {
        assert_eq!(line_fixations("x", 10), vec![0]);
        assert_eq!(line_fixations("to", 10), vec![1]);
        assert_eq!(line_fixations("word", 10), vec![1]);
    }

    #[test]
    fn test_orp_offset_rules() {
        assert_eq!(orp_offset(0), 0);
        assert_eq!(orp_offset(1), 0);
        assert_eq!(orp_offset(2), 1);
        assert_eq!(orp_offset(3), 1);
        assert_eq!(orp_offset(4), 1); // floor(1.4)
        assert_eq!(orp_offset(9), 3); // floor(3.15)
        assert_eq!(orp_offset(14), 4); // floor(4.9)
    }

    #[test]
    fn test_skip_scale_saturates() {
        assert_eq!(skip_scale(7), 0.8);
        assert_eq!(skip_scale(3), 0.8);
        assert!((skip_scale(15) - 1.2).abs() < 1e-12);
        assert!((skip_scale(40) - 1.2).abs() < 1e-12);
        assert!((skip_scale(11) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_function_words_are_sorted() {
        let mut sorted = FUNCTION_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, FUNCTION_WORDS);
    }

    #[test]
    fn test_function_word_surcharge() {
        // "the" and "map" are both three chars; only the article carries
        // the function-word surcharge.
        let text = "the map";
        let tokens = word_tokens(text);
        assert_eq!(word_penalty(&tokens[0], text), 2.5 + FUNCTION_WORD_PENALTY);
        assert_eq!(word_penalty(&tokens[1], text), 2.5);
        // Matching strips punctuation and case.
        let text = "The, cat";
        let tokens = word_tokens(text);
        assert_eq!(word_penalty(&tokens[0], text), 1.5 + FUNCTION_WORD_PENALTY);
    }

    #[test]
    fn test_word_tokens_offsets() {
        let tokens = word_tokens("  ab  cdef ");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].char_start, 2);
        assert_eq!(tokens[0].char_len, 2);
        assert_eq!(tokens[1].char_start, 6);
        assert_eq!(tokens[1].char_len, 4);
        assert_eq!(tokens[1].as_str("  ab  cdef "), "cdef");
    }

    #[test]
    fn test_word_tokens_multibyte() {
        let text = "été là";
        let tokens = word_tokens(text);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].char_len, 3);
        assert_eq!(tokens[0].as_str(text), "été");
        assert_eq!(tokens[1].char_start, 4);
        assert_eq!(tokens[1].as_str(text), "là");
    }

    #[test]
    fn test_deterministic() {
        let text = "Determinism means the same offsets every single time around";
        let first = line_fixations(text, 9);
        for _ in 0..5 {
            assert_eq!(line_fixations(text, 9), first);
        }
    }

    #[test]
    fn test_forward_progress_beyond_window() {
        // Huge gap between the fixated word and the rest: the windowed pass
        // finds nothing, the fallback must still move forward.
        let text = format!("start{}finish", " ".repeat(40));
        let fixations = line_fixations(&text, 8);
        assert!(fixations.len() >= 2);
        assert!(*fixations.last().unwrap() >= 45);
    }
}
