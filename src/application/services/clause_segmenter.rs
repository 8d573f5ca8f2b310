use regex::Regex;

/// Candidates at or below this length are discarded as noise.
const MIN_CLAUSE_CHARS: usize = 20;

/// Splits raw contract text into clause-sized units.
///
/// Boundaries are paragraph breaks (two or more consecutive newlines) and
/// sentence starts (a period, whitespace, then an uppercase letter). This is
/// a heuristic, not a parser: there is no guarantee the cuts land on
/// semantic clause boundaries, and numbered sub-clauses or abbreviations can
/// split early.
pub struct ClauseSegmenter {
    paragraph_break: Regex,
    sentence_boundary: Regex,
}

impl Default for ClauseSegmenter {
    fn default() -> Self {
        Self {
            paragraph_break: Regex::new(r"\n{2,}").expect("paragraph break pattern"),
            sentence_boundary: Regex::new(r"\.\s+[A-Z]").expect("sentence boundary pattern"),
        }
    }
}

impl ClauseSegmenter {
    /// Ordered clause texts; position in the returned vector defines the
    /// 1-based clause number.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let mut clauses = Vec::new();

        for paragraph in self.paragraph_break.split(text) {
            for candidate in self.split_sentences(paragraph) {
                let trimmed = candidate.trim();
                if trimmed.len() > MIN_CLAUSE_CHARS {
                    clauses.push(trimmed.to_string());
                }
            }
        }

        clauses
    }

    /// Split on `". X"` boundaries, keeping the period with the left part
    /// and the uppercase letter with the right part.
    fn split_sentences<'a>(&self, paragraph: &'a str) -> Vec<&'a str> {
        let mut parts = Vec::new();
        let mut start = 0;

        for m in self.sentence_boundary.find_iter(paragraph) {
            // +1 keeps the terminating period; the match ends on the
            // uppercase letter that opens the next candidate.
            let cut = m.start() + 1;
            let next = m.end() - 1;
            parts.push(&paragraph[start..cut]);
            start = next;
        }

        parts.push(&paragraph[start..]);
        parts
    }
}
