//! Query compilation.
//!
//! A query plus [`SearchOptions`] compiles into a [`MatchRule`], which finds every
//! non-overlapping occurrence in a text segment. All public offsets are **character offsets**
//! (Unicode scalar values), not byte offsets.
//!
//! - plain queries are escaped and compiled into a regex
//! - regex queries are used verbatim
//! - whole-word plain queries are wrapped in `\b` assertions

use crate::error::RuleError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Mode flags that control how a query is matched.
///
/// Snapshots are immutable per scan: changing any flag triggers a full rescan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// If `true`, matching is case-sensitive.
    pub preserve_case: bool,
    /// If `true`, a plain query only matches whole words.
    pub whole_word: bool,
    /// If `true`, the query is a regex pattern.
    pub use_regex: bool,
    /// If `true`, only text fully inside the viewport is scanned.
    pub only_viewport: bool,
}

/// Identifies one of the four [`SearchOptions`] flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionFlag {
    /// [`SearchOptions::preserve_case`]
    PreserveCase,
    /// [`SearchOptions::whole_word`]
    WholeWord,
    /// [`SearchOptions::use_regex`]
    UseRegex,
    /// [`SearchOptions::only_viewport`]
    OnlyViewport,
}

impl SearchOptions {
    /// Returns the value of `flag`.
    pub fn get(&self, flag: OptionFlag) -> bool {
        match flag {
            OptionFlag::PreserveCase => self.preserve_case,
            OptionFlag::WholeWord => self.whole_word,
            OptionFlag::UseRegex => self.use_regex,
            OptionFlag::OnlyViewport => self.only_viewport,
        }
    }

    /// Returns a copy with `flag` flipped.
    pub fn toggled(mut self, flag: OptionFlag) -> Self {
        let slot = match flag {
            OptionFlag::PreserveCase => &mut self.preserve_case,
            OptionFlag::WholeWord => &mut self.whole_word,
            OptionFlag::UseRegex => &mut self.use_regex,
            OptionFlag::OnlyViewport => &mut self.only_viewport,
        };
        *slot = !*slot;
        self
    }
}

/// A match inside one text segment, expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl TextMatch {
    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Byte offset of every char boundary in a string, the end of the string included.
#[derive(Debug)]
pub(crate) struct CharIndex {
    boundaries: Vec<usize>,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let boundaries = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { boundaries }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Clamps past-the-end offsets to the end of the string.
    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        self.boundaries[char_offset.min(self.char_count())]
    }

    /// Offsets inside a multi-byte char round up to the next char.
    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        self.boundaries
            .partition_point(|b| *b < byte_offset)
            .min(self.char_count())
    }
}

/// A compiled, global matching rule.
///
/// Built fresh for every scan and dropped right after it.
#[derive(Debug, Clone)]
pub struct MatchRule {
    regex: Regex,
    preserve_case: bool,
    whole_word: bool,
}

impl MatchRule {
    /// The pattern source handed to the regex compiler.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the rule is case-sensitive.
    pub fn preserve_case(&self) -> bool {
        self.preserve_case
    }

    /// Whether the rule was built in whole-word mode.
    pub fn whole_word(&self) -> bool {
        self.whole_word
    }

    /// Find all non-overlapping, non-empty occurrences in `text`, in order.
    pub fn find_all(&self, text: &str) -> Vec<TextMatch> {
        let index = CharIndex::new(text);
        self.regex
            .find_iter(text)
            .map(|m| TextMatch {
                start: index.byte_to_char(m.start()),
                end: index.byte_to_char(m.end()),
            })
            .filter(|m| !m.is_empty())
            .collect()
    }

    /// Returns `true` if `text` contains at least one non-empty occurrence.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.find_iter(text).any(|m| !m.is_empty())
    }
}

/// Compile `query` under `options`.
///
/// - Returns `Ok(None)` for an empty or whitespace-only query.
/// - Returns [`RuleError::InvalidPattern`] if a regex-mode query does not compile.
pub fn compile(query: &str, options: SearchOptions) -> Result<Option<MatchRule>, RuleError> {
    if query.trim().is_empty() {
        return Ok(None);
    }

    let pattern = if options.use_regex {
        query.to_string()
    } else if options.whole_word {
        format!(r"\b{}\b", regex::escape(query))
    } else {
        regex::escape(query)
    };

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(!options.preserve_case)
        .build()
        .map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;

    Ok(Some(MatchRule {
        regex,
        preserve_case: options.preserve_case,
        whole_word: options.whole_word,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(preserve_case: bool, whole_word: bool, use_regex: bool) -> SearchOptions {
        SearchOptions {
            preserve_case,
            whole_word,
            use_regex,
            only_viewport: false,
        }
    }

    #[test]
    fn test_char_index_conversions() {
        let index = CharIndex::new("aßc");
        assert_eq!(index.char_count(), 3);
        assert_eq!(index.char_to_byte(2), 3);
        assert_eq!(index.char_to_byte(9), 4);
        // byte 2 is inside 'ß'
        assert_eq!(index.byte_to_char(2), 2);
        assert_eq!(index.byte_to_char(3), 2);
        assert_eq!(index.byte_to_char(99), 3);

        let empty = CharIndex::new("");
        assert_eq!(empty.char_count(), 0);
        assert_eq!(empty.char_to_byte(5), 0);
    }

    fn spans(query: &str, options: SearchOptions, text: &str) -> Vec<(usize, usize)> {
        compile(query, options)
            .unwrap()
            .expect("rule")
            .find_all(text)
            .into_iter()
            .map(|m| (m.start, m.end))
            .collect()
    }

    #[test]
    fn test_blank_query_has_no_rule() {
        assert!(compile("", SearchOptions::default()).unwrap().is_none());
        assert!(compile(" \t\n", opts(false, false, true)).unwrap().is_none());
    }

    #[test]
    fn test_case_and_whole_word_matrix() {
        let text = "Cat cats category";
        assert_eq!(spans("cat", opts(false, false, false), text).len(), 3);
        assert_eq!(spans("cat", opts(false, true, false), text), vec![(0, 3)]);

        let text = "Cat cats cat";
        assert_eq!(spans("cat", opts(true, false, false), text), vec![(4, 7), (9, 12)]);
        assert_eq!(spans("cat", opts(true, true, false), text), vec![(9, 12)]);
    }

    #[test]
    fn test_literal_mode_escapes_metacharacters() {
        assert_eq!(spans("a.b", opts(false, false, false), "axb a.b"), vec![(4, 7)]);
        assert_eq!(spans("(x)", opts(false, false, false), "f(x) + (x)").len(), 2);
    }

    #[test]
    fn test_regex_mode_is_verbatim() {
        assert_eq!(spans("c.t", opts(false, false, true), "cat cot cut").len(), 3);
        // whole_word adds nothing in regex mode
        assert_eq!(spans("c.t", opts(false, true, true), "cats").len(), 1);
    }

    #[test]
    fn test_invalid_regex_fails() {
        let err = compile("(unclosed", opts(false, false, true)).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
        // the same text is fine as a literal
        assert!(compile("(unclosed", opts(false, false, false)).unwrap().is_some());
    }

    #[test]
    fn test_offsets_are_chars() {
        assert_eq!(spans("b", opts(false, false, false), "👋ab"), vec![(2, 3)]);
    }

    #[test]
    fn test_empty_matches_are_skipped() {
        assert_eq!(spans("x*", opts(false, false, true), "abxxc"), vec![(2, 4)]);
    }

    #[test]
    fn test_option_toggle() {
        let options = SearchOptions::default().toggled(OptionFlag::UseRegex);
        assert!(options.get(OptionFlag::UseRegex));
        assert!(!options.toggled(OptionFlag::UseRegex).use_regex);
    }
}
