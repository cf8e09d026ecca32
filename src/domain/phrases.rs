//! Search phrases and report matching
//!
//! Phrases come from a single semicolon-delimited argument. Each segment is
//! trimmed; empty segments are kept and match every report.

use crate::error::{AppError, AppResult};
use regex::{Regex, RegexBuilder};

/// How a phrase is tested against report text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive substring
    #[default]
    Literal,
    /// Case-insensitive regular expression
    Regex,
}

/// Split a raw settings string into trimmed phrases, preserving order
pub fn split_phrases(raw: Option<&str>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(raw) => raw.split(';').map(|s| s.trim().to_string()).collect(),
    }
}

/// Compiled phrase list
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrases: Vec<(String, Regex)>,
}

impl PhraseMatcher {
    pub fn new(phrases: &[String], mode: MatchMode) -> AppResult<Self> {
        let phrases = phrases
            .iter()
            .map(|phrase| {
                let pattern = match mode {
                    MatchMode::Literal => regex::escape(phrase),
                    MatchMode::Regex => phrase.clone(),
                };
                RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (phrase.clone(), re))
                    .map_err(|e| {
                        AppError::ConfigError(format!("Invalid search phrase '{}': {}", phrase, e))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self { phrases })
    }

    /// Every phrase found in `text`, in input order. Repeated phrases are
    /// reported once per occurrence in the phrase list.
    pub fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.phrases
            .iter()
            .filter(move |(_, re)| re.is_match(text))
            .map(|(phrase, _)| phrase.as_str())
    }
}
