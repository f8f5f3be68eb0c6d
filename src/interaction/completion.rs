//! Completion collaborator interface

use serde::{Deserialize, Serialize};

/// How completions are offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionMode {
    /// The host shows candidates for the word before the cursor
    #[default]
    Popup,
    /// The candidate's remaining suffix is shown selected in the editor
    Inline,
}

/// Direction for [`Completer::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Supplies completion candidates for a prefix
pub trait Completer: std::fmt::Debug {
    /// Offer the text to complete; resets the current candidate to the first
    fn set_prefix(&mut self, prefix: &str);
    fn current_candidate(&self) -> Option<String>;
    /// Step through candidates. Returns false when there is nowhere to go.
    fn advance(&mut self, direction: Direction) -> bool;
}

/// Case-insensitive prefix matching over a fixed word list
#[derive(Debug, Clone, Default)]
pub struct ListCompleter {
    words: Vec<String>,
    matches: Vec<usize>,
    current: usize,
}

impl ListCompleter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            matches: Vec::new(),
            current: 0,
        }
    }
}

impl Completer for ListCompleter {
    fn set_prefix(&mut self, prefix: &str) {
        let prefix = prefix.to_lowercase();
        self.current = 0;
        self.matches = if prefix.is_empty() {
            Vec::new()
        } else {
            self.words
                .iter()
                .enumerate()
                .filter(|(_, word)| word.to_lowercase().starts_with(&prefix))
                .map(|(i, _)| i)
                .collect()
        };
    }

    fn current_candidate(&self) -> Option<String> {
        let index = *self.matches.get(self.current)?;
        self.words.get(index).cloned()
    }

    fn advance(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Next if self.current + 1 < self.matches.len() => {
                self.current += 1;
                true
            }
            Direction::Previous if self.current > 0 => {
                self.current -= 1;
                true
            }
            _ => false,
        }
    }
}
