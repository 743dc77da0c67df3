use crate::{JackpotError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub index: u64,
    pub text: String,
}

/// Append-only list of hints. Indices are dense and never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintCatalog {
    entries: Vec<String>,
}

impl HintCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, text: impl Into<String>) -> Result<u64> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(JackpotError::invalid("hint text cannot be empty"));
        }
        let index = self.count();
        self.entries.push(text);
        Ok(index)
    }

    pub fn get(&self, index: u64) -> Result<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
            .ok_or(JackpotError::HintOutOfRange {
                index,
                count: self.count(),
            })
    }

    pub fn latest(&self) -> Result<Hint> {
        let text = self.entries.last().ok_or(JackpotError::NoHints)?;
        Ok(Hint {
            index: self.count() - 1,
            text: text.clone(),
        })
    }
}
