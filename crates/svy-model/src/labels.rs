use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered code→text dictionary attachable to a numeric-coded column.
///
/// Identity is the (question, scale) pair; the derived name is globally
/// unique per pair. Every code is representable as an integer — columns
/// whose answer codes fail that test never get a label set at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSet {
    pub name: String,
    pub question_id: u32,
    pub scale_id: u32,
    entries: BTreeMap<i64, String>,
}

impl LabelSet {
    /// Naming convention: `vall<question-id><scale-id>`.
    pub fn set_name(question_id: u32, scale_id: u32) -> String {
        format!("vall{question_id}{scale_id}")
    }

    pub fn new(question_id: u32, scale_id: u32) -> Self {
        Self {
            name: Self::set_name(question_id, scale_id),
            question_id,
            scale_id,
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, code: i64, text: impl Into<String>) {
        self.entries.insert(code, text.into());
    }

    /// Entries in ascending code order.
    pub fn entries(&self) -> impl Iterator<Item = (i64, &str)> {
        self.entries.iter().map(|(code, text)| (*code, text.as_str()))
    }

    pub fn text_for(&self, code: i64) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
