//! Search and category filtering over an in-memory memo collection.

use crate::models::{CategoryFilter, Memo, MemoStats};

/// Search query plus category selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoFilter {
    pub query: String,
    pub category: CategoryFilter,
}

impl MemoFilter {
    pub fn new(query: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            query: query.into(),
            category,
        }
    }

    /// Category filter AND case-insensitive substring match over title,
    /// content, or any tag. A blank query matches every memo.
    pub fn matches(&self, memo: &Memo) -> bool {
        if !self.category.matches(memo.category) {
            return false;
        }

        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }

        // Untrimmed to match what the user typed inside the text
        let needle = self.query.to_lowercase();
        memo.title.to_lowercase().contains(&needle)
            || memo.content.to_lowercase().contains(&needle)
            || memo
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Apply a filter, preserving collection order.
pub fn filter_memos(memos: &[Memo], filter: &MemoFilter) -> Vec<Memo> {
    memos.iter().filter(|m| filter.matches(m)).cloned().collect()
}

/// Totals for the whole collection plus the size of the filtered view.
pub fn compute_stats(memos: &[Memo], filter: &MemoFilter) -> MemoStats {
    let mut stats = MemoStats {
        total: memos.len(),
        ..Default::default()
    };

    for memo in memos {
        *stats
            .by_category
            .entry(memo.category.as_str().to_string())
            .or_insert(0) += 1;
        if filter.matches(memo) {
            stats.filtered += 1;
        }
    }

    stats
}
