//! Serializing dataset records into prompt context.

use tracing::warn;

use crate::models::{Campsite, Extra, FaqItem, Trail};

/// Separator placed between entity blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// A record that can describe itself to a language model.
pub trait PromptBlock {
    fn prompt_block(&self) -> String;
}

impl PromptBlock for Campsite {
    fn prompt_block(&self) -> String {
        let mut block = format!(
            "ID: {}\nName: {}\nArea: {}\nStay types: {}\nFacilities: {}\nPrice: {}\nDistance to loch: {}\nOpen months: {}",
            self.id,
            self.display_name,
            self.area_id,
            self.stay_types.join(", "),
            self.facility_tags.join(", "),
            self.typical_price_band
                .map(|band| band.as_str())
                .unwrap_or("unknown"),
            self.distance_to_loch_m
                .map(|m| format!("{:.0}m", m))
                .unwrap_or_else(|| "unknown".to_string()),
            self.open_months.join(", "),
        );
        if self.has_drying_room() {
            block.push_str("\nHas drying room");
        }
        block
    }
}

impl PromptBlock for Trail {
    fn prompt_block(&self) -> String {
        let summary = if self.summary.is_empty() {
            "No description"
        } else {
            &self.summary
        };
        let mut block = format!(
            "ID: {}\nName: {}\nDistance: {:.1} miles ({:.1} km)\nDifficulty: {}\nArea: {}",
            self.id,
            self.name,
            self.miles(),
            self.distance_km,
            self.difficulty.as_str(),
            self.area_id,
        );
        if let Some(ascent) = self.ascent_m {
            block.push_str(&format!("\nAscent: {:.0}m", ascent));
        }
        block.push_str(&format!("\nSummary: {}", summary));
        block
    }
}

impl PromptBlock for Extra {
    fn prompt_block(&self) -> String {
        format!(
            "ID: {}\nName: {}\nCategory: {}\nArea: {}\nSummary: {}",
            self.id,
            self.name,
            self.category.as_str(),
            self.area_id,
            self.summary,
        )
    }
}

impl PromptBlock for FaqItem {
    fn prompt_block(&self) -> String {
        format!(
            "SLUG: {}\nQ: {}\nA: {}\nDetails: {}",
            self.slug, self.question, self.short_answer, self.extended_content
        )
    }
}

/// Joins blocks up to a character budget.
///
/// Blocks are never split: the first block that would overflow the budget,
/// and every block after it, is dropped.
#[derive(Debug)]
pub struct ContextBuilder {
    label: &'static str,
    max_chars: usize,
    out: String,
    kept: usize,
    dropped: usize,
}

impl ContextBuilder {
    pub fn new(label: &'static str, max_chars: usize) -> Self {
        Self {
            label,
            max_chars,
            out: String::new(),
            kept: 0,
            dropped: 0,
        }
    }

    pub fn push(&mut self, block: &str) {
        let separator = if self.kept == 0 { 0 } else { BLOCK_SEPARATOR.len() };
        let overflow = self.out.len() + separator + block.len() > self.max_chars;
        if self.dropped > 0 || overflow {
            self.dropped += 1;
            return;
        }
        if self.kept > 0 {
            self.out.push_str(BLOCK_SEPARATOR);
        }
        self.out.push_str(block);
        self.kept += 1;
    }

    pub fn extend<'a, T, I>(mut self, items: I) -> Self
    where
        T: PromptBlock + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for item in items {
            self.push(&item.prompt_block());
        }
        self
    }

    pub fn kept(&self) -> usize {
        self.kept
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn build(self) -> String {
        if self.dropped > 0 {
            warn!(
                "Prompt context '{}' truncated: kept {} blocks, dropped {} (limit {} chars)",
                self.label, self.kept, self.dropped, self.max_chars
            );
        }
        self.out
    }
}

/// Serialize `items` into one context string within `max_chars`.
pub fn context_for<'a, T: PromptBlock + 'a>(
    label: &'static str,
    items: impl IntoIterator<Item = &'a T>,
    max_chars: usize,
) -> String {
    ContextBuilder::new(label, max_chars).extend(items).build()
}
