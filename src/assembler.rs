use serde::{Deserialize, Serialize};

use crate::extractors::{FallbackResults, SectionResults, TableResults};
use crate::model::{ModernRecipe, RecipeListing, StructuredRecipe};

/// How keyword-pass lines are combined with the structural lines for
/// `original_text` and `modern_translation`.
///
/// `Concatenate` can repeat a line found by both passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Structural lines followed by every keyword-pass line
    #[default]
    Concatenate,
    /// Keyword-pass lines only when the structural pass found nothing
    FallbackWhenEmpty,
}

impl MergePolicy {
    pub fn merge(self, structural: Vec<String>, fallback: Vec<String>) -> Vec<String> {
        match self {
            MergePolicy::Concatenate => {
                let mut merged = structural;
                merged.extend(fallback);
                merged
            }
            MergePolicy::FallbackWhenEmpty if structural.is_empty() => fallback,
            MergePolicy::FallbackWhenEmpty => structural,
        }
    }
}

/// Build the final record for `listing` from both extraction passes.
pub fn assemble(
    listing: &RecipeListing,
    sections: SectionResults,
    tables: TableResults,
    fallback: FallbackResults,
    policy: MergePolicy,
) -> StructuredRecipe {
    let mut modern_instructions = tables.instructions.modern;
    modern_instructions.extend(sections.list_instructions);

    StructuredRecipe {
        id: listing.id,
        name: listing.name.clone(),
        url: listing.url.clone(),
        original_text: policy.merge(sections.original_text, fallback.original_text),
        modern_translation: policy.merge(sections.modern_translation, fallback.modern_translation),
        modern_recipe: ModernRecipe {
            description: sections.description,
            ingredients: tables.ingredients,
            modern_instructions,
            tips: sections.tips,
        },
        modern_translation_instructions: tables.instructions.translation,
        original_instructions: tables.instructions.original,
    }
}
