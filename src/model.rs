use serde::{Deserialize, Serialize};

/// One entry of the recipe index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeListing {
    pub id: u32,
    pub name: String,
    pub url: String,
}

/// The modern, cookable version of a historical recipe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModernRecipe {
    pub description: Vec<String>,
    /// `"name: amount"` pairs in table order
    pub ingredients: Vec<String>,
    /// `"N: text"` steps
    pub modern_instructions: Vec<String>,
    pub tips: String,
}

/// A recipe extracted from one detail page.
///
/// Every field has an empty value; missing sections never produce a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredRecipe {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub original_text: Vec<String>,
    pub modern_translation: Vec<String>,
    pub modern_recipe: ModernRecipe,
    pub modern_translation_instructions: Vec<String>,
    pub original_instructions: Vec<String>,
}

impl StructuredRecipe {
    /// Start an empty record carrying the listing's identity.
    pub fn from_listing(listing: &RecipeListing) -> Self {
        Self {
            id: listing.id,
            name: listing.name.clone(),
            url: listing.url.clone(),
            ..Default::default()
        }
    }
}

/// Which version of the recipe a set of instructions belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    Modern,
    Translation,
    Original,
}

impl InstructionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructionKind::Modern => "modern",
            InstructionKind::Translation => "translation",
            InstructionKind::Original => "original",
        }
    }
}
