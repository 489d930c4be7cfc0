//! Projection of extracted recipes onto the storage schema, and the checks a
//! record must pass before it is stored.

use serde::Serialize;

use crate::error::{Result, ScrapeError};
use crate::model::{InstructionKind, StructuredRecipe};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageInstruction {
    pub kind: InstructionKind,
    /// 1-based position within its kind
    pub sort_order: usize,
    pub instruction: String,
}

/// One row of the recipe table plus its ingredient and instruction rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageRecord {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub description: String,
    pub tips: String,
    pub original_text: String,
    pub modern_translation: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<StorageInstruction>,
}

impl From<&StructuredRecipe> for StorageRecord {
    fn from(recipe: &StructuredRecipe) -> Self {
        let groups = [
            (InstructionKind::Modern, &recipe.modern_recipe.modern_instructions),
            (
                InstructionKind::Translation,
                &recipe.modern_translation_instructions,
            ),
            (InstructionKind::Original, &recipe.original_instructions),
        ];
        let instructions = groups
            .into_iter()
            .flat_map(|(kind, steps)| {
                steps.iter().enumerate().map(move |(i, step)| StorageInstruction {
                    kind,
                    sort_order: i + 1,
                    instruction: step.clone(),
                })
            })
            .collect();

        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            url: recipe.url.clone(),
            description: recipe.modern_recipe.description.join("\n"),
            tips: recipe.modern_recipe.tips.clone(),
            original_text: recipe.original_text.join("\n"),
            modern_translation: recipe.modern_translation.join("\n"),
            ingredients: recipe.modern_recipe.ingredients.clone(),
            instructions,
        }
    }
}

impl StorageRecord {
    pub fn instructions_of(&self, kind: InstructionKind) -> impl Iterator<Item = &StorageInstruction> {
        self.instructions.iter().filter(move |step| step.kind == kind)
    }

    /// Required fields for storage: a positive id, a name, a url and at least one ingredient.
    pub fn validate(&self) -> Result<()> {
        if self.id == 0 {
            return Err(ScrapeError::ValidationError(
                "recipe id must be positive".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ScrapeError::ValidationError(format!(
                "recipe #{} has no name",
                self.id
            )));
        }
        if self.url.trim().is_empty() {
            return Err(ScrapeError::ValidationError(format!(
                "recipe #{} has no url",
                self.id
            )));
        }
        if self.ingredients.is_empty() {
            return Err(ScrapeError::ValidationError(format!(
                "recipe #{} has no ingredients",
                self.id
            )));
        }
        Ok(())
    }
}

/// A recipe is worth storing once it has ingredients.
pub fn is_valid_recipe(recipe: &StructuredRecipe) -> bool {
    !recipe.modern_recipe.ingredients.is_empty()
}

pub fn filter_valid_recipes(recipes: Vec<StructuredRecipe>) -> Vec<StructuredRecipe> {
    recipes.into_iter().filter(is_valid_recipe).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModernRecipe;

    fn recipe(id: u32, ingredients: &[&str]) -> StructuredRecipe {
        StructuredRecipe {
            id,
            name: format!("料理{id}"),
            url: format!("https://example.com/{id:03}.html.ja"),
            original_text: vec!["玉子を".to_string(), "わりて".to_string()],
            modern_recipe: ModernRecipe {
                description: vec!["説明".to_string()],
                ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
                modern_instructions: vec!["1: 卵を割る".to_string(), "2: 混ぜ合わせる".to_string()],
                tips: "弱火で".to_string(),
            },
            original_instructions: vec!["1: 玉子をわりて".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_storage_record_projection() {
        let record = StorageRecord::from(&recipe(3, &["卵: 2個"]));

        assert_eq!(record.id, 3);
        assert_eq!(record.original_text, "玉子を\nわりて");
        assert_eq!(record.modern_translation, "");
        assert_eq!(record.description, "説明");
        assert_eq!(record.tips, "弱火で");
        assert_eq!(record.instructions.len(), 3);

        let modern: Vec<_> = record.instructions_of(InstructionKind::Modern).collect();
        assert_eq!(modern[1].sort_order, 2);
        assert_eq!(modern[1].instruction, "2: 混ぜ合わせる");
        assert_eq!(record.instructions_of(InstructionKind::Translation).count(), 0);
        assert_eq!(record.instructions_of(InstructionKind::Original).count(), 1);
    }

    #[test]
    fn test_validate() {
        assert!(StorageRecord::from(&recipe(1, &["卵: 2個"])).validate().is_ok());

        let missing_ingredients = StorageRecord::from(&recipe(1, &[]));
        assert!(matches!(
            missing_ingredients.validate(),
            Err(ScrapeError::ValidationError(_))
        ));

        let zero_id = StorageRecord::from(&recipe(0, &["卵: 2個"]));
        assert!(zero_id.validate().is_err());

        let mut unnamed = StorageRecord::from(&recipe(2, &["卵: 2個"]));
        unnamed.name = " ".to_string();
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_filter_valid_recipes_keeps_order() {
        let recipes = vec![
            recipe(1, &["卵: 1個"]),
            recipe(2, &[]),
            recipe(3, &["卵: 3個"]),
        ];
        let ids: Vec<u32> = filter_valid_recipes(recipes).iter().map(|r| r.id).collect();

        assert_eq!(ids, vec![1, 3]);
    }
}
