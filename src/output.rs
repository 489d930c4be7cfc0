//! JSON and CSV projections of extracted recipes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::model::StructuredRecipe;

/// Separator for list fields flattened into one CSV cell.
pub const CSV_LIST_SEPARATOR: &str = "; ";

/// One flattened CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvRow {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub original_text: String,
    pub modern_translation: String,
    pub recipe_description: String,
    pub ingredients_count: usize,
    pub ingredients: String,
    pub modern_instructions_count: usize,
    pub modern_instructions: String,
    pub modern_translation_instructions_count: usize,
    pub modern_translation_instructions: String,
    pub original_instructions_count: usize,
    pub original_instructions: String,
    pub tips: String,
}

impl From<&StructuredRecipe> for CsvRow {
    fn from(recipe: &StructuredRecipe) -> Self {
        let modern = &recipe.modern_recipe;
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            url: recipe.url.clone(),
            original_text: recipe.original_text.join(CSV_LIST_SEPARATOR),
            modern_translation: recipe.modern_translation.join(CSV_LIST_SEPARATOR),
            recipe_description: modern.description.join(CSV_LIST_SEPARATOR),
            ingredients_count: modern.ingredients.len(),
            ingredients: modern.ingredients.join(CSV_LIST_SEPARATOR),
            modern_instructions_count: modern.modern_instructions.len(),
            modern_instructions: modern.modern_instructions.join(CSV_LIST_SEPARATOR),
            modern_translation_instructions_count: recipe.modern_translation_instructions.len(),
            modern_translation_instructions: recipe
                .modern_translation_instructions
                .join(CSV_LIST_SEPARATOR),
            original_instructions_count: recipe.original_instructions.len(),
            original_instructions: recipe.original_instructions.join(CSV_LIST_SEPARATOR),
            tips: modern.tips.clone(),
        }
    }
}

/// Pretty-printed JSON array of records.
pub fn to_json(recipes: &[StructuredRecipe]) -> Result<String> {
    Ok(serde_json::to_string_pretty(recipes)?)
}

pub fn from_json(json: &str) -> Result<Vec<StructuredRecipe>> {
    Ok(serde_json::from_str(json)?)
}

/// CSV document with a header row and one row per record.
pub fn to_csv(recipes: &[StructuredRecipe]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for recipe in recipes {
        writer.serialize(CsvRow::from(recipe))?;
    }
    writer
        .into_inner()
        .map_err(|e| std::io::Error::from(e.into_error()).into())
}

/// `base` with `.extension` appended, keeping any dots already in the file name.
fn output_path(base: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

/// Write `<base>.json` and `<base>.csv`, returning both paths.
pub async fn save_outputs(base: &Path, recipes: &[StructuredRecipe]) -> Result<(PathBuf, PathBuf)> {
    let json_path = output_path(base, "json");
    let csv_path = output_path(base, "csv");

    tokio::fs::write(&json_path, to_json(recipes)?).await?;
    info!("Saved {} recipe(s) to {}", recipes.len(), json_path.display());

    tokio::fs::write(&csv_path, to_csv(recipes)?).await?;
    info!("Saved {} recipe(s) to {}", recipes.len(), csv_path.display());

    Ok((json_path, csv_path))
}
