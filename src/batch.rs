use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};

use crate::assembler::MergePolicy;
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::extractors::extract_recipe;
use crate::fetchers::{fetch_page, PageSource};
use crate::listing::{fetch_listing, ListingParser};
use crate::model::{RecipeListing, StructuredRecipe};

/// Which listings a batch run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    /// The first `n` listings
    First(usize),
    /// The listing with this id
    Single(u32),
}

impl Selection {
    /// Build a selection from a count and a single id, which are mutually exclusive.
    /// A missing or zero count selects everything.
    pub fn from_options(count: Option<usize>, single_id: Option<u32>) -> Result<Self> {
        match (count, single_id) {
            (Some(_), Some(_)) => Err(ScrapeError::InvalidArguments(
                "a recipe count and a single recipe id cannot be combined".to_string(),
            )),
            (None, Some(id)) => Ok(Selection::Single(id)),
            (None | Some(0), None) => Ok(Selection::All),
            (Some(n), None) => Ok(Selection::First(n)),
        }
    }

    fn apply(self, mut listings: Vec<RecipeListing>) -> Result<Vec<RecipeListing>> {
        match self {
            Selection::All => Ok(listings),
            Selection::First(n) => {
                listings.truncate(n);
                Ok(listings)
            }
            Selection::Single(id) => {
                let available = listings.len();
                match listings.into_iter().find(|listing| listing.id == id) {
                    Some(listing) => Ok(vec![listing]),
                    None => {
                        warn!("Recipe #{} not found among {} listings", id, available);
                        Err(ScrapeError::NotFound(id))
                    }
                }
            }
        }
    }
}

/// Stops a running batch before its next item.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A listing that could not be scraped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecipe {
    pub listing: RecipeListing,
    pub reason: String,
}

/// Result of a batch run
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub recipes: Vec<StructuredRecipe>,
    pub skipped: Vec<SkippedRecipe>,
    /// Number of listings selected for this run
    pub requested: usize,
    /// Whether the run was stopped before reaching every selected listing
    pub stopped: bool,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.recipes.len()
    }
}

/// Sequentially scrapes recipe pages, one at a time.
pub struct BatchScraper {
    source: Box<dyn PageSource>,
    parser: ListingParser,
    delay: Duration,
    merge_policy: MergePolicy,
    stop: StopHandle,
}

impl BatchScraper {
    pub fn new(source: Box<dyn PageSource>, config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            source,
            parser: ListingParser::from_config(config)?,
            delay: config.delay(),
            merge_policy: config.merge_policy,
            stop: StopHandle::default(),
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub async fn listings(&self) -> Result<Vec<RecipeListing>> {
        fetch_listing(self.source.as_ref(), &self.parser).await
    }

    /// Number of recipes available in the listing.
    pub async fn count(&self) -> Result<usize> {
        Ok(self.listings().await?.len())
    }

    /// Fetch and extract a single recipe page.
    pub async fn scrape_recipe(&self, listing: &RecipeListing) -> Result<StructuredRecipe> {
        let page = fetch_page(self.source.as_ref(), &listing.url, self.delay).await?;
        Ok(extract_recipe(listing, &page, self.merge_policy))
    }

    /// Scrape the selected listings.
    ///
    /// Failing to read the listing aborts the run. A failure on any single recipe is
    /// logged and the recipe is skipped.
    pub async fn run(&self, selection: Selection) -> Result<BatchOutcome> {
        let listings = selection.apply(self.listings().await?)?;
        let total = listings.len();
        info!("Scraping {} recipe(s)", total);

        let mut outcome = BatchOutcome {
            requested: total,
            ..Default::default()
        };

        for (index, listing) in listings.into_iter().enumerate() {
            if self.stop.is_stopped() {
                warn!("Stopping before recipe #{} ({}/{})", listing.id, index + 1, total);
                outcome.stopped = true;
                break;
            }

            info!("[{}/{}] Scraping '{}'", index + 1, total, listing.name);
            match self.scrape_recipe(&listing).await {
                Ok(recipe) => {
                    log_summary(&recipe);
                    outcome.recipes.push(recipe);
                }
                Err(e) => {
                    let kind = if e.is_network() { "fetch" } else { "extraction" };
                    error!(
                        "Skipping recipe #{} '{}' after {} failure: {}",
                        listing.id, listing.name, kind, e
                    );
                    outcome.skipped.push(SkippedRecipe {
                        listing,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Scraped {} of {} recipe(s), {} skipped",
            outcome.succeeded(),
            total,
            outcome.skipped.len()
        );
        Ok(outcome)
    }
}

const EXCERPT_CHARS: usize = 50;

fn excerpt(lines: &[String]) -> String {
    let joined = lines.join("; ");
    match joined.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &joined[..cut]),
        None => joined,
    }
}

fn log_summary(recipe: &StructuredRecipe) {
    info!("Recipe #{} '{}'", recipe.id, recipe.name);
    if !recipe.original_text.is_empty() {
        info!("  original text: {}", excerpt(&recipe.original_text));
    }
    if !recipe.modern_translation.is_empty() {
        info!("  translation: {}", excerpt(&recipe.modern_translation));
    }
    info!(
        "  ingredients: {}, steps (modern/translation/original): {}/{}/{}",
        recipe.modern_recipe.ingredients.len(),
        recipe.modern_recipe.modern_instructions.len(),
        recipe.modern_translation_instructions.len(),
        recipe.original_instructions.len()
    );
}
