pub mod assembler;
pub mod batch;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod listing;
pub mod model;
pub mod output;
pub mod validation;

pub use assembler::MergePolicy;
pub use batch::{BatchOutcome, BatchScraper, Selection, SkippedRecipe, StopHandle};
pub use config::ScraperConfig;
pub use error::{Result, ScrapeError};
pub use fetchers::{PageSource, RawPage, RequestFetcher};
pub use listing::ListingParser;
pub use model::{InstructionKind, ModernRecipe, RecipeListing, StructuredRecipe};
pub use validation::{filter_valid_recipes, is_valid_recipe, StorageRecord};

/// Extract a record from an already downloaded detail page.
pub fn extract_recipe_from_html(
    listing: &RecipeListing,
    html: &str,
    policy: MergePolicy,
) -> StructuredRecipe {
    let page = RawPage::parse(listing.url.as_str(), html);
    extractors::extract_recipe(listing, &page, policy)
}

/// Build an HTTP scraper from `config`.
pub fn scraper_from_config(config: &ScraperConfig) -> Result<BatchScraper> {
    let fetcher = RequestFetcher::from_config(config)?;
    BatchScraper::new(Box::new(fetcher), config)
}

/// Scrape the selected recipes over HTTP.
pub async fn scrape_recipes(config: &ScraperConfig, selection: Selection) -> Result<BatchOutcome> {
    scraper_from_config(config)?.run(selection).await
}

/// Number of recipes in the listing at `config.base_url`.
pub async fn count_recipes(config: &ScraperConfig) -> Result<usize> {
    scraper_from_config(config)?.count().await
}
