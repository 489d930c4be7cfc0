use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::extractors::element_text;
use crate::fetchers::PageSource;
use crate::model::RecipeListing;

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid row selector"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Reads the recipe index page into listings.
#[derive(Debug, Clone)]
pub struct ListingParser {
    base: Url,
    link_pattern: Regex,
}

impl ListingParser {
    pub fn new(base_url: &str, link_pattern: &str) -> Result<Self> {
        Ok(Self {
            base: Url::parse(base_url)?,
            link_pattern: Regex::new(link_pattern)?,
        })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.listing_link_pattern)
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Listings from the index table, or from recipe links when there is no usable table.
    pub fn parse(&self, html: &str) -> Result<Vec<RecipeListing>> {
        let document = Html::parse_document(html);

        match document.select(&crate::extractors::TABLE).next() {
            Some(table) => {
                let listings = self.from_table(table);
                if !listings.is_empty() {
                    return Ok(listings);
                }
                warn!("Listing table has no recipe rows, scanning links instead");
            }
            None => warn!("No listing table found, scanning links instead"),
        }

        let listings = self.from_links(&document);
        if listings.is_empty() {
            return Err(ScrapeError::ParseError(format!(
                "no listing table or recipe links found at {}",
                self.base
            )));
        }
        Ok(listings)
    }

    fn from_table(&self, table: ElementRef) -> Vec<RecipeListing> {
        let mut listings = Vec::new();

        for row in table.select(&ROW) {
            let cells: Vec<ElementRef> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| matches!(el.value().name(), "td" | "th"))
                .collect();
            if cells.len() < 2 {
                continue;
            }

            let id_text = element_text(&cells[0]);
            let Some(id) = id_text.parse::<u32>().ok().filter(|id| *id >= 1) else {
                debug!("Skipping listing row with id '{}'", id_text);
                continue;
            };
            let Some((name, url)) = cells[1]
                .select(&ANCHOR)
                .next()
                .and_then(|link| self.link(link))
            else {
                debug!("Skipping listing row {} without a recipe link", id);
                continue;
            };

            listings.push(RecipeListing { id, name, url });
        }

        listings
    }

    fn from_links(&self, document: &Html) -> Vec<RecipeListing> {
        document
            .select(&ANCHOR)
            .filter(|link| {
                link.value()
                    .attr("href")
                    .is_some_and(|href| self.link_pattern.is_match(href))
            })
            .filter_map(|link| self.link(link))
            .zip(1..)
            .map(|((name, url), id)| RecipeListing { id, name, url })
            .collect()
    }

    /// Anchor text and its href resolved against the index URL.
    fn link(&self, anchor: ElementRef) -> Option<(String, String)> {
        let href = anchor.value().attr("href")?;
        match self.base.join(href.trim()) {
            Ok(url) => Some((element_text(&anchor), url.to_string())),
            Err(e) => {
                warn!("Ignoring unresolvable link '{}': {}", href, e);
                None
            }
        }
    }
}

/// Fetch the index page and read its listings.
pub async fn fetch_listing(
    source: &dyn PageSource,
    parser: &ListingParser,
) -> Result<Vec<RecipeListing>> {
    let html = source.fetch_html(parser.base_url()).await?;
    let listings = parser.parse(&html)?;
    info!("Found {} recipes in the listing", listings.len());
    Ok(listings)
}
