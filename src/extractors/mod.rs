use std::sync::LazyLock;

use log::debug;
use scraper::{ElementRef, Selector};

use crate::assembler::{assemble, MergePolicy};
use crate::fetchers::RawPage;
use crate::model::{RecipeListing, StructuredRecipe};

pub mod keywords;
pub mod sections;
pub mod tables;

pub use keywords::{classify_by_keyword, FallbackResults};
pub use sections::{locate_sections, SectionKind, SectionMap, SectionResults, SectionSpan};
pub use tables::{classify_tables, InstructionSets, TableResults};

pub(crate) static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));

/// Run both extraction passes over a page and merge them into one record.
pub fn extract_recipe(
    listing: &RecipeListing,
    page: &RawPage,
    policy: MergePolicy,
) -> StructuredRecipe {
    let document = page.document();

    let sections = locate_sections(document);
    debug!(
        "Located {} section(s) on {}: {:?}",
        sections.len(),
        page.url(),
        sections.keys().collect::<Vec<_>>()
    );

    let section_results = sections::extract_section_text(&sections);
    let table_results = classify_tables(document, &sections);
    let fallback_results = classify_by_keyword(document);

    assemble(
        listing,
        section_results,
        table_results,
        fallback_results,
        policy,
    )
}

/// Text of an element with every text fragment trimmed and joined without a separator.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}

/// `Some(n)` for `<hN>` elements.
pub(crate) fn heading_level(element: &ElementRef) -> Option<u8> {
    match element.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}
