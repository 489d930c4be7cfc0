//! Heading-based section location.
//!
//! A recipe page is divided by `<h2>` headings into the original text, its modern
//! translation and a modern recipe. Each section becomes a [`SectionSpan`]: the flat
//! list of sibling nodes between its heading and the next heading of the same or
//! higher rank.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use log::debug;
use scraper::{ElementRef, Html, Selector};

use super::{element_text, heading_level};

/// Rank of the headings that open a section.
pub const SECTION_HEADING_LEVEL: u8 = 2;

/// Sub-heading keywords that mark a paragraph as cooking tips.
const TIPS_KEYWORDS: [&str; 2] = ["コツ", "ポイント"];

static SECTION_HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("valid heading selector"));
static ORDERED_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ol").expect("valid list selector"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    Original,
    Translation,
    Recipe,
}

impl SectionKind {
    /// Marker substrings, tested in this order.
    const MARKERS: [(SectionKind, &'static [&'static str]); 3] = [
        (SectionKind::Original, &["翻刻テキスト", "原文", "古文"]),
        (SectionKind::Translation, &["現代語訳"]),
        (SectionKind::Recipe, &["現代レシピ", "レシピ"]),
    ];

    /// Classify a heading by the markers its text contains.
    pub fn from_heading(text: &str) -> Option<Self> {
        Self::MARKERS
            .iter()
            .find(|(_, markers)| markers.iter().any(|marker| text.contains(marker)))
            .map(|(kind, _)| *kind)
    }
}

/// Node types a span keeps. Anything else between headings is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    SubHeading(u8),
    Paragraph,
    Block,
    Table,
    List,
}

impl NodeKind {
    pub fn of(element: &ElementRef) -> Option<Self> {
        match element.value().name() {
            "h3" | "h4" | "h5" | "h6" => heading_level(element).map(NodeKind::SubHeading),
            "p" => Some(NodeKind::Paragraph),
            "div" | "section" | "article" | "blockquote" => Some(NodeKind::Block),
            "table" => Some(NodeKind::Table),
            "ol" | "ul" => Some(NodeKind::List),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SectionSpan<'a> {
    pub kind: SectionKind,
    pub nodes: Vec<ElementRef<'a>>,
}

impl<'a> SectionSpan<'a> {
    pub fn new(kind: SectionKind, nodes: Vec<ElementRef<'a>>) -> Self {
        Self { kind, nodes }
    }

    /// Build a span from the child elements of `container`.
    pub fn from_children(kind: SectionKind, container: ElementRef<'a>) -> Self {
        let nodes = container
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| NodeKind::of(el).is_some())
            .collect();
        Self { kind, nodes }
    }

    /// One trimmed line per sub-heading, paragraph, block or table node.
    pub fn text_lines(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|node| !matches!(NodeKind::of(node), Some(NodeKind::List) | None))
            .map(element_text)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

pub type SectionMap<'a> = BTreeMap<SectionKind, SectionSpan<'a>>;

/// Split a document into its sections. The first heading of each kind wins; a page
/// without any recognised heading yields an empty map.
pub fn locate_sections(document: &Html) -> SectionMap<'_> {
    let mut sections = SectionMap::new();

    for heading in document.select(&SECTION_HEADING) {
        let title = element_text(&heading);
        let Some(kind) = SectionKind::from_heading(&title) else {
            continue;
        };
        if sections.contains_key(&kind) {
            debug!("Ignoring repeated {:?} heading: {}", kind, title);
            continue;
        }

        let nodes = span_nodes(heading);
        debug!("Found {:?} section '{}' with {} node(s)", kind, title, nodes.len());
        sections.insert(kind, SectionSpan::new(kind, nodes));
    }

    sections
}

fn span_nodes(heading: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let level = heading_level(&heading).unwrap_or(SECTION_HEADING_LEVEL);

    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|sibling| heading_level(sibling).map_or(true, |l| l > level))
        .filter(|sibling| NodeKind::of(sibling).is_some())
        .collect()
}

/// Text content recovered from the section spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionResults {
    pub original_text: Vec<String>,
    pub modern_translation: Vec<String>,
    pub description: Vec<String>,
    pub tips: String,
    /// `"N: text"` lines from ordered lists in the recipe section
    pub list_instructions: Vec<String>,
}

pub fn extract_section_text(sections: &SectionMap) -> SectionResults {
    let mut results = SectionResults::default();

    if let Some(span) = sections.get(&SectionKind::Original) {
        results.original_text = span.text_lines();
    }
    if let Some(span) = sections.get(&SectionKind::Translation) {
        results.modern_translation = span.text_lines();
    }
    if let Some(span) = sections.get(&SectionKind::Recipe) {
        read_recipe_span(span, &mut results);
    }

    results
}

fn read_recipe_span(span: &SectionSpan, results: &mut SectionResults) {
    let mut under_tips_heading = false;

    for node in &span.nodes {
        match NodeKind::of(node) {
            Some(NodeKind::SubHeading(level)) => {
                let text = element_text(node);
                under_tips_heading = TIPS_KEYWORDS.iter().any(|k| text.contains(k));
                if level == SECTION_HEADING_LEVEL + 1 && !text.is_empty() {
                    results.description.push(text);
                }
            }
            Some(NodeKind::Paragraph) => {
                let text = element_text(node);
                if text.is_empty() {
                    continue;
                }
                if under_tips_heading {
                    debug!("Found tips paragraph: {}", text);
                    if !results.tips.is_empty() {
                        results.tips.push('\n');
                    }
                    results.tips.push_str(&text);
                } else {
                    results.description.push(text);
                }
            }
            Some(NodeKind::List) | Some(NodeKind::Block) => {
                results.list_instructions.extend(ordered_list_items(node));
            }
            Some(NodeKind::Table) | None => {}
        }
    }
}

/// `"N: text"` lines for every `<ol>` at or below `node`, numbered from the list's `start`.
///
/// A missing or non-positive `start` counts from 1. Numbering stops at `u32::MAX`.
fn ordered_list_items(node: &ElementRef) -> Vec<String> {
    let lists: Vec<ElementRef> = if node.value().name() == "ol" {
        vec![*node]
    } else {
        node.select(&ORDERED_LIST).collect()
    };

    let mut items = Vec::new();
    for list in lists {
        let start = list
            .value()
            .attr("start")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|start| *start >= 1)
            .unwrap_or(1);
        let texts = list
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "li")
            .map(|li| element_text(&li))
            .filter(|text| !text.is_empty());
        for (offset, text) in (0u32..).zip(texts) {
            let Some(number) = start.checked_add(offset) else {
                debug!("Ordered list numbering overflowed, dropping remaining items");
                break;
            };
            items.push(format!("{}: {}", number, text));
        }
    }
    items
}
