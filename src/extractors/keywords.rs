//! Keyword-driven line classification.
//!
//! Works on the flattened text of the whole page and ignores heading structure, so
//! it still recovers the original text and translation on pages whose markup the
//! section locator does not recognise.

use log::debug;
use scraper::{Html, Node};

/// Elements whose text is never page content.
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineState {
    #[default]
    None,
    Original,
    Translation,
    Recipe,
    Ingredients,
    Instructions,
    Usage,
}

impl LineState {
    /// Trigger keywords in priority order.
    const TRIGGERS: [(LineState, &'static [&'static str]); 6] = [
        (LineState::Original, &["翻刻テキスト", "原文", "古文"]),
        (LineState::Translation, &["現代語訳", "現代語"]),
        (LineState::Recipe, &["現代レシピ", "レシピ"]),
        (LineState::Ingredients, &["材料"]),
        (LineState::Instructions, &["作り方", "手順"]),
        (LineState::Usage, &["使い方", "用途"]),
    ];

    /// The state a header line switches to, if it is one.
    pub fn triggered_by(line: &str) -> Option<Self> {
        Self::TRIGGERS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| line.contains(k)))
            .map(|(state, _)| *state)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackResults {
    pub original_text: Vec<String>,
    pub modern_translation: Vec<String>,
}

pub fn classify_by_keyword(document: &Html) -> FallbackResults {
    let results = classify_lines(document_lines(document));
    debug!(
        "Keyword pass found {} original and {} translation line(s)",
        results.original_text.len(),
        results.modern_translation.len()
    );
    results
}

/// Every non-empty trimmed line of visible text, in document order.
pub fn document_lines(document: &Html) -> Vec<String> {
    let mut lines = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let skipped = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()));
        if skipped {
            continue;
        }

        lines.extend(
            text.split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }

    lines
}

/// Single pass over `lines`. Header lines switch state and are consumed; other lines
/// are kept while in the original or translation state.
pub fn classify_lines<I, S>(lines: I) -> FallbackResults
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut results = FallbackResults::default();
    let mut state = LineState::None;

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if let Some(next) = LineState::triggered_by(line) {
            state = next;
            continue;
        }

        match state {
            LineState::Original => results.original_text.push(line.to_string()),
            LineState::Translation => results.modern_translation.push(line.to_string()),
            // classified but not collected
            LineState::None
            | LineState::Recipe
            | LineState::Ingredients
            | LineState::Instructions
            | LineState::Usage => {}
        }
    }

    results
}
