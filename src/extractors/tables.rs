use log::debug;
use scraper::{ElementRef, Html};

use super::sections::{NodeKind, SectionKind, SectionMap, SectionSpan};
use super::{element_text, TABLE};
use crate::model::InstructionKind;

/// Both must appear in the header row of an ingredients table.
const INGREDIENT_HEADER_KEYWORDS: [&str; 2] = ["材料", "分量"];
/// Body rows whose first cell is this are a repeated header.
const INGREDIENT_HEADER_CELL: &str = "材料";
/// Sub-heading keyword that introduces an instruction table.
const STEPS_HEADING_KEYWORD: &str = "手順";
const STEP_PLACEHOLDER: &str = "手順";
/// Step text must be longer than this, in bytes.
const MIN_STEP_TEXT_LEN: usize = 5;

impl From<SectionKind> for InstructionKind {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Recipe => InstructionKind::Modern,
            SectionKind::Translation => InstructionKind::Translation,
            SectionKind::Original => InstructionKind::Original,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionSets {
    pub modern: Vec<String>,
    pub translation: Vec<String>,
    pub original: Vec<String>,
}

impl InstructionSets {
    pub fn get(&self, kind: InstructionKind) -> &[String] {
        match kind {
            InstructionKind::Modern => &self.modern,
            InstructionKind::Translation => &self.translation,
            InstructionKind::Original => &self.original,
        }
    }

    fn get_mut(&mut self, kind: InstructionKind) -> &mut Vec<String> {
        match kind {
            InstructionKind::Modern => &mut self.modern,
            InstructionKind::Translation => &mut self.translation,
            InstructionKind::Original => &mut self.original,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableResults {
    pub ingredients: Vec<String>,
    pub instructions: InstructionSets,
}

/// Ingredients come from every table in the document; instructions from the
/// instruction table of each located section.
pub fn classify_tables(document: &Html, sections: &SectionMap) -> TableResults {
    let mut results = TableResults {
        ingredients: ingredient_rows(document),
        ..Default::default()
    };

    for (kind, span) in sections {
        let steps = instruction_rows(span);
        debug!("Found {} {:?} instruction step(s)", steps.len(), kind);
        results
            .instructions
            .get_mut(InstructionKind::from(*kind))
            .extend(steps);
    }

    results
}

/// `"name: amount"` lines from every table whose header names both columns.
pub fn ingredient_rows(document: &Html) -> Vec<String> {
    let mut ingredients = Vec::new();

    for table in document.select(&TABLE) {
        let rows = TableRows::of(table);
        let (header, body) = match rows.head.as_slice() {
            [] => match rows.body.split_first() {
                Some((first, rest)) => (element_text(first), rest),
                None => continue,
            },
            head => (head.iter().map(element_text).collect(), rows.body.as_slice()),
        };

        if !INGREDIENT_HEADER_KEYWORDS.iter().all(|k| header.contains(k)) {
            continue;
        }
        debug!("Found ingredients table with {} row(s)", body.len());

        for row in body {
            let cells = row_cells(row);
            let [name, amount, ..] = cells.as_slice() else {
                continue;
            };
            if name.is_empty() || amount.is_empty() || name == INGREDIENT_HEADER_CELL {
                continue;
            }
            ingredients.push(format!("{name}: {amount}"));
        }
    }

    ingredients
}

/// `"N: text"` lines from the first table after the span's steps sub-heading.
pub fn instruction_rows(span: &SectionSpan) -> Vec<String> {
    let Some(table) = find_instruction_table(span) else {
        return Vec::new();
    };

    TableRows::of(table)
        .body
        .iter()
        .filter_map(|row| format_step(&row_cells(row)))
        .collect()
}

fn find_instruction_table<'a>(span: &SectionSpan<'a>) -> Option<ElementRef<'a>> {
    let heading = span.nodes.iter().position(|node| {
        matches!(NodeKind::of(node), Some(NodeKind::SubHeading(_)))
            && element_text(node).contains(STEPS_HEADING_KEYWORD)
    })?;

    for node in &span.nodes[heading + 1..] {
        match NodeKind::of(node) {
            Some(NodeKind::Table) => return Some(*node),
            Some(NodeKind::Block) => {
                if let Some(table) = node.select(&TABLE).next() {
                    return Some(table);
                }
            }
            Some(NodeKind::SubHeading(_)) => return None,
            _ => {}
        }
    }
    None
}

/// Format a table row as a step, or `None` if it is a header or noise row.
///
/// The step number is the first cell taken literally; the text is the last cell.
pub fn format_step(cells: &[String]) -> Option<String> {
    if cells.len() < 2 {
        return None;
    }
    let number = cells[0].as_str();
    let text = cells[cells.len() - 1].as_str();

    let accepted = is_step_number(number)
        && !text.is_empty()
        && text != STEP_PLACEHOLDER
        && text.len() > MIN_STEP_TEXT_LEN;

    accepted.then(|| format!("{number}: {text}"))
}

/// ASCII or full-width decimal digits only.
fn is_step_number(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || ('０'..='９').contains(&c))
}

/// A table's own rows, split by `<thead>`. Rows of nested tables are not included.
struct TableRows<'a> {
    head: Vec<ElementRef<'a>>,
    body: Vec<ElementRef<'a>>,
}

impl<'a> TableRows<'a> {
    fn of(table: ElementRef<'a>) -> Self {
        let mut rows = TableRows {
            head: Vec::new(),
            body: Vec::new(),
        };

        for child in table.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "thead" => rows.head.extend(child_rows(child)),
                "tbody" | "tfoot" => rows.body.extend(child_rows(child)),
                "tr" => rows.body.push(child),
                _ => {}
            }
        }
        rows
    }
}

fn child_rows(group: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    group
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
}

fn row_cells(row: &ElementRef) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .map(|cell| element_text(&cell))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::sections::locate_sections;
    use scraper::Selector;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_ingredient_table_with_thead() {
        let html = r#"
            <table>
                <thead><tr><th>材料</th><th>分量</th></tr></thead>
                <tbody><tr><td>卵</td><td>2個</td></tr></tbody>
            </table>
        "#;
        let document = Html::parse_document(html);

        assert_eq!(ingredient_rows(&document), vec!["卵: 2個"]);
    }

    #[test]
    fn test_ingredient_table_header_in_first_row() {
        let html = r#"
            <table>
                <tr><th>材料</th><th>分量</th></tr>
                <tr><td>卵</td><td>2個</td></tr>
                <tr><td>材料</td><td>分量</td></tr>
                <tr><td>だし</td><td>100ml</td></tr>
                <tr><td>塩</td><td></td></tr>
                <tr><td>ひとつだけ</td></tr>
            </table>
        "#;
        let document = Html::parse_document(html);

        assert_eq!(ingredient_rows(&document), vec!["卵: 2個", "だし: 100ml"]);
    }

    #[test]
    fn test_non_ingredient_tables_are_ignored() {
        let html = r#"
            <table><tr><th>番号</th><th>手順</th></tr><tr><td>1</td><td>卵を割ってほぐす</td></tr></table>
            <table><tr><th>材料</th><th>備考</th></tr><tr><td>卵</td><td>新鮮なもの</td></tr></table>
        "#;
        let document = Html::parse_document(html);

        assert!(ingredient_rows(&document).is_empty());
    }

    #[test]
    fn test_ingredients_from_several_tables_keep_order() {
        let html = r#"
            <table><thead><tr><th>材料</th><th>分量</th></tr></thead>
                <tbody><tr><td>卵</td><td>2個</td></tr></tbody></table>
            <p>たれ</p>
            <table><thead><tr><th>材料（たれ）</th><th>分量</th></tr></thead>
                <tbody><tr><td>醤油</td><td>大さじ1</td></tr><tr><td>みりん</td><td>小さじ1</td></tr></tbody></table>
        "#;
        let document = Html::parse_document(html);

        assert_eq!(
            ingredient_rows(&document),
            vec!["卵: 2個", "醤油: 大さじ1", "みりん: 小さじ1"]
        );
    }

    #[test]
    fn test_instruction_table_with_noise_row() {
        let html = r#"
            <h2>現代レシピ</h2>
            <h4>手順</h4>
            <table>
                <tr><td>1</td><td>卵を割る</td></tr>
                <tr><td>手順</td><td>手順</td></tr>
                <tr><td>2</td><td>弱火で十分煮る</td></tr>
            </table>
        "#;
        let document = Html::parse_document(html);
        let results = classify_tables(&document, &locate_sections(&document));

        assert_eq!(
            results.instructions.modern,
            vec!["1: 卵を割る", "2: 弱火で十分煮る"]
        );
        assert!(results.instructions.translation.is_empty());
        assert!(results.instructions.original.is_empty());
    }

    #[test]
    fn test_instruction_numbers_are_kept_literally() {
        let html = r#"
            <h2>現代語訳</h2>
            <h4>手順</h4>
            <div class="table-wrap"><table>
                <thead><tr><th>番号</th><th>内容</th></tr></thead>
                <tbody>
                    <tr><td>3</td><td>鍋</td><td>卵を鍋に入れる</td></tr>
                    <tr><td>7</td><td>火</td><td>火にかけて煮る</td></tr>
                </tbody>
            </table></div>
        "#;
        let document = Html::parse_document(html);
        let results = classify_tables(&document, &locate_sections(&document));

        assert_eq!(
            results.instructions.translation,
            vec!["3: 卵を鍋に入れる", "7: 火にかけて煮る"]
        );
    }

    #[test]
    fn test_instruction_table_must_follow_steps_heading() {
        let html = r#"
            <h2>翻刻テキスト</h2>
            <table><tr><td>1</td><td>玉子をわりて</td></tr></table>
            <h4>手順</h4>
            <h4>注記</h4>
            <table><tr><td>1</td><td>玉子をわりて</td></tr></table>
        "#;
        let document = Html::parse_document(html);
        let results = classify_tables(&document, &locate_sections(&document));

        assert!(results.instructions.original.is_empty());
    }

    #[test]
    fn test_instruction_rows_on_constructed_span() {
        let html = Html::parse_fragment(
            r#"<section><h4>作り方の手順</h4><p>説明</p>
               <table><tr><td>１</td><td>卵をゆでる</td></tr></table></section>"#,
        );
        let selector = Selector::parse("section").unwrap();
        let container = html.select(&selector).next().unwrap();
        let span = SectionSpan::from_children(SectionKind::Recipe, container);

        assert_eq!(instruction_rows(&span), vec!["１: 卵をゆでる"]);
    }

    #[test]
    fn test_format_step_filters() {
        assert_eq!(
            format_step(&cells(&["1", "卵を割る"])),
            Some("1: 卵を割る".to_string())
        );
        assert_eq!(format_step(&cells(&["手順", "手順"])), None);
        assert_eq!(format_step(&cells(&["1", "手順"])), None);
        assert_eq!(format_step(&cells(&["1", ""])), None);
        assert_eq!(format_step(&cells(&["1a", "卵を割る"])), None);
        assert_eq!(format_step(&cells(&["", "卵を割る"])), None);
        assert_eq!(format_step(&cells(&["2", "boil"])), None);
        assert_eq!(format_step(&cells(&["2", "simmer"])), Some("2: simmer".to_string()));
        assert_eq!(format_step(&cells(&["2"])), None);
        // the length limit counts bytes, so short kana and kanji steps are kept
        assert_eq!(format_step(&cells(&["3", "煮る"])), Some("3: 煮る".to_string()));
        assert_eq!(format_step(&cells(&["3", "煮"])), None);
        assert_eq!(format_step(&cells(&["3", "boils"])), None);
    }
}
