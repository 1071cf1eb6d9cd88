//! The Markdown subset used in narrative report bodies.
//!
//! Supported: `#`, `##`, `###` headings, `**bold**`, paragraphs separated by
//! blank lines, and pipe tables. Anything else is plain text.

use std::sync::LazyLock;

use ledger_core::ReportTable;
use regex::Regex;

/// A pipe table: header line, separator line, then one or more rows.
static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|[^\n]+\|[\n\r]+\|[-:\s|]+\|[\n\r]+(?:\|[^\n]+\|[\n\r]*)+").unwrap()
});

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// A run of text with uniform weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

/// One line of inline content.
pub type Line = Vec<Span>;

/// A block of report content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Level 1 to 3.
    Heading(u8, Line),
    /// Consecutive non-blank lines.
    Paragraph(Vec<Line>),
    /// Rows of cells. Separator rows are dropped.
    Table(Vec<Vec<Line>>),
}

/// Best-effort scan for pipe tables in free text.
///
/// The first line of each table becomes the header. Empty cells are dropped,
/// so a ragged table yields ragged rows.
pub fn extract_tables(content: &str) -> Vec<ReportTable> {
    TABLE_RE
        .find_iter(content)
        .filter_map(|m| {
            let mut lines = m
                .as_str()
                .split('\n')
                .filter(|line| !line.trim().is_empty() && !is_separator(line))
                .map(split_cells);
            let header = lines.next()?;
            Some(ReportTable {
                title: None,
                header,
                rows: lines.collect(),
            })
        })
        .collect()
}

/// Split content into blocks.
pub fn parse_blocks(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<Line> = Vec::new();
    let mut table: Vec<Vec<Line>> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut blocks, &mut paragraph);
            flush_table(&mut blocks, &mut table);
            continue;
        }

        if let Some((level, text)) = heading(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            flush_table(&mut blocks, &mut table);
            blocks.push(Block::Heading(level, parse_inline(text)));
            continue;
        }

        if is_table_row(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            if !is_separator(line) {
                table.push(split_cells(line).iter().map(|cell| parse_inline(cell)).collect());
            }
            continue;
        }

        flush_table(&mut blocks, &mut table);
        paragraph.push(parse_inline(line));
    }

    flush_paragraph(&mut blocks, &mut paragraph);
    flush_table(&mut blocks, &mut table);
    blocks
}

/// Split `**bold**` runs out of a line.
pub fn parse_inline(text: &str) -> Line {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in BOLD_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span {
                text: text[last..whole.start()].to_string(),
                bold: false,
            });
        }
        spans.push(Span {
            text: inner.as_str().to_string(),
            bold: true,
        });
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span {
            text: text[last..].to_string(),
            bold: false,
        });
    }
    spans
}

fn heading(line: &str) -> Option<(u8, &str)> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(marker, level)| line.strip_prefix(marker).map(|text| (level, text.trim_end())))
}

fn is_table_row(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

fn is_separator(line: &str) -> bool {
    line.chars()
        .all(|c| c.is_whitespace() || matches!(c, '|' | ':' | '-'))
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

fn flush_paragraph(blocks: &mut Vec<Block>, paragraph: &mut Vec<Line>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(paragraph)));
    }
}

fn flush_table(blocks: &mut Vec<Block>, table: &mut Vec<Vec<Line>>) {
    if !table.is_empty() {
        blocks.push(Block::Table(std::mem::take(table)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span {
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Span {
        Span {
            text: text.to_string(),
            bold: true,
        }
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    const CONTENT: &str = "# Payments\n\nIntro text.\n\n| Provider | Count |\n|---|:---:|\n| PayPlus | 12 |\n| Manual | 3 |\n\nClosing line.\n";

    #[test]
    fn test_extract_single_table() {
        let tables = extract_tables(CONTENT);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].header, strings(&["Provider", "Count"]));
        assert_eq!(
            tables[0].rows,
            vec![strings(&["PayPlus", "12"]), strings(&["Manual", "3"])]
        );
    }

    #[test]
    fn test_extract_multiple_tables_with_crlf() {
        let content = "| A | B |\r\n|---|---|\r\n| 1 | 2 |\r\n\r\ntext\r\n\r\n| C |\r\n| - |\r\n| 3 |\r\n";
        let tables = extract_tables(content);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows, vec![strings(&["1", "2"])]);
        assert_eq!(tables[1].header, strings(&["C"]));
        assert_eq!(tables[1].rows, vec![strings(&["3"])]);
    }

    #[test]
    fn test_table_without_separator_is_not_extracted() {
        assert!(extract_tables("| a | b |\n| 1 | 2 |\n").is_empty());
    }

    #[test]
    fn test_empty_cells_dropped() {
        let tables = extract_tables("| a | b |\n|---|---|\n| 1 |  |\n");
        assert_eq!(tables[0].rows, vec![strings(&["1"])]);
    }

    #[test]
    fn test_parse_inline_bold() {
        assert_eq!(
            parse_inline("Total: **42** checks, **ok**"),
            vec![plain("Total: "), bold("42"), plain(" checks, "), bold("ok")]
        );
        assert_eq!(parse_inline("no markup"), vec![plain("no markup")]);
        assert_eq!(parse_inline("**unterminated"), vec![plain("**unterminated")]);
    }

    #[test]
    fn test_parse_blocks() {
        let blocks = parse_blocks(CONTENT);
        assert_eq!(
            blocks,
            vec![
                Block::Heading(1, vec![plain("Payments")]),
                Block::Paragraph(vec![vec![plain("Intro text.")]]),
                Block::Table(vec![
                    vec![vec![plain("Provider")], vec![plain("Count")]],
                    vec![vec![plain("PayPlus")], vec![plain("12")]],
                    vec![vec![plain("Manual")], vec![plain("3")]],
                ]),
                Block::Paragraph(vec![vec![plain("Closing line.")]]),
            ]
        );
    }

    #[test]
    fn test_heading_levels() {
        let blocks = parse_blocks("### Third\n## Second\n#NoSpace");
        assert_eq!(
            blocks,
            vec![
                Block::Heading(3, vec![plain("Third")]),
                Block::Heading(2, vec![plain("Second")]),
                Block::Paragraph(vec![vec![plain("#NoSpace")]]),
            ]
        );
    }

    #[test]
    fn test_paragraph_keeps_line_breaks() {
        let blocks = parse_blocks("first\nsecond\n\nthird");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![vec![plain("first")], vec![plain("second")]]),
                Block::Paragraph(vec![vec![plain("third")]]),
            ]
        );
    }
}
