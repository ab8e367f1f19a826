use crate::filter::FilterError;
use crate::stream::ScanStats;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

/// Table with the look used for every summary this tool prints
pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

pub fn stats_table(stats: &ScanStats) -> Table {
    let mut table = create_styled_table(&["Metric", "Lines"]);
    let rows = [
        ("read", stats.lines_read),
        ("parsed", stats.records_parsed),
        ("skipped", stats.lines_skipped),
        ("matched", stats.lines_matched),
    ];
    for (label, count) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Error message plus the expression with a caret under the failing position
pub fn render_filter_error(expression: &str, err: &FilterError) -> String {
    let position = err.position().min(expression.chars().count());
    let caret = format!("{}^", " ".repeat(position));
    format!(
        "{} {}\n  {}\n  {}",
        "Error parsing filter:".red().bold(),
        err,
        expression,
        caret.red().bold()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::compile;

    #[test]
    fn test_caret_points_at_error() {
        colored::control::set_override(false);
        let expr = "(level = ERROR";
        let err = compile(expr).unwrap_err();
        let rendered = render_filter_error(expr, &err);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines[0],
            "Error parsing filter: Expected RPAREN, got EOF at position 14"
        );
        assert_eq!(lines[1], "  (level = ERROR");
        assert_eq!(lines[2], format!("  {}^", " ".repeat(14)));
    }

    #[test]
    fn test_stats_table_lists_counts() {
        let stats = ScanStats {
            lines_read: 5,
            records_parsed: 4,
            lines_skipped: 1,
            lines_matched: 2,
        };
        let rendered = stats_table(&stats).to_string();
        for label in ["read", "parsed", "skipped", "matched"] {
            assert!(rendered.contains(label), "missing {label} in\n{rendered}");
        }
    }
}
