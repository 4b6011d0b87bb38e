use crate::constants::TOTALS_MARKER;
use crate::types::{EmptyReason, Position};
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use tracing::debug;

/// Result of running the extractor over one validated document.
#[derive(Debug, Clone, PartialEq)]
pub enum TableExtract {
    Found(BTreeMap<String, f64>),
    Empty(EmptyReason),
}

// Fixed column schemas per position. Cells of the aggregate row are consumed
// positionally, one per column; header text across categories is too
// irregular for name-based mapping (see DESIGN.md).
const QB_COLUMNS: &[&str] = &[
    "completions",
    "pass_attempts",
    "passing_yards",
    "completion_pct",
    "passing_tds",
    "interceptions",
    "sacks",
    "passer_rating",
];

const RB_COLUMNS: &[&str] = &[
    "rush_attempts",
    "rushing_yards",
    "yards_per_carry",
    "rushing_tds",
    "receptions",
    "receiving_yards",
    "receiving_tds",
    "fumbles",
];

const WR_COLUMNS: &[&str] = &[
    "receptions",
    "targets",
    "receiving_yards",
    "yards_per_catch",
    "receiving_tds",
    "rush_attempts",
    "rushing_yards",
    "fumbles",
];

const TE_COLUMNS: &[&str] = &[
    "receptions",
    "targets",
    "receiving_yards",
    "yards_per_catch",
    "receiving_tds",
    "fumbles",
];

pub fn schema_for(position: Position) -> &'static [&'static str] {
    match position {
        Position::QB => QB_COLUMNS,
        Position::RB => RB_COLUMNS,
        Position::WR => WR_COLUMNS,
        Position::TE => TE_COLUMNS,
    }
}

fn receiving_position(hint: Option<Position>) -> Position {
    match hint {
        Some(Position::TE) => Position::TE,
        _ => Position::WR,
    }
}

/// Selects the column schema from the header row. The relative order of the
/// category-distinguishing tokens decides: a receiving token ahead of a
/// rushing-attempts token means a receiving table, the reverse a rushing
/// table, a leading passing token a quarterback table. With no
/// distinguishing token the caller's hint wins, then RB as the default.
pub fn detect_schema_position(headers: &[String], hint: Option<Position>) -> Position {
    let lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let first_index = |tokens: &[&str]| -> Option<usize> {
        lower
            .iter()
            .position(|cell| tokens.iter().any(|token| cell.contains(token)))
    };
    let passing = first_index(&["comp", "pass"]);
    let receiving = first_index(&["rec", "tgt", "target"]);
    let rushing = first_index(&["rush", "att", "car"]);

    if let Some(p) = passing {
        if receiving.map_or(true, |i| p < i) && rushing.map_or(true, |i| p < i) {
            return Position::QB;
        }
    }
    match (receiving, rushing) {
        (Some(r), Some(a)) if r < a => receiving_position(hint),
        (Some(_), Some(_)) => Position::RB,
        (Some(_), None) => receiving_position(hint),
        (None, Some(_)) => Position::RB,
        (None, None) => hint.unwrap_or(Position::RB),
    }
}

/// Parses one data cell to a number, tolerating thousands separators and
/// percent signs. Placeholders and unparseable text yield `None`.
pub fn parse_stat_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    let cleaned = trimmed.replace(',', "");
    let cleaned = cleaned.strip_suffix('%').unwrap_or(&cleaned);
    cleaned.trim().parse::<f64>().ok()
}

/// Locates the aggregate row (marker cell `Totals`) in whichever table
/// carries it and maps its data cells onto the schema selected from that
/// table's header row. Deterministic: identical documents yield identical
/// mappings.
pub fn extract_totals(body: &str, hint: Option<Position>) -> TableExtract {
    let document = Html::parse_document(body);
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    for table in document.select(&table_selector) {
        let rows: Vec<Vec<String>> = table
            .select(&row_selector)
            .map(|row| {
                row.select(&cell_selector)
                    .map(|cell| cell.text().collect::<String>().trim().to_string())
                    .collect()
            })
            .collect();

        let Some(totals_idx) = rows.iter().position(|cells| {
            cells
                .first()
                .map_or(false, |cell| cell.eq_ignore_ascii_case(TOTALS_MARKER))
        }) else {
            continue;
        };

        let headers: &[String] = if totals_idx > 0 { &rows[0] } else { &[] };
        let position = detect_schema_position(headers, hint);
        let columns = schema_for(position);
        debug!(?position, "selected column schema");

        // Skip the marker cell and any blank spacer cells right after it,
        // then consume one source cell per schema column.
        let cells = &rows[totals_idx];
        let mut values = cells.iter().skip(1).skip_while(|cell| cell.is_empty());
        let mut stats = BTreeMap::new();
        for column in columns {
            let Some(cell) = values.next() else { break };
            if let Some(value) = parse_stat_cell(cell) {
                stats.insert((*column).to_string(), value);
            }
        }

        if stats.is_empty() {
            return TableExtract::Empty(EmptyReason::NoValidStats);
        }
        return TableExtract::Found(stats);
    }

    TableExtract::Empty(EmptyReason::NoDataStart)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[Vec<&str>]) -> String {
        let head: String = headers.iter().map(|h| format!("<th>{h}</th>")).collect();
        let body: String = rows
            .iter()
            .map(|cells| {
                let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
                format!("<tr>{tds}</tr>")
            })
            .collect();
        format!("<html><body><table><tr>{head}</tr>{body}</table></body></html>")
    }

    #[test]
    fn receiving_token_first_selects_receiving_schema() {
        let headers: Vec<String> =
            ["Rec", "Tgt", "Yds", "Avg", "TD", "Att"].map(String::from).into();
        assert_eq!(detect_schema_position(&headers, None), Position::WR);
        assert_eq!(detect_schema_position(&headers, Some(Position::TE)), Position::TE);
    }

    #[test]
    fn rushing_token_first_selects_rushing_schema() {
        let headers: Vec<String> =
            ["Att", "Yds", "Avg", "TD", "Rec"].map(String::from).into();
        assert_eq!(detect_schema_position(&headers, None), Position::RB);
        // the hint never overrides a distinguishing header
        assert_eq!(detect_schema_position(&headers, Some(Position::WR)), Position::RB);
    }

    #[test]
    fn leading_passing_token_selects_quarterback_schema() {
        let headers: Vec<String> =
            ["Comp", "Att", "Yds", "Pct", "TD", "INT"].map(String::from).into();
        assert_eq!(detect_schema_position(&headers, None), Position::QB);
    }

    #[test]
    fn undistinguished_headers_fall_back_to_hint_then_default() {
        let headers: Vec<String> = ["Week", "Opp", "Result"].map(String::from).into();
        assert_eq!(detect_schema_position(&headers, Some(Position::QB)), Position::QB);
        assert_eq!(detect_schema_position(&headers, None), Position::RB);
    }

    #[test]
    fn totals_row_maps_onto_receiving_columns() {
        let body = table(
            &["Rec", "Tgt", "Yds", "Avg", "TD"],
            &[
                vec!["Week 1", "6", "9", "81", "13.5", "1"],
                vec!["Totals", "", "98", "140", "1,204", "12.3", "9"],
            ],
        );
        let TableExtract::Found(stats) = extract_totals(&body, Some(Position::WR)) else {
            panic!("expected stats");
        };
        assert_eq!(stats["receptions"], 98.0);
        assert_eq!(stats["targets"], 140.0);
        assert_eq!(stats["receiving_yards"], 1204.0);
        assert_eq!(stats["yards_per_catch"], 12.3);
        assert_eq!(stats["receiving_tds"], 9.0);
        // trailing schema columns with no source cells are simply absent
        assert!(!stats.contains_key("fumbles"));
    }

    #[test]
    fn percent_cells_parse_and_placeholders_are_omitted() {
        let body = table(
            &["Comp", "Att", "Yds", "Pct", "TD", "INT", "Sck", "Rtg"],
            &[vec!["Totals", "385", "579", "4,306", "66.5%", "29", "18", "-", "92.2"]],
        );
        let TableExtract::Found(stats) = extract_totals(&body, Some(Position::QB)) else {
            panic!("expected stats");
        };
        assert_eq!(stats["completions"], 385.0);
        assert_eq!(stats["completion_pct"], 66.5);
        assert_eq!(stats["interceptions"], 18.0);
        // the "-" sack cell is consumed but omitted
        assert!(!stats.contains_key("sacks"));
        assert_eq!(stats["passer_rating"], 92.2);
    }

    #[test]
    fn missing_marker_row_reports_no_data_start() {
        let body = table(
            &["Att", "Yds"],
            &[vec!["Week 1", "12", "48"], vec!["Week 2", "9", "31"]],
        );
        assert_eq!(
            extract_totals(&body, Some(Position::RB)),
            TableExtract::Empty(EmptyReason::NoDataStart)
        );
    }

    #[test]
    fn unparseable_marker_row_reports_no_valid_stats() {
        let body = table(&["Att", "Yds"], &[vec!["Totals", "-", "", "DNP"]]);
        assert_eq!(
            extract_totals(&body, Some(Position::RB)),
            TableExtract::Empty(EmptyReason::NoValidStats)
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let body = table(
            &["Rec", "Tgt", "Yds"],
            &[vec!["Totals", "98", "140", "1,204"]],
        );
        let first = extract_totals(&body, Some(Position::WR));
        let second = extract_totals(&body, Some(Position::WR));
        assert_eq!(first, second);
    }

    #[test]
    fn marker_is_found_in_a_later_table() {
        let nav = "<table><tr><th>Standings</th></tr><tr><td>AFC East</td></tr></table>";
        let stats = table(&["Att", "Yds"], &[vec!["Totals", "212", "987"]]);
        let body = format!("<html><body>{nav}{stats}</body></html>");
        let TableExtract::Found(map) = extract_totals(&body, Some(Position::RB)) else {
            panic!("expected stats");
        };
        assert_eq!(map["rush_attempts"], 212.0);
    }

    #[test]
    fn stat_cell_parsing_handles_separators() {
        assert_eq!(parse_stat_cell("1,204"), Some(1204.0));
        assert_eq!(parse_stat_cell("66.5%"), Some(66.5));
        assert_eq!(parse_stat_cell("-"), None);
        assert_eq!(parse_stat_cell(""), None);
        assert_eq!(parse_stat_cell("DNP"), None);
    }
}
