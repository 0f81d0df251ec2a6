use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::blocks::locate_labeled_tables;
use crate::config::SiteConfig;
use crate::error::Result;
use crate::utils::{parse_sub_document, selector, stripped_text, PageFetcher};

// Bookmaker + home, draw, away
const MIN_ODDS_COLUMNS: usize = 4;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Home, draw and away odds as printed on the page
pub type Odds = [String; 3];

/// Bookmaker name to its odds for one odd group
pub type BookmakerOdds = IndexMap<String, Odds>;

/// Odd group label (e.g. "1X2") to its bookmaker odds
pub type GameOdds = IndexMap<String, BookmakerOdds>;

/// One bookmaker row of an odds table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OddsRow {
    pub bookmaker: String,
    pub odds: Odds,
}

// ============================================================================
// GAME PAGE PARSING
// ============================================================================

/// Parses a game page into its odd groups and bookmaker odds
pub fn parse_game_html(html: &str, config: &SiteConfig) -> Result<GameOdds> {
    let document = Html::parse_document(html);
    let tables = locate_labeled_tables(&document, config, None)?;

    let odds_table_selector = selector(&config.odds_table_selector)?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let value_selector = selector(&config.sortable_value_selector)?;

    let mut game = GameOdds::new();

    for (label, fragment) in tables {
        let document = parse_sub_document(&fragment);
        let mut bookmakers = BookmakerOdds::new();

        for table in document.select(&odds_table_selector) {
            for row in table.select(&row_selector).skip(1) { // Skip header row
                if let Some(odds_row) = parse_odds_row(row, &cell_selector, &value_selector, config) {
                    bookmakers.insert(odds_row.bookmaker, odds_row.odds);
                }
            }
        }

        game.insert(label, bookmakers);
    }

    Ok(game)
}

/// Fetches and parses a single game page
pub async fn process_game<F: PageFetcher>(fetcher: &F, url: &str, config: &SiteConfig) -> Result<GameOdds> {
    let html = fetcher.fetch(url).await?;
    parse_game_html(&html, config)
}

// ============================================================================
// ROW PARSING
// ============================================================================

fn parse_odds_row(
    row: ElementRef,
    cell_selector: &Selector,
    value_selector: &Selector,
    config: &SiteConfig,
) -> Option<OddsRow> {
    let cells: Vec<ElementRef> = row.select(cell_selector).collect();
    if cells.len() < MIN_ODDS_COLUMNS {
        return None;
    }

    let bookmaker = stripped_text(cells[0]);
    if bookmaker == config.aggregate_row {
        return None;
    }

    let value = |cell: ElementRef| cell.select(value_selector).next().map(stripped_text);

    match (value(cells[1]), value(cells[2]), value(cells[3])) {
        (Some(home), Some(draw), Some(away)) => Some(OddsRow {
            bookmaker,
            odds: [home, draw, away],
        }),
        _ => {
            debug!("Skipping row for {}: missing sortable odds value", bookmaker);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odds_cell(value: &str) -> String {
        format!(r#"<td><span class="toSort noDsp">{}</span><b>{}</b></td>"#, value, value)
    }

    fn odds_row(bookmaker: &str, home: &str, draw: &str, away: &str) -> String {
        format!(
            "<tr><td>{}</td>{}{}{}</tr>",
            bookmaker,
            odds_cell(home),
            odds_cell(draw),
            odds_cell(away)
        )
    }

    fn game_page(label: &str, rows: &str) -> String {
        format!(
            r#"<div class="tblehead">{}</div>
               <div><table class="tble sort6"><tr><th>Bookmaker</th><th>1</th><th>X</th><th>2</th></tr>{}</table></div>"#,
            label, rows
        )
    }

    #[test]
    fn test_best_odds_row_excluded() {
        let rows = odds_row("Best odds", "2.10", "3.20", "3.50") + &odds_row("BookmakerX", "2.05", "3.10", "3.60");
        let game = parse_game_html(&game_page("1X2", &rows), &SiteConfig::default()).unwrap();

        assert_eq!(game.len(), 1);
        let bookmakers = &game["1X2"];
        assert_eq!(bookmakers.len(), 1);
        assert_eq!(bookmakers["BookmakerX"], ["2.05", "3.10", "3.60"]);
    }

    #[test]
    fn test_short_rows_excluded() {
        let rows = format!(
            "<tr><td>Short</td>{}{}</tr>{}",
            odds_cell("1.50"),
            odds_cell("4.00"),
            odds_row("BookmakerY", "1.90", "3.30", "4.10")
        );
        let game = parse_game_html(&game_page("1X2", &rows), &SiteConfig::default()).unwrap();

        let bookmakers = &game["1X2"];
        assert_eq!(bookmakers.len(), 1);
        assert!(bookmakers.contains_key("BookmakerY"));
    }

    #[test]
    fn test_missing_sortable_value_skipped() {
        let rows = "<tr><td>NoSpan</td><td>1.5</td><td>3.0</td><td>5.0</td></tr>";
        let game = parse_game_html(&game_page("1X2", rows), &SiteConfig::default()).unwrap();
        assert!(game["1X2"].is_empty());
    }

    #[test]
    fn test_empty_group_survives() {
        let game = parse_game_html(&game_page("Double chance", ""), &SiteConfig::default()).unwrap();
        assert!(game.contains_key("Double chance"));
        assert!(game["Double chance"].is_empty());
    }

    #[test]
    fn test_only_sortable_tables_read() {
        let html = format!(
            r#"<div class="tblehead">1X2</div>
               <div><table class="tble"><tr><th>h</th></tr>{}</table></div>"#,
            odds_row("Plain", "1.1", "2.2", "3.3")
        );
        let game = parse_game_html(&html, &SiteConfig::default()).unwrap();
        assert!(game["1X2"].is_empty());
    }

    #[test]
    fn test_groups_keep_page_order() {
        let html = game_page("1X2", &odds_row("A", "1", "2", "3"))
            + &game_page("Over/Under 2.5", &odds_row("B", "4", "5", "6"));
        let game = parse_game_html(&html, &SiteConfig::default()).unwrap();

        let labels: Vec<&str> = game.keys().map(String::as_str).collect();
        assert_eq!(labels, ["1X2", "Over/Under 2.5"]);
        assert_eq!(game["Over/Under 2.5"]["B"], ["4", "5", "6"]);
    }
}
