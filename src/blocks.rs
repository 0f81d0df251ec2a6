use indexmap::IndexMap;
use scraper::Html;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::utils::{selector, stripped_text};

/// Label of a header block mapped to the outer HTML of the table after it
pub type LabeledTables = IndexMap<String, String>;

// ============================================================================
// HEADER / TABLE PAIRING
// ============================================================================

/// Pairs every header marker in `document` with the first table that follows it.
///
/// Labels are the header's trimmed text with `strip` removed. Headers with no
/// table after them are dropped, and a repeated label keeps the later table.
pub fn locate_labeled_tables(
    document: &Html,
    config: &SiteConfig,
    strip: Option<&str>,
) -> Result<LabeledTables> {
    let header_selector = selector(&config.header_selector)?;
    let combined = selector(&format!("{}, table", config.header_selector))?;

    let mut tables = LabeledTables::new();
    let mut pending: Vec<String> = Vec::new();

    // select() walks in document order, so a table claims every header seen since the last one
    for element in document.select(&combined) {
        if header_selector.matches(&element) {
            pending.push(header_label(&stripped_text(element), strip));
        } else if element.value().name() == "table" && !pending.is_empty() {
            let fragment = element.html();
            for label in pending.drain(..) {
                tables.insert(label, fragment.clone());
            }
        }
    }

    Ok(tables)
}

fn header_label(text: &str, strip: Option<&str>) -> String {
    match strip {
        Some(s) if !s.is_empty() => text.replace(s, "").trim().to_string(),
        _ => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(html: &str, strip: Option<&str>) -> LabeledTables {
        let document = Html::parse_document(html);
        locate_labeled_tables(&document, &SiteConfig::default(), strip).unwrap()
    }

    #[test]
    fn test_every_header_gets_its_table() {
        let tables = locate(
            r#"<div class="tblehead">1X2</div><table id="a"></table>
               <div class="tblehead">Over/Under</div><p>text</p><table id="b"></table>
               <div class="tblehead">Handicap</div><div><table id="c"></table></div>"#,
            None,
        );

        let labels: Vec<&str> = tables.keys().map(String::as_str).collect();
        assert_eq!(labels, ["1X2", "Over/Under", "Handicap"]);
        assert!(tables["1X2"].contains("id=\"a\""));
        assert!(tables["Over/Under"].contains("id=\"b\""));
        assert!(tables["Handicap"].contains("id=\"c\""));
    }

    #[test]
    fn test_header_without_table_is_skipped() {
        let tables = locate(
            r#"<div class="tblehead">Serie A</div><table></table><div class="tblehead">Divider</div>"#,
            None,
        );
        assert_eq!(tables.len(), 1);
        assert!(tables.contains_key("Serie A"));
    }

    #[test]
    fn test_duplicate_label_last_wins() {
        let tables = locate(
            r#"<div class="tblehead">1X2</div><table id="first"></table>
               <div class="tblehead">Other</div><table id="other"></table>
               <div class="tblehead">1X2</div><table id="second"></table>"#,
            None,
        );
        assert_eq!(tables.len(), 2);
        assert!(tables["1X2"].contains("second"));
        assert_eq!(tables.get_index_of("1X2"), Some(0));
    }

    #[test]
    fn test_strip_substring() {
        let tables = locate(
            r#"<div class="tblehead"><span>Best odds</span> Serie A </div><table></table>
               <div class="tblehead">Best odds Copa do Brasil</div><table></table>"#,
            Some("Best odds"),
        );
        let labels: Vec<&str> = tables.keys().map(String::as_str).collect();
        assert_eq!(labels, ["Serie A", "Copa do Brasil"]);
    }

    #[test]
    fn test_nested_tables_pick_outer() {
        let tables = locate(
            r#"<div class="tblehead">Serie A</div>
               <table id="outer"><tr><td><table class="tble" id="inner"></table></td></tr></table>"#,
            None,
        );
        assert!(tables["Serie A"].starts_with("<table id=\"outer\""));
        assert!(tables["Serie A"].contains("inner"));
    }
}
