use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::error::Result;
use crate::game_handler::GameOdds;

const CSV_HEADER: [&str; 8] = ["Year", "Competition", "Game", "Odd group", "House", "Home", "Draw", "Away"];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Competition to game to odd group to bookmaker odds, for a whole season
pub type CompetitionOdds = IndexMap<String, IndexMap<String, GameOdds>>;

/// One bookmaker quote with everything needed to locate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OddsRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Competition")]
    pub competition: String,
    #[serde(rename = "Game")]
    pub game: String,
    #[serde(rename = "Odd group")]
    pub odd_group: String,
    #[serde(rename = "House")]
    pub bookmaker: String,
    #[serde(rename = "Home")]
    pub home: String,
    #[serde(rename = "Draw")]
    pub draw: String,
    #[serde(rename = "Away")]
    pub away: String,
}

// ============================================================================
// FLATTENING
// ============================================================================

/// Flattens a season's odds into one record per bookmaker, in page order.
///
/// The mapping is consumed; walking it again requires building it again.
pub fn flatten_odds(odds: CompetitionOdds, year: i32) -> impl Iterator<Item = OddsRecord> {
    odds.into_iter().flat_map(move |(competition, games)| {
        games.into_iter().flat_map(move |(game, groups)| {
            let competition = competition.clone();
            groups.into_iter().flat_map(move |(odd_group, bookmakers)| {
                let competition = competition.clone();
                let game = game.clone();
                bookmakers.into_iter().map(move |(bookmaker, [home, draw, away])| OddsRecord {
                    year,
                    competition: competition.clone(),
                    game: game.clone(),
                    odd_group: odd_group.clone(),
                    bookmaker,
                    home,
                    draw,
                    away,
                })
            })
        })
    })
}

// ============================================================================
// CSV OUTPUT
// ============================================================================

/// Where finished seasons are kept
pub trait RecordStore {
    /// Whether the season was already written
    fn exists(&self, year: i32) -> bool;

    /// Persists a season's records, returning how many were written
    fn write<I>(&self, year: i32, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = OddsRecord>;
}

/// One `<year>.csv` per season inside a directory
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CsvStore { dir: dir.into() }
    }

    pub fn path(&self, year: i32) -> PathBuf {
        self.dir.join(format!("{}.csv", year))
    }
}

impl RecordStore for CsvStore {
    fn exists(&self, year: i32) -> bool {
        self.path(year).exists()
    }

    fn write<I>(&self, year: i32, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = OddsRecord>,
    {
        fs::create_dir_all(&self.dir)?;

        // Written under a temporary name so an interrupted run is not mistaken for a finished year
        let final_path = self.path(year);
        let partial_path = self.dir.join(format!("{}.csv.part", year));

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&partial_path)?;
        writer.write_record(CSV_HEADER)?;

        let mut count = 0;
        for record in records {
            writer.serialize(&record)?;
            count += 1;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&partial_path, &final_path)?;
        info!("{} records written to {}", count, final_path.display());
        Ok(count)
    }
}
