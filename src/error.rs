use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Invalid year range: {start}..={end}")]
    YearRange { start: i32, end: i32 },
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
