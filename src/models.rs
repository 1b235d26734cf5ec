//! Data models for scraped articles and the assembled result table.
//!
//! - [`ArticleRecord`]: one extracted article; every field is always present
//! - [`ResultTable`]: ordered collection of records with fixed columns
//! - [`TableSnapshot`]: a table stamped with when and where it was scraped
//!
//! Missing fields never become `Option`s. They hold the [`NOT_AVAILABLE`]
//! sentinel so downstream consumers see a rectangular table.

use serde::{Deserialize, Serialize};

/// Sentinel stored in any field the extractor could not find.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column names of the result table, in display order.
pub const COLUMNS: [&str; 5] = ["url", "title", "author", "publication_date", "content"];

/// A single extracted news article.
///
/// Created once per successfully fetched article page and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The absolute URL the article was fetched from.
    pub url: String,
    /// Headline text.
    pub title: String,
    /// Byline author name.
    pub author: String,
    /// Publication timestamp as published by the site (not normalized).
    pub publication_date: String,
    /// Body paragraphs joined with newlines.
    pub content: String,
}

impl ArticleRecord {
    /// Field values in [`COLUMNS`] order.
    pub fn cells(&self) -> [&str; 5] {
        [
            self.url.as_str(),
            self.title.as_str(),
            self.author.as_str(),
            self.publication_date.as_str(),
            self.content.as_str(),
        ]
    }

    /// Number of fields (excluding `url`) that fell back to the sentinel.
    pub fn missing_fields(&self) -> usize {
        self.cells()[1..]
            .iter()
            .filter(|value| **value == NOT_AVAILABLE)
            .count()
    }
}

/// Ordered result of an extraction run.
///
/// Rows keep the order in which links were processed. There is no
/// uniqueness constraint on rows; URLs are deduplicated before extraction.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ResultTable {
    pub records: Vec<ArticleRecord>,
}

impl ResultTable {
    /// Assemble a table from records, preserving their order.
    pub fn from_records(records: Vec<ArticleRecord>) -> Self {
        Self { records }
    }

    /// Column names, always [`COLUMNS`], even for an empty table.
    ///
    /// # Returns
    ///
    /// `url, title, author, publication_date, content` in display order.
    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when no article was extracted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[ArticleRecord] {
        &self.records[..n.min(self.records.len())]
    }
}

impl FromIterator<ArticleRecord> for ResultTable {
    fn from_iter<I: IntoIterator<Item = ArticleRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

/// A [`ResultTable`] together with the run metadata written to JSON.
#[derive(Debug, Deserialize, Serialize)]
pub struct TableSnapshot {
    /// The listing page the links were collected from.
    pub source: String,
    /// Local date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// "morning", "afternoon", or "evening".
    pub time_of_day: String,
    /// Local time of the run.
    pub local_time: String,
    pub columns: Vec<String>,
    pub articles: Vec<ArticleRecord>,
}
