//! Aggregates shown on the dashboard and the library page.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::constants::dashboard;
use crate::domain::ReadingStatus;
use crate::models::BookEntry;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LibraryStats {
    pub total: usize,
    pub reading: usize,
    pub read: usize,
    pub want_to_read: usize,
    /// Mean over rated entries only; `0.0` when nothing is rated.
    pub average_rating: f64,
    pub finished_this_year: usize,
}

impl LibraryStats {
    #[must_use]
    pub fn from_entries(entries: &[BookEntry], current_year: i32) -> Self {
        let mut stats = Self {
            total: entries.len(),
            ..Self::default()
        };

        let mut rating_sum = 0i64;
        let mut rated = 0usize;

        for entry in entries {
            match entry.status {
                ReadingStatus::Reading => stats.reading += 1,
                ReadingStatus::Read => stats.read += 1,
                ReadingStatus::WantToRead => stats.want_to_read += 1,
            }

            if let Some(rating) = entry.rating {
                rating_sum += i64::from(rating);
                rated += 1;
            }

            if entry.status == ReadingStatus::Read
                && finish_year(entry.finish_date.as_deref()) == Some(current_year)
            {
                stats.finished_this_year += 1;
            }
        }

        if rated > 0 {
            #[allow(clippy::cast_precision_loss)]
            {
                stats.average_rating = rating_sum as f64 / rated as f64;
            }
        }

        stats
    }

    #[must_use]
    pub const fn count(&self, status: ReadingStatus) -> usize {
        match status {
            ReadingStatus::WantToRead => self.want_to_read,
            ReadingStatus::Reading => self.reading,
            ReadingStatus::Read => self.read,
        }
    }
}

fn finish_year(date: Option<&str>) -> Option<i32> {
    NaiveDate::parse_from_str(date?, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: LibraryStats,
    pub recently_added: Vec<BookEntry>,
    pub currently_reading: Vec<BookEntry>,
}

impl Dashboard {
    /// `entries` are expected most recently updated first, as returned by the
    /// store.
    #[must_use]
    pub fn from_entries(entries: Vec<BookEntry>, current_year: i32) -> Self {
        let stats = LibraryStats::from_entries(&entries, current_year);

        let currently_reading = entries
            .iter()
            .filter(|e| e.status == ReadingStatus::Reading)
            .take(dashboard::CURRENTLY_READING)
            .cloned()
            .collect();

        let mut recently_added = entries;
        recently_added.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recently_added.truncate(dashboard::RECENTLY_ADDED);

        Self {
            stats,
            recently_added,
            currently_reading,
        }
    }
}
