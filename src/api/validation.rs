use chrono::NaiveDate;
use serde::Deserialize;

use super::ApiError;
use crate::constants::limits::{MAX_RATING, MAX_REVIEW_CHARS, MAX_SEARCH_LIMIT, MIN_RATING};
use crate::domain::{BookId, ReadingStatus};
use crate::models::EntryUpdate;

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    Ok(password)
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query is required"));
    }
    Ok(trimmed)
}

pub fn validate_page(page: Option<u32>) -> Result<u32, ApiError> {
    match page {
        None => Ok(1),
        Some(0) => Err(ApiError::validation(
            "Invalid page: 0. Page must be a positive integer",
        )),
        Some(p) => Ok(p),
    }
}

pub fn validate_limit(limit: Option<u32>, default: u32) -> Result<u32, ApiError> {
    let limit = limit.unwrap_or(default);
    if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between 1 and {}",
            limit, MAX_SEARCH_LIMIT
        )));
    }
    Ok(limit)
}

pub fn validate_book_id(id: &str) -> Result<BookId, ApiError> {
    if id.is_empty() {
        return Err(ApiError::validation("Book ID is required"));
    }

    let id = BookId::new(id);
    if !id.is_well_formed() {
        return Err(ApiError::validation(format!(
            "Invalid book ID: {id}. IDs are up to 64 letters and digits"
        )));
    }
    Ok(id)
}

pub fn parse_status(value: &str) -> Result<ReadingStatus, ApiError> {
    value
        .parse::<ReadingStatus>()
        .map_err(|e| ApiError::validation(format!("status: {e}")))
}

/// An absent or empty `?status=` means no filter.
pub fn parse_status_filter(value: Option<&str>) -> Result<Option<ReadingStatus>, ApiError> {
    match value {
        None | Some("") => Ok(None),
        Some(v) => parse_status(v).map(Some),
    }
}

/// Entry fields as submitted by an HTML form, before typing.
#[derive(Debug, Default, Deserialize)]
pub struct EntryFields {
    pub status: Option<String>,
    pub rating: Option<String>,
    pub review: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "finishDate")]
    pub finish_date: Option<String>,
}

#[derive(Default)]
struct FieldErrors(Vec<String>);

impl FieldErrors {
    fn push(&mut self, field: &str, message: impl std::fmt::Display) {
        self.0.push(format!("{field}: {message}"));
    }

    fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.0.join("; ")))
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Types form input. Empty status, rating, and date values count as absent.
pub fn parse_entry_fields(fields: EntryFields) -> Result<EntryUpdate, ApiError> {
    let mut errors = FieldErrors::default();

    let status = match non_empty(fields.status) {
        Some(raw) => match raw.parse::<ReadingStatus>() {
            Ok(s) => Some(s),
            Err(e) => {
                errors.push("status", e);
                None
            }
        },
        None => None,
    };

    let rating = match non_empty(fields.rating) {
        Some(raw) => match raw.trim().parse::<i32>() {
            Ok(r) => Some(r),
            Err(_) => {
                errors.push("rating", "Rating must be a whole number");
                None
            }
        },
        None => None,
    };

    errors.into_result()?;

    let update = EntryUpdate {
        status,
        rating,
        review: fields.review,
        start_date: non_empty(fields.start_date).map(|d| d.trim().to_string()),
        finish_date: non_empty(fields.finish_date).map(|d| d.trim().to_string()),
    };

    validate_entry_update(&update)?;
    Ok(update)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn validate_entry_update(update: &EntryUpdate) -> Result<(), ApiError> {
    let mut errors = FieldErrors::default();

    if let Some(rating) = update.rating
        && !(MIN_RATING..=MAX_RATING).contains(&rating)
    {
        errors.push(
            "rating",
            format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
        );
    }

    if let Some(review) = &update.review
        && review.chars().count() > MAX_REVIEW_CHARS
    {
        errors.push(
            "review",
            format!("Review must be {MAX_REVIEW_CHARS} characters or less"),
        );
    }

    let start = update.start_date.as_deref().map(|d| (d, parse_date(d)));
    let finish = update.finish_date.as_deref().map(|d| (d, parse_date(d)));

    if let Some((raw, None)) = start {
        errors.push("start_date", format!("Invalid date '{raw}'. Use YYYY-MM-DD"));
    }
    if let Some((raw, None)) = finish {
        errors.push("finish_date", format!("Invalid date '{raw}'. Use YYYY-MM-DD"));
    }

    if let (Some((_, Some(start))), Some((_, Some(finish)))) = (start, finish)
        && finish < start
    {
        errors.push("finish_date", "Finish date cannot be before start date");
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: ApiError) -> String {
        match err {
            ApiError::ValidationError(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter2").is_ok());
        assert_eq!(
            message(validate_password("").unwrap_err()),
            "Password is required"
        );
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  dune  ").unwrap(), "dune");
        assert!(validate_search_query("").is_err());
        assert!(validate_search_query("   ").is_err());
    }

    #[test]
    fn test_validate_page_and_limit() {
        assert_eq!(validate_page(None).unwrap(), 1);
        assert_eq!(validate_page(Some(3)).unwrap(), 3);
        assert!(validate_page(Some(0)).is_err());

        assert_eq!(validate_limit(None, 20).unwrap(), 20);
        assert_eq!(validate_limit(Some(100), 20).unwrap(), 100);
        assert!(validate_limit(Some(0), 20).is_err());
        assert!(validate_limit(Some(101), 20).is_err());
    }

    #[test]
    fn test_validate_book_id() {
        assert_eq!(validate_book_id("OL45804W").unwrap().as_str(), "OL45804W");
        assert_eq!(message(validate_book_id("").unwrap_err()), "Book ID is required");
        assert!(validate_book_id("../admin").is_err());
        assert!(validate_book_id("OL1W?x=1").is_err());
    }

    #[test]
    fn test_status_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("read")).unwrap(),
            Some(ReadingStatus::Read)
        );
        assert!(parse_status_filter(Some("done")).is_err());
    }

    #[test]
    fn empty_form_values_are_absent() {
        let update = parse_entry_fields(EntryFields {
            status: Some(String::new()),
            rating: Some(String::new()),
            review: None,
            start_date: Some(String::new()),
            finish_date: Some("  ".to_string()),
        })
        .unwrap();

        assert!(update.is_empty());
    }

    #[test]
    fn form_values_are_typed() {
        let update = parse_entry_fields(EntryFields {
            status: Some("read".to_string()),
            rating: Some("4".to_string()),
            review: Some("Loved it".to_string()),
            start_date: Some("2026-01-02".to_string()),
            finish_date: Some("2026-02-03".to_string()),
        })
        .unwrap();

        assert_eq!(update.status, Some(ReadingStatus::Read));
        assert_eq!(update.rating, Some(4));
        assert_eq!(update.review.as_deref(), Some("Loved it"));
        assert_eq!(update.start_date.as_deref(), Some("2026-01-02"));
        assert_eq!(update.finish_date.as_deref(), Some("2026-02-03"));
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        for raw in ["0", "6", "-1", "four", "4.5"] {
            let result = parse_entry_fields(EntryFields {
                rating: Some(raw.to_string()),
                ..EntryFields::default()
            });
            assert!(message(result.unwrap_err()).starts_with("rating:"), "{raw}");
        }
    }

    #[test]
    fn review_length_is_counted_in_characters() {
        let at_limit = EntryUpdate {
            review: Some("é".repeat(MAX_REVIEW_CHARS)),
            ..EntryUpdate::default()
        };
        assert!(validate_entry_update(&at_limit).is_ok());

        let over = EntryUpdate {
            review: Some("a".repeat(MAX_REVIEW_CHARS + 1)),
            ..EntryUpdate::default()
        };
        assert!(message(validate_entry_update(&over).unwrap_err()).starts_with("review:"));
    }

    #[test]
    fn dates_must_be_calendar_days_in_order() {
        let bad_format = EntryUpdate {
            start_date: Some("2026-2-3".to_string()),
            ..EntryUpdate::default()
        };
        assert!(validate_entry_update(&bad_format).is_err());

        let impossible = EntryUpdate {
            finish_date: Some("2026-02-30".to_string()),
            ..EntryUpdate::default()
        };
        assert!(validate_entry_update(&impossible).is_err());

        let reversed = EntryUpdate {
            start_date: Some("2026-03-01".to_string()),
            finish_date: Some("2026-02-01".to_string()),
            ..EntryUpdate::default()
        };
        assert_eq!(
            message(validate_entry_update(&reversed).unwrap_err()),
            "finish_date: Finish date cannot be before start date"
        );

        let same_day = EntryUpdate {
            start_date: Some("2026-03-01".to_string()),
            finish_date: Some("2026-03-01".to_string()),
            ..EntryUpdate::default()
        };
        assert!(validate_entry_update(&same_day).is_ok());
    }

    #[test]
    fn multiple_field_errors_are_reported_together() {
        let update = EntryUpdate {
            rating: Some(9),
            start_date: Some("yesterday".to_string()),
            ..EntryUpdate::default()
        };
        let msg = message(validate_entry_update(&update).unwrap_err());
        assert!(msg.contains("rating:"));
        assert!(msg.contains("start_date:"));
    }
}
