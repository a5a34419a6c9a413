use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

/// Raw article parameters as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleForm {
    pub outline: String,
    pub audience: String,
    pub writing_style: String,
    pub imagination_level: u8,
    pub research_level: u8,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// A validated article request, ready to post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRequest {
    pub outline: String,
    pub audience: String,
    pub writing_style: String,
    pub imagination_level: u8,
    pub research_level: u8,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArticleResponse {
    pub agent_prompt: String,
    #[serde(default)]
    pub search_terms: Vec<String>,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be between 1 and 5, got {value}")]
    LevelOutOfRange { field: &'static str, value: u8 },
    #[error("{field} is not an ISO-8601 date (YYYY-MM-DD): {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },
}

impl ArticleForm {
    /// Check required fields, level ranges and the date range.
    ///
    /// Text fields are trimmed. Dates are normalized to `YYYY-MM-DD`.
    pub fn validate(&self) -> Result<ArticleRequest, ValidationError> {
        let outline = required("outline", &self.outline)?;
        let audience = required("audience", &self.audience)?;
        let writing_style = required("writing style", &self.writing_style)?;
        let imagination_level = level("imagination level", self.imagination_level)?;
        let research_level = level("research level", self.research_level)?;
        let start = date("start date", &self.start_date)?;
        let end = date("end date", &self.end_date)?;
        if start > end {
            return Err(ValidationError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(ArticleRequest {
            outline,
            audience,
            writing_style,
            imagination_level,
            research_level,
            date_range: DateRange {
                start: start.format("%Y-%m-%d").to_string(),
                end: end.format("%Y-%m-%d").to_string(),
            },
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(value.to_string())
    }
}

fn level(field: &'static str, value: u8) -> Result<u8, ValidationError> {
    if (MIN_LEVEL..=MAX_LEVEL).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::LevelOutOfRange { field, value })
    }
}

fn date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
