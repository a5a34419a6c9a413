//! Record shapes returned by the list endpoints.
//!
//! Each endpoint has its own closed record type. Required fields are enforced
//! by deserialization, so a record that reaches the state machine is safe to
//! render without further presence checks.
use serde::{Deserialize, Deserializer};

use crate::ListQuery;

/// A crawled or processed document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentRecord {
    #[serde(default, alias = "_id", alias = "content_id")]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "processing_status")]
    pub status: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub date_crawled: Option<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    #[serde(alias = "WARN")]
    Warning,
    Error,
    #[serde(other)]
    Other,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogRecord {
    pub message: String,
    pub level: LogLevel,
    pub timestamp: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrawlerRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_run: Option<String>,
    #[serde(default)]
    pub urls_crawled: Option<u64>,
}

/// One entry of the processing pipeline status snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineTask {
    pub task_id: String,
    pub task_type: String,
    pub content_id: String,
    /// Fraction complete in `0.0..=1.0`.
    #[serde(deserialize_with = "clamped_progress")]
    pub progress: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub estimated_completion: Option<String>,
}

fn clamped_progress<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Content(ContentRecord),
    Log(LogRecord),
    Crawler(CrawlerRecord),
    Task(PipelineTask),
}

impl Record {
    /// Identifier usable as an action target, when the record has one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Record::Content(record) => record.id.as_deref(),
            Record::Crawler(record) => Some(&record.id),
            Record::Task(task) => Some(&task.task_id),
            Record::Log(_) => None,
        }
    }
}

/// One page of a list, paired with the query it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult {
    pub items: Vec<Record>,
    /// Server count for `query`'s filters, independent of the page.
    pub total: u64,
    pub query: ListQuery,
}

impl ListResult {
    pub fn page_count(&self) -> u32 {
        self.query.page_count(self.total)
    }
}

/// Full view of one document, including the nested raw and processed
/// payloads whose shape is owned by the pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentDetail {
    #[serde(flatten)]
    pub record: ContentRecord,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub raw_content: Option<serde_json::Value>,
    #[serde(default)]
    pub processed_content: Option<serde_json::Value>,
    #[serde(default)]
    pub classifications: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub active_crawlers: u64,
    pub urls_processed: u64,
    pub average_processing_time: String,
    #[serde(default)]
    pub daily_stats: DailyStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DailyStats {
    #[serde(default)]
    pub processed: Vec<u64>,
    #[serde(default)]
    pub dates: Vec<String>,
}
