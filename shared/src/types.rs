//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

/// Grouping granularity for time-bucketed report series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Day,
    #[default]
    Month,
    Year,
}

impl TimeBucket {
    /// The `DATE_TRUNC` field name for this bucket
    pub fn date_trunc(&self) -> &'static str {
        match self {
            TimeBucket::Day => "day",
            TimeBucket::Month => "month",
            TimeBucket::Year => "year",
        }
    }

    /// Label format for chart axes, matching the bucket width
    pub fn label_format(&self) -> &'static str {
        match self {
            TimeBucket::Day => "YYYY-MM-DD",
            TimeBucket::Month => "Mon YYYY",
            TimeBucket::Year => "YYYY",
        }
    }
}
