//! Analysis history service for saving and browsing past analyses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{normalize_tags, validate_tag, PaginatedResponse, Pagination, PaginationMeta};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Maximum number of tags on one entry
pub const MAX_TAGS: usize = 20;

/// History service for managing saved analyses
#[derive(Clone)]
pub struct HistoryService {
    db: PgPool,
}

/// Saved analysis
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub zone_name: String,
    pub zone_type: String,
    pub geometry: Value,
    pub analysis_data: Value,
    pub weather_data: Option<Value>,
    pub agriculture_data: Option<Value>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for saving an analysis
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHistoryInput {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub zone_name: String,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub zone_type: String,
    pub geometry: Value,
    pub analysis_data: Value,
    pub weather_data: Option<Value>,
    pub agriculture_data: Option<Value>,
    #[validate(length(max = 20, message = "at most 20 tags"))]
    pub tags: Option<Vec<String>>,
    #[validate(length(max = 2000, message = "at most 2000 characters"))]
    pub notes: Option<String>,
}

impl CreateHistoryInput {
    /// Trim names so blank values fail the length checks
    pub fn trimmed(mut self) -> Self {
        self.zone_name = self.zone_name.trim().to_string();
        self.zone_type = self.zone_type.trim().to_string();
        self
    }
}

/// Input for updating an entry; only tags and notes are editable
///
/// Absent fields are left unchanged. A blank `notes` string clears the notes.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHistoryInput {
    #[validate(length(max = 20, message = "at most 20 tags"))]
    pub tags: Option<Vec<String>>,
    #[validate(length(max = 2000, message = "at most 2000 characters"))]
    pub notes: Option<String>,
}

impl UpdateHistoryInput {
    /// `None` keeps the stored notes; `Some(None)` clears them
    pub fn notes_change(&self) -> Option<Option<&str>> {
        self.notes
            .as_deref()
            .map(str::trim)
            .map(|notes| Some(notes).filter(|n| !n.is_empty()))
    }
}

/// Query string of the list and export endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub search: Option<String>,
    /// Comma-separated; every tag must be present
    pub tags: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Normalized filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    /// ILIKE pattern, already wrapped in `%`
    pub search: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl HistoryQuery {
    /// Build the SQL filter from the raw query
    pub fn filter(&self) -> HistoryFilter {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let tags = self
            .tags
            .as_deref()
            .map(|raw| normalize_tags(&raw.split(',').map(String::from).collect::<Vec<_>>()))
            .filter(|t| !t.is_empty());

        HistoryFilter { search, tags }
    }

    /// Page window, clamped
    pub fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(default.page),
            per_page: self.per_page.unwrap_or(default.per_page),
        }
        .normalized()
    }
}

/// One line of the CSV export
#[derive(Debug, Serialize, PartialEq)]
pub struct HistoryCsvRow {
    #[serde(rename = "Zone name")]
    pub zone_name: String,
    #[serde(rename = "Zone type")]
    pub zone_type: String,
    #[serde(rename = "Surface (ha)")]
    pub surface_hectares: Option<f64>,
    #[serde(rename = "Variation (%)")]
    pub variation_percent: Option<f64>,
    #[serde(rename = "Water index")]
    pub water_index: Option<f64>,
    #[serde(rename = "Trend")]
    pub trend: String,
    #[serde(rename = "Alert count")]
    pub alert_count: usize,
    #[serde(rename = "Created at")]
    pub created_at: String,
}

impl From<&HistoryEntry> for HistoryCsvRow {
    fn from(entry: &HistoryEntry) -> Self {
        let data = &entry.analysis_data;
        Self {
            zone_name: entry.zone_name.clone(),
            zone_type: entry.zone_type.clone(),
            surface_hectares: data.pointer("/surface/value").and_then(Value::as_f64),
            variation_percent: data.pointer("/surface/variationPercent").and_then(Value::as_f64),
            water_index: data.pointer("/waterIndex/average").and_then(Value::as_f64),
            trend: data
                .pointer("/waterIndex/trend")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            alert_count: data
                .get("alerts")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

const ENTRY_COLUMNS: &str = "id, zone_name, zone_type, geometry, analysis_data, weather_data, \
                             agriculture_data, tags, notes, created_at, updated_at";

const FILTER_CLAUSE: &str = "($1::text IS NULL OR zone_name ILIKE $1 OR notes ILIKE $1) \
                             AND ($2::text[] IS NULL OR tags @> $2)";

impl HistoryService {
    /// Create a new HistoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Save an analysis
    pub async fn create(&self, input: CreateHistoryInput) -> AppResult<HistoryEntry> {
        let input = input.trimmed();
        input.validate()?;
        let tags = checked_tags(input.tags.as_deref().unwrap_or_default())?;

        let entry = sqlx::query_as::<_, HistoryEntry>(&format!(
            r#"
            INSERT INTO analysis_history
                (id, zone_name, zone_type, geometry, analysis_data, weather_data,
                 agriculture_data, tags, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            ENTRY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&input.zone_name)
        .bind(&input.zone_type)
        .bind(&input.geometry)
        .bind(&input.analysis_data)
        .bind(&input.weather_data)
        .bind(&input.agriculture_data)
        .bind(&tags)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(id = %entry.id, zone = %entry.zone_name, "Saved analysis to history");
        Ok(entry)
    }

    /// List entries, newest first
    pub async fn list(&self, query: &HistoryQuery) -> AppResult<PaginatedResponse<HistoryEntry>> {
        let filter = query.filter();
        let pagination = query.pagination();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM analysis_history WHERE {}",
            FILTER_CLAUSE
        ))
        .bind(&filter.search)
        .bind(&filter.tags)
        .fetch_one(&self.db)
        .await?;

        let data = sqlx::query_as::<_, HistoryEntry>(&format!(
            "SELECT {} FROM analysis_history WHERE {} ORDER BY created_at DESC LIMIT $3 OFFSET $4",
            ENTRY_COLUMNS, FILTER_CLAUSE
        ))
        .bind(&filter.search)
        .bind(&filter.tags)
        .bind(pagination.per_page as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(&pagination, total.max(0) as u64),
        })
    }

    /// Get an entry by ID
    pub async fn get(&self, id: Uuid) -> AppResult<HistoryEntry> {
        sqlx::query_as::<_, HistoryEntry>(&format!(
            "SELECT {} FROM analysis_history WHERE id = $1",
            ENTRY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("History entry".to_string()))
    }

    /// Update tags and notes
    pub async fn update(&self, id: Uuid, input: UpdateHistoryInput) -> AppResult<HistoryEntry> {
        input.validate()?;
        let tags = input.tags.as_deref().map(checked_tags).transpose()?;
        let notes = input.notes_change();

        sqlx::query_as::<_, HistoryEntry>(&format!(
            r#"
            UPDATE analysis_history
            SET tags = COALESCE($2, tags),
                notes = CASE WHEN $3 THEN $4 ELSE notes END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ENTRY_COLUMNS
        ))
        .bind(id)
        .bind(&tags)
        .bind(notes.is_some())
        .bind(notes.flatten())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("History entry".to_string()))
    }

    /// Delete an entry
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM analysis_history WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("History entry".to_string()));
        }
        Ok(())
    }

    /// Distinct tags across all entries, sorted
    pub async fn tags(&self) -> AppResult<Vec<String>> {
        let tags = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT unnest(tags) AS tag FROM analysis_history ORDER BY tag",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(tags)
    }

    /// Export every matching entry as CSV
    pub async fn export_csv(&self, query: &HistoryQuery) -> AppResult<String> {
        let filter = query.filter();
        let entries = sqlx::query_as::<_, HistoryEntry>(&format!(
            "SELECT {} FROM analysis_history WHERE {} ORDER BY created_at DESC",
            ENTRY_COLUMNS, FILTER_CLAUSE
        ))
        .bind(&filter.search)
        .bind(&filter.tags)
        .fetch_all(&self.db)
        .await?;

        let rows: Vec<HistoryCsvRow> = entries.iter().map(HistoryCsvRow::from).collect();
        export_to_csv(&rows)
    }
}

/// Normalize tags and reject malformed ones
fn checked_tags(tags: &[String]) -> AppResult<Vec<String>> {
    let tags = normalize_tags(tags);
    if tags.len() > MAX_TAGS {
        return Err(AppError::Validation(format!("tags: at most {} tags", MAX_TAGS)));
    }
    for tag in &tags {
        validate_tag(tag).map_err(|e| AppError::Validation(format!("tags: {}", e)))?;
    }
    Ok(tags)
}

/// Escape LIKE wildcards in user input
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Serialize rows as CSV with a header line
pub fn export_to_csv<T: Serialize>(rows: &[T]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
}
