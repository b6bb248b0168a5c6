//! Wire types for the HTTP surface (`spec.md` §6): snake_case at the
//! boundary for API-specific fields, camelCase preserved on embedded
//! domain value objects (`AnalysisOptions`, `Node`, `Metadata`,
//! `JobProgress`) exactly as those types already serialize.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reposcope_domain::entities::{AnalysisRecord, AnalysisStatus};
use reposcope_domain::value_objects::{AnalysisOptions, FileTreeStatistics, JobProgress, Node};
use serde::{Deserialize, Serialize};

/// `POST /analyze` request body.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Repository URL to analyze.
    pub repository_url: String,
    /// Branch override; defaults to the remote's default branch.
    #[serde(default)]
    pub branch: Option<String>,
    /// Per-analysis options; defaults to [`AnalysisOptions::default`].
    #[serde(default)]
    pub options: Option<AnalysisOptions>,
}

/// `POST /analyze` success body (`201`).
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Newly assigned id.
    pub analysis_id: String,
    /// Always `"queued"` on intake.
    pub status: &'static str,
    /// Intake timestamp.
    pub created_at: DateTime<Utc>,
    /// Rough wall-clock estimate for the full pipeline, in seconds.
    pub estimated_time: u64,
}

/// `GET /analysis/:id/status` response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// The analysis id.
    pub analysis_id: String,
    /// Current lifecycle state.
    pub status: AnalysisStatus,
    /// Latest queue-level progress, if the job has started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<JobProgress>,
    /// Set iff `status == failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set once the record reaches a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl StatusResponse {
    /// Build from a record and its queue-level progress snapshot.
    #[must_use]
    pub fn new(record: &AnalysisRecord, progress: Option<JobProgress>) -> Self {
        Self {
            analysis_id: record.id.to_string(),
            status: record.status,
            progress,
            error: record.error.clone(),
            completed_at: record.completed_at,
        }
    }
}

/// `sizeBreakdown` nested inside [`TreeStatisticsDto`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeBreakdownDto {
    /// Sum of `size` over all file nodes.
    pub total_size: i64,
    /// `totalSize / totalFiles`, `0.0` when there are no files.
    pub average_file_size: f64,
}

/// `statistics` nested inside [`TreeResponse`], reshaping
/// [`FileTreeStatistics`] to nest the size figures under `sizeBreakdown`
/// per `spec.md` §6's route table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStatisticsDto {
    /// Total file nodes in the tree.
    pub total_files: u64,
    /// Total directory nodes in the tree (root excluded).
    pub total_directories: u64,
    /// Sum of `linesOfCode` over all file nodes.
    pub total_lines: u64,
    /// Language tag to file count.
    pub language_breakdown: BTreeMap<String, u64>,
    /// Aggregate size figures.
    pub size_breakdown: SizeBreakdownDto,
}

impl From<&FileTreeStatistics> for TreeStatisticsDto {
    fn from(stats: &FileTreeStatistics) -> Self {
        Self {
            total_files: stats.total_files,
            total_directories: stats.total_directories,
            total_lines: stats.total_lines,
            language_breakdown: stats.language_breakdown.clone(),
            size_breakdown: SizeBreakdownDto {
                total_size: stats.total_size,
                average_file_size: stats.average_file_size(),
            },
        }
    }
}

/// `GET /analysis/:id/tree` response.
#[derive(Debug, Serialize)]
pub struct TreeResponse {
    /// The root directory node.
    pub root: Node,
    /// Aggregate statistics, reshaped for the wire.
    pub statistics: TreeStatisticsDto,
}

/// One entry in [`AnalysesListResponse`].
#[derive(Debug, Serialize)]
pub struct AnalysisSummaryDto {
    /// The analysis id.
    pub analysis_id: String,
    /// Normalized repository URL.
    pub repository_url: String,
    /// Resolved branch.
    pub branch: String,
    /// Current lifecycle state.
    pub status: AnalysisStatus,
    /// Intake timestamp.
    pub created_at: DateTime<Utc>,
    /// Set once the record reaches a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&AnalysisRecord> for AnalysisSummaryDto {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            analysis_id: record.id.to_string(),
            repository_url: record.repository.url.clone(),
            branch: record.branch.clone(),
            status: record.status,
            created_at: record.created_at,
            completed_at: record.completed_at,
        }
    }
}

/// Query params for `GET /analyses?limit=&offset=&status=`.
#[derive(Debug, Deserialize)]
pub struct ListAnalysesQuery {
    /// Page size, `[1, 100]`, default 20.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Records to skip, default 0.
    #[serde(default)]
    pub offset: Option<u32>,
    /// Optional status filter.
    #[serde(default)]
    pub status: Option<AnalysisStatus>,
}

/// `GET /analyses` response.
#[derive(Debug, Serialize)]
pub struct AnalysesListResponse {
    /// Page of analyses, newest first.
    pub analyses: Vec<AnalysisSummaryDto>,
    /// Total number of matching records, independent of pagination.
    pub total: u64,
    /// Current 1-based page number, derived from `offset`/`limit`.
    pub page: u32,
}

/// `DELETE /analysis/:id` response.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Always `true`: deletion is idempotent, so a missing id is a `404`
    /// rather than a `false` here.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

/// `GET /health` response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: &'static str,
    /// Response timestamp.
    pub timestamp: DateTime<Utc>,
    /// Per-dependency reachability.
    pub services: HealthServices,
}

/// Per-dependency reachability flags nested in [`HealthResponse`].
#[derive(Debug, Serialize)]
pub struct HealthServices {
    /// Record store reachable.
    pub database: bool,
    /// Redis reachable, or `true` when Redis is not configured.
    pub redis: bool,
    /// Job queue reachable.
    pub queue: bool,
}

/// `GET /ping` response.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    /// Always `"pong"`.
    pub message: &'static str,
    /// Response timestamp.
    pub timestamp: DateTime<Utc>,
}
