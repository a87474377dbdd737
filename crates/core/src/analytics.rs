//! Optimization analytics: one record per generation attempt, summarized per
//! store over a trailing timeframe.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::CoreError;
use crate::generation::GenerationErrorKind;
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
   Timeframe
   -------------------------------------------------------------------------- */

/// Trailing window an analytics summary covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Last24h,
    Last7Days,
    Last30Days,
    Last90Days,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Last24h,
        Timeframe::Last7Days,
        Timeframe::Last30Days,
        Timeframe::Last90Days,
    ];

    /// Parse the `timeframe` query value. Absent means the last 30 days.
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        let Some(value) = value else {
            return Ok(Timeframe::Last30Days);
        };
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| {
                let allowed: Vec<String> =
                    Self::ALL.iter().map(|t| t.as_str().to_string()).collect();
                CoreError::invalid_option("timeframe", value, &allowed)
            })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Last24h => "last_24h",
            Timeframe::Last7Days => "last_7_days",
            Timeframe::Last30Days => "last_30_days",
            Timeframe::Last90Days => "last_90_days",
        }
    }

    pub fn span(self) -> Duration {
        match self {
            Timeframe::Last24h => Duration::days(1),
            Timeframe::Last7Days => Duration::days(7),
            Timeframe::Last30Days => Duration::days(30),
            Timeframe::Last90Days => Duration::days(90),
        }
    }
}

/* --------------------------------------------------------------------------
   Attempts
   -------------------------------------------------------------------------- */

/// One generation attempt to record. `error_kind` is `None` on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOptimizationAttempt {
    pub store_id: DbId,
    pub product_id: DbId,
    pub error_kind: Option<GenerationErrorKind>,
    pub elapsed_ms: i64,
}

/// A recorded generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationAttempt {
    pub id: DbId,
    pub store_id: DbId,
    pub product_id: DbId,
    /// Snake-case [`GenerationErrorKind`] name, `None` on success.
    pub error_kind: Option<String>,
    pub elapsed_ms: i64,
    pub created_at: Timestamp,
}

impl OptimizationAttempt {
    pub fn succeeded(&self) -> bool {
        self.error_kind.is_none()
    }
}

/* --------------------------------------------------------------------------
   Summary
   -------------------------------------------------------------------------- */

/// Attempts and success rate for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySuccess {
    pub date: NaiveDate,
    pub total: i64,
    pub successful: i64,
    /// Percentage, 0 when there were no attempts.
    pub success_rate: f64,
}

/// Per-store optimization metrics over a timeframe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationMetrics {
    pub timeframe: &'static str,
    pub start: Timestamp,
    pub end: Timestamp,
    pub total_attempts: i64,
    pub successful: i64,
    pub failed: i64,
    /// Percentage, 0 when there were no attempts.
    pub success_rate: f64,
    pub avg_response_ms: f64,
    pub failures_by_kind: BTreeMap<String, i64>,
    pub daily: Vec<DailySuccess>,
}

impl OptimizationMetrics {
    /// Summarize the attempts that fall inside `timeframe`, ending at `end`.
    pub fn summarize(timeframe: Timeframe, end: Timestamp, attempts: &[OptimizationAttempt]) -> Self {
        let start = end - timeframe.span();
        let in_range: Vec<&OptimizationAttempt> = attempts
            .iter()
            .filter(|a| a.created_at >= start && a.created_at <= end)
            .collect();

        let total_attempts = count(in_range.len());
        let successful = count(in_range.iter().filter(|a| a.succeeded()).count());
        let mut failures_by_kind = BTreeMap::new();
        for kind in in_range.iter().filter_map(|a| a.error_kind.as_deref()) {
            *failures_by_kind.entry(kind.to_string()).or_insert(0) += 1;
        }

        let avg_response_ms = if in_range.is_empty() {
            0.0
        } else {
            let sum: i64 = in_range.iter().map(|a| a.elapsed_ms).sum();
            sum as f64 / in_range.len() as f64
        };

        let last_day = end.date_naive();
        let daily = start
            .date_naive()
            .iter_days()
            .take_while(|day| *day <= last_day)
            .map(|date| {
                let (total, ok) = in_range
                    .iter()
                    .filter(|a| a.created_at.date_naive() == date)
                    .fold((0, 0), |(total, ok), a| {
                        (total + 1, ok + i64::from(a.succeeded()))
                    });
                DailySuccess {
                    date,
                    total,
                    successful: ok,
                    success_rate: percent(ok, total),
                }
            })
            .collect();

        Self {
            timeframe: timeframe.as_str(),
            start,
            end,
            total_attempts,
            successful,
            failed: total_attempts - successful,
            success_rate: percent(successful, total_attempts),
            avg_response_ms,
            failures_by_kind,
            daily,
        }
    }
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn percent(part: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
