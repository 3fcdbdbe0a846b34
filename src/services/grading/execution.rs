//! SQL 运行与尝试次数控制
//!
//! 沙箱并不真正执行查询：结果来自按题目预置的结果集，延迟按配置模拟。

use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;
use serde_json::json;
use tracing::{debug, warn};

use super::GradingEngine;
use super::rubric::{clamp_score, rebuild_rubric_breakdown, recalc_overall_score};
use crate::config::RunnerConfig;
use crate::errors::{Result, SqlHwError};
use crate::models::analytics::entities::{AnalyticsEvent, AnalyticsEventType};
use crate::models::submissions::entities::{Feedback, ResultPreview};
use crate::models::submissions::requests::ExecuteSqlRequest;
use crate::models::submissions::responses::SqlExecutionResponse;

const DEFAULT_BASE_LATENCY_MS: u64 = 120;

/// 预置的查询结果
#[derive(Debug, Clone, PartialEq)]
pub struct CannedResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub base_latency_ms: u64,
}

impl CannedResult {
    pub fn new(columns: &[&str], rows: Vec<Vec<serde_json::Value>>, base_latency_ms: u64) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            base_latency_ms,
        }
    }
}

/// 题目 ID -> 预置结果
pub type ResultCatalog = HashMap<String, CannedResult>;

/// `max(min_ms, base × jitter)`
pub fn synthesize_latency(base_ms: u64, jitter: f64, min_ms: u64) -> u64 {
    let jittered = (base_ms as f64 * jitter).round().max(0.0) as u64;
    jittered.max(min_ms)
}

fn sample_jitter(runner: &RunnerConfig) -> f64 {
    let low = runner.jitter_min.min(runner.jitter_max);
    let high = runner.jitter_min.max(runner.jitter_max);
    if high - low <= f64::EPSILON {
        return low;
    }
    rand::rng().random_range(low..=high)
}

/// 构造结果预览：评估为 0 分时返回空结果集
pub fn build_preview(
    canned: Option<&CannedResult>,
    score_ratio: f64,
    runner: &RunnerConfig,
    jitter: f64,
) -> ResultPreview {
    let base = canned
        .map(|c| c.base_latency_ms)
        .unwrap_or(DEFAULT_BASE_LATENCY_MS);
    let execution_ms = synthesize_latency(base, jitter, runner.min_latency_ms);

    match canned {
        Some(canned) if score_ratio > 0.0 => {
            let truncated = canned.rows.len() > runner.max_preview_rows;
            ResultPreview {
                columns: canned.columns.clone(),
                rows: canned
                    .rows
                    .iter()
                    .take(runner.max_preview_rows)
                    .cloned()
                    .collect(),
                execution_ms,
                truncated,
            }
        }
        _ => ResultPreview {
            execution_ms,
            ..Default::default()
        },
    }
}

impl GradingEngine {
    /// 运行一次 SQL 并记录评估结果
    ///
    /// 非预览请求在用尽尝试次数后直接返回上一次的结果，不计数、不记事件；
    /// 预览请求不受上限限制，但同样计数。
    pub async fn execute_sql_for_submission(
        &self,
        request: ExecuteSqlRequest,
    ) -> Result<SqlExecutionResponse> {
        let record = self.load_record(&request.set_id).await?;
        let question = record
            .question(&request.question_id)
            .filter(|q| record.is_active_question(&q.id))
            .ok_or_else(|| {
                SqlHwError::not_found(format!(
                    "题目不存在: {}/{}",
                    request.set_id, request.question_id
                ))
            })?;

        let _guard = self
            .lock_submission(&request.set_id, &request.student_id)
            .await;

        let mut submission = self
            .ensure_submission_locked(&record, &request.student_id)
            .await?;
        if let Some(claimed) = &request.submission_id
            && claimed != &submission.id
        {
            debug!(
                "Execute request names submission {}, resolved {} by student",
                claimed, submission.id
            );
        }

        let ceiling = question.attempt_ceiling();
        let executed = submission
            .answers
            .get(&question.id)
            .map(|a| a.execution_count)
            .unwrap_or(0);

        if !request.preview
            && let Some(max) = ceiling
            && executed >= max
        {
            warn!(
                "Attempt limit reached: student {} question {} ({}/{})",
                request.student_id, question.id, executed, max
            );
            let answer = submission.answers.get(&question.id);
            let preview = answer
                .and_then(|a| a.result_preview.clone())
                .unwrap_or_default();
            let feedback = answer
                .and_then(|a| a.feedback.clone())
                .unwrap_or_else(|| Feedback {
                    auto_notes: Some(format!(
                        "Attempt limit reached: {max} of {max} runs used for this question."
                    )),
                    ..Feedback::empty(&question.id)
                });
            return Ok(SqlExecutionResponse {
                columns: preview.columns,
                rows: preview.rows,
                execution_ms: preview.execution_ms,
                truncated: preview.truncated,
                feedback: Some(feedback),
                attempt_limit_reached: true,
                attempts_remaining: Some(0),
            });
        }

        let evaluation = self.heuristics.evaluate_sql(question, &request.sql);
        let preview = build_preview(
            self.results.get(&question.id),
            evaluation.score_ratio,
            &self.runner,
            sample_jitter(&self.runner),
        );
        let score = clamp_score(
            (question.points as f64 * evaluation.score_ratio).round(),
            question.points,
        );
        let feedback = Feedback {
            question_id: question.id.clone(),
            score,
            auto_notes: Some(evaluation.note),
            instructor_notes: None,
            rubric_breakdown: rebuild_rubric_breakdown(question, score),
        };

        let now = Utc::now();
        let execution_count = {
            let answer = submission.answers.entry(question.id.clone()).or_default();
            answer.sql = request.sql;
            answer.result_preview = Some(preview.clone());
            answer.feedback = Some(feedback.clone());
            answer.last_executed_at = Some(now);
            answer.execution_count = answer.execution_count.saturating_add(1);
            answer.execution_count
        };
        recalc_overall_score(&mut submission, &record);
        submission.updated_at = now;

        let event_type = if request.preview {
            AnalyticsEventType::PreviewExecute
        } else {
            AnalyticsEventType::ExecuteSql
        };
        self.commit(
            std::slice::from_ref(&submission),
            AnalyticsEvent::new(event_type, &request.student_id, &request.set_id)
                .with_question(&question.id)
                .with_submission(&submission.id)
                .with_metadata(json!({
                    "executionMs": preview.execution_ms,
                    "score": score,
                    "preview": request.preview,
                })),
        )
        .await?;

        debug!(
            "Executed SQL for {} question {}: score {} in {}ms (run {})",
            request.student_id, question.id, score, preview.execution_ms, execution_count
        );

        Ok(SqlExecutionResponse {
            columns: preview.columns,
            rows: preview.rows,
            execution_ms: preview.execution_ms,
            truncated: preview.truncated,
            feedback: Some(feedback),
            attempt_limit_reached: false,
            attempts_remaining: ceiling.map(|max| max.saturating_sub(execution_count)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn runner(max_preview_rows: usize) -> RunnerConfig {
        RunnerConfig {
            max_preview_rows,
            ..RunnerConfig::default()
        }
    }

    fn canned() -> CannedResult {
        CannedResult::new(
            &["id"],
            vec![vec![json!(1)], vec![json!(2)], vec![json!(3)]],
            200,
        )
    }

    #[test]
    fn test_latency_has_floor() {
        assert_eq!(synthesize_latency(40, 0.85, 65), 65);
        assert_eq!(synthesize_latency(200, 1.15, 65), 230);
        assert_eq!(synthesize_latency(200, 0.85, 65), 170);
    }

    #[test]
    fn test_jitter_stays_in_configured_range() {
        let config = RunnerConfig::default();
        for _ in 0..100 {
            let jitter = sample_jitter(&config);
            assert!((config.jitter_min..=config.jitter_max).contains(&jitter));
        }
        let fixed = RunnerConfig {
            jitter_min: 1.0,
            jitter_max: 1.0,
            ..RunnerConfig::default()
        };
        assert_eq!(sample_jitter(&fixed), 1.0);
    }

    #[test]
    fn test_zero_ratio_returns_empty_result() {
        let canned = canned();
        let preview = build_preview(Some(&canned), 0.0, &runner(50), 1.0);
        assert!(preview.columns.is_empty());
        assert!(preview.rows.is_empty());
        assert!(!preview.truncated);
        assert_eq!(preview.execution_ms, 200);
    }

    #[test]
    fn test_rows_are_truncated() {
        let canned = canned();
        let preview = build_preview(Some(&canned), 0.5, &runner(2), 1.0);
        assert_eq!(preview.columns, vec!["id"]);
        assert_eq!(preview.rows.len(), 2);
        assert!(preview.truncated);

        let full = build_preview(Some(&canned), 0.5, &runner(3), 1.0);
        assert_eq!(full.rows.len(), 3);
        assert!(!full.truncated);
    }

    #[test]
    fn test_unknown_question_uses_default_latency() {
        let preview = build_preview(None, 1.0, &runner(50), 1.0);
        assert!(preview.rows.is_empty());
        assert_eq!(preview.execution_ms, DEFAULT_BASE_LATENCY_MS);
    }
}
