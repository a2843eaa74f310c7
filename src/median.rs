//! Picks the run that best represents a test, per view and step.
//!
//! The selected run is one of the decoded runs, never a synthetic average.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::error::SelectionError;
use crate::lenient::Number;
use crate::result::{Run, TestResult, View};

/// Metric used when the caller doesn't name one.
pub const DEFAULT_METRIC: &str = "loadTime";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewKind {
    FirstView,
    RepeatView,
}

impl ViewKind {
    fn of(self, run: &Run) -> Option<&View> {
        match self {
            ViewKind::FirstView => Some(&run.first_view),
            ViewKind::RepeatView => run.repeat_view.as_ref(),
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::FirstView => f.write_str("first view"),
            ViewKind::RepeatView => f.write_str("repeat view"),
        }
    }
}

/// A run chosen as the median, with the value that ranked it.
#[derive(Debug, Clone, PartialEq)]
pub struct MedianRun<'a> {
    pub run_number: u32,
    pub run: &'a Run,
    pub value: Number,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Medians<'a> {
    pub first_view: MedianRun<'a>,
    /// `None` when no run has a repeat view (first-view-only tests).
    pub repeat_view: Option<MedianRun<'a>>,
}

/// Median run for one view.
///
/// Runs whose step carries an error are left out of the ranking, as are runs
/// that stopped short of `step` after an error in an earlier step. With an
/// even number of eligible runs the lower of the two central runs wins; equal
/// values keep run-number order.
pub fn select_median<'a>(
    result: &'a TestResult,
    view: ViewKind,
    step: usize,
    metric: &str,
) -> Result<MedianRun<'a>, SelectionError> {
    if step == 0 {
        return Err(SelectionError::InvalidStep);
    }

    let mut ranked: Vec<MedianRun<'a>> = Vec::new();
    for (&run_number, run) in &result.runs {
        let Some(measured) = view.of(run) else {
            continue;
        };
        let Some(step_data) = measured.step(step) else {
            // A script that failed part way stops recording steps.
            if measured.steps.iter().any(|s| !s.is_successful()) {
                continue;
            }
            return Err(SelectionError::StepOutOfRange {
                run: run_number,
                step,
                available: measured.steps.len(),
            });
        };
        if !step_data.is_successful() {
            continue;
        }
        let value = step_data
            .metric(metric)
            .filter(|v| v.as_f64().is_some_and(f64::is_finite))
            .ok_or_else(|| SelectionError::MissingMetric {
                run: run_number,
                metric: metric.to_string(),
            })?;
        ranked.push(MedianRun {
            run_number,
            run,
            value,
        });
    }

    if ranked.is_empty() {
        return Err(SelectionError::NoEligibleRuns { view });
    }

    // Stable sort keeps run order among equal values.
    ranked.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
    let middle = (ranked.len() - 1) / 2;
    Ok(ranked.swap_remove(middle))
}

/// Median runs for both views of `result` at `step` (1-based).
pub fn select_medians<'a>(
    result: &'a TestResult,
    step: usize,
    metric: &str,
) -> Result<Medians<'a>, SelectionError> {
    let first_view = select_median(result, ViewKind::FirstView, step, metric)?;
    let has_repeat = result.runs.values().any(|run| run.repeat_view.is_some());
    let repeat_view = if has_repeat {
        Some(select_median(result, ViewKind::RepeatView, step, metric)?)
    } else {
        None
    };
    Ok(Medians {
        first_view,
        repeat_view,
    })
}
