mod common;

use common::{flat_view, result_body};
use serde_json::{json, Value};
use wpt_client::client::parse_result;
use wpt_client::{
    select_median, select_medians, Number, SelectionError, TestResult, ViewKind, DEFAULT_METRIC,
};

fn decode(body: Value) -> TestResult {
    parse_result(body.to_string().as_bytes()).unwrap()
}

fn with_load_times(load_times: &[i64]) -> TestResult {
    decode(result_body(load_times))
}

#[test]
fn odd_count_picks_the_middle_run() {
    let result = with_load_times(&[300, 100, 200]);
    let median = select_median(&result, ViewKind::FirstView, 1, DEFAULT_METRIC).unwrap();
    assert_eq!(median.run_number, 3);
    assert_eq!(median.value, Number::Integer(200));
    assert!(std::ptr::eq(median.run, result.run(3).unwrap()));
}

#[test]
fn even_count_picks_the_lower_central_run() {
    let result = with_load_times(&[100, 200, 300, 400]);
    let median = select_median(&result, ViewKind::FirstView, 1, DEFAULT_METRIC).unwrap();
    assert_eq!(median.run_number, 2);
    assert_eq!(median.value, Number::Integer(200));
}

#[test]
fn equal_values_keep_run_order() {
    let result = with_load_times(&[500, 500, 500, 500]);
    let median = select_median(&result, ViewKind::FirstView, 1, DEFAULT_METRIC).unwrap();
    assert_eq!(median.run_number, 2);
}

#[test]
fn both_views_are_selected_independently() {
    let mut body = result_body(&[100, 200, 300]);
    // Reverse the repeat view ordering so the two medians land on different runs.
    body["data"]["runs"]["1"]["repeatView"]["loadTime"] = json!(90);
    body["data"]["runs"]["3"]["repeatView"]["loadTime"] = json!(10);
    let result = decode(body);

    let medians = select_medians(&result, 1, DEFAULT_METRIC).unwrap();
    assert_eq!(medians.first_view.run_number, 2);
    let repeat = medians.repeat_view.unwrap();
    assert_eq!(repeat.run_number, 1);
    assert_eq!(repeat.value, Number::Integer(90));
}

#[test]
fn runs_with_errors_are_excluded() {
    let mut body = result_body(&[100, 200, 300]);
    body["data"]["runs"]["2"]["firstView"]["error"] = json!("Timed out");
    let result = decode(body);

    let median = select_median(&result, ViewKind::FirstView, 1, DEFAULT_METRIC).unwrap();
    assert_eq!(median.run_number, 1);
    assert_eq!(median.value, Number::Integer(100));
}

#[test]
fn all_runs_failed_is_an_error() {
    let mut body = result_body(&[100]);
    body["data"]["runs"]["1"]["firstView"]["error"] = json!("Navigation failed");
    let result = decode(body);

    assert_eq!(
        select_median(&result, ViewKind::FirstView, 1, DEFAULT_METRIC).unwrap_err(),
        SelectionError::NoEligibleRuns {
            view: ViewKind::FirstView
        }
    );
}

#[test]
fn result_without_runs_is_an_error() {
    let result = decode(json!({
        "statusCode": 200,
        "statusText": "Test Complete",
        "data": {"id": "161128_R3_2", "runs": []}
    }));
    assert!(matches!(
        select_medians(&result, 1, DEFAULT_METRIC),
        Err(SelectionError::NoEligibleRuns { .. })
    ));
}

#[test]
fn first_view_only_has_no_repeat_median() {
    let mut body = result_body(&[100, 200, 300]);
    for run in ["1", "2", "3"] {
        body["data"]["runs"][run]
            .as_object_mut()
            .unwrap()
            .remove("repeatView");
    }
    body["data"]["fvonly"] = json!("1");
    let result = decode(body);

    let medians = select_medians(&result, 1, DEFAULT_METRIC).unwrap();
    assert_eq!(medians.first_view.run_number, 2);
    assert!(medians.repeat_view.is_none());
}

#[test]
fn step_beyond_a_run_is_an_error() {
    let result = with_load_times(&[100, 200]);
    assert_eq!(
        select_median(&result, ViewKind::FirstView, 2, DEFAULT_METRIC).unwrap_err(),
        SelectionError::StepOutOfRange {
            run: 1,
            step: 2,
            available: 1
        }
    );
}

#[test]
fn step_zero_is_rejected() {
    let result = with_load_times(&[100]);
    assert_eq!(
        select_median(&result, ViewKind::FirstView, 0, DEFAULT_METRIC).unwrap_err(),
        SelectionError::InvalidStep
    );
}

#[test]
fn missing_metric_is_an_error() {
    let result = with_load_times(&[100, 200]);
    let err = select_median(&result, ViewKind::FirstView, 1, "heroElementTime").unwrap_err();
    assert_eq!(
        err,
        SelectionError::MissingMetric {
            run: 1,
            metric: "heroElementTime".to_string()
        }
    );
}

#[test]
fn mixed_string_and_number_values_rank_together() {
    let mut body = result_body(&[0, 0, 0]);
    body["data"]["runs"]["1"]["firstView"]["loadTime"] = json!("1500");
    body["data"]["runs"]["2"]["firstView"]["loadTime"] = json!(900.5);
    body["data"]["runs"]["3"]["firstView"]["loadTime"] = json!(1200);
    let result = decode(body);

    let median = select_median(&result, ViewKind::FirstView, 1, DEFAULT_METRIC).unwrap();
    assert_eq!(median.run_number, 3);
}

#[test]
fn selects_by_any_metric_on_a_scripted_step() {
    let scripted = |first: i64, second: i64| {
        json!({
            "numSteps": 2,
            "steps": [
                {"eventName": "home", "SpeedIndex": first},
                {"eventName": "search", "SpeedIndex": second}
            ]
        })
    };
    let result = decode(json!({
        "statusCode": 200,
        "statusText": "Test Complete",
        "data": {
            "runs": {
                "1": {"firstView": scripted(1000, 3000)},
                "2": {"firstView": scripted(2000, 1000)},
                "3": {"firstView": scripted(3000, 2000)}
            }
        }
    }));

    let second = select_median(&result, ViewKind::FirstView, 2, "SpeedIndex").unwrap();
    assert_eq!(second.run_number, 3);
    let first = select_median(&result, ViewKind::FirstView, 1, "SpeedIndex").unwrap();
    assert_eq!(first.run_number, 2);
}

#[test]
fn server_median_is_left_alone() {
    let mut body = result_body(&[100, 200, 300]);
    body["data"]["median"] = json!({"firstView": flat_view(json!(300))});
    let result = decode(body);

    let median = select_median(&result, ViewKind::FirstView, 1, DEFAULT_METRIC).unwrap();
    assert_eq!(median.value, Number::Integer(200));
}

#[test]
fn script_that_failed_early_does_not_block_later_steps() {
    let completed = |first: i64, second: i64| {
        json!({
            "numSteps": 2,
            "steps": [
                {"eventName": "home", "loadTime": first},
                {"eventName": "search", "loadTime": second}
            ]
        })
    };
    let result = decode(json!({
        "statusCode": 200,
        "statusText": "Test Complete",
        "data": {
            "runs": {
                "1": {"firstView": completed(1000, 3000)},
                "2": {"firstView": {
                    "numSteps": 1,
                    "loadTime": 900,
                    "error": "Script failed at step 2"
                }},
                "3": {"firstView": completed(1100, 1000)},
                "4": {"firstView": completed(1200, 2000)}
            }
        }
    }));

    let second = select_median(&result, ViewKind::FirstView, 2, DEFAULT_METRIC).unwrap();
    assert_eq!(second.run_number, 4);
    assert_eq!(second.value, Number::Integer(2000));
}

#[test]
fn short_run_without_errors_is_still_out_of_range() {
    let result = decode(json!({
        "statusCode": 200,
        "statusText": "Test Complete",
        "data": {
            "runs": {
                "1": {"firstView": {
                    "numSteps": 2,
                    "steps": [{"loadTime": 100}, {"loadTime": 200}]
                }},
                "2": {"firstView": {"loadTime": 300}}
            }
        }
    }));

    assert_eq!(
        select_median(&result, ViewKind::FirstView, 2, DEFAULT_METRIC).unwrap_err(),
        SelectionError::StepOutOfRange {
            run: 2,
            step: 2,
            available: 1
        }
    );
}

#[test]
fn non_finite_metric_counts_as_missing() {
    let mut body = result_body(&[100, 200, 300]);
    body["data"]["runs"]["2"]["firstView"]["loadTime"] = json!("NaN");
    let result = decode(body);

    assert_eq!(
        select_median(&result, ViewKind::FirstView, 1, DEFAULT_METRIC).unwrap_err(),
        SelectionError::MissingMetric {
            run: 2,
            metric: DEFAULT_METRIC.to_string()
        }
    );
}
