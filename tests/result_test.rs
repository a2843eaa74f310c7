mod common;

use common::{client, flat_view, result_body, ScriptedTransport};
use serde_json::json;
use wpt_client::client::parse_result;
use wpt_client::{JobHandle, Number, ResultOptions, View, WptError};

fn parse(body: serde_json::Value) -> Result<wpt_client::TestResult, WptError> {
    parse_result(body.to_string().as_bytes())
}

#[test]
fn single_step_view_is_wrapped_from_top_level_fields() {
    let result = parse(result_body(&[1200])).unwrap();
    let run = result.run(1).unwrap();

    assert_eq!(run.first_view.steps.len(), 1);
    let step = &run.first_view.steps[0];
    assert_eq!(step.load_time, Some(Number::Integer(1200)));
    assert_eq!(step.ttfb, Some(Number::Integer(310)));
    assert_eq!(step.speed_index, Some(Number::Integer(1024)));
    assert_eq!(step.event_name, "Step 1");
    assert_eq!(
        step.thumbnails["waterfall"],
        "http://wpt.test/result/1_waterfall_thumb.png"
    );
    assert!(step.domains.is_empty());
    assert_eq!(step.video_frames.len(), 1);

    let repeat = run.repeat_view.as_ref().unwrap();
    assert_eq!(repeat.steps[0].load_time, Some(Number::Integer(600)));
}

#[test]
fn scripted_view_keeps_steps_in_order() {
    let body = json!({
        "statusCode": 200,
        "statusText": "Test Complete",
        "data": {
            "id": "161128_S0_1",
            "runs": {
                "1": {
                    "firstView": {
                        "numSteps": 3,
                        "steps": [
                            {"eventName": "login", "loadTime": 900, "step": 1},
                            {"eventName": "search", "loadTime": "1400", "step": 2},
                            {"eventName": "checkout", "loadTime": 2100.5, "step": 3}
                        ]
                    }
                }
            }
        }
    });

    let result = parse(body).unwrap();
    let view = &result.run(1).unwrap().first_view;
    let names: Vec<&str> = view.steps.iter().map(|s| s.event_name.as_str()).collect();
    assert_eq!(names, vec!["login", "search", "checkout"]);
    assert_eq!(view.step(2).unwrap().load_time, Some(Number::Integer(1400)));
    assert_eq!(
        view.step(3).unwrap().load_time.as_ref().unwrap().as_f64(),
        Some(2100.5)
    );
    assert!(result.run(1).unwrap().repeat_view.is_none());
}

#[test]
fn numeric_string_and_number_decode_equal() {
    let as_string = View::from_value(&json!({"bytesIn": "43", "plr": "0"})).unwrap();
    let as_number = View::from_value(&json!({"bytesIn": 43, "plr": 0})).unwrap();
    assert_eq!(as_string.steps[0].bytes_in, as_number.steps[0].bytes_in);
    assert_eq!(as_string.steps[0].metric("plr"), as_number.steps[0].metric("plr"));
}

#[test]
fn packet_loss_as_string_or_number() {
    let mut as_number = result_body(&[100]);
    as_number["data"]["plr"] = json!(0);
    let a = parse(as_number).unwrap();
    let b = parse(result_body(&[100])).unwrap();
    assert_eq!(a.connectivity.packet_loss_rate, b.connectivity.packet_loss_rate);
    assert_eq!(
        b.connectivity.to_string(),
        "Cable (5000Kbps/1000Kbps) 28ms, Packet Loss 0%"
    );
}

#[test]
fn not_applicable_sentinel_is_preserved() {
    let result = parse(result_body(&[100])).unwrap();
    let step = &result.run(1).unwrap().first_view.steps[0];
    let cdn = step.score_cdn.as_ref().unwrap();
    assert!(cdn.is_not_applicable());
    assert_eq!(cdn.as_i64(), Some(-1));
}

#[test]
fn top_level_metadata() {
    let result = parse(result_body(&[100, 200])).unwrap();
    assert_eq!(result.id, "161128_R3_2");
    assert_eq!(result.location, "Dulles:Chrome");
    assert_eq!(result.runs.len(), 2);
    assert!(!result.first_view_only);
    assert_eq!(
        result.completed_at().unwrap().to_rfc3339(),
        "2016-11-24T07:46:40+00:00"
    );
}

#[test]
fn unknown_fields_are_ignored_and_kept() {
    let mut body = result_body(&[100]);
    body["data"]["brandNewField"] = json!({"nested": true});
    body["data"]["runs"]["1"]["firstView"]["heroElementTime"] = json!(455);

    let result = parse(body).unwrap();
    let step = &result.run(1).unwrap().first_view.steps[0];
    assert_eq!(step.metric("heroElementTime"), Some(Number::Integer(455)));
}

#[test]
fn empty_repeat_view_and_median_are_absent() {
    let mut body = result_body(&[100]);
    body["data"]["runs"]["1"]["repeatView"] = json!([]);
    body["data"]["median"] = json!([]);
    body["data"]["fvonly"] = json!(1);

    let result = parse(body).unwrap();
    assert!(result.run(1).unwrap().repeat_view.is_none());
    assert!(result.median.is_none());
    assert!(result.first_view_only);
}

#[test]
fn server_median_is_decoded_like_a_run() {
    let mut body = result_body(&[100, 300]);
    body["data"]["median"] = json!({"firstView": flat_view(json!(100))});

    let result = parse(body).unwrap();
    let median = result.median.unwrap();
    assert_eq!(median.first_view.steps[0].load_time, Some(Number::Integer(100)));
}

#[test]
fn non_ok_envelope_is_rejected() {
    let err = parse(json!({
        "statusCode": 400,
        "statusText": "Test not found",
        "data": {"id": "x"}
    }))
    .unwrap_err();
    match err {
        WptError::RemoteRejection {
            status_code,
            status_text,
        } => {
            assert_eq!(status_code, 400);
            assert_eq!(status_text, "Test not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn step_count_mismatch_fails_the_whole_decode() {
    let body = json!({
        "statusCode": 200,
        "statusText": "Ok",
        "data": {
            "runs": {
                "1": {"firstView": {"numSteps": 2, "steps": [{"loadTime": 1}]}}
            }
        }
    });
    assert!(matches!(parse(body), Err(WptError::Decode(_))));
}

#[test]
fn malformed_json_is_a_decode_error() {
    assert!(matches!(parse_result(b"{\"statusCode\": 200,"), Err(WptError::Decode(_))));
}

#[test]
fn request_table_accepts_string_numbers() {
    let mut body = result_body(&[100]);
    body["data"]["runs"]["1"]["firstView"]["requests"] = json!([{
        "ip_addr": "173.194.122.199",
        "method": "GET",
        "host": "google.com",
        "url": "/",
        "full_url": "http://google.com/",
        "responseCode": "302",
        "request_id": "9",
        "bytesIn": "467",
        "dns_ms": "-1",
        "ttfb_ms": "43",
        "load_ms": 43,
        "score_keep-alive": "-1",
        "headers": {"request": ["GET / HTTP/1.1"], "response": []}
    }]);

    let result = parse(body).unwrap();
    let request = &result.run(1).unwrap().first_view.steps[0].requests[0];
    assert_eq!(request.response_code.as_ref().unwrap().as_i64(), Some(302));
    assert_eq!(request.ttfb, request.load);
    assert!(request.dns.as_ref().unwrap().is_not_applicable());
    assert_eq!(request.headers.as_ref().unwrap().request.len(), 1);
}

#[tokio::test]
async fn compact_result_request_disables_sections() {
    let transport = ScriptedTransport::new().push_json(result_body(&[100]));
    let client = client(transport);

    client
        .result(&JobHandle::new("161128_R3_2"), ResultOptions::compact())
        .await
        .unwrap();

    let call = &client.transport().calls()[0];
    assert_eq!(call.path, "/jsonResult.php");
    assert_eq!(call.param("test"), Some("161128_R3_2"));
    assert_eq!(call.param("requests"), Some("0"));
    assert_eq!(call.param("average"), Some("0"));
    assert_eq!(call.param("standard"), Some("0"));
}
