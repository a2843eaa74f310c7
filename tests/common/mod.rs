#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use wpt_client::{Client, ClientConfig, Transport, WptError};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Call {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport that replays canned bodies in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Vec<u8>, WptError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(self, body: Value) -> Self {
        self.push_body(body.to_string())
    }

    pub fn push_body(self, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(body.into().into_bytes()));
        self
    }

    pub fn push_error(self, error: WptError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, call: Call) -> Result<Vec<u8>, WptError> {
        self.calls.lock().unwrap().push(call.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response left for {:?}", call))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Vec<u8>, WptError> {
        self.next(Call {
            method: "GET",
            path: path.to_string(),
            params: query.to_vec(),
        })
    }

    async fn post_form(&self, path: &str, form: &[(String, String)]) -> Result<Vec<u8>, WptError> {
        self.next(Call {
            method: "POST",
            path: path.to_string(),
            params: form.to_vec(),
        })
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new("http://wpt.test")
        .unwrap()
        .with_poll_interval(Duration::from_secs(10))
}

pub fn client(transport: ScriptedTransport) -> Client<ScriptedTransport> {
    Client::with_transport(config(), transport)
}

pub fn status_body(code: i64, text: &str) -> Value {
    json!({
        "statusCode": code,
        "statusText": text,
        "data": {
            "statusCode": code,
            "statusText": text,
            "id": "161126_19_abc",
            "testId": "161126_19_abc",
            "runs": 3,
            "elapsed": 14,
            "testsExpected": 3,
            "testsCompleted": 1
        }
    })
}

pub fn submit_body() -> Value {
    json!({
        "statusCode": 200,
        "statusText": "Ok",
        "data": {
            "testId": "161128_R3_2",
            "ownerKey": "c9d1754ea6388229093c69adac3740e0339fa100",
            "jsonUrl": "http://wpt.test/jsonResult.php?test=161128_R3_2",
            "xmlUrl": "http://wpt.test/xmlResult.php?test=161128_R3_2",
            "userUrl": "http://wpt.test/results.php?test=161128_R3_2",
            "summaryCSV": "http://wpt.test/csv.php?test=161128_R3_2"
        }
    })
}

/// Flat (non-scripted) view payload.
pub fn flat_view(load_time: Value) -> Value {
    json!({
        "URL": "http://google.com",
        "loadTime": load_time,
        "TTFB": 310,
        "render": 700,
        "SpeedIndex": 1024,
        "score_cdn": -1,
        "numSteps": 1,
        "step": 1,
        "eventName": "Step 1",
        "thumbnails": {"waterfall": "http://wpt.test/result/1_waterfall_thumb.png"},
        "domains": [],
        "videoFrames": [{"time": 0, "image": "http://wpt.test/frame_0000.jpg", "VisuallyComplete": 0}]
    })
}

/// Result envelope whose runs have the given first-view load times.
pub fn result_body(load_times: &[i64]) -> Value {
    let runs: serde_json::Map<String, Value> = load_times
        .iter()
        .enumerate()
        .map(|(i, t)| {
            (
                (i + 1).to_string(),
                json!({"firstView": flat_view(json!(t)), "repeatView": flat_view(json!(t / 2))}),
            )
        })
        .collect();
    json!({
        "statusCode": 200,
        "statusText": "Test Complete",
        "data": {
            "id": "161128_R3_2",
            "url": "http://google.com",
            "location": "Dulles:Chrome",
            "connectivity": "Cable",
            "bwDown": 5000,
            "bwUp": 1000,
            "latency": 28,
            "plr": "0",
            "completed": 1479973600,
            "fvonly": false,
            "successfulFVRuns": load_times.len(),
            "runs": runs
        }
    })
}
