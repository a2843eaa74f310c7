//! Decoded `/jsonResult.php` payload.
//!
//! A view (first or repeat) comes in one of two shapes. Scripted tests send
//! `{"numSteps": N, "steps": [...]}`; plain tests send the metrics of their
//! single step flat at the view level. Both become a [`View`] holding an
//! ordered list of [`Step`]s.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::lenient::{self, Number};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Connectivity {
    /// Profile name
    #[serde(rename = "connectivity", default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Download bandwidth in Kbps
    #[serde(rename = "bwDown", default, deserialize_with = "lenient::opt_number")]
    pub bandwidth_down: Option<Number>,
    /// Upload bandwidth in Kbps
    #[serde(rename = "bwUp", default, deserialize_with = "lenient::opt_number")]
    pub bandwidth_up: Option<Number>,
    /// First-hop round trip time in ms
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub latency: Option<Number>,
    /// Percent of packets dropped
    #[serde(rename = "plr", default, deserialize_with = "lenient::opt_number")]
    pub packet_loss_rate: Option<Number>,
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(n: &Option<Number>) -> String {
            n.as_ref().map(|n| n.to_string()).unwrap_or_else(|| "0".into())
        }
        write!(
            f,
            "{} ({}Kbps/{}Kbps) {}ms, Packet Loss {}%",
            self.name,
            show(&self.bandwidth_down),
            show(&self.bandwidth_up),
            show(&self.latency),
            show(&self.packet_loss_rate)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TestResult {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(rename = "testUrl", default, deserialize_with = "lenient::string")]
    pub test_url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub from: String,
    #[serde(flatten)]
    pub connectivity: Connectivity,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub mobile: bool,
    /// Unix timestamp of completion
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub completed: Option<Number>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub tester: String,
    #[serde(rename = "testerDNS", default, deserialize_with = "lenient::string")]
    pub tester_dns: String,
    #[serde(rename = "fvonly", default, deserialize_with = "lenient::flag")]
    pub first_view_only: bool,
    #[serde(rename = "successfulFVRuns", default, deserialize_with = "lenient::opt_number")]
    pub successful_fv_runs: Option<Number>,
    #[serde(rename = "successfulRVRuns", default, deserialize_with = "lenient::opt_number")]
    pub successful_rv_runs: Option<Number>,

    /// Runs keyed by their 1-based run number
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub runs: BTreeMap<u32, Run>,
    /// Median run as computed by the server
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub median: Option<Run>,
}

impl TestResult {
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        unix_time(self.completed.as_ref())
    }

    pub fn run(&self, number: u32) -> Option<&Run> {
        self.runs.get(&number)
    }
}

/// One repetition of the test.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "RawRun")]
pub struct Run {
    #[serde(rename = "firstView")]
    pub first_view: View,
    #[serde(rename = "repeatView", skip_serializing_if = "Option::is_none")]
    pub repeat_view: Option<View>,
}

#[derive(Deserialize)]
struct RawRun {
    #[serde(rename = "firstView", default)]
    first_view: Option<Value>,
    #[serde(rename = "repeatView", default)]
    repeat_view: Option<Value>,
}

impl TryFrom<RawRun> for Run {
    type Error = serde_json::Error;

    fn try_from(raw: RawRun) -> Result<Self, Self::Error> {
        let first_view = match raw.first_view.as_ref().filter(|v| !is_empty(v)) {
            Some(value) => View::from_value(value)?,
            None => return Err(serde::de::Error::missing_field("firstView")),
        };
        let repeat_view = match raw.repeat_view.as_ref().filter(|v| !is_empty(v)) {
            Some(value) => Some(View::from_value(value)?),
            None => None,
        };
        Ok(Run {
            first_view,
            repeat_view,
        })
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Ordered measurements of one view. Non-scripted tests always have exactly
/// one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct View {
    pub steps: Vec<Step>,
}

/// Just enough of a view to tell which shape it has.
#[derive(Deserialize)]
struct ViewHeader {
    #[serde(rename = "numSteps", default, deserialize_with = "lenient::opt_number")]
    num_steps: Option<Number>,
}

#[derive(Deserialize)]
struct ScriptedView {
    steps: Vec<Step>,
}

impl View {
    /// Two-phase decode: read `numSteps`, then decode either the `steps`
    /// array or the whole object as a single step.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let header = ViewHeader::deserialize(value)?;
        let declared = match &header.num_steps {
            None => 1,
            Some(n) => n.as_i64().ok_or_else(|| {
                <serde_json::Error as serde::de::Error>::custom(format!(
                    "numSteps is not an integer: {}",
                    n
                ))
            })?,
        };

        if declared > 1 {
            let scripted = ScriptedView::deserialize(value)?;
            if scripted.steps.len() as i64 != declared {
                return Err(serde::de::Error::invalid_length(
                    scripted.steps.len(),
                    &format!("{} steps as declared by numSteps", declared).as_str(),
                ));
            }
            return Ok(View {
                steps: scripted.steps,
            });
        }

        Ok(View {
            steps: vec![Step::deserialize(value)?],
        })
    }

    /// Step by its 1-based number.
    pub fn step(&self, number: usize) -> Option<&Step> {
        number.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }
}

impl<'de> Deserialize<'de> for View {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        View::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VideoFrame {
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub time: Option<Number>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: String,
    #[serde(rename = "VisuallyComplete", default, deserialize_with = "lenient::opt_number")]
    pub visually_complete: Option<Number>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Domain {
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub bytes: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub requests: Option<Number>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cdn_provider: String,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub connections: Option<Number>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Breakdown {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub color: Vec<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub bytes: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub requests: Option<Number>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Headers {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub request: Vec<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub response: Vec<String>,
}

/// One row of a step's request table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Request {
    #[serde(rename = "ip_addr", default, deserialize_with = "lenient::string")]
    pub ip: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub method: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub host: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub full_url: String,
    #[serde(rename = "responseCode", default, deserialize_with = "lenient::opt_number")]
    pub response_code: Option<Number>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub protocol: String,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub request_id: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub index: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub number: Option<Number>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_number")]
    pub request_type: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub socket: Option<Number>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub priority: String,

    #[serde(rename = "bytesOut", default, deserialize_with = "lenient::opt_number")]
    pub bytes_out: Option<Number>,
    #[serde(rename = "bytesIn", default, deserialize_with = "lenient::opt_number")]
    pub bytes_in: Option<Number>,
    #[serde(rename = "objectSize", default, deserialize_with = "lenient::opt_number")]
    pub object_size: Option<Number>,
    #[serde(rename = "contentType", default, deserialize_with = "lenient::string")]
    pub content_type: String,
    #[serde(rename = "contentEncoding", default, deserialize_with = "lenient::string")]
    pub content_encoding: String,
    #[serde(rename = "cacheControl", default, deserialize_with = "lenient::string")]
    pub cache_control: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub expires: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cdn_provider: String,

    #[serde(rename = "dns_ms", default, deserialize_with = "lenient::opt_number")]
    pub dns: Option<Number>,
    #[serde(rename = "connect_ms", default, deserialize_with = "lenient::opt_number")]
    pub connect: Option<Number>,
    #[serde(rename = "ssl_ms", default, deserialize_with = "lenient::opt_number")]
    pub ssl: Option<Number>,
    #[serde(rename = "ttfb_ms", default, deserialize_with = "lenient::opt_number")]
    pub ttfb: Option<Number>,
    #[serde(rename = "download_ms", default, deserialize_with = "lenient::opt_number")]
    pub download: Option<Number>,
    #[serde(rename = "load_start", default, deserialize_with = "lenient::opt_number")]
    pub load_start: Option<Number>,
    #[serde(rename = "load_ms", default, deserialize_with = "lenient::opt_number")]
    pub load: Option<Number>,
    #[serde(rename = "all_start", default, deserialize_with = "lenient::opt_number")]
    pub all_start: Option<Number>,
    #[serde(rename = "all_ms", default, deserialize_with = "lenient::opt_number")]
    pub all: Option<Number>,

    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_cache: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_cdn: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_gzip: Option<Number>,
    #[serde(rename = "score_keep-alive", default, deserialize_with = "lenient::opt_number")]
    pub score_keep_alive: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_minify: Option<Number>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub initiator: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub initiator_type: String,

    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub headers: Option<Headers>,
}

/// Measurements of a single step.
///
/// All numeric metrics are [`Number`]s: the server may send them as JSON
/// numbers or numeric strings, and uses `-1` for "not applicable".
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Step {
    #[serde(rename = "URL", default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub result: Option<Number>,
    /// Error reported by the agent for this step; empty on success
    #[serde(default, deserialize_with = "lenient::string")]
    pub error: String,
    /// Unix timestamp of the measurement
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub date: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub run: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub cached: Option<Number>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub tester: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub browser_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub browser_version: String,

    #[serde(rename = "eventName", default, deserialize_with = "lenient::string")]
    pub event_name: String,
    #[serde(rename = "numSteps", default, deserialize_with = "lenient::opt_number")]
    pub num_steps: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub step: Option<Number>,

    /// Estimated RTT to server (ms)
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub server_rtt: Option<Number>,
    /// Time to first byte of the base page, after redirects (ms)
    #[serde(rename = "TTFB", default, deserialize_with = "lenient::opt_number")]
    pub ttfb: Option<Number>,
    #[serde(rename = "domLoading", default, deserialize_with = "lenient::opt_number")]
    pub dom_loading: Option<Number>,
    #[serde(rename = "firstPaint", default, deserialize_with = "lenient::opt_number")]
    pub first_paint: Option<Number>,
    #[serde(rename = "titleTime", default, deserialize_with = "lenient::opt_number")]
    pub title_time: Option<Number>,
    #[serde(rename = "domInteractive", default, deserialize_with = "lenient::opt_number")]
    pub dom_interactive: Option<Number>,
    #[serde(rename = "domContentLoadedEventStart", default, deserialize_with = "lenient::opt_number")]
    pub dom_content_loaded_event_start: Option<Number>,
    #[serde(rename = "domContentLoadedEventEnd", default, deserialize_with = "lenient::opt_number")]
    pub dom_content_loaded_event_end: Option<Number>,
    #[serde(rename = "loadEventStart", default, deserialize_with = "lenient::opt_number")]
    pub load_event_start: Option<Number>,
    #[serde(rename = "loadEventEnd", default, deserialize_with = "lenient::opt_number")]
    pub load_event_end: Option<Number>,
    /// Document complete (ms)
    #[serde(rename = "docTime", default, deserialize_with = "lenient::opt_number")]
    pub doc_time: Option<Number>,
    /// Start of the window load event (ms)
    #[serde(rename = "loadTime", default, deserialize_with = "lenient::opt_number")]
    pub load_time: Option<Number>,
    /// First non-white paint (ms)
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub render: Option<Number>,
    #[serde(rename = "visualComplete", default, deserialize_with = "lenient::opt_number")]
    pub visual_complete: Option<Number>,
    /// Two seconds of network silence after document complete (ms)
    #[serde(rename = "fullyLoaded", default, deserialize_with = "lenient::opt_number")]
    pub fully_loaded: Option<Number>,
    #[serde(rename = "lastVisualChange", default, deserialize_with = "lenient::opt_number")]
    pub last_visual_change: Option<Number>,
    #[serde(rename = "SpeedIndex", default, deserialize_with = "lenient::opt_number")]
    pub speed_index: Option<Number>,
    #[serde(rename = "domTime", default, deserialize_with = "lenient::opt_number")]
    pub dom_time: Option<Number>,
    #[serde(rename = "aft", default, deserialize_with = "lenient::opt_number")]
    pub above_the_fold_time: Option<Number>,
    #[serde(rename = "domElements", default, deserialize_with = "lenient::opt_number")]
    pub dom_elements: Option<Number>,

    #[serde(rename = "docCPUms", default, deserialize_with = "lenient::opt_number")]
    pub doc_cpu_ms: Option<Number>,
    #[serde(rename = "fullyLoadedCPUms", default, deserialize_with = "lenient::opt_number")]
    pub fully_loaded_cpu_ms: Option<Number>,
    #[serde(rename = "docCPUpct", default, deserialize_with = "lenient::opt_number")]
    pub doc_cpu_pct: Option<Number>,
    #[serde(rename = "fullyLoadedCPUpct", default, deserialize_with = "lenient::opt_number")]
    pub fully_loaded_cpu_pct: Option<Number>,

    #[serde(rename = "bytesIn", default, deserialize_with = "lenient::opt_number")]
    pub bytes_in: Option<Number>,
    #[serde(rename = "bytesOut", default, deserialize_with = "lenient::opt_number")]
    pub bytes_out: Option<Number>,
    #[serde(rename = "bytesInDoc", default, deserialize_with = "lenient::opt_number")]
    pub bytes_in_doc: Option<Number>,
    #[serde(rename = "bytesOutDoc", default, deserialize_with = "lenient::opt_number")]
    pub bytes_out_doc: Option<Number>,
    #[serde(rename = "effectiveBps", default, deserialize_with = "lenient::opt_number")]
    pub effective_bps: Option<Number>,
    #[serde(rename = "effectiveBpsDoc", default, deserialize_with = "lenient::opt_number")]
    pub effective_bps_doc: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub certificate_bytes: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub connections: Option<Number>,
    #[serde(rename = "requestsFull", default, deserialize_with = "lenient::opt_number")]
    pub requests_full: Option<Number>,
    #[serde(rename = "requestsDoc", default, deserialize_with = "lenient::opt_number")]
    pub requests_doc: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub responses_200: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub responses_404: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub responses_other: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub server_count: Option<Number>,

    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub optimization_checked: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_cache: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_cdn: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_gzip: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_cookies: Option<Number>,
    #[serde(rename = "score_keep-alive", default, deserialize_with = "lenient::opt_number")]
    pub score_keep_alive: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_minify: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_combine: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_compress: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_etags: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub score_progressive_jpeg: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub gzip_total: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub gzip_savings: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub minify_total: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub minify_savings: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub image_total: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub image_savings: Option<Number>,
    #[serde(rename = "pageSpeedVersion", default, deserialize_with = "lenient::string")]
    pub page_speed_version: String,

    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub adult_site: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub fixed_viewport: Option<Number>,
    #[serde(rename = "isResponsive", default, deserialize_with = "lenient::opt_number")]
    pub is_responsive: Option<Number>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub base_page_cdn: String,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub base_page_redirects: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub base_page_ttfb: Option<Number>,

    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub browser_process_count: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub browser_main_memory_kb: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub browser_working_set_kb: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub browser_other_private_memory_kb: Option<Number>,

    /// details, checklist, breakdown, domains, screenShot
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub pages: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub thumbnails: BTreeMap<String, String>,
    /// waterfall, connectionView, checklist, screenShot, screenShotPng
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub images: BTreeMap<String, String>,
    /// headers, pageData, requestsData, utilization
    #[serde(rename = "rawData", default, deserialize_with = "lenient::or_default")]
    pub raw_data: BTreeMap<String, String>,
    #[serde(rename = "videoFrames", default, deserialize_with = "lenient::or_default")]
    pub video_frames: Vec<VideoFrame>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub domains: BTreeMap<String, Domain>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub breakdown: BTreeMap<String, Breakdown>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub requests: Vec<Request>,

    /// Fields without a typed home, e.g. custom metrics.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Step {
    pub fn is_successful(&self) -> bool {
        self.error.trim().is_empty()
    }

    pub fn measured_at(&self) -> Option<DateTime<Utc>> {
        unix_time(self.date.as_ref())
    }

    /// Look up a numeric metric by its wire name (`loadTime`, `SpeedIndex`,
    /// `TTFB`, a custom metric, ...).
    pub fn metric(&self, name: &str) -> Option<Number> {
        let known = match name {
            "result" => &self.result,
            "server_rtt" => &self.server_rtt,
            "TTFB" => &self.ttfb,
            "domLoading" => &self.dom_loading,
            "firstPaint" => &self.first_paint,
            "titleTime" => &self.title_time,
            "domInteractive" => &self.dom_interactive,
            "domContentLoadedEventStart" => &self.dom_content_loaded_event_start,
            "domContentLoadedEventEnd" => &self.dom_content_loaded_event_end,
            "loadEventStart" => &self.load_event_start,
            "loadEventEnd" => &self.load_event_end,
            "docTime" => &self.doc_time,
            "loadTime" => &self.load_time,
            "render" => &self.render,
            "visualComplete" => &self.visual_complete,
            "fullyLoaded" => &self.fully_loaded,
            "lastVisualChange" => &self.last_visual_change,
            "SpeedIndex" => &self.speed_index,
            "domTime" => &self.dom_time,
            "aft" => &self.above_the_fold_time,
            "domElements" => &self.dom_elements,
            "docCPUms" => &self.doc_cpu_ms,
            "fullyLoadedCPUms" => &self.fully_loaded_cpu_ms,
            "docCPUpct" => &self.doc_cpu_pct,
            "fullyLoadedCPUpct" => &self.fully_loaded_cpu_pct,
            "bytesIn" => &self.bytes_in,
            "bytesOut" => &self.bytes_out,
            "bytesInDoc" => &self.bytes_in_doc,
            "bytesOutDoc" => &self.bytes_out_doc,
            "effectiveBps" => &self.effective_bps,
            "effectiveBpsDoc" => &self.effective_bps_doc,
            "certificate_bytes" => &self.certificate_bytes,
            "connections" => &self.connections,
            "requestsFull" => &self.requests_full,
            "requestsDoc" => &self.requests_doc,
            "responses_200" => &self.responses_200,
            "responses_404" => &self.responses_404,
            "responses_other" => &self.responses_other,
            "server_count" => &self.server_count,
            "score_cache" => &self.score_cache,
            "score_cdn" => &self.score_cdn,
            "score_gzip" => &self.score_gzip,
            "score_cookies" => &self.score_cookies,
            "score_keep-alive" => &self.score_keep_alive,
            "score_minify" => &self.score_minify,
            "score_combine" => &self.score_combine,
            "score_compress" => &self.score_compress,
            "score_etags" => &self.score_etags,
            "score_progressive_jpeg" => &self.score_progressive_jpeg,
            "gzip_total" => &self.gzip_total,
            "gzip_savings" => &self.gzip_savings,
            "minify_total" => &self.minify_total,
            "minify_savings" => &self.minify_savings,
            "image_total" => &self.image_total,
            "image_savings" => &self.image_savings,
            "base_page_redirects" => &self.base_page_redirects,
            "base_page_ttfb" => &self.base_page_ttfb,
            "browser_process_count" => &self.browser_process_count,
            "browser_main_memory_kb" => &self.browser_main_memory_kb,
            "browser_working_set_kb" => &self.browser_working_set_kb,
            "browser_other_private_memory_kb" => &self.browser_other_private_memory_kb,
            _ => return self.extra.get(name).and_then(Number::from_value),
        };
        known.clone()
    }
}

fn unix_time(stamp: Option<&Number>) -> Option<DateTime<Utc>> {
    let secs = stamp?.as_i64()?;
    Utc.timestamp_opt(secs, 0).single()
}
