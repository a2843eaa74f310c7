use serde::{Deserialize, Serialize};

/// What to test and how. Only `url` is required; every other field is left
/// to the server default unless set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestConfiguration {
    /// URL to be tested
    pub url: String,
    pub label: Option<String>,
    /// Legacy location selector, sent as `where`
    #[serde(rename = "where")]
    pub where_: Option<String>,

    /// Test location, optionally with browser and connectivity
    /// (`Dulles:Chrome.Cable`)
    pub location: Option<String>,
    pub browser: Option<String>,
    /// Connectivity profile name (`Cable`, `3G`, `Custom`, ...)
    pub connectivity: Option<String>,

    /// Number of test runs (1-10 on the public instance)
    pub runs: Option<u32>,
    /// Viewport width in css pixels
    pub width: Option<u32>,
    /// Viewport height in css pixels
    pub height: Option<u32>,
    /// Metric the server uses when picking its own median run
    pub median_metric: Option<String>,

    /// Scripted multi-step test
    pub script: Option<String>,
    pub custom_headers: Option<String>,
    /// Custom metrics to collect at the end of a test
    pub custom_metrics: Option<String>,

    /// Capture the Dev Tools timeline
    pub timeline: bool,
    /// Javascript call stack depth for the timeline (1-5)
    pub timeline_stack: Option<u32>,
    /// Skip the repeat view
    pub first_view_only: bool,
    /// Keep the test out of the public test log
    pub private: bool,
    /// Capture video (required for Speed Index)
    pub capture_video: bool,
    /// Only keep the video of the median run
    pub median_run_video: bool,
    /// Save a full-resolution png of the fully loaded screen
    pub png_screenshot: bool,
    /// JPEG quality for screenshots and video (30-100)
    pub image_quality: Option<u32>,

    /// URL to ping with `id=<test id>` on completion
    pub pingback: Option<String>,
    /// E-mail address to notify on completion
    pub notify: Option<String>,
    /// DOM element to record for sub-measurement
    pub dom_element: Option<String>,
    /// Override the number of concurrent connections (IE)
    pub connections: Option<u32>,
    /// Stop the test at Document Complete
    pub web10: bool,
    /// Space-delimited list of urls to block
    pub block: Option<String>,

    /// HTTP authentication
    pub login: Option<String>,
    pub password: Option<String>,
    /// 0 = Basic Auth, 1 = SNS
    pub auth_type: Option<String>,

    /// Download bandwidth in Kbps (custom connectivity)
    pub bandwidth_down: Option<u32>,
    /// Upload bandwidth in Kbps (custom connectivity)
    pub bandwidth_up: Option<u32>,
    /// First-hop round trip time in ms (custom connectivity)
    pub latency: Option<u32>,
    /// Percent of packets to drop (custom connectivity)
    pub packet_loss_rate: Option<u32>,

    pub tcpdump: bool,
    /// Disable optimization checks
    pub no_optimization: bool,
    pub no_images: bool,
    pub no_headers: bool,
    /// Disable javascript
    pub no_script: bool,
    /// Clear the OS certificate caches
    pub clear_certs: bool,
    pub ignore_ssl: bool,
    /// Save the body of the base page only
    pub html_body: bool,

    /// Emulate a mobile browser (Chrome)
    pub mobile: bool,
    /// Device name from mobile_devices.ini
    pub mobile_device: Option<String>,
    /// Device pixel ratio when emulating mobile
    pub device_pixel_ratio: Option<u32>,
    /// Don't append PTST to the user agent
    pub keep_user_agent: bool,
    pub user_agent: Option<String>,
    /// Appended to the user agent, supports %TESTID%, %RUN%, %CACHED%, %VERSION%
    pub append_user_agent: Option<String>,
    /// Custom command-line options (Chrome)
    pub command_line: Option<String>,

    /// Run on a specific tester (PC name from getTesters.php)
    pub tester: Option<String>,
    /// Hash the test to a consistent tester
    pub affinity: Option<String>,
}

impl TestConfiguration {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Form fields for `/runtest.php`. Unset options are left out entirely so
    /// the server applies its own defaults.
    pub fn form_params(&self) -> Vec<(String, String)> {
        let mut form = FormBuilder::default();
        form.push("f", "json");
        form.push("url", &self.url);

        form.text("label", &self.label);
        form.text("where", &self.where_);
        form.text("location", &self.location);
        form.text("browser", &self.browser);
        form.text("connectivity", &self.connectivity);
        form.number("runs", self.runs);
        form.number("width", self.width);
        form.number("height", self.height);
        form.text("medianMetric", &self.median_metric);

        form.text("script", &self.script);
        form.text("customHeaders", &self.custom_headers);
        form.text("custom", &self.custom_metrics);

        form.flag("timeline", self.timeline);
        form.number("timelineStack", self.timeline_stack);
        form.flag("fvonly", self.first_view_only);
        form.flag("private", self.private);
        form.flag("video", self.capture_video);
        form.flag("mv", self.median_run_video);
        form.flag("pngss", self.png_screenshot);
        form.number("iq", self.image_quality);

        form.text("pingback", &self.pingback);
        form.text("notify", &self.notify);
        form.text("domelement", &self.dom_element);
        form.number("connections", self.connections);
        form.flag("web10", self.web10);
        form.text("block", &self.block);

        form.text("login", &self.login);
        form.text("password", &self.password);
        form.text("authType", &self.auth_type);

        form.number("bwDown", self.bandwidth_down);
        form.number("bwUp", self.bandwidth_up);
        form.number("latency", self.latency);
        form.number("plr", self.packet_loss_rate);

        form.flag("tcpdump", self.tcpdump);
        form.flag("noopt", self.no_optimization);
        form.flag("noimages", self.no_images);
        form.flag("noheaders", self.no_headers);
        form.flag("noscript", self.no_script);
        form.flag("clearcerts", self.clear_certs);
        form.flag("ignoreSSL", self.ignore_ssl);
        form.flag("htmlbody", self.html_body);

        form.flag("mobile", self.mobile);
        form.text("mobileDevice", &self.mobile_device);
        form.number("dpr", self.device_pixel_ratio);
        form.flag("keepua", self.keep_user_agent);
        form.text("uastring", &self.user_agent);
        form.text("appendua", &self.append_user_agent);
        form.text("cmdline", &self.command_line);

        form.text("tester", &self.tester);
        form.text("affinity", &self.affinity);

        form.0
    }
}

#[derive(Default)]
struct FormBuilder(Vec<(String, String)>);

impl FormBuilder {
    fn push(&mut self, key: &str, value: &str) {
        self.0.push((key.to_string(), value.to_string()));
    }

    fn text(&mut self, key: &str, value: &Option<String>) {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            self.push(key, value);
        }
    }

    fn number(&mut self, key: &str, value: Option<u32>) {
        if let Some(value) = value {
            self.push(key, &value.to_string());
        }
    }

    fn flag(&mut self, key: &str, enabled: bool) {
        if enabled {
            self.push(key, "1");
        }
    }
}
