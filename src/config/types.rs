use serde::Deserialize;

/// Run options read from `trafficgen.toml` / `trafficgen.json`.
///
/// Every field is optional; values given on the command line win.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub clients: Option<usize>,
    pub requests: Option<u64>,
    /// Milliseconds between two requests of one client.
    pub wait: Option<u64>,
    /// Probe deadline in seconds.
    pub timeout: Option<u64>,
    #[serde(rename = "type", alias = "traffic_type")]
    pub traffic_type: Option<String>,
    pub follow_redirect: Option<bool>,
    pub seed: Option<i64>,
    #[serde(alias = "urls")]
    pub url_source: Option<String>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}
