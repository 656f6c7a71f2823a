pub(crate) const DEFAULT_USER_AGENT: &str = concat!("trafficgen/", env!("CARGO_PKG_VERSION"));

/// Target list read when `--url-source` is not given.
pub(crate) const DEFAULT_URL_SOURCE: &str = "./top-1m.txt";
