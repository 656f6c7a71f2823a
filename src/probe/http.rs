use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use http::header::{ACCEPT, CONNECTION, HOST, LOCATION, USER_AGENT};
use http::{Method, Request, StatusCode};
use hyper::body::{Body as _, Incoming};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use trust_dns_resolver::TokioAsyncResolver;
use url::{Host, Position, Url};

use super::classify::classify;
use super::outcome::{Outcome, PhaseBreakdown};
use super::timeline::{RequestTimeline, TimelineEvent};
use super::{Probe, with_default_scheme};
use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppResult, ProbeError};

/// Redirect hops followed before the request fails.
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    Follow { max: usize },
    Stop,
}

impl RedirectPolicy {
    #[must_use]
    pub const fn from_flag(follow_redirect: bool) -> Self {
        if follow_redirect {
            RedirectPolicy::Follow { max: MAX_REDIRECTS }
        } else {
            RedirectPolicy::Stop
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HttpProbeSettings {
    pub timeout: Duration,
    pub redirects: RedirectPolicy,
}

/// Issues one GET per probe over a fresh connection, timing every phase of
/// the exchange.
pub struct HttpProbe {
    resolver: TokioAsyncResolver,
    tls: tokio_native_tls::TlsConnector,
    settings: HttpProbeSettings,
}

/// Response of a single hop.
struct Exchange {
    status: StatusCode,
    location: Option<String>,
    size: u64,
    phases: PhaseBreakdown,
}

/// Aborts the spawned connection task once the exchange is over.
struct ConnectionDriver(JoinHandle<()>);

impl Drop for ConnectionDriver {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl HttpProbe {
    /// # Errors
    ///
    /// Returns an error when the platform TLS connector cannot be built.
    pub fn new(resolver: TokioAsyncResolver, settings: HttpProbeSettings) -> AppResult<Self> {
        let connector = native_tls::TlsConnector::new()?;
        Ok(Self {
            resolver,
            tls: tokio_native_tls::TlsConnector::from(connector),
            settings,
        })
    }

    async fn fetch_within_deadline(&self, address: &str) -> Result<Exchange, ProbeError> {
        let url = Url::parse(address).map_err(|err| classify(&err))?;
        tokio::time::timeout(self.settings.timeout, self.fetch(url))
            .await
            .unwrap_or(Err(ProbeError::Timeout))
    }

    async fn fetch(&self, url: Url) -> Result<Exchange, ProbeError> {
        let mut current = url;
        let mut followed: usize = 0;
        loop {
            let exchange = self.exchange(&current).await?;
            let location = match (self.settings.redirects, exchange.location.as_deref()) {
                (RedirectPolicy::Follow { max }, Some(location))
                    if exchange.status.is_redirection() =>
                {
                    if followed >= max {
                        return Err(ProbeError::Request {
                            detail: format!("stopped after {} redirects", max),
                        });
                    }
                    location
                }
                (RedirectPolicy::Follow { .. } | RedirectPolicy::Stop, _) => return Ok(exchange),
            };
            current = current.join(location).map_err(|err| classify(&err))?;
            followed = followed.saturating_add(1);
        }
    }

    async fn exchange(&self, url: &Url) -> Result<Exchange, ProbeError> {
        let mut timeline = RequestTimeline::default();
        let secure = match url.scheme() {
            "http" => false,
            "https" => true,
            other => {
                return Err(ProbeError::Request {
                    detail: format!("unsupported protocol scheme \"{}\"", other),
                });
            }
        };
        let port = url
            .port_or_known_default()
            .unwrap_or(if secure { 443 } else { 80 });
        let ip = match url.host() {
            Some(Host::Ipv4(ip)) => IpAddr::V4(ip),
            Some(Host::Ipv6(ip)) => IpAddr::V6(ip),
            Some(Host::Domain(name)) => self.resolve(name, &mut timeline).await?,
            None => {
                return Err(ProbeError::Address {
                    detail: format!("missing host in '{}'", url),
                });
            }
        };

        timeline.record(TimelineEvent::ConnectStart);
        let stream = TcpStream::connect(SocketAddr::new(ip, port))
            .await
            .map_err(|err| classify(&err))?;
        timeline.record(TimelineEvent::ConnectDone);

        if secure {
            let domain = url.host_str().unwrap_or_default().trim_matches(['[', ']']);
            let stream = self
                .tls
                .connect(domain, stream)
                .await
                .map_err(|err| classify(&err))?;
            send(TokioIo::new(stream), url, timeline).await
        } else {
            send(TokioIo::new(stream), url, timeline).await
        }
    }

    async fn resolve(
        &self,
        name: &str,
        timeline: &mut RequestTimeline,
    ) -> Result<IpAddr, ProbeError> {
        timeline.record(TimelineEvent::ResolutionStart);
        let lookup = self
            .resolver
            .lookup_ip(name)
            .await
            .map_err(|err| classify(&err))?;
        timeline.record(TimelineEvent::ResolutionDone);
        lookup.iter().next().ok_or_else(|| ProbeError::DnsLookup {
            detail: format!("no addresses found for {}", name),
        })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn display_name(&self) -> &'static str {
        "http"
    }

    async fn probe(&self, target: &str) -> Outcome {
        let address = with_default_scheme(target);
        let started = Instant::now();
        let result = self.fetch_within_deadline(&address).await;
        let elapsed = started.elapsed();

        match result {
            Ok(exchange) => Outcome::responded(
                address,
                elapsed,
                exchange.status.as_u16(),
                &status_label(exchange.status),
            )
            .with_size(exchange.size)
            .with_phases(exchange.phases),
            Err(err) => Outcome::failed(address, elapsed, err),
        }
    }
}

async fn send<S>(
    io: TokioIo<S>,
    url: &Url,
    mut timeline: RequestTimeline,
) -> Result<Exchange, ProbeError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, connection) = http1::handshake::<_, String>(io)
        .await
        .map_err(|err| classify(&err))?;
    let _driver = ConnectionDriver(tokio::spawn(async move {
        if let Err(err) = connection.await {
            tracing::debug!("Connection closed with error: {}", err);
        }
    }));
    timeline.record(TimelineEvent::ConnectionReady);

    let request = Request::builder()
        .method(Method::GET)
        .uri(&url[Position::BeforePath..Position::AfterQuery])
        .header(HOST, authority(url))
        .header(USER_AGENT, DEFAULT_USER_AGENT)
        .header(ACCEPT, "*/*")
        .header(CONNECTION, "close")
        .body(String::new())
        .map_err(|err| classify(&err))?;

    let response = sender
        .send_request(request)
        .await
        .map_err(|err| classify(&err))?;
    timeline.record(TimelineEvent::FirstByte);

    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let size = drain_body(response.into_body())
        .await
        .map_err(|err| classify(&err))?;
    timeline.record(TimelineEvent::LastByte);

    Ok(Exchange {
        status,
        location,
        size,
        phases: timeline.breakdown(),
    })
}

/// Reads the body to the end, returning the number of payload bytes.
async fn drain_body(body: Incoming) -> Result<u64, hyper::Error> {
    let mut body = std::pin::pin!(body);
    let mut total: u64 = 0;
    while let Some(frame) = std::future::poll_fn(|cx| body.as_mut().poll_frame(cx)).await {
        if let Some(data) = frame?.data_ref() {
            total = total.saturating_add(u64::try_from(data.len()).unwrap_or(u64::MAX));
        }
    }
    Ok(total)
}

fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    url.port()
        .map_or_else(|| host.to_owned(), |port| format!("{}:{}", host, port))
}

/// Reason phrase of the status, or the bare code for unregistered statuses.
pub(super) fn status_label(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_owned(), str::to_owned)
}
