//! Shared HTTP and DNS plumbing injected into probes.

use std::fmt;
use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use reqwest::Client;

use crate::error::ProbeError;

/// Maximum time to establish a connection to a metadata endpoint.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default maximum time for a whole metadata request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Reverse DNS lookups, substitutable for deterministic tests.
#[async_trait]
pub trait ReverseDns: fmt::Debug + Send + Sync {
    /// Resolve the PTR names for `ip`.
    ///
    /// An address without a PTR record resolves to an empty list rather
    /// than an error; only resolver-level failures are errors.
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, ProbeError>;
}

/// Resolver backed by the host's DNS configuration.
pub struct SystemDns {
    inner: TokioAsyncResolver,
}

impl SystemDns {
    /// Build a resolver from the system configuration, falling back to
    /// public defaults when none can be read.
    pub fn new() -> Self {
        let inner = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|_| {
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { inner }
    }
}

impl Default for SystemDns {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SystemDns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemDns").finish_non_exhaustive()
    }
}

#[async_trait]
impl ReverseDns for SystemDns {
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, ProbeError> {
        match self.inner.reverse_lookup(ip).await {
            Ok(lookup) => Ok(lookup.iter().map(|ptr| ptr.to_string()).collect()),
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => Ok(Vec::new()),
            Err(e) => Err(ProbeError::ReverseLookup(e.to_string())),
        }
    }
}

/// Shared client state handed to every probe.
///
/// Connections are capped at [`CONNECT_TIMEOUT`] and requests are never
/// retried: on a host that is not running on a given provider, the probe's
/// endpoint legitimately does not exist, and a retry would only add latency.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    dns: Arc<dyn ReverseDns>,
}

impl Transport {
    /// Create a transport with the given per-request timeout.
    pub fn new(request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            dns: Arc::new(SystemDns::new()),
        })
    }

    /// Create a transport with the default request timeout.
    pub fn with_default_timeout() -> Result<Self, reqwest::Error> {
        Self::new(REQUEST_TIMEOUT)
    }

    /// Replace the reverse DNS implementation (for testing).
    pub fn with_dns(mut self, dns: Arc<dyn ReverseDns>) -> Self {
        self.dns = dns;
        self
    }

    /// Get the underlying HTTP client.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Get the reverse DNS resolver.
    pub fn dns(&self) -> &dyn ReverseDns {
        &*self.dns
    }
}

/// Best-effort discovery of the address this host reaches the network with.
///
/// Connects a UDP socket toward a public resolver; no packet is sent, the
/// kernel only selects the outbound interface.
pub(crate) fn outbound_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind(SocketAddr::from(([0, 0, 0, 0], 0))).ok()?;
    socket.connect(("8.8.8.8", 53)).ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}
