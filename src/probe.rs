//! Probe variants and per-run results.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::ProbeError;
use crate::provider::ProviderId;
use crate::providers::{
    aws, azure, digitalocean, gce, linode, scaleway, softlayer, vultr, LINK_LOCAL_BASE_URL,
};
use crate::transport::Transport;

/// Outcome of one probe run.
#[derive(Debug)]
pub struct ProbeResult {
    provider: ProviderId,
    matched: bool,
    evidence: Option<String>,
    elapsed: Duration,
    error: Option<ProbeError>,
}

impl ProbeResult {
    /// The provider this probe tests for.
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Whether the technique produced the provider-specific signature.
    pub fn matched(&self) -> bool {
        self.matched
    }

    /// Raw evidence behind a match (header value, PTR name, instance id).
    pub fn evidence(&self) -> Option<&str> {
        self.evidence.as_deref()
    }

    /// Wall-clock time the probe spent.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Failure recorded while running the technique, if any.
    pub fn error(&self) -> Option<&ProbeError> {
        self.error.as_ref()
    }

    pub(crate) fn timed_out(provider: ProviderId, elapsed: Duration) -> Self {
        Self {
            provider,
            matched: false,
            evidence: None,
            elapsed,
            error: Some(ProbeError::DeadlineExceeded),
        }
    }
}

/// One provider-specific detection technique.
///
/// Probes are stateless beyond configuration and safe to run concurrently
/// and repeatedly. The set of variants is closed: the providers this crate
/// knows about are fixed and small.
#[derive(Debug, Clone)]
pub enum Probe {
    /// EC2 instance identity document over IMDSv2.
    Aws { base_url: String },
    /// Azure IMDS compute document.
    Azure { base_url: String },
    /// Droplet metadata document.
    DigitalOcean { base_url: String },
    /// Metadata server flavor header.
    Gce { base_url: String },
    /// Reverse DNS name of the host address.
    Linode { host_ip: Option<IpAddr> },
    /// Instance configuration document.
    Scaleway { base_url: String },
    /// Resource metadata API keyed on the caller's address.
    Softlayer { base_url: String },
    /// Instance metadata document.
    Vultr { base_url: String },
}

impl Probe {
    /// Default AWS probe against the link-local metadata address.
    pub fn aws() -> Self {
        Probe::Aws {
            base_url: LINK_LOCAL_BASE_URL.to_string(),
        }
    }

    /// Default Azure probe against the link-local metadata address.
    pub fn azure() -> Self {
        Probe::Azure {
            base_url: LINK_LOCAL_BASE_URL.to_string(),
        }
    }

    /// Default DigitalOcean probe against the link-local metadata address.
    pub fn digitalocean() -> Self {
        Probe::DigitalOcean {
            base_url: LINK_LOCAL_BASE_URL.to_string(),
        }
    }

    /// Default GCE probe against the link-local metadata address.
    pub fn gce() -> Self {
        Probe::Gce {
            base_url: LINK_LOCAL_BASE_URL.to_string(),
        }
    }

    /// Default Linode probe; the host address is discovered at run time.
    pub fn linode() -> Self {
        Probe::Linode { host_ip: None }
    }

    /// Default Scaleway probe against the provider-reserved address.
    pub fn scaleway() -> Self {
        Probe::Scaleway {
            base_url: scaleway::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Default SoftLayer probe against the resource metadata API.
    pub fn softlayer() -> Self {
        Probe::Softlayer {
            base_url: softlayer::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Default Vultr probe against the link-local metadata address.
    pub fn vultr() -> Self {
        Probe::Vultr {
            base_url: LINK_LOCAL_BASE_URL.to_string(),
        }
    }

    /// Default probe for `provider`, or `None` for [`ProviderId::Unknown`].
    pub fn for_provider(provider: ProviderId) -> Option<Self> {
        match provider {
            ProviderId::Aws => Some(Self::aws()),
            ProviderId::Azure => Some(Self::azure()),
            ProviderId::DigitalOcean => Some(Self::digitalocean()),
            ProviderId::Gce => Some(Self::gce()),
            ProviderId::Linode => Some(Self::linode()),
            ProviderId::Scaleway => Some(Self::scaleway()),
            ProviderId::Softlayer => Some(Self::softlayer()),
            ProviderId::Vultr => Some(Self::vultr()),
            ProviderId::Unknown => None,
        }
    }

    /// Point an HTTP probe at a different metadata endpoint (for testing
    /// with mock servers). No-op for the reverse DNS probe.
    pub fn with_base_url(mut self, url: &str) -> Self {
        let url = url.trim_end_matches('/').to_string();
        match &mut self {
            Probe::Aws { base_url }
            | Probe::Azure { base_url }
            | Probe::DigitalOcean { base_url }
            | Probe::Gce { base_url }
            | Probe::Scaleway { base_url }
            | Probe::Softlayer { base_url }
            | Probe::Vultr { base_url } => *base_url = url,
            Probe::Linode { .. } => {}
        }
        self
    }

    /// Pin the address the reverse DNS probe resolves (for testing).
    /// No-op for HTTP probes.
    pub fn with_host_ip(mut self, ip: IpAddr) -> Self {
        if let Probe::Linode { host_ip } = &mut self {
            *host_ip = Some(ip);
        }
        self
    }

    /// The provider this probe tests for.
    pub fn provider(&self) -> ProviderId {
        match self {
            Probe::Aws { .. } => ProviderId::Aws,
            Probe::Azure { .. } => ProviderId::Azure,
            Probe::DigitalOcean { .. } => ProviderId::DigitalOcean,
            Probe::Gce { .. } => ProviderId::Gce,
            Probe::Linode { .. } => ProviderId::Linode,
            Probe::Scaleway { .. } => ProviderId::Scaleway,
            Probe::Softlayer { .. } => ProviderId::Softlayer,
            Probe::Vultr { .. } => ProviderId::Vultr,
        }
    }

    /// Run the technique once. Never fails: endpoint absence, malformed
    /// responses, and transport errors all come back as an unmatched
    /// result, with the error retained for diagnostics.
    pub async fn run(&self, transport: &Transport) -> ProbeResult {
        let started = Instant::now();
        let outcome = match self {
            Probe::Aws { base_url } => aws::probe(transport, base_url).await,
            Probe::Azure { base_url } => azure::probe(transport, base_url).await,
            Probe::DigitalOcean { base_url } => digitalocean::probe(transport, base_url).await,
            Probe::Gce { base_url } => gce::probe(transport, base_url).await,
            Probe::Linode { host_ip } => linode::probe(transport, *host_ip).await,
            Probe::Scaleway { base_url } => scaleway::probe(transport, base_url).await,
            Probe::Softlayer { base_url } => softlayer::probe(transport, base_url).await,
            Probe::Vultr { base_url } => vultr::probe(transport, base_url).await,
        };
        let elapsed = started.elapsed();
        let provider = self.provider();

        match outcome {
            Ok(Some(evidence)) => {
                debug!(%provider, %evidence, "probe matched");
                ProbeResult {
                    provider,
                    matched: true,
                    evidence: Some(evidence),
                    elapsed,
                    error: None,
                }
            }
            Ok(None) => {
                debug!(%provider, "probe did not match");
                ProbeResult {
                    provider,
                    matched: false,
                    evidence: None,
                    elapsed,
                    error: None,
                }
            }
            Err(error) => {
                debug!(%provider, %error, "probe failed");
                ProbeResult {
                    provider,
                    matched: false,
                    evidence: None,
                    elapsed,
                    error: Some(error),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_probes_cover_all_providers() {
        for provider in ProviderId::ALL {
            let probe = Probe::for_provider(provider).unwrap();
            assert_eq!(probe.provider(), provider);
        }
        assert!(Probe::for_provider(ProviderId::Unknown).is_none());
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let probe = Probe::aws().with_base_url("http://localhost:8080/");
        match probe {
            Probe::Aws { base_url } => assert_eq!(base_url, "http://localhost:8080"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_with_base_url_ignored_for_linode() {
        let probe = Probe::linode().with_base_url("http://localhost:8080");
        assert!(matches!(probe, Probe::Linode { host_ip: None }));
    }

    #[test]
    fn test_with_host_ip_pins_linode() {
        let ip: IpAddr = "203.0.113.7".parse().unwrap();
        let probe = Probe::linode().with_host_ip(ip);
        assert!(matches!(probe, Probe::Linode { host_ip: Some(pinned) } if pinned == ip));
    }
}
