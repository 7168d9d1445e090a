//! Detection orchestration: concurrent fan-out over all probes, then a
//! deterministic precedence decision.

use std::time::Duration;

use futures::future::join_all;
use tokio::time;
use tracing::{debug, warn};

use crate::probe::{Probe, ProbeResult};
use crate::provider::ProviderId;
use crate::transport::Transport;

/// Default overall deadline for one detection pass.
pub const DETECTION_TIMEOUT: Duration = Duration::from_secs(3);

/// Final decision of a detection pass, plus the per-probe results behind
/// it. The results are diagnostics only; nothing is persisted or reused.
#[derive(Debug)]
pub struct DetectionOutcome {
    provider: ProviderId,
    results: Vec<ProbeResult>,
}

impl DetectionOutcome {
    /// The single identified provider, [`ProviderId::Unknown`] when none.
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// All probe results in precedence order, one per configured probe.
    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    /// True when every probe failed outright, as under a total network
    /// outage. A host that plainly matches no provider reports `false`:
    /// its probes completed, they just found nothing.
    pub fn all_errored(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|result| result.error().is_some())
    }
}

/// Runs the configured probes concurrently and reduces their results to a
/// single provider.
///
/// A detector is constructed once and may be invoked any number of times;
/// invocations share nothing but the transport's connection pool.
///
/// # Example
///
/// ```ignore
/// use cloud_detect::Detector;
///
/// #[tokio::main]
/// async fn main() {
///     let detector = Detector::new().expect("failed to build detector");
///     let outcome = detector.detect().await;
///     println!("{}", outcome.provider());
/// }
/// ```
#[derive(Debug)]
pub struct Detector {
    transport: Transport,
    probes: Vec<Probe>,
    timeout: Duration,
}

impl Detector {
    /// Detector over the full provider set with default timeouts.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::builder().build()
    }

    /// Start configuring a detector.
    pub fn builder() -> DetectorBuilder {
        DetectorBuilder::default()
    }

    /// Run every probe concurrently, wait for all of them, and apply the
    /// precedence rule.
    ///
    /// Never fails and never short-circuits on the first match: a
    /// misconfigured network could yield a spurious early positive, so the
    /// decision is made over the full result set. Probes still in flight
    /// at the deadline are cut off and report a timeout diagnostic.
    pub async fn detect(&self) -> DetectionOutcome {
        let transport = &self.transport;
        let deadline = self.timeout;
        let runs = self.probes.iter().map(|probe| async move {
            match time::timeout(deadline, probe.run(transport)).await {
                Ok(result) => result,
                Err(_) => ProbeResult::timed_out(probe.provider(), deadline),
            }
        });
        let mut results = join_all(runs).await;
        // Precedence order decides ties; completion order must not.
        results.sort_by_key(|result| result.provider());

        let mut matches = results.iter().filter(|result| result.matched());
        let provider = match matches.next() {
            Some(first) => {
                let losers: Vec<ProviderId> = matches.map(|result| result.provider()).collect();
                if !losers.is_empty() {
                    warn!(
                        winner = %first.provider(),
                        ?losers,
                        "multiple probes matched, keeping highest precedence"
                    );
                }
                first.provider()
            }
            None => ProviderId::Unknown,
        };
        debug!(%provider, probes = results.len(), "detection finished");

        DetectionOutcome { provider, results }
    }
}

/// Builder for [`Detector`].
#[derive(Debug)]
pub struct DetectorBuilder {
    timeout: Duration,
    providers: Vec<ProviderId>,
    overrides: Vec<Probe>,
    transport: Option<Transport>,
}

impl Default for DetectorBuilder {
    fn default() -> Self {
        Self {
            timeout: DETECTION_TIMEOUT,
            providers: ProviderId::ALL.to_vec(),
            overrides: Vec::new(),
            transport: None,
        }
    }
}

impl DetectorBuilder {
    /// Overall deadline for one detection pass.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Restrict detection to the given providers.
    pub fn providers(mut self, providers: impl IntoIterator<Item = ProviderId>) -> Self {
        self.providers = providers.into_iter().collect();
        self
    }

    /// Replace the default probe for its provider. Tests point probes at
    /// mock endpoints this way.
    pub fn probe(mut self, probe: Probe) -> Self {
        self.overrides.push(probe);
        self
    }

    /// Use a preconfigured transport instead of building the default one.
    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the detector.
    ///
    /// # Errors
    ///
    /// Fails only if the default HTTP client cannot be constructed.
    pub fn build(self) -> Result<Detector, reqwest::Error> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Transport::with_default_timeout()?,
        };
        let probes = self
            .providers
            .iter()
            .filter_map(|&provider| {
                self.overrides
                    .iter()
                    .find(|probe| probe.provider() == provider)
                    .cloned()
                    .or_else(|| Probe::for_provider(provider))
            })
            .collect();
        Ok(Detector {
            transport,
            probes,
            timeout: self.timeout,
        })
    }
}

/// Detect the current cloud provider and return its canonical id.
///
/// Convenience wrapper over a default [`Detector`]. Returns `"unknown"`
/// when no provider is identified or the detector cannot be built.
pub async fn detect_cloud_provider() -> String {
    match Detector::new() {
        Ok(detector) => detector.detect().await.provider().to_string(),
        Err(error) => {
            warn!(%error, "failed to build detector");
            ProviderId::Unknown.to_string()
        }
    }
}
