//! Identify which cloud platform the current host runs on.
//!
//! Cluster bootstrapping tools need to select a matching cloud-provider
//! integration (load balancer, node, and routing controllers) without
//! operator input. This crate answers the one question they ask: *where am
//! I running?* — using only signals available from inside the instance:
//! metadata-service responses, reverse DNS, and provider-reserved
//! addresses.
//!
//! All techniques run concurrently against a shared deadline; an endpoint
//! that does not exist on the current host fails fast rather than hanging,
//! and a deterministic precedence rule reduces the results to a single
//! answer.
//!
//! # Supported Providers
//!
//! | Id | Name | Technique |
//! |----|------|-----------|
//! | aws | Amazon Web Services | Instance identity document (IMDSv2) |
//! | azure | Microsoft Azure | IMDS compute document |
//! | digitalocean | DigitalOcean | Droplet metadata document |
//! | gce | Google Compute Engine | Metadata server flavor header |
//! | linode | Linode | Reverse domain name (PTR record) |
//! | scaleway | Scaleway | Instance configuration document |
//! | softlayer | IBM SoftLayer (Bluemix) | Instance user metadata |
//! | vultr | Vultr | Instance metadata document |
//!
//! # Example
//!
//! ```ignore
//! use cloud_detect::{Detector, ProviderId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let detector = Detector::new().expect("failed to build detector");
//!     let outcome = detector.detect().await;
//!     match outcome.provider() {
//!         ProviderId::Unknown => eprintln!("not running on a known cloud"),
//!         provider => println!("running on {}", provider),
//!     }
//! }
//! ```
//!
//! Or, when only the canonical id string is needed:
//!
//! ```ignore
//! let id = cloud_detect::detect_cloud_provider().await;
//! println!("{}", id); // "aws", "gce", ..., or "unknown"
//! ```

mod detector;
mod error;
mod probe;
mod provider;
mod providers;
mod transport;

pub use detector::{
    detect_cloud_provider, DetectionOutcome, Detector, DetectorBuilder, DETECTION_TIMEOUT,
};
pub use error::ProbeError;
pub use probe::{Probe, ProbeResult};
pub use provider::ProviderId;
pub use transport::{ReverseDns, SystemDns, Transport, CONNECT_TIMEOUT, REQUEST_TIMEOUT};
