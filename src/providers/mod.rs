//! Per-provider detection techniques.

pub(crate) mod aws;
pub(crate) mod azure;
pub(crate) mod digitalocean;
pub(crate) mod gce;
pub(crate) mod linode;
pub(crate) mod scaleway;
pub(crate) mod softlayer;
pub(crate) mod vultr;

/// Link-local metadata service address shared by most providers.
pub(crate) const LINK_LOCAL_BASE_URL: &str = "http://169.254.169.254";
