//! Linode detection via the host's reverse DNS name.
//!
//! Linode assigns PTR records under `linode.com` (for example
//! `li927-143.members.linode.com`), so the hosting provider can be read
//! off the host's own address without a metadata endpoint.

use std::net::IpAddr;

use crate::error::ProbeError;
use crate::transport::{outbound_ip, Transport};

/// Domain suffix of Linode-assigned PTR names.
const PTR_SUFFIX: &str = ".linode.com";

fn is_linode_name(name: &str) -> bool {
    name.trim_end_matches('.').ends_with(PTR_SUFFIX)
}

/// Matches when the host's outbound address reverse-resolves to a name
/// under `linode.com`. Evidence is the PTR name. A missing PTR record is
/// the expected signal for "not Linode", not an error.
pub(crate) async fn probe(
    transport: &Transport,
    host_ip: Option<IpAddr>,
) -> Result<Option<String>, ProbeError> {
    let ip = match host_ip.or_else(outbound_ip) {
        Some(ip) => ip,
        None => return Err(ProbeError::NoLocalAddress),
    };
    let names = transport.dns().reverse_lookup(ip).await?;
    Ok(names.into_iter().find(|name| is_linode_name(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linode_names() {
        assert!(is_linode_name("li927-143.members.linode.com"));
        assert!(is_linode_name("host.linode.com"));
        // Resolvers return absolute names with a trailing dot.
        assert!(is_linode_name("li927-143.members.linode.com."));
    }

    #[test]
    fn test_foreign_names() {
        assert!(!is_linode_name("ec2-52-0-0-1.compute-1.amazonaws.com"));
        assert!(!is_linode_name("linode.com"));
        assert!(!is_linode_name("evil-linode.com.attacker.net"));
    }
}
