//! Cloud provider enumeration.

use std::fmt;
use std::str::FromStr;

/// Cloud platforms this crate can identify.
///
/// Variant order is the fixed precedence order: when more than one probe
/// reports a match, the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderId {
    /// Amazon Web Services
    Aws,
    /// Microsoft Azure
    Azure,
    /// DigitalOcean
    DigitalOcean,
    /// Google Compute Engine
    Gce,
    /// Linode
    Linode,
    /// Scaleway
    Scaleway,
    /// IBM SoftLayer (Bluemix)
    Softlayer,
    /// Vultr
    Vultr,
    /// No provider identified.
    Unknown,
}

impl ProviderId {
    /// Every detectable provider, in precedence order.
    pub const ALL: [ProviderId; 8] = [
        ProviderId::Aws,
        ProviderId::Azure,
        ProviderId::DigitalOcean,
        ProviderId::Gce,
        ProviderId::Linode,
        ProviderId::Scaleway,
        ProviderId::Softlayer,
        ProviderId::Vultr,
    ];

    /// Canonical lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Aws => "aws",
            ProviderId::Azure => "azure",
            ProviderId::DigitalOcean => "digitalocean",
            ProviderId::Gce => "gce",
            ProviderId::Linode => "linode",
            ProviderId::Scaleway => "scaleway",
            ProviderId::Softlayer => "softlayer",
            ProviderId::Vultr => "vultr",
            ProviderId::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(ProviderId::Aws),
            "azure" => Ok(ProviderId::Azure),
            "digitalocean" => Ok(ProviderId::DigitalOcean),
            "gce" => Ok(ProviderId::Gce),
            "linode" => Ok(ProviderId::Linode),
            "scaleway" => Ok(ProviderId::Scaleway),
            "softlayer" => Ok(ProviderId::Softlayer),
            "vultr" => Ok(ProviderId::Vultr),
            "unknown" => Ok(ProviderId::Unknown),
            _ => Err(format!("unknown provider: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_canonical_id() {
        assert_eq!(ProviderId::Aws.to_string(), "aws");
        assert_eq!(ProviderId::DigitalOcean.to_string(), "digitalocean");
        assert_eq!(ProviderId::Gce.to_string(), "gce");
        assert_eq!(ProviderId::Softlayer.to_string(), "softlayer");
        assert_eq!(ProviderId::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_from_str_round_trips() {
        for provider in ProviderId::ALL {
            assert_eq!(provider.as_str().parse::<ProviderId>(), Ok(provider));
        }
        assert_eq!("UNKNOWN".parse::<ProviderId>(), Ok(ProviderId::Unknown));
        assert!("ec2".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_precedence_follows_variant_order() {
        assert!(ProviderId::Aws < ProviderId::Azure);
        assert!(ProviderId::Azure < ProviderId::DigitalOcean);
        assert!(ProviderId::Vultr < ProviderId::Unknown);
        let mut sorted = ProviderId::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, ProviderId::ALL.to_vec());
    }

    #[test]
    fn test_all_excludes_unknown() {
        assert!(!ProviderId::ALL.contains(&ProviderId::Unknown));
    }
}
