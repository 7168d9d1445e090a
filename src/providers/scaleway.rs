//! Scaleway detection against the instance configuration service.

use serde::Deserialize;

use crate::error::ProbeError;
use crate::transport::Transport;

/// Scaleway metadata service address (provider-reserved, not link-local).
pub(crate) const DEFAULT_BASE_URL: &str = "http://169.254.42.42";

/// Instance configuration endpoint.
const CONF_PATH: &str = "/conf";

#[derive(Deserialize)]
struct ConfDocument {
    commercial_type: Option<String>,
}

/// Matches when the configuration document carries a populated
/// `commercial_type` field. Evidence is the commercial type.
pub(crate) async fn probe(
    transport: &Transport,
    base_url: &str,
) -> Result<Option<String>, ProbeError> {
    let url = format!("{}{}", base_url, CONF_PATH);
    let response = transport
        .http()
        .get(&url)
        .query(&[("format", "json")])
        .send()
        .await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let body = response.bytes().await?;
    let document: ConfDocument = match serde_json::from_slice(&body) {
        Ok(document) => document,
        Err(_) => return Ok(None),
    };
    Ok(document.commercial_type.filter(|t| !t.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(DEFAULT_BASE_URL, "http://169.254.42.42");
        assert_eq!(CONF_PATH, "/conf");
    }

    #[test]
    fn test_conf_document_parsing() {
        let document: ConfDocument =
            serde_json::from_str(r#"{"commercial_type": "DEV1-S", "hostname": "scw-01"}"#).unwrap();
        assert_eq!(document.commercial_type.as_deref(), Some("DEV1-S"));
    }
}
