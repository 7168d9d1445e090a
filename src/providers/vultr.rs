//! Vultr detection against the instance metadata service.

use serde::Deserialize;

use crate::error::ProbeError;
use crate::transport::Transport;

/// Instance metadata document endpoint.
const METADATA_PATH: &str = "/v1.json";

#[derive(Deserialize)]
struct InstanceDocument {
    instanceid: Option<String>,
}

/// Matches when the metadata document carries a populated `instanceid`
/// field. Evidence is the instance id.
pub(crate) async fn probe(
    transport: &Transport,
    base_url: &str,
) -> Result<Option<String>, ProbeError> {
    let url = format!("{}{}", base_url, METADATA_PATH);
    let response = transport.http().get(&url).send().await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let body = response.bytes().await?;
    let document: InstanceDocument = match serde_json::from_slice(&body) {
        Ok(document) => document,
        Err(_) => return Ok(None),
    };
    Ok(document.instanceid.filter(|id| !id.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(METADATA_PATH, "/v1.json");
    }

    #[test]
    fn test_instance_document_parsing() {
        let document: InstanceDocument =
            serde_json::from_str(r#"{"instanceid": "54230901", "hostname": "vultr-01"}"#).unwrap();
        assert_eq!(document.instanceid.as_deref(), Some("54230901"));
    }
}
