//! DigitalOcean detection against the droplet metadata service.

use serde::Deserialize;

use crate::error::ProbeError;
use crate::transport::Transport;

/// Droplet metadata document endpoint.
const METADATA_PATH: &str = "/metadata/v1.json";

#[derive(Deserialize)]
struct DropletDocument {
    droplet_id: Option<u64>,
}

/// Matches when the metadata document carries a `droplet_id` field.
/// Evidence is the droplet id.
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
    let document: DropletDocument = match serde_json::from_slice(&body) {
        Ok(document) => document,
        Err(_) => return Ok(None),
    };
    Ok(document.droplet_id.map(|id| id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(METADATA_PATH, "/metadata/v1.json");
    }

    #[test]
    fn test_droplet_document_parsing() {
        let document: DropletDocument =
            serde_json::from_str(r#"{"droplet_id": 2756294, "hostname": "db-01"}"#).unwrap();
        assert_eq!(document.droplet_id, Some(2756294));

        // A generic JSON response has no droplet_id and must not match.
        let document: DropletDocument = serde_json::from_str(r#"{"hello": 1}"#).unwrap();
        assert!(document.droplet_id.is_none());
    }
}
