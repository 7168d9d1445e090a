//! Azure detection against the instance metadata service (IMDS).

use serde::Deserialize;

use crate::error::ProbeError;
use crate::transport::Transport;

/// IMDS compute document endpoint.
const COMPUTE_PATH: &str = "/metadata/instance/compute";

/// API version query parameter.
const API_VERSION: &str = "2021-02-01";

/// Required header for Azure metadata requests.
const METADATA_HEADER: &str = "Metadata";

/// Required header value for Azure metadata requests.
const METADATA_VALUE: &str = "true";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeDocument {
    vm_id: Option<String>,
}

/// Matches when the compute document carries a populated `vmId` field.
/// Evidence is the VM id.
pub(crate) async fn probe(
    transport: &Transport,
    base_url: &str,
) -> Result<Option<String>, ProbeError> {
    let url = format!("{}{}", base_url, COMPUTE_PATH);
    let response = transport
        .http()
        .get(&url)
        .query(&[("api-version", API_VERSION), ("format", "json")])
        .header(METADATA_HEADER, METADATA_VALUE)
        .send()
        .await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let body = response.bytes().await?;
    let document: ComputeDocument = match serde_json::from_slice(&body) {
        Ok(document) => document,
        Err(_) => return Ok(None),
    };
    Ok(document.vm_id.filter(|id| !id.is_empty()))
}
