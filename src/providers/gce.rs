//! Google Compute Engine detection against the metadata server.

use crate::error::ProbeError;
use crate::transport::Transport;

/// Metadata server root.
const METADATA_PATH: &str = "/computeMetadata/v1/";

/// Required header for GCE metadata requests.
const METADATA_FLAVOR_HEADER: &str = "Metadata-Flavor";

/// Required header value, echoed by the real metadata server.
const METADATA_FLAVOR_VALUE: &str = "Google";

/// Matches when the metadata root answers 200 *and* the response carries
/// `Metadata-Flavor: Google`. A generic service answering on the same
/// address will not echo the header. Evidence is the header value.
pub(crate) async fn probe(
    transport: &Transport,
    base_url: &str,
) -> Result<Option<String>, ProbeError> {
    let url = format!("{}{}", base_url, METADATA_PATH);
    let response = transport
        .http()
        .get(&url)
        .header(METADATA_FLAVOR_HEADER, METADATA_FLAVOR_VALUE)
        .send()
        .await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let flavor = response
        .headers()
        .get(METADATA_FLAVOR_HEADER)
        .and_then(|value| value.to_str().ok());
    Ok((flavor == Some(METADATA_FLAVOR_VALUE)).then(|| METADATA_FLAVOR_VALUE.to_string()))
}
