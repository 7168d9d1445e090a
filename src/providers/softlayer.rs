//! IBM SoftLayer detection against the resource metadata API.
//!
//! The API host is public but only answers metadata requests for the
//! instance they originate from, identified by source address.

use crate::error::ProbeError;
use crate::transport::Transport;

/// SoftLayer metadata API address.
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.service.softlayer.com";

/// Instance user metadata endpoint.
const USER_METADATA_PATH: &str = "/rest/v3/SoftLayer_Resource_Metadata/UserMetadata.txt";

/// Matches when the user metadata endpoint answers 200 with a non-empty
/// body; non-instances get an error status. Evidence is the byte count,
/// the metadata itself is not recorded.
pub(crate) async fn probe(
    transport: &Transport,
    base_url: &str,
) -> Result<Option<String>, ProbeError> {
    let url = format!("{}{}", base_url, USER_METADATA_PATH);
    let response = transport.http().get(&url).send().await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let body = response.bytes().await?;
    Ok((!body.is_empty()).then(|| format!("{} bytes of user metadata", body.len())))
}
