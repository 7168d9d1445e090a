//! AWS detection against the EC2 instance metadata service (IMDSv2).

use serde::Deserialize;

use crate::error::ProbeError;
use crate::transport::Transport;

/// IMDSv2 session token endpoint.
const TOKEN_PATH: &str = "/latest/api/token";

/// Instance identity document endpoint.
const IDENTITY_DOCUMENT_PATH: &str = "/latest/dynamic/instance-identity/document";

/// Token TTL header sent on the token request.
const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";

/// Session token header sent on metadata requests.
const TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityDocument {
    instance_id: Option<String>,
}

/// Matches when the identity document endpoint serves a JSON document with
/// a populated `instanceId` field. Evidence is the instance id.
pub(crate) async fn probe(
    transport: &Transport,
    base_url: &str,
) -> Result<Option<String>, ProbeError> {
    let url = format!("{}{}", base_url, TOKEN_PATH);
    let response = transport
        .http()
        .put(&url)
        .header(TOKEN_TTL_HEADER, "60")
        .send()
        .await?;
    if !response.status().is_success() {
        return Ok(None);
    }
    let token = response.text().await?;

    let url = format!("{}{}", base_url, IDENTITY_DOCUMENT_PATH);
    let response = transport
        .http()
        .get(&url)
        .header(TOKEN_HEADER, &token)
        .send()
        .await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let body = response.bytes().await?;
    // Reachable but not serving an identity document: not this provider.
    let document: IdentityDocument = match serde_json::from_slice(&body) {
        Ok(document) => document,
        Err(_) => return Ok(None),
    };
    Ok(document.instance_id.filter(|id| !id.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(TOKEN_PATH, "/latest/api/token");
        assert_eq!(
            IDENTITY_DOCUMENT_PATH,
            "/latest/dynamic/instance-identity/document"
        );
    }

    #[test]
    fn test_identity_document_parsing() {
        let document: IdentityDocument =
            serde_json::from_str(r#"{"instanceId": "i-0abc", "region": "us-east-1"}"#).unwrap();
        assert_eq!(document.instance_id.as_deref(), Some("i-0abc"));

        let document: IdentityDocument = serde_json::from_str("{}").unwrap();
        assert!(document.instance_id.is_none());
    }
}
