use anyhow::anyhow;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};

/// Maximum clock skew accepted between the webhook timestamp header and
/// the server clock, in either direction.
const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

const SECRET_PREFIX: &str = "whsec_";

/// Verifier for the identity provider's webhook signatures.
///
/// The provider signs `"{id}.{timestamp}.{body}"` with HMAC-SHA256 and
/// sends one or more `v1,<base64>` entries space-separated in the
/// signature header. The signing secret is the base64 payload after the
/// `whsec_` prefix.
pub struct WebhookVerifier {
    key: Vec<u8>,
}

impl WebhookVerifier {
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = BASE64
            .decode(encoded)
            .map_err(|e| anyhow!("Webhook secret is not valid base64: {e}"))?;

        if key.is_empty() {
            return Err(anyhow!("Webhook secret must not be empty"));
        }

        Ok(WebhookVerifier { key })
    }

    pub fn sign(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> String {
        let mut signed_content =
            Vec::with_capacity(msg_id.len() + 24 + payload.len());
        signed_content.extend_from_slice(msg_id.as_bytes());
        signed_content.push(b'.');
        signed_content.extend_from_slice(timestamp.to_string().as_bytes());
        signed_content.push(b'.');
        signed_content.extend_from_slice(payload);

        let mac = hmac_sha256::HMAC::mac(&signed_content, &self.key);
        format!("v1,{}", BASE64.encode(mac))
    }

    pub fn verify(
        &self,
        msg_id: &str,
        timestamp_header: &str,
        signature_header: &str,
        payload: &[u8],
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let timestamp: i64 = timestamp_header
            .trim()
            .parse()
            .map_err(|_| anyhow!("Webhook timestamp is not a unix timestamp"))?;

        let skew = (now.timestamp() - timestamp).abs();
        if skew > TIMESTAMP_TOLERANCE_SECS {
            return Err(anyhow!("Webhook timestamp outside tolerance ({skew}s)"));
        }

        let expected = self.sign(msg_id, timestamp, payload);
        let expected_sig = expected
            .split_once(',')
            .map(|(_, sig)| sig)
            .unwrap_or(&expected);

        for candidate in signature_header.split_ascii_whitespace() {
            // Only v1 (HMAC) entries participate; unknown versions are skipped.
            let Some(("v1", candidate_sig)) = candidate.split_once(',') else {
                continue;
            };

            if constant_time_eq::constant_time_eq(
                candidate_sig.as_bytes(),
                expected_sig.as_bytes(),
            ) {
                return Ok(());
            }
        }

        Err(anyhow!("No webhook signature matched"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(TEST_SECRET).unwrap()
    }

    #[test]
    fn accepts_a_signature_it_produced() {
        let v = verifier();
        let now = Utc::now();
        let payload = br#"{"type":"user.created","data":{"id":"idn_1"}}"#;

        let signature = v.sign("msg_1", now.timestamp(), payload);

        v.verify("msg_1", &now.timestamp().to_string(), &signature, payload, now)
            .unwrap();
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let v = verifier();
        let now = Utc::now();
        let signature = v.sign("msg_1", now.timestamp(), b"original");

        assert!(
            v.verify("msg_1", &now.timestamp().to_string(), &signature, b"tampered", now)
                .is_err()
        );
    }

    #[test]
    fn rejects_a_stale_timestamp() {
        let v = verifier();
        let now = Utc::now();
        let stale = now.timestamp() - TIMESTAMP_TOLERANCE_SECS - 1;
        let signature = v.sign("msg_1", stale, b"payload");

        assert!(
            v.verify("msg_1", &stale.to_string(), &signature, b"payload", now)
                .is_err()
        );
    }

    #[test]
    fn accepts_any_matching_entry_in_a_signature_list() {
        let v = verifier();
        let now = Utc::now();
        let payload = b"payload";
        let good = v.sign("msg_1", now.timestamp(), payload);
        let header = format!("v1,bm90LXRoZS1zaWduYXR1cmU= {good}");

        v.verify("msg_1", &now.timestamp().to_string(), &header, payload, now)
            .unwrap();
    }

    #[test]
    fn rejects_a_malformed_secret() {
        assert!(WebhookVerifier::new("whsec_%%%not-base64%%%").is_err());
    }
}
