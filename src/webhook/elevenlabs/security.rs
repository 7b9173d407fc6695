//! Signature verification for incoming ElevenLabs webhook requests
//!
//! Every post-call webhook carries an `elevenlabs-signature` header with the
//! format `t=<unix-seconds>,v0=<hex_signature>`. The platform signs the string
//! `<timestamp>.<raw body>` with HMAC-SHA256 using the shared webhook secret.
//!
//! To verify authenticity and freshness:
//! 1. Parse the timestamp and the `v0=` token from the header
//! 2. Reject the request if the timestamp is older than the replay window
//! 3. Compute `v0=` + hex(HMAC-SHA256(secret, timestamp + "." + body))
//! 4. Compare the computed token with the received one in constant time
//!
//! # Important Notes
//!
//! - The signature MUST be computed on the raw request body bytes, not parsed JSON
//! - Checks run in a fixed order and the first failure wins:
//!   missing → malformed → stale → mismatch
//! - Timestamps in the future are accepted, only the lower bound is enforced
//! - [`verify`] is pure: it performs no I/O and never logs, so callers decide
//!   how to report each [`VerificationResult`]

use crate::consts;
use chrono::{DateTime, TimeDelta, Utc};
use derive_more::{Display, Error};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::{fmt, str::FromStr};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const TIMESTAMP_PREFIX: &str = "t=";
const SIGNATURE_PREFIX: &str = "v0=";

/// 🔒 SENSITIVE: pre-shared secret used to sign webhooks.
///
/// Formatting never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(Vec<u8>);

#[derive(Debug, Display, Error)]
#[display("webhook secret must not be empty")]
pub struct EmptySecretError;

impl WebhookSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, EmptySecretError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(EmptySecretError);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for WebhookSecret {
    type Err = EmptySecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.as_bytes())
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(***)")
    }
}

impl fmt::Display for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Replay window: the maximum accepted age of a signed webhook.
///
/// Always a positive number of whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxSkew(TimeDelta);

#[derive(Debug, Display, Error)]
pub enum InvalidMaxSkewError {
    #[display("replay window must be a whole number of seconds")]
    NotANumber,
    #[display("replay window must be a positive number of seconds")]
    OutOfRange,
}

impl MaxSkew {
    pub fn from_secs(secs: i64) -> Result<Self, InvalidMaxSkewError> {
        if secs <= 0 {
            return Err(InvalidMaxSkewError::OutOfRange);
        }
        TimeDelta::try_seconds(secs)
            .map(Self)
            .ok_or(InvalidMaxSkewError::OutOfRange)
    }

    pub fn as_time_delta(&self) -> TimeDelta {
        self.0
    }
}

impl Default for MaxSkew {
    fn default() -> Self {
        Self(consts::DEFAULT_WEBHOOK_MAX_SKEW)
    }
}

impl FromStr for MaxSkew {
    type Err = InvalidMaxSkewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs = s
            .parse::<i64>()
            .map_err(|_| InvalidMaxSkewError::NotANumber)?;
        Self::from_secs(secs)
    }
}

/// Outcome of verifying a webhook request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum VerificationResult {
    #[display("authentic")]
    Authentic,
    #[display("missing_header")]
    MissingHeader,
    #[display("malformed_header")]
    MalformedHeader,
    #[display("stale")]
    Stale,
    #[display("signature_mismatch")]
    SignatureMismatch,
}

impl VerificationResult {
    pub fn is_authentic(self) -> bool {
        self == VerificationResult::Authentic
    }
}

/// Parsed `t=<unix-seconds>,v0=<hex>` header.
///
/// Fields after the second one are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureHeader<'a> {
    /// Timestamp exactly as transmitted, this is the text that was signed
    timestamp_raw: &'a str,
    /// Signing time in unix seconds
    pub timestamp: i64,
    /// Full `v0=<hex>` token
    pub signature: &'a str,
}

impl<'a> SignatureHeader<'a> {
    /// Returns `None` when the header does not follow the expected format
    pub fn parse(header_value: &'a str) -> Option<Self> {
        let mut fields = header_value.split(',');
        let (Some(timestamp_field), Some(signature)) = (fields.next(), fields.next()) else {
            return None;
        };

        let timestamp_raw = timestamp_field.strip_prefix(TIMESTAMP_PREFIX)?;
        let timestamp = timestamp_raw.parse::<i64>().ok()?;

        if !signature.starts_with(SIGNATURE_PREFIX) {
            return None;
        }

        Some(Self {
            timestamp_raw,
            timestamp,
            signature,
        })
    }
}

/// Verifies the signature header against the raw request payload
///
/// # Arguments
///
/// * `raw_body` - The raw request body bytes, exactly as received
/// * `header_value` - The value of the `elevenlabs-signature` header, if any
/// * `secret` - The shared webhook secret
/// * `now` - Current time, used to enforce the replay window
/// * `max_skew` - Maximum accepted age of the signature timestamp
///
/// # Security
///
/// The final comparison uses [`subtle::ConstantTimeEq`], its running time does
/// not depend on the position of the first differing byte.
pub fn verify(
    raw_body: &[u8],
    header_value: Option<&str>,
    secret: &WebhookSecret,
    now: DateTime<Utc>,
    max_skew: TimeDelta,
) -> VerificationResult {
    let Some(header_value) = header_value else {
        return VerificationResult::MissingHeader;
    };

    let Some(header) = SignatureHeader::parse(header_value) else {
        return VerificationResult::MalformedHeader;
    };

    if now.timestamp().saturating_sub(header.timestamp) > max_skew.num_seconds() {
        return VerificationResult::Stale;
    }

    let Some(expected_signature) = compute_signature(secret, header.timestamp_raw, raw_body)
    else {
        return VerificationResult::SignatureMismatch;
    };

    let is_valid: bool = expected_signature
        .as_bytes()
        .ct_eq(header.signature.as_bytes())
        .into();

    if is_valid {
        VerificationResult::Authentic
    } else {
        VerificationResult::SignatureMismatch
    }
}

/// Computes the `v0=<hex>` token for a timestamp and payload
fn compute_signature(secret: &WebhookSecret, timestamp: &str, raw_body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(raw_body);

    Some(format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Builds a complete signature header the way the voice platform does.
///
/// Used to sign payloads when testing the webhook locally.
pub fn signature_header(secret: &WebhookSecret, timestamp: i64, raw_body: &[u8]) -> Option<String> {
    let signature = compute_signature(secret, &timestamp.to_string(), raw_body)?;
    Some(format!("{TIMESTAMP_PREFIX}{timestamp},{signature}"))
}

/// Verifies webhooks with a secret and a replay window fixed at construction
#[derive(Debug, Clone)]
pub struct WebhookAuthenticator {
    secret: WebhookSecret,
    max_skew: MaxSkew,
}

impl WebhookAuthenticator {
    pub fn new(secret: WebhookSecret, max_skew: MaxSkew) -> Self {
        Self { secret, max_skew }
    }

    pub fn verify(
        &self,
        raw_body: &[u8],
        header_value: Option<&str>,
        now: DateTime<Utc>,
    ) -> VerificationResult {
        verify(
            raw_body,
            header_value,
            &self.secret,
            now,
            self.max_skew.as_time_delta(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMESTAMP: i64 = 1_700_000_000;
    const BODY: &[u8] = b"{\"type\":\"post_call_transcription\",\"data\":{}}";

    fn secret() -> WebhookSecret {
        WebhookSecret::new("wsec_test_secret").unwrap()
    }

    fn at(timestamp: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(timestamp, 0).unwrap()
    }

    fn max_skew() -> TimeDelta {
        TimeDelta::seconds(1800)
    }

    #[test]
    fn test_verify_known_vector() {
        let secret = WebhookSecret::new("abc").unwrap();
        let header = "t=1700000000,v0=dbc67ae9960503f659ed1b92a98629f8bca5b204512928da601353adba5b1f2e";

        assert_eq!(
            verify(b"{}", Some(header), &secret, at(TIMESTAMP), max_skew()),
            VerificationResult::Authentic
        );
        assert_eq!(
            signature_header(&secret, TIMESTAMP, b"{}").as_deref(),
            Some(header)
        );
    }

    #[test]
    fn test_verify_signature_valid() {
        let header = signature_header(&secret(), TIMESTAMP, BODY).unwrap();

        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP + 5), max_skew()),
            VerificationResult::Authentic
        );
    }

    #[test]
    fn test_verify_signature_matches_independent_hmac() {
        let mut mac = HmacSha256::new_from_slice(secret().as_bytes()).unwrap();
        mac.update(format!("{TIMESTAMP}.").as_bytes());
        mac.update(BODY);
        let header = format!(
            "t={TIMESTAMP},v0={}",
            hex::encode(mac.finalize().into_bytes())
        );

        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::Authentic
        );
    }

    #[test]
    fn test_verify_missing_header() {
        assert_eq!(
            verify(BODY, None, &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::MissingHeader
        );
    }

    #[test]
    fn test_verify_malformed_headers() {
        let signature = signature_header(&secret(), TIMESTAMP, BODY).unwrap();
        let v0_token = signature.split(',').nth(1).unwrap().to_string();

        let cases = [
            String::new(),
            format!("t={TIMESTAMP}"),
            format!("t={TIMESTAMP},"),
            format!("t={TIMESTAMP},{}", v0_token.trim_start_matches("v0=")),
            format!("t={TIMESTAMP},sha256=abc"),
            format!("{TIMESTAMP},{v0_token}"),
            format!("t,{v0_token}"),
            format!("t=,{v0_token}"),
            format!("t=yesterday,{v0_token}"),
            format!("t=17000000.5,{v0_token}"),
            format!("x={TIMESTAMP},{v0_token}"),
        ];

        for header in cases {
            assert_eq!(
                verify(BODY, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
                VerificationResult::MalformedHeader,
                "header {header:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_verify_extra_fields_are_ignored() {
        let header = signature_header(&secret(), TIMESTAMP, BODY).unwrap();
        let header = format!("{header},v1=unused");

        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::Authentic
        );
    }

    #[test]
    fn test_verify_stale_timestamp() {
        let header = signature_header(&secret(), TIMESTAMP, BODY).unwrap();

        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP + 1801), max_skew()),
            VerificationResult::Stale
        );
    }

    #[test]
    fn test_verify_timestamp_at_window_edge_is_fresh() {
        let header = signature_header(&secret(), TIMESTAMP, BODY).unwrap();

        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP + 1800), max_skew()),
            VerificationResult::Authentic
        );
    }

    #[test]
    fn test_verify_future_timestamp_is_accepted() {
        let header = signature_header(&secret(), TIMESTAMP + 86_400, BODY).unwrap();

        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::Authentic
        );
    }

    #[test]
    fn test_verify_stale_is_checked_before_signature() {
        let header = format!("t={TIMESTAMP},v0=0000");

        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP + 3600), max_skew()),
            VerificationResult::Stale
        );
    }

    #[test]
    fn test_verify_extreme_timestamps_do_not_overflow() {
        let header = format!("t={},v0=00", i64::MIN);
        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::Stale
        );

        let header = format!("t={},v0=00", i64::MAX);
        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::SignatureMismatch
        );
    }

    #[test]
    fn test_verify_tampered_payload() {
        let header = signature_header(&secret(), TIMESTAMP, BODY).unwrap();

        for index in 0..BODY.len() {
            let mut tampered = BODY.to_vec();
            tampered[index] ^= 0x01;

            assert_eq!(
                verify(&tampered, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
                VerificationResult::SignatureMismatch
            );
        }
    }

    #[test]
    fn test_verify_tampered_timestamp() {
        let header = signature_header(&secret(), TIMESTAMP, BODY).unwrap();
        let header = header.replacen(&TIMESTAMP.to_string(), &(TIMESTAMP + 1).to_string(), 1);

        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::SignatureMismatch
        );
    }

    #[test]
    fn test_verify_wrong_secret() {
        let wrong_secret = WebhookSecret::new("wrong_secret").unwrap();
        let header = signature_header(&wrong_secret, TIMESTAMP, BODY).unwrap();

        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::SignatureMismatch
        );
    }

    #[test]
    fn test_verify_mismatch_regardless_of_differing_position() {
        let header = signature_header(&secret(), TIMESTAMP, BODY).unwrap();
        let (prefix, hex_signature) = header.split_once(",v0=").unwrap();

        let flip = |index: usize| {
            let mut chars: Vec<char> = hex_signature.chars().collect();
            chars[index] = if chars[index] == '0' { '1' } else { '0' };
            format!("{prefix},v0={}", chars.into_iter().collect::<String>())
        };

        for tampered in [flip(0), flip(hex_signature.len() / 2), flip(hex_signature.len() - 1)] {
            assert_eq!(
                verify(BODY, Some(&tampered), &secret(), at(TIMESTAMP), max_skew()),
                VerificationResult::SignatureMismatch
            );
        }
    }

    #[test]
    fn test_verify_uppercase_hex_does_not_match() {
        let header = signature_header(&secret(), TIMESTAMP, BODY).unwrap();
        let (prefix, hex_signature) = header.split_once(",v0=").unwrap();
        let header = format!("{prefix},v0={}", hex_signature.to_uppercase());

        assert_eq!(
            verify(BODY, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::SignatureMismatch
        );
    }

    #[test]
    fn test_verify_truncated_signature() {
        let header = signature_header(&secret(), TIMESTAMP, BODY).unwrap();
        let truncated = &header[..header.len() - 2];

        assert_eq!(
            verify(BODY, Some(truncated), &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::SignatureMismatch
        );
    }

    #[test]
    fn test_verify_non_utf8_body() {
        let body = [0xff, 0xfe, 0x00, 0x7b];
        let header = signature_header(&secret(), TIMESTAMP, &body).unwrap();

        assert_eq!(
            verify(&body, Some(&header), &secret(), at(TIMESTAMP), max_skew()),
            VerificationResult::Authentic
        );
    }

    #[test]
    fn test_authenticator_uses_configured_window() {
        let authenticator =
            WebhookAuthenticator::new(secret(), MaxSkew::from_secs(60).unwrap());
        let header = signature_header(&secret(), TIMESTAMP, BODY).unwrap();

        assert!(authenticator
            .verify(BODY, Some(&header), at(TIMESTAMP + 60))
            .is_authentic());
        assert_eq!(
            authenticator.verify(BODY, Some(&header), at(TIMESTAMP + 61)),
            VerificationResult::Stale
        );
    }

    #[test]
    fn test_max_skew_must_be_positive() {
        assert_eq!(
            "1800".parse::<MaxSkew>().unwrap().as_time_delta(),
            TimeDelta::seconds(1800)
        );
        assert_eq!(MaxSkew::default().as_time_delta(), TimeDelta::seconds(1800));

        for invalid in ["0", "-1", "-1800", "9223372036854775807"] {
            assert!(
                matches!(
                    invalid.parse::<MaxSkew>(),
                    Err(InvalidMaxSkewError::OutOfRange)
                ),
                "accepted {invalid}"
            );
        }
        for invalid in ["", "30m", "1.5"] {
            assert!(
                matches!(
                    invalid.parse::<MaxSkew>(),
                    Err(InvalidMaxSkewError::NotANumber)
                ),
                "accepted {invalid:?}"
            );
        }
    }

    #[test]
    fn test_signature_header_parse() {
        let header = SignatureHeader::parse("t=1700000000,v0=abcdef").unwrap();

        assert_eq!(header.timestamp, TIMESTAMP);
        assert_eq!(header.signature, "v0=abcdef");
    }

    #[test]
    fn test_secret_is_redacted() {
        let secret = secret();

        assert_eq!(format!("{secret:?}"), "WebhookSecret(***)");
        assert_eq!(secret.to_string(), "***");
        assert!(WebhookSecret::new("").is_err());
        assert!("".parse::<WebhookSecret>().is_err());
    }
}
