//! DCAP verification-service backend
//!
//! Parses the report structurally, then asks an HTTP quote verification
//! service to check the quote signature chain and evaluate the platform TCB.
//!
//! Request: `POST <url>` with `{"quote": "<base64>"}`.
//! Response: `{"valid": bool, "status": "<TCB status>", "detail": "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::quote::{parse_claims, quote_bytes};
use crate::domain::{ReportClaims, TcbStatus};
use crate::error::BackendError;
use crate::ports::AttestationBackend;

/// Default timeout for a verification request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct VerifyQuoteRequest {
    quote: String,
}

#[derive(Deserialize)]
struct VerifyQuoteResponse {
    valid: bool,
    status: String,
    #[serde(default)]
    detail: Option<String>,
}

/// Backend delegating quote verification to a DCAP service.
pub struct DcapServiceBackend {
    client: reqwest::Client,
    url: String,
}

impl DcapServiceBackend {
    /// Create a backend for the service at `url`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn evaluate(&self, quote: &[u8]) -> Result<VerifyQuoteResponse, BackendError> {
        let response = self
            .client
            .post(&self.url)
            .json(&VerifyQuoteRequest {
                quote: STANDARD.encode(quote),
            })
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(BackendError::Unavailable(format!("service returned {status}")));
        }
        if !status.is_success() {
            return Err(BackendError::Rejected(format!("service returned {status}")));
        }

        response
            .json::<VerifyQuoteResponse>()
            .await
            .map_err(|e| BackendError::Unavailable(format!("invalid service response: {e}")))
    }
}

#[async_trait]
impl AttestationBackend for DcapServiceBackend {
    async fn verify_remote_report(&self, report: &[u8]) -> Result<ReportClaims, BackendError> {
        let quote = quote_bytes(report)?;
        let mut claims = parse_claims(quote)?;

        let verdict = self.evaluate(quote).await?;
        if !verdict.valid {
            return Err(BackendError::Rejected(
                verdict.detail.unwrap_or_else(|| "quote verification failed".into()),
            ));
        }

        let status = TcbStatus::from_service_name(&verdict.status);
        claims.tcb_status = status;
        debug!(status = %status, "[ao-02] Quote verified by DCAP service");

        match status {
            TcbStatus::UpToDate => Ok(claims),
            s if s.is_degraded() => Err(BackendError::TcbLevelInvalid {
                claims: Box::new(claims),
                status: s,
            }),
            s => {
                warn!(status = %s, "[ao-02] Platform TCB not trusted: {}", s.explain());
                Err(BackendError::Rejected(format!("TCB status {s}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::fixtures::{build_quote, wrap_oe, QuoteFields};
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_service(reply: Value) -> String {
        let app = Router::new().route(
            "/verify",
            post(move |Json(body): Json<Value>| {
                let reply = reply.clone();
                async move {
                    assert!(body["quote"].as_str().is_some());
                    Json(reply)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/verify")
    }

    fn report() -> Vec<u8> {
        wrap_oe(&build_quote(&QuoteFields {
            report_data: [7u8; 64],
            mr_signer: [0x36; 32],
            mr_enclave: [0x11; 32],
            isv_prod_id: 1,
            isv_svn: 3,
            debug: false,
        }))
    }

    #[tokio::test]
    async fn test_up_to_date_quote() {
        let url = spawn_service(json!({"valid": true, "status": "UpToDate"})).await;
        let backend = DcapServiceBackend::new(url, DEFAULT_REQUEST_TIMEOUT).unwrap();

        let claims = backend.verify_remote_report(&report()).await.unwrap();
        assert_eq!(claims.tcb_status, TcbStatus::UpToDate);
        assert_eq!(claims.security_version, 3);
        assert_eq!(claims.signer_id, vec![0x36; 32]);
    }

    #[tokio::test]
    async fn test_degraded_quote_carries_claims() {
        let url = spawn_service(json!({"valid": true, "status": "SW_HARDENING_NEEDED"})).await;
        let backend = DcapServiceBackend::new(url, DEFAULT_REQUEST_TIMEOUT).unwrap();

        match backend.verify_remote_report(&report()).await {
            Err(BackendError::TcbLevelInvalid { claims, status }) => {
                assert_eq!(status, TcbStatus::SWHardeningNeeded);
                assert_eq!(claims.product(), Some(1));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_revoked_and_invalid_are_rejected() {
        let url = spawn_service(json!({"valid": true, "status": "REVOKED"})).await;
        let backend = DcapServiceBackend::new(url, DEFAULT_REQUEST_TIMEOUT).unwrap();
        assert!(matches!(
            backend.verify_remote_report(&report()).await,
            Err(BackendError::Rejected(_))
        ));

        let url = spawn_service(json!({"valid": false, "status": "UpToDate", "detail": "bad signature"})).await;
        let backend = DcapServiceBackend::new(url, DEFAULT_REQUEST_TIMEOUT).unwrap();
        match backend.verify_remote_report(&report()).await {
            Err(BackendError::Rejected(detail)) => assert_eq!(detail, "bad signature"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_report_never_reaches_service() {
        let backend =
            DcapServiceBackend::new("http://127.0.0.1:1/verify", DEFAULT_REQUEST_TIMEOUT).unwrap();
        assert!(matches!(
            backend.verify_remote_report(&[1, 2, 3]).await,
            Err(BackendError::MalformedReport(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let backend =
            DcapServiceBackend::new("http://127.0.0.1:1/verify", DEFAULT_REQUEST_TIMEOUT).unwrap();
        assert!(matches!(
            backend.verify_remote_report(&report()).await,
            Err(BackendError::Unavailable(_))
        ));
    }
}
