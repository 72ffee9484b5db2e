//! gRPC oracle client
//!
//! Calls the oracle's unary `Prices` method and reads the enclave report the
//! oracle server attaches as trailer metadata (`x-enclave-report`, base64
//! standard alphabet without padding).

use std::time::Duration;

use async_trait::async_trait;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use shared_types::{QueryPricesRequest, QueryPricesResponse};
use tokio::sync::RwLock;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info, warn};

use crate::config::OracleClientConfig;
use crate::error::{OracleError, Result};
use crate::ports::{AttestedPrices, OracleConnection, SideChannelOracle};

/// Fully-qualified path of the oracle `Prices` method.
pub const PRICES_PATH: &str = "/connect.service.oracle.v2.Oracle/Prices";

/// Trailer key carrying the enclave report.
pub const REPORT_TRAILER: &str = "x-enclave-report";

/// Report encoding: standard alphabet, no padding emitted, padding tolerated.
const REPORT_ENCODING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Oracle connection over gRPC.
pub struct GrpcOracleClient {
    endpoint: Endpoint,
    channel: RwLock<Option<Channel>>,
    address: String,
    request_timeout: Duration,
}

impl GrpcOracleClient {
    /// Build a client. Does not connect; see [`OracleConnection::start`].
    pub fn new(config: &OracleClientConfig) -> Result<Self> {
        let address = normalize_address(&config.address);
        let endpoint = Endpoint::from_shared(address.clone())
            .map_err(|e| OracleError::Config(format!("{address}: {e}")))?
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout);

        Ok(Self {
            endpoint,
            channel: RwLock::new(None),
            address,
            request_timeout: config.request_timeout,
        })
    }

    /// Endpoint the client talks to.
    pub fn address(&self) -> &str {
        &self.address
    }

    async fn connect(&self) -> Result<Channel> {
        let channel = self
            .endpoint
            .connect()
            .await
            .map_err(|e| OracleError::Connection(e.to_string()))?;
        *self.channel.write().await = Some(channel.clone());
        Ok(channel)
    }

    async fn channel(&self) -> Result<Channel> {
        if let Some(channel) = self.channel.read().await.clone() {
            return Ok(channel);
        }
        self.connect().await
    }

    async fn call(&self, request: QueryPricesRequest) -> Result<tonic::Response<QueryPricesResponse>> {
        let mut grpc = tonic::client::Grpc::new(self.channel().await?);
        grpc.ready()
            .await
            .map_err(|e| OracleError::Connection(e.to_string()))?;

        let codec: ProstCodec<QueryPricesRequest, QueryPricesResponse> = ProstCodec::default();
        grpc.unary(
            tonic::Request::new(request),
            PathAndQuery::from_static(PRICES_PATH),
            codec,
        )
        .await
        .map_err(|status| match status.code() {
            tonic::Code::DeadlineExceeded => OracleError::Timeout(self.request_timeout),
            code => OracleError::Connection(format!("{code}: {}", status.message())),
        })
    }
}

#[async_trait]
impl OracleConnection for GrpcOracleClient {
    async fn start(&self) -> Result<()> {
        self.connect().await?;
        info!(address = %self.address, "[ao-03] Connected to oracle");
        Ok(())
    }

    async fn prices(&self, request: QueryPricesRequest) -> Result<QueryPricesResponse> {
        Ok(self.call(request).await?.into_inner())
    }
}

#[async_trait]
impl SideChannelOracle for GrpcOracleClient {
    async fn prices_with_report(&self, request: QueryPricesRequest) -> Result<AttestedPrices> {
        let response = self.call(request).await?;
        Ok(split_report(response))
    }
}

/// Separate the price response from its report trailer.
///
/// Unary responses carry trailers merged into the response metadata.
pub fn split_report(response: tonic::Response<QueryPricesResponse>) -> AttestedPrices {
    let report = match response.metadata().get(REPORT_TRAILER) {
        None => {
            debug!("[ao-03] Oracle response carries no report trailer");
            None
        }
        Some(value) => match value.to_str().map(|encoded| REPORT_ENCODING.decode(encoded)) {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                warn!(error = %e, "[ao-03] Report trailer is not valid base64");
                None
            }
            Err(e) => {
                warn!(error = %e, "[ao-03] Report trailer is not ASCII");
                None
            }
        },
    };

    AttestedPrices {
        response: response.into_inner(),
        report,
    }
}

/// Encode a report the way the enclave-side oracle server does.
pub fn encode_report(report: &[u8]) -> String {
    REPORT_ENCODING.encode(report)
}

fn normalize_address(address: &str) -> String {
    let address = address.trim();
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}
