//! Oracle connection capability, resolved once at construction

use std::sync::Arc;

use crate::error::Result;
use crate::ports::{OracleConnection, SideChannelOracle};

/// An oracle connection tagged with whether it can return attestation reports.
#[derive(Clone)]
pub enum OracleSource {
    /// Connection returning a report alongside each price response.
    WithSideChannel(Arc<dyn SideChannelOracle>),
    /// Connection without report support; rounds always produce no extension.
    Plain(Arc<dyn OracleConnection>),
}

impl OracleSource {
    /// Wrap a side-channel capable connection.
    pub fn with_side_channel(connection: Arc<dyn SideChannelOracle>) -> Self {
        Self::WithSideChannel(connection)
    }

    /// Wrap a plain connection.
    pub fn plain(connection: Arc<dyn OracleConnection>) -> Self {
        Self::Plain(connection)
    }

    /// Whether reports can be obtained.
    pub fn supports_side_channel(&self) -> bool {
        matches!(self, Self::WithSideChannel(_))
    }

    /// The side-channel connection, if available.
    pub fn side_channel(&self) -> Option<&Arc<dyn SideChannelOracle>> {
        match self {
            Self::WithSideChannel(oracle) => Some(oracle),
            Self::Plain(_) => None,
        }
    }

    /// Start the underlying connection.
    pub async fn start(&self) -> Result<()> {
        match self {
            Self::WithSideChannel(oracle) => oracle.start().await,
            Self::Plain(oracle) => oracle.start().await,
        }
    }

    /// Query prices without collecting a report.
    pub async fn prices(
        &self,
        request: shared_types::QueryPricesRequest,
    ) -> Result<shared_types::QueryPricesResponse> {
        match self {
            Self::WithSideChannel(oracle) => oracle.prices(request).await,
            Self::Plain(oracle) => oracle.prices(request).await,
        }
    }
}

impl std::fmt::Debug for OracleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WithSideChannel(_) => f.write_str("OracleSource::WithSideChannel"),
            Self::Plain(_) => f.write_str("OracleSource::Plain"),
        }
    }
}
