//! Outcome of one extension round

/// How an extension round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionOutcome {
    /// Framed prices and report were returned.
    Attached,
    /// Query failed or the enclave sent no usable report.
    Empty,
    /// The round exceeded its deadline.
    Timeout,
    /// The oracle answered without prices.
    NoPrices,
    /// The report failed verification.
    AttestationFailed,
    /// The framed payload exceeded `max_bytes`.
    TooLarge,
    /// The connection cannot return reports.
    Unsupported,
}

impl ExtensionOutcome {
    /// Metric label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::Empty => "empty",
            Self::Timeout => "timeout",
            Self::NoPrices => "no_prices",
            Self::AttestationFailed => "attestation_failed",
            Self::TooLarge => "too_large",
            Self::Unsupported => "unsupported",
        }
    }
}
