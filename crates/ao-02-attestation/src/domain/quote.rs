//! SGX remote report parsing
//!
//! A remote report is an Open Enclave style header followed by an SGX ECDSA
//! quote (version 3). Only the structure is interpreted here; signature and
//! TCB evaluation are delegated to the verification service.
//!
//! ```text
//! ┌────────────────────┬──────────────────┬────────────────────┬─────────────┐
//! │ OE header (16)     │ quote header (48)│ report body (384)  │ signature.. │
//! │ ver | type | size  │ ver=3, tee=SGX   │ MRSIGNER, ISVSVN.. │             │
//! └────────────────────┴──────────────────┴────────────────────┴─────────────┘
//! ```

use crate::domain::claims::{ReportClaims, TcbStatus, MEASUREMENT_SIZE, REPORT_DATA_SIZE};
use crate::error::BackendError;

/// Open Enclave report header version.
pub const OE_REPORT_HEADER_VERSION: u32 = 1;
/// Open Enclave report type for SGX remote reports.
pub const OE_REPORT_TYPE_SGX_REMOTE: u32 = 2;
/// Size of the Open Enclave report header.
pub const OE_HEADER_SIZE: usize = 16;

/// Supported SGX quote version.
pub const SGX_QUOTE_VERSION: u16 = 3;
/// Size of the SGX quote header.
pub const QUOTE_HEADER_SIZE: usize = 48;
/// Size of the SGX report body.
pub const REPORT_BODY_SIZE: usize = 384;

/// `SGX_FLAGS_DEBUG` in the attributes flags word.
const SGX_FLAGS_DEBUG: u64 = 0x02;

// Offsets inside the report body.
const ATTRIBUTES_OFFSET: usize = 48;
const MR_ENCLAVE_OFFSET: usize = 64;
const MR_SIGNER_OFFSET: usize = 128;
const ISV_PROD_ID_OFFSET: usize = 256;
const ISV_SVN_OFFSET: usize = 258;
const REPORT_DATA_OFFSET: usize = 320;

/// Strip the Open Enclave header, if present, and return the raw quote.
pub fn quote_bytes(report: &[u8]) -> Result<&[u8], BackendError> {
    let (Some(version), Some(kind)) = (read_u32(report, 0), read_u32(report, 4)) else {
        return Err(BackendError::MalformedReport("report too short".into()));
    };
    if version != OE_REPORT_HEADER_VERSION {
        // Bare quote without an OE header.
        return Ok(report);
    }
    if kind != OE_REPORT_TYPE_SGX_REMOTE {
        return Err(BackendError::MalformedReport(format!(
            "unsupported report type {kind}"
        )));
    }
    let size = read_u64(report, 8)
        .and_then(|s| usize::try_from(s).ok())
        .ok_or_else(|| BackendError::MalformedReport("truncated report header".into()))?;
    report
        .get(OE_HEADER_SIZE..)
        .filter(|quote| quote.len() == size)
        .ok_or_else(|| {
            BackendError::MalformedReport(format!("report size mismatch: header says {size}"))
        })
}

/// Extract claims from the report body of a quote.
///
/// The returned claims carry [`TcbStatus::Unknown`]; the caller fills in
/// the status reported by the verification service.
pub fn parse_claims(quote: &[u8]) -> Result<ReportClaims, BackendError> {
    let version = read_u16(quote, 0)
        .ok_or_else(|| BackendError::MalformedReport("quote too short".into()))?;
    if version != SGX_QUOTE_VERSION {
        return Err(BackendError::MalformedReport(format!(
            "unsupported quote version {version}"
        )));
    }

    let body = quote
        .get(QUOTE_HEADER_SIZE..QUOTE_HEADER_SIZE + REPORT_BODY_SIZE)
        .ok_or_else(|| BackendError::MalformedReport("truncated report body".into()))?;

    let flags = read_u64(body, ATTRIBUTES_OFFSET).unwrap_or_default();
    let isv_prod_id = read_u16(body, ISV_PROD_ID_OFFSET).unwrap_or_default();
    let isv_svn = read_u16(body, ISV_SVN_OFFSET).unwrap_or_default();

    Ok(ReportClaims {
        data: field(body, REPORT_DATA_OFFSET, REPORT_DATA_SIZE),
        security_version: u32::from(isv_svn),
        product_id: ReportClaims::encode_product_id(isv_prod_id),
        signer_id: field(body, MR_SIGNER_OFFSET, MEASUREMENT_SIZE),
        unique_id: field(body, MR_ENCLAVE_OFFSET, MEASUREMENT_SIZE),
        debug: flags & SGX_FLAGS_DEBUG != 0,
        tcb_status: TcbStatus::Unknown,
    })
}

fn field(body: &[u8], offset: usize, len: usize) -> Vec<u8> {
    body.get(offset..offset + len).map(<[u8]>::to_vec).unwrap_or_default()
}

fn read_u16(buf: &[u8], offset: usize) -> Option<u16> {
    let bytes = buf.get(offset..offset + 2)?;
    Some(u16::from_le_bytes(bytes.try_into().ok()?))
}

fn read_u32(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset + 4)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

fn read_u64(buf: &[u8], offset: usize) -> Option<u64> {
    let bytes = buf.get(offset..offset + 8)?;
    Some(u64::from_le_bytes(bytes.try_into().ok()?))
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn fields() -> QuoteFields {
        let mut report_data = [0u8; 64];
        report_data[..32].copy_from_slice(&[0xAB; 32]);
        QuoteFields {
            report_data,
            mr_signer: [0x36; 32],
            mr_enclave: [0x11; 32],
            isv_prod_id: 1,
            isv_svn: 2,
            debug: false,
        }
    }

    #[test]
    fn test_parse_claims_from_oe_report() {
        let report = wrap_oe(&build_quote(&fields()));
        let quote = quote_bytes(&report).unwrap();
        let claims = parse_claims(quote).unwrap();

        assert_eq!(&claims.data[..32], &[0xAB; 32]);
        assert_eq!(claims.signer_id, vec![0x36; 32]);
        assert_eq!(claims.unique_id, vec![0x11; 32]);
        assert_eq!(claims.product(), Some(1));
        assert_eq!(claims.security_version, 2);
        assert!(!claims.debug);
        assert_eq!(claims.tcb_status, TcbStatus::Unknown);
    }

    #[test]
    fn test_bare_quote_accepted() {
        let quote = build_quote(&fields());
        assert_eq!(quote_bytes(&quote).unwrap(), quote.as_slice());
    }

    #[test]
    fn test_debug_attribute() {
        let mut f = fields();
        f.debug = true;
        let claims = parse_claims(&build_quote(&f)).unwrap();
        assert!(claims.debug);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut report = wrap_oe(&build_quote(&fields()));
        report.push(0);
        assert!(matches!(
            quote_bytes(&report),
            Err(BackendError::MalformedReport(_))
        ));
    }

    #[test]
    fn test_truncated_inputs_rejected() {
        assert!(quote_bytes(&[1, 0, 0]).is_err());
        let quote = build_quote(&fields());
        assert!(parse_claims(&quote[..100]).is_err());
        let mut wrong_version = quote.clone();
        wrong_version[0] = 4;
        assert!(parse_claims(&wrong_version).is_err());
    }
}
