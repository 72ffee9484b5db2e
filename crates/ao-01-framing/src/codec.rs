//! Length-prefixed encoder and decoder

use crate::error::{FramingError, Result};
use crate::{LENGTH_PREFIX_SIZE, MAX_FIELD_LEN, MIN_FRAME_LEN};

/// A decoded frame, borrowing both fields from the input blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramedPayload<'a> {
    /// First field (the marshalled price response)
    pub payload: &'a [u8],
    /// Second field (the attestation report)
    pub report: &'a [u8],
}

impl<'a> FramedPayload<'a> {
    /// Decode a blob into its two fields.
    pub fn decode(data: &'a [u8]) -> Result<Self> {
        let (payload, report) = decode(data)?;
        Ok(Self { payload, report })
    }

    /// Encode both fields back into a blob.
    pub fn encode(&self) -> Vec<u8> {
        encode(self.payload, self.report)
    }
}

/// Encode two byte buffers as `BE32(len(a)) || a || BE32(len(b)) || b`.
///
/// Empty buffers are framed as zero-length fields.
///
/// # Panics
///
/// If a field is longer than [`MAX_FIELD_LEN`] bytes, which a 32-bit prefix
/// cannot describe. Callers framing untrusted sizes check the bound first.
pub fn encode(a: &[u8], b: &[u8]) -> Vec<u8> {
    let a_len = prefix(a);
    let b_len = prefix(b);

    let mut buf = Vec::with_capacity(MIN_FRAME_LEN + a.len() + b.len());
    buf.extend_from_slice(&a_len);
    buf.extend_from_slice(a);
    buf.extend_from_slice(&b_len);
    buf.extend_from_slice(b);
    buf
}

/// Decode a blob produced by [`encode`] into its two fields.
pub fn decode(data: &[u8]) -> Result<(&[u8], &[u8])> {
    if data.len() < MIN_FRAME_LEN {
        return Err(FramingError::TooShort);
    }

    let mut offset = 0;
    let a_len = read_len(data, offset).ok_or(FramingError::TooShort)?;
    offset += LENGTH_PREFIX_SIZE;

    // `a` plus the second prefix must fit.
    let a_end = offset
        .checked_add(a_len)
        .filter(|end| *end <= data.len() - LENGTH_PREFIX_SIZE)
        .ok_or(FramingError::InvalidFirstLength)?;
    let a = &data[offset..a_end];
    offset = a_end;

    let b_len = read_len(data, offset).ok_or(FramingError::InvalidFirstLength)?;
    offset += LENGTH_PREFIX_SIZE;

    let b_end = offset
        .checked_add(b_len)
        .filter(|end| *end <= data.len())
        .ok_or(FramingError::InvalidSecondLength)?;
    let b = &data[offset..b_end];
    offset = b_end;

    if offset != data.len() {
        return Err(FramingError::TrailingBytes);
    }

    Ok((a, b))
}

fn prefix(field: &[u8]) -> [u8; LENGTH_PREFIX_SIZE] {
    assert!(
        field.len() <= MAX_FIELD_LEN,
        "field too large to frame: {} bytes",
        field.len()
    );
    (field.len() as u32).to_be_bytes()
}

fn read_len(data: &[u8], offset: usize) -> Option<usize> {
    let bytes = data.get(offset..offset.checked_add(LENGTH_PREFIX_SIZE)?)?;
    let bytes: [u8; LENGTH_PREFIX_SIZE] = bytes.try_into().ok()?;
    usize::try_from(u32::from_be_bytes(bytes)).ok()
}
