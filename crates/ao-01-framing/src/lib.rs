//! # Attested Oracle - Binary Framing Codec (Subsystem 01)
//!
//! Packs two opaque byte buffers into one blob so the oracle price payload
//! and the enclave report that vouches for it travel together as a single
//! batch transaction.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────────┬───────────┬──────────────┬───────────┐
//! │ u32 BE len(A)│  A bytes  │ u32 BE len(B)│  B bytes  │
//! └──────────────┴───────────┴──────────────┴───────────┘
//! ```
//!
//! No version byte, no checksum. The smallest valid frame is 8 bytes (two
//! empty fields). In practice `A` is the marshalled price response and `B`
//! is the attestation report.
//!
//! ## Invariants
//!
//! 1. **Round-trip**: `decode(&encode(a, b)) == (a, b)` for every `a`, `b`.
//! 2. **Total decoding**: every malformed input yields a [`FramingError`];
//!    all bounds are checked before a slice is taken, so attacker-controlled
//!    input can never cause a panic.
//! 3. **No truncation**: trailing bytes after the second field are rejected.
//!
//! The codec is stateless and safe to call concurrently.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod codec;
mod error;

pub use codec::{decode, encode, FramedPayload};
pub use error::{FramingError, Result};

/// Size of each big-endian length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Smallest valid frame: two zero-length fields.
pub const MIN_FRAME_LEN: usize = 2 * LENGTH_PREFIX_SIZE;

/// Largest field a length prefix can describe.
pub const MAX_FIELD_LEN: usize = u32::MAX as usize;
