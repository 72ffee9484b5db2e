//! # Attested Oracle Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── pipeline_benchmarks.rs  # framing, verification, commit pass
//! └── src/integration/
//!     ├── price_propagation.rs    # oracle → producer → block → store
//!     └── tampering.rs            # forged, swapped and stale reports
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ao-tests
//! cargo test -p ao-tests integration::tampering
//! cargo bench -p ao-tests
//! ```

pub mod integration;
