//! End-to-end tests for pixflow crates.
//!
//! These exercise the path a request takes: bytes are decoded by
//! `pixflow-io`, normalized into a `PixelBuffer`, transformed by the
//! `pixflow-ops` pipeline and encoded again.
