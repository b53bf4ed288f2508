//! # Feedloop Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Cross-subsystem flows through the node container
//! │   ├── access.rs      # membership → role → feedback visibility
//! │   └── admission.rs   # container-built layers in front of a handler
//! └── benches/           # criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p fl-tests
//! cargo test -p fl-tests integration::admission
//! cargo bench -p fl-tests
//! ```

pub mod integration;
