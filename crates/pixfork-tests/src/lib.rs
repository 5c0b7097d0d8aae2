//! Integration tests for pixfork crates.
//!
//! End-to-end checks across the codec and the transforms, including
//! bit-identical output for worker pools of different sizes.
