//! Integration tests for pixkit crates.
//!
//! End-to-end checks that drive the engine the way a script would:
//! images go in through `set_image`, commands run by name with text
//! arguments, results come back through `get_image`/`get_histogram`.
