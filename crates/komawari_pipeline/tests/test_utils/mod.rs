//! Test utilities for pipeline tests.
//!
//! This module provides a scripted oracle and text helpers.

pub mod mock_oracle;

#[allow(unused_imports)]
pub use mock_oracle::{MockBehavior, MockOracle, MockResponse};

/// `count` copies of `c`.
#[allow(dead_code)]
pub fn repeat_char(c: char, count: usize) -> String {
    std::iter::repeat_n(c, count).collect()
}

/// A 500-character text with a paragraph break at offset 260.
#[allow(dead_code)]
pub fn five_hundred_chars() -> String {
    format!("{}\n\n{}", repeat_char('あ', 260), repeat_char('い', 238))
}
