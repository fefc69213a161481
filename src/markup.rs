// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Pre-pass for text that goes to a math renderer.
//!
//! The core never parses math. This only splits explanation text into
//! paragraphs and rewrites dollar delimiters into the `\[ \]` / `\( \)`
//! forms a MathJax-style renderer expects. Everything else passes through
//! unchanged.

use regex::Regex;
use std::sync::LazyLock;

static HAS_MATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\$.*?\$|\\\[.*?\\\]|\\\(.*?\\\))").expect("static regex")
});
static DISPLAY_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$(.*?)\$\$").expect("static regex"));
static INLINE_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(.*?)\$").expect("static regex"));

/// One blank-line-separated block of explanation text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    /// True when the paragraph contains math and must go through the
    /// math renderer
    pub has_math: bool,
}

/// Split `content` into paragraphs, normalizing math delimiters in the ones
/// that contain math. Empty paragraphs are dropped.
pub fn paragraphs(content: &str) -> Vec<Paragraph> {
    content
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            if HAS_MATH.is_match(p) {
                Paragraph {
                    text: normalize_delimiters(p),
                    has_math: true,
                }
            } else {
                Paragraph {
                    text: p.to_string(),
                    has_math: false,
                }
            }
        })
        .collect()
}

/// `$$..$$` → `\[..\]`, then `$..$` → `\(..\)`
pub fn normalize_delimiters(text: &str) -> String {
    let display = DISPLAY_MATH.replace_all(text, r"\[${1}\]");
    INLINE_MATH.replace_all(&display, r"\(${1}\)").into_owned()
}
