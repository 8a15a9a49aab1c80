// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Delimiter sniffing from the header line.

use serde::Serialize;

/// Supported field delimiters, in tie-breaking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    const CANDIDATES: [Delimiter; 3] = [Delimiter::Comma, Delimiter::Semicolon, Delimiter::Tab];

    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Tab => '\t',
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Pick the delimiter occurring most often in the first line.
///
/// Ties go to the earlier candidate and a line with none of them is
/// treated as comma-separated.
pub fn detect_delimiter(text: &str) -> Delimiter {
    let first_line = text.lines().next().unwrap_or("");

    let mut best = Delimiter::Comma;
    let mut best_count = 0;
    for candidate in Delimiter::CANDIDATES {
        let count = first_line.matches(candidate.as_char()).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
