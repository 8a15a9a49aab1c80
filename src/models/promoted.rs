// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Promoted-bikes singleton.

use serde::{Deserialize, Serialize};

pub const PROMOTED_SLOTS: usize = 3;

/// Curated landing-page list of model numbers, overwritten on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromotedBikes {
    pub slots: [Option<String>; PROMOTED_SLOTS],
}

impl PromotedBikes {
    /// Trim every slot and turn blanks into empty slots.
    pub fn normalized(slots: [Option<String>; PROMOTED_SLOTS]) -> Self {
        Self {
            slots: slots.map(|slot| {
                slot.map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            }),
        }
    }
}
