// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Edit-mode bookkeeping for the admin bike grid.
//!
//! Each cell is `Viewing`, `Editing` or `RecentlySaved`. The saved highlight
//! expires by comparing a monotonic timestamp against the time of the query,
//! so nothing has to fire a timer to clear it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::field::{diff_fields, FieldError};
use crate::models::{Bike, BikeField, BikePatch, FieldValue};

/// How long modified cells stay highlighted after a successful write.
pub const SAVED_HIGHLIGHT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub row_id: String,
    pub field: BikeField,
}

impl CellKey {
    pub fn new(row_id: impl Into<String>, field: BikeField) -> Self {
        Self {
            row_id: row_id.into(),
            field,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellState {
    Viewing,
    Editing { draft: String },
    RecentlySaved { saved_at: Instant },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("field '{0}' cannot be edited in the grid")]
    NotEditable(BikeField),

    #[error("cell is not in edit mode")]
    NotEditing,

    #[error(transparent)]
    Field(#[from] FieldError),
}

#[derive(Debug, Default)]
pub struct GridState {
    cells: HashMap<CellKey, CellState>,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter edit mode with the current value as draft. Clicking a cell that
    /// is already being edited keeps its draft.
    pub fn begin_edit(&mut self, key: CellKey, current: &Bike) -> Result<(), GridError> {
        if !key.field.is_editable() {
            return Err(GridError::NotEditable(key.field));
        }
        if matches!(self.cells.get(&key), Some(CellState::Editing { .. })) {
            return Ok(());
        }
        let draft = current.field_value(key.field).to_string();
        self.cells.insert(key, CellState::Editing { draft });
        Ok(())
    }

    pub fn update_draft(&mut self, key: &CellKey, text: impl Into<String>) -> Result<(), GridError> {
        match self.cells.get_mut(key) {
            Some(CellState::Editing { draft }) => {
                *draft = text.into();
                Ok(())
            }
            _ => Err(GridError::NotEditing),
        }
    }

    /// Leave edit mode without saving.
    pub fn cancel(&mut self, key: &CellKey) {
        if matches!(self.cells.get(key), Some(CellState::Editing { .. })) {
            self.cells.remove(key);
        }
    }

    /// Leave edit mode (blur or confirm key) and diff the draft against the
    /// last-known server copy.
    ///
    /// Returns `None` when the draft equals the stored value, so focusing a
    /// cell and leaving it never produces a write. An unparseable draft keeps
    /// the cell in edit mode.
    pub fn commit(&mut self, key: &CellKey, server: &Bike) -> Result<Option<BikePatch>, GridError> {
        let draft = match self.cells.get(key) {
            Some(CellState::Editing { draft }) => draft.clone(),
            _ => return Err(GridError::NotEditing),
        };

        let value = FieldValue::parse(key.field, &draft)?;
        self.cells.remove(key);

        let patch = diff_fields(server, [(key.field, value)]);
        Ok((!patch.is_empty()).then_some(patch))
    }

    /// Flag written fields as recently saved.
    pub fn mark_saved(&mut self, row_id: &str, fields: &[BikeField], now: Instant) {
        for field in fields {
            self.cells.insert(
                CellKey::new(row_id, *field),
                CellState::RecentlySaved { saved_at: now },
            );
        }
    }

    /// State of a cell as it should render at `now`.
    pub fn state_at(&self, key: &CellKey, now: Instant) -> CellState {
        match self.cells.get(key) {
            Some(CellState::RecentlySaved { saved_at })
                if now.saturating_duration_since(*saved_at) >= SAVED_HIGHLIGHT =>
            {
                CellState::Viewing
            }
            Some(state) => state.clone(),
            None => CellState::Viewing,
        }
    }

    pub fn is_highlighted(&self, key: &CellKey, now: Instant) -> bool {
        matches!(self.state_at(key, now), CellState::RecentlySaved { .. })
    }

    /// Forget highlights that have expired.
    pub fn prune(&mut self, now: Instant) {
        self.cells.retain(|_, state| match state {
            CellState::RecentlySaved { saved_at } => {
                now.saturating_duration_since(*saved_at) < SAVED_HIGHLIGHT
            }
            _ => true,
        });
    }

    /// Fields of `row_id` currently in edit mode.
    pub fn editing_fields(&self, row_id: &str) -> Vec<BikeField> {
        let mut fields: Vec<BikeField> = self
            .cells
            .iter()
            .filter(|(key, state)| {
                key.row_id == row_id && matches!(state, CellState::Editing { .. })
            })
            .map(|(key, _)| key.field)
            .collect();
        fields.sort();
        fields
    }
}
