// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod export;
pub mod grid;
pub mod id_token;

pub use catalog::{CatalogFilter, ModelFamily};
pub use export::ExportColumn;
pub use grid::GridState;
pub use id_token::{IdTokenError, IdTokenVerifier};
