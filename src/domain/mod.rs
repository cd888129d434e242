// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core business logic with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`editing`]: Editing types ([`Adjustments`](editing::Adjustments),
//!   [`RotationDegrees`](editing::RotationDegrees), [`CropRect`](editing::CropRect),
//!   [`EditState`](editing::EditState))
//! - [`photo`]: Photo identity and format ([`PhotoId`](photo::PhotoId),
//!   [`PhotoFormat`](photo::PhotoFormat))

pub mod editing;
pub mod photo;
