// SPDX-License-Identifier: MPL-2.0
//! `magnet_studio` is the photo composition pipeline behind a custom
//! photo-magnet storefront.
//!
//! Photos enter through the [`intake`] pipeline (files, camera, URLs), live in
//! the bounded [`store`], are edited non-destructively in an
//! [`editor::EditorSession`] with undo/redo, and are laid out by the
//! [`compositor`] into a fixed grid. [`studio::Studio`] ties them together.

pub mod compositor;
pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod intake;
pub mod media;
pub mod store;
pub mod studio;

#[cfg(test)]
pub(crate) mod test_utils;

pub use studio::Studio;
