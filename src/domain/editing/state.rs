// SPDX-License-Identifier: MPL-2.0
//! Editable state of one photo.

use super::{Adjustments, CropRect, RotationDegrees};

/// Everything the editor can change on a photo.
///
/// Each field's type carries its own invariants (clamped sliders, 90° steps,
/// crop inside the unit square), so any value of this record is committable.
/// This is also the snapshot type stored by the undo/redo log.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditState {
    pub adjustments: Adjustments,
    /// Preset id, empty for none.
    pub filter_preset_id: String,
    pub rotation: RotationDegrees,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// `None` means the full image.
    pub crop: Option<CropRect>,
}

impl EditState {
    /// Returns true if the state renders the photo untouched.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }

    /// Stores a crop, folding a full-image region into `None`.
    pub fn set_crop(&mut self, crop: Option<CropRect>) {
        self.crop = crop.filter(|rect| !rect.is_full());
    }

    /// Shallow-merges the fields present in `patch`.
    pub fn apply(&mut self, patch: EditStatePatch) {
        let EditStatePatch {
            adjustments,
            filter_preset_id,
            rotation,
            flip_horizontal,
            flip_vertical,
            crop,
        } = patch;

        if let Some(adjustments) = adjustments {
            self.adjustments = adjustments;
        }
        if let Some(preset) = filter_preset_id {
            self.filter_preset_id = preset;
        }
        if let Some(rotation) = rotation {
            self.rotation = rotation;
        }
        if let Some(flip) = flip_horizontal {
            self.flip_horizontal = flip;
        }
        if let Some(flip) = flip_vertical {
            self.flip_vertical = flip;
        }
        if let Some(crop) = crop {
            self.set_crop(crop);
        }
    }
}

/// Partial edit state used by `PhotoStore::update`.
///
/// `crop` is doubly optional: `None` leaves the crop alone, `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditStatePatch {
    pub adjustments: Option<Adjustments>,
    pub filter_preset_id: Option<String>,
    pub rotation: Option<RotationDegrees>,
    pub flip_horizontal: Option<bool>,
    pub flip_vertical: Option<bool>,
    pub crop: Option<Option<CropRect>>,
}

impl EditStatePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<EditState> for EditStatePatch {
    fn from(state: EditState) -> Self {
        Self {
            adjustments: Some(state.adjustments),
            filter_preset_id: Some(state.filter_preset_id),
            rotation: Some(state.rotation),
            flip_horizontal: Some(state.flip_horizontal),
            flip_vertical: Some(state.flip_vertical),
            crop: Some(state.crop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::editing::AdjustmentKind;

    #[test]
    fn default_state_is_pristine() {
        let state = EditState::default();
        assert!(state.is_pristine());
        assert!(state.filter_preset_id.is_empty());
        assert_eq!(state.rotation.degrees(), 0);
        assert!(state.crop.is_none());
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut state = EditState {
            flip_horizontal: true,
            ..EditState::default()
        };
        state.apply(EditStatePatch {
            filter_preset_id: Some("noir".into()),
            ..EditStatePatch::default()
        });

        assert_eq!(state.filter_preset_id, "noir");
        assert!(state.flip_horizontal, "untouched field must survive");
    }

    #[test]
    fn apply_can_clear_crop() {
        let mut state = EditState::default();
        state.set_crop(Some(CropRect::new(0.1, 0.1, 0.5, 0.5)));
        assert!(state.crop.is_some());

        state.apply(EditStatePatch {
            crop: Some(None),
            ..EditStatePatch::default()
        });
        assert!(state.crop.is_none());
    }

    #[test]
    fn full_crop_folds_to_none() {
        let mut state = EditState::default();
        state.set_crop(Some(CropRect::FULL));
        assert!(state.crop.is_none());
    }

    #[test]
    fn full_patch_replaces_everything() {
        let edited = EditState {
            adjustments: Adjustments::default().with(AdjustmentKind::Warmth, 1.5),
            filter_preset_id: "vivid".into(),
            rotation: RotationDegrees::new(180),
            flip_horizontal: true,
            flip_vertical: true,
            crop: Some(CropRect::new(0.0, 0.0, 0.5, 0.5)),
        };
        let mut state = EditState::default();
        state.apply(edited.clone().into());
        assert_eq!(state, edited);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(EditStatePatch::default().is_empty());
        assert!(!EditStatePatch::from(EditState::default()).is_empty());
    }
}
