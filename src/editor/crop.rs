// SPDX-License-Identifier: MPL-2.0
//! Crop tool state: hit-testing, move/resize drags and aspect-ratio lock.
//!
//! All coordinates are viewport units of the displayed image. The rectangle
//! always stays inside the viewport and keeps each side at least the minimum
//! crop size (or the viewport side, when that is smaller).

use crate::config::defaults::CROP_HANDLE_HIT_RADIUS;
use crate::domain::editing::{CropRect, Point, Size, ViewRect};

/// Crop aspect ratio constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    Free,
    Square,     // 1:1
    Classic,    // 4:3
    Photo,      // 3:2
    Widescreen, // 16:9
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Free,
        AspectRatio::Square,
        AspectRatio::Classic,
        AspectRatio::Photo,
        AspectRatio::Widescreen,
    ];

    /// Width over height, `None` when unconstrained.
    #[must_use]
    pub fn value(self) -> Option<f32> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Square => Some(1.0),
            AspectRatio::Classic => Some(4.0 / 3.0),
            AspectRatio::Photo => Some(3.0 / 2.0),
            AspectRatio::Widescreen => Some(16.0 / 9.0),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Free => "Free",
            AspectRatio::Square => "1:1",
            AspectRatio::Classic => "4:3",
            AspectRatio::Photo => "3:2",
            AspectRatio::Widescreen => "16:9",
        }
    }
}

/// What a crop drag manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropHandle {
    /// The whole rectangle.
    Move,
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl CropHandle {
    const CORNERS: [CropHandle; 4] = [
        CropHandle::NorthWest,
        CropHandle::NorthEast,
        CropHandle::SouthWest,
        CropHandle::SouthEast,
    ];

    const EDGES: [CropHandle; 4] = [
        CropHandle::North,
        CropHandle::South,
        CropHandle::East,
        CropHandle::West,
    ];

    #[must_use]
    pub fn is_corner(self) -> bool {
        Self::CORNERS.contains(&self)
    }

    fn moves_west(self) -> bool {
        matches!(
            self,
            CropHandle::NorthWest | CropHandle::West | CropHandle::SouthWest
        )
    }

    fn moves_east(self) -> bool {
        matches!(
            self,
            CropHandle::NorthEast | CropHandle::East | CropHandle::SouthEast
        )
    }

    fn moves_north(self) -> bool {
        matches!(
            self,
            CropHandle::NorthWest | CropHandle::North | CropHandle::NorthEast
        )
    }

    fn moves_south(self) -> bool {
        matches!(
            self,
            CropHandle::SouthWest | CropHandle::South | CropHandle::SouthEast
        )
    }

    /// Anchor point of the handle on `rect`.
    fn anchor(self, rect: &ViewRect) -> Point {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        match self {
            CropHandle::Move => rect.center(),
            CropHandle::NorthWest => Point::new(rect.x, rect.y),
            CropHandle::North => Point::new(cx, rect.y),
            CropHandle::NorthEast => Point::new(rect.right(), rect.y),
            CropHandle::East => Point::new(rect.right(), cy),
            CropHandle::SouthEast => Point::new(rect.right(), rect.bottom()),
            CropHandle::South => Point::new(cx, rect.bottom()),
            CropHandle::SouthWest => Point::new(rect.x, rect.bottom()),
            CropHandle::West => Point::new(rect.x, cy),
        }
    }
}

/// Crop drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CropDragState {
    /// No active drag
    #[default]
    Idle,
    Dragging {
        handle: CropHandle,
        /// Rectangle when the drag started
        start_rect: ViewRect,
        /// Cursor position when the drag started
        start_point: Point,
    },
}

/// Interactive crop rectangle over one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct CropState {
    viewport: Size,
    rect: ViewRect,
    ratio: AspectRatio,
    drag: CropDragState,
    min_size: f32,
}

impl CropState {
    /// A crop covering the whole viewport.
    #[must_use]
    pub fn new(viewport: Size, min_size: f32) -> Self {
        Self {
            viewport,
            rect: ViewRect::full(viewport),
            ratio: AspectRatio::Free,
            drag: CropDragState::Idle,
            min_size: if min_size.is_finite() { min_size.max(1.0) } else { 1.0 },
        }
    }

    /// Restores a stored crop; `None` means the whole viewport.
    #[must_use]
    pub fn from_crop(viewport: Size, crop: Option<CropRect>, min_size: f32) -> Self {
        let mut state = Self::new(viewport, min_size);
        if let Some(crop) = crop {
            state.rect = state.clamp_rect(crop.to_view(viewport));
        }
        state
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn rect(&self) -> ViewRect {
        self.rect
    }

    #[must_use]
    pub fn ratio(&self) -> AspectRatio {
        self.ratio
    }

    /// Whether the rectangle has the proportions of `ratio`. Always true for
    /// [`AspectRatio::Free`].
    #[must_use]
    pub fn fits_ratio(&self, ratio: AspectRatio) -> bool {
        const TOLERANCE: f32 = 1e-3;
        ratio.value().is_none_or(|value| {
            (self.rect.width / self.rect.height / value - 1.0).abs() <= TOLERANCE
        })
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, CropDragState::Dragging { .. })
    }

    fn min_width(&self) -> f32 {
        self.min_size.min(self.viewport.width)
    }

    fn min_height(&self) -> f32 {
        self.min_size.min(self.viewport.height)
    }

    /// The rectangle as viewport fractions; `None` when it covers everything.
    #[must_use]
    pub fn normalized(&self) -> Option<CropRect> {
        let crop = self.rect.normalize(self.viewport);
        (!crop.is_full()).then_some(crop)
    }

    /// Forces the rectangle back into the viewport and minimum size.
    fn clamp_rect(&self, rect: ViewRect) -> ViewRect {
        let vw = self.viewport.width;
        let vh = self.viewport.height;
        let width = clamp_range(rect.width, self.min_width(), vw);
        let height = clamp_range(rect.height, self.min_height(), vh);
        let x = clamp_range(rect.x, 0.0, vw - width);
        let y = clamp_range(rect.y, 0.0, vh - height);
        ViewRect::new(x, y, width, height)
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Finds the handle under `point`: corners first, then edges, then the
    /// interior. Hit areas extend `CROP_HANDLE_HIT_RADIUS` around each handle.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<CropHandle> {
        let r = CROP_HANDLE_HIT_RADIUS;
        let near = |a: Point| (point.x - a.x).abs() <= r && (point.y - a.y).abs() <= r;

        if let Some(corner) = CropHandle::CORNERS
            .into_iter()
            .find(|corner| near(corner.anchor(&self.rect)))
        {
            return Some(corner);
        }

        let rect = &self.rect;
        let within_x = point.x >= rect.x && point.x <= rect.right();
        let within_y = point.y >= rect.y && point.y <= rect.bottom();
        let edge = CropHandle::EDGES.into_iter().find(|edge| match edge {
            CropHandle::North => within_x && (point.y - rect.y).abs() <= r,
            CropHandle::South => within_x && (point.y - rect.bottom()).abs() <= r,
            CropHandle::East => within_y && (point.x - rect.right()).abs() <= r,
            CropHandle::West => within_y && (point.x - rect.x).abs() <= r,
            _ => false,
        });
        if edge.is_some() {
            return edge;
        }

        rect.contains(point).then_some(CropHandle::Move)
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Starts a drag on whatever handle is under `point`.
    pub fn pointer_down(&mut self, point: Point) -> Option<CropHandle> {
        if !is_finite(point) {
            return None;
        }
        let handle = self.hit_test(point)?;
        self.begin_drag(handle, point);
        Some(handle)
    }

    /// Starts a drag on a known handle.
    pub fn begin_drag(&mut self, handle: CropHandle, point: Point) {
        self.drag = CropDragState::Dragging {
            handle,
            start_rect: self.rect,
            start_point: point,
        };
    }

    /// Updates the rectangle for the current drag. Returns true if it moved.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let CropDragState::Dragging {
            handle,
            start_rect,
            start_point,
        } = self.drag
        else {
            return false;
        };
        if !is_finite(point) {
            return false;
        }

        let dx = point.x - start_point.x;
        let dy = point.y - start_point.y;
        let next = match handle {
            CropHandle::Move => self.moved(start_rect, dx, dy),
            _ => match self.ratio.value() {
                Some(ratio) => self
                    .resized_locked(start_rect, handle, dx, dy, ratio)
                    .unwrap_or(start_rect),
                None => self.resized_free(start_rect, handle, dx, dy),
            },
        };

        let changed = next != self.rect;
        self.rect = next;
        changed
    }

    /// Ends the drag. Returns true if the rectangle differs from its
    /// pre-drag position.
    pub fn pointer_up(&mut self) -> bool {
        match std::mem::take(&mut self.drag) {
            CropDragState::Dragging { start_rect, .. } => start_rect != self.rect,
            CropDragState::Idle => false,
        }
    }

    fn moved(&self, start: ViewRect, dx: f32, dy: f32) -> ViewRect {
        let x = clamp_range(start.x + dx, 0.0, self.viewport.width - start.width);
        let y = clamp_range(start.y + dy, 0.0, self.viewport.height - start.height);
        ViewRect::new(x, y, start.width, start.height)
    }

    fn resized_free(&self, start: ViewRect, handle: CropHandle, dx: f32, dy: f32) -> ViewRect {
        let (vw, vh) = (self.viewport.width, self.viewport.height);
        let (min_w, min_h) = (self.min_width(), self.min_height());

        let mut left = start.x;
        let mut top = start.y;
        let mut right = start.right();
        let mut bottom = start.bottom();

        if handle.moves_west() {
            left = clamp_range(start.x + dx, 0.0, right - min_w);
        }
        if handle.moves_east() {
            right = clamp_range(start.right() + dx, left + min_w, vw);
        }
        if handle.moves_north() {
            top = clamp_range(start.y + dy, 0.0, bottom - min_h);
        }
        if handle.moves_south() {
            bottom = clamp_range(start.bottom() + dy, top + min_h, vh);
        }

        ViewRect::new(left, top, right - left, bottom - top)
    }

    /// Ratio-locked resize. Corners and east/west edges are driven by width,
    /// north/south edges by height. Returns `None` when no rectangle of the
    /// ratio fits between the minimum size and the viewport.
    fn resized_locked(
        &self,
        start: ViewRect,
        handle: CropHandle,
        dx: f32,
        dy: f32,
        ratio: f32,
    ) -> Option<ViewRect> {
        let (vw, vh) = (self.viewport.width, self.viewport.height);

        // Edge handles keep the top (east/west) or left (north/south) edge.
        let grows_west = handle.moves_west();
        let grows_north = handle.moves_north();

        let max_w = if grows_west { start.right() } else { vw - start.x };
        let max_h = if grows_north { start.bottom() } else { vh - start.y };

        let width_driven = !matches!(handle, CropHandle::North | CropHandle::South);
        let (width, height) = if width_driven {
            let raw = if grows_west {
                start.width - dx
            } else {
                start.width + dx
            };
            let lo = self.min_width().max(self.min_height() * ratio);
            let hi = max_w.min(max_h * ratio);
            if lo > hi {
                return None;
            }
            let width = clamp_range(raw, lo, hi);
            (width, width / ratio)
        } else {
            let raw = if grows_north {
                start.height - dy
            } else {
                start.height + dy
            };
            let lo = self.min_height().max(self.min_width() / ratio);
            let hi = max_h.min(max_w / ratio);
            if lo > hi {
                return None;
            }
            let height = clamp_range(raw, lo, hi);
            (height * ratio, height)
        };

        let x = if grows_west { start.right() - width } else { start.x };
        let y = if grows_north { start.bottom() - height } else { start.y };
        Some(ViewRect::new(x, y, width, height))
    }

    // ------------------------------------------------------------------
    // Discrete operations
    // ------------------------------------------------------------------

    /// Switches the aspect ratio and reshapes the rectangle, anchored at its
    /// top-left corner. Returns true if the rectangle changed.
    pub fn set_ratio(&mut self, ratio: AspectRatio) -> bool {
        self.ratio = ratio;
        let Some(value) = ratio.value() else {
            return false;
        };

        let (vw, vh) = (self.viewport.width, self.viewport.height);
        let rect = self.rect;

        let mut width = rect.width;
        let mut height = width / value;
        let max_h = vh - rect.y;
        if height > max_h {
            height = max_h;
            width = height * value;
        }

        let min_w = self.min_width().max(self.min_height() * value);
        if width < min_w {
            width = min_w;
            height = width / value;
        }

        // Largest fit when the minimum cannot be honored at all.
        if width > vw || height > vh {
            height = vh.min(vw / value);
            width = height * value;
        }

        // Shift only as far as needed to keep the rectangle inside.
        let x = clamp_range(rect.x, 0.0, vw - width);
        let y = clamp_range(rect.y, 0.0, vh - height);
        let next = ViewRect::new(x, y, width, height);

        let changed = next != self.rect;
        self.rect = next;
        changed
    }

    /// Sets the ratio lock without touching the rectangle. The lock applies
    /// from the next resize.
    pub fn lock_ratio(&mut self, ratio: AspectRatio) {
        self.ratio = ratio;
    }

    /// Back to the whole viewport, unconstrained.
    pub fn reset(&mut self) {
        self.rect = ViewRect::full(self.viewport);
        self.ratio = AspectRatio::Free;
        self.drag = CropDragState::Idle;
    }
}

fn is_finite(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

/// `max` then `min`, so an empty range resolves to `hi` instead of panicking.
fn clamp_range(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}
