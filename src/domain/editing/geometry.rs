// SPDX-License-Identifier: MPL-2.0
//! Crop geometry value objects.
//!
//! Two coordinate spaces are used:
//! - [`ViewRect`]: viewport units of the displayed (rotated/flipped) image, used
//!   while a crop gesture is in progress.
//! - [`CropRect`]: fractions (`0.0..=1.0`) of that viewport, stored in the photo's
//!   edit state so it survives viewport resizes.

/// A position in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A viewport or image size in viewport units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Creates a size; non-finite or non-positive sides become 1.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// The same size with width and height exchanged.
    #[must_use]
    pub fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// A rectangle in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewRect {
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering the whole viewport.
    #[must_use]
    pub fn full(viewport: Size) -> Self {
        Self::new(0.0, 0.0, viewport.width, viewport.height)
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Converts to viewport fractions.
    #[must_use]
    pub fn normalize(&self, viewport: Size) -> CropRect {
        CropRect::new(
            self.x / viewport.width,
            self.y / viewport.height,
            self.width / viewport.width,
            self.height / viewport.height,
        )
    }
}

/// A crop region as fractions of the displayed viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl CropRect {
    /// The whole image.
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Creates a crop region clamped into the unit square.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let unit = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        let x = unit(x);
        let y = unit(y);
        let width = unit(width).min(1.0 - x);
        let height = unit(height).min(1.0 - y);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns true if the region covers the whole image.
    #[must_use]
    pub fn is_full(&self) -> bool {
        const EPS: f32 = 1e-4;
        self.x.abs() < EPS
            && self.y.abs() < EPS
            && (self.width - 1.0).abs() < EPS
            && (self.height - 1.0).abs() < EPS
    }

    /// Scales to viewport units.
    #[must_use]
    pub fn to_view(&self, viewport: Size) -> ViewRect {
        ViewRect::new(
            self.x * viewport.width,
            self.y * viewport.height,
            self.width * viewport.width,
            self.height * viewport.height,
        )
    }

    /// The same image region after the view turns 90° clockwise.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        Self::new(1.0 - self.y - self.height, self.x, self.height, self.width)
    }

    /// The same image region after the view turns 90° counter-clockwise.
    #[must_use]
    pub fn rotated_counterclockwise(&self) -> Self {
        Self::new(self.y, 1.0 - self.x - self.width, self.height, self.width)
    }

    /// Mirrored left-to-right within the view.
    #[must_use]
    pub fn mirrored_horizontally(&self) -> Self {
        Self::new(1.0 - self.x - self.width, self.y, self.width, self.height)
    }

    /// Mirrored top-to-bottom within the view.
    #[must_use]
    pub fn mirrored_vertically(&self) -> Self {
        Self::new(self.x, 1.0 - self.y - self.height, self.width, self.height)
    }
}
