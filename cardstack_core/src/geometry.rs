// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry primitives.
//!
//! Rectangles, points, sizes and insets are the [`kurbo`] types, re-exported
//! here so hosts need only one import path. [`CardTransform`] covers the
//! subset of affine transforms a card ever receives: a uniform scale about
//! the card's centre followed by a translation.

use core::ops::Mul;

pub use kurbo::{Affine, Insets, Point, Rect, Size, Vec2};

/// A uniform scale plus translation, applied about a card's centre.
///
/// A point `p` expressed relative to the card centre maps to
/// `p * scale + translation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTransform {
    /// Uniform scale factor.
    pub scale: f64,
    /// Translation applied after scaling.
    pub translation: Vec2,
}

impl CardTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translation: Vec2::ZERO,
    };

    /// Creates a pure scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(scale: f64) -> Self {
        Self {
            scale,
            translation: Vec2::ZERO,
        }
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(translation: Vec2) -> Self {
        Self {
            scale: 1.0,
            translation,
        }
    }

    /// Returns `self` followed by `next`.
    #[inline]
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        next * self
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.scale.is_finite() && self.translation.is_finite()
    }

    /// Returns `true` if this transform leaves every point unchanged.
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Converts to a [`kurbo::Affine`] in centre-relative coordinates.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translation) * Affine::scale(self.scale)
    }

    /// Returns the on-screen rectangle of a card laid out at `frame` once this
    /// transform is applied about the frame's centre.
    #[must_use]
    pub fn apply_to_frame(self, frame: Rect) -> Rect {
        let center = frame.center() + self.translation;
        Rect::from_center_size(center, frame.size() * self.scale)
    }
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for CardTransform {
    type Output = Self;

    /// `a * b` applies `b` first, then `a`.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            scale: self.scale * rhs.scale,
            translation: rhs.translation * self.scale + self.translation,
        }
    }
}

/// Returns `true` if the two rectangles share interior area.
///
/// Touching edges do not count, and a rectangle with zero height never
/// intersects anything.
#[inline]
#[must_use]
pub fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}
