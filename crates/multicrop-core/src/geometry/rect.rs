//! Axis-aligned rectangle value type and space conversions.
//!
//! `Rect` is the unit of currency of the whole engine: crop rectangles live
//! as `Rect`s in display space while the operator drags them, and become
//! `Rect`s in source space at export time. The type is a pure value with no
//! identity; "mutation" is always reconstruction through one of the named
//! constructors.
//!
//! # Rounding
//!
//! Both projections round each edge to the nearest integer using
//! round-half-away-from-zero (`f64::round`). Coordinates are non-negative in
//! practice so this coincides with round-half-up, but the rule is applied
//! uniformly in both directions rather than mixing truncation and rounding.

use serde::{Deserialize, Serialize};

use super::space::CoordinateSpace;

/// A point in either display or source space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with integer edges.
///
/// Invariant: `left <= right` and `top <= bottom`. Every constructor
/// normalizes its inputs, so the invariant holds for any argument order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub fn empty() -> Self {
        Self {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
        }
    }

    /// Rectangle of the given size anchored at (0, 0).
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        }
    }

    /// Rectangle spanned by two arbitrary corner points.
    ///
    /// The corners may be given in any order; edges are normalized to
    /// min/max per axis. Never fails.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self {
            left: p1.x.min(p2.x),
            top: p1.y.min(p2.y),
            right: p1.x.max(p2.x),
            bottom: p1.y.max(p2.y),
        }
    }

    /// Rectangle with an explicit top-left corner and exact size.
    pub fn from_origin_size(origin: Point, width: u32, height: u32) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + width as i32,
            bottom: origin.y + height as i32,
        }
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Width in pixels. Non-negative by the edge invariant.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels. Non-negative by the edge invariant.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// The same rectangle with its top-left corner moved to `origin`,
    /// size preserved.
    pub fn at(&self, origin: Point) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + self.width(),
            bottom: origin.y + self.height(),
        }
    }

    /// Project a display-space rectangle into source space.
    ///
    /// Each edge is mapped as `round((edge - display_offset) * scale)` on
    /// its axis. This is the inverse of the drawing projection performed by
    /// [`Rect::to_display_space`].
    pub fn to_source_space(&self, space: &CoordinateSpace) -> Rect {
        let off = space.display_offset();
        Rect {
            left: project_out(self.left, off, space.scale_x()),
            top: project_out(self.top, off, space.scale_y()),
            right: project_out(self.right, off, space.scale_x()),
            bottom: project_out(self.bottom, off, space.scale_y()),
        }
    }

    /// Project a source-space rectangle into display space.
    ///
    /// `origin` is the top-left of the region currently fit into the
    /// viewport. Each edge is mapped as
    /// `round((edge - origin) / scale) + display_offset` on its axis.
    ///
    /// Composing this with [`Rect::to_source_space`] is not an exact
    /// identity: integer rounding in display space scales back up by the
    /// axis scale, so a round trip starting in display space stays within
    /// one pixel per edge (the thumbnail never upscales, so `scale >= 1`),
    /// while a round trip starting in source space can drift by up to
    /// `scale / 2 + 0.5` pixels per edge.
    pub fn to_display_space(&self, space: &CoordinateSpace, origin: Point) -> Rect {
        let off = space.display_offset();
        Rect {
            left: project_in(self.left, origin.x, off, space.scale_x()),
            top: project_in(self.top, origin.y, off, space.scale_y()),
            right: project_in(self.right, origin.x, off, space.scale_x()),
            bottom: project_in(self.bottom, origin.y, off, space.scale_y()),
        }
    }
}

/// Display edge -> source edge.
fn project_out(edge: i32, offset: i32, scale: f64) -> i32 {
    (((edge - offset) as f64) * scale).round() as i32
}

/// Source edge -> display edge.
fn project_in(edge: i32, origin: i32, offset: i32, scale: f64) -> i32 {
    (((edge - origin) as f64) / scale).round() as i32 + offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::space::CoordinateSpace;

    fn space(region: (u32, u32), thumb: (u32, u32)) -> CoordinateSpace {
        CoordinateSpace::new(region.0, region.1, thumb.0, thumb.1, 16).unwrap()
    }

    #[test]
    fn test_empty_rect() {
        let r = Rect::empty();
        assert_eq!(r.width(), 0);
        assert_eq!(r.height(), 0);
        assert_eq!(r.top_left(), Point::new(0, 0));
    }

    #[test]
    fn test_from_size() {
        let r = Rect::from_size(1280, 720);
        assert_eq!(r.left(), 0);
        assert_eq!(r.top(), 0);
        assert_eq!(r.width(), 1280);
        assert_eq!(r.height(), 720);
    }

    #[test]
    fn test_from_corners_normalizes() {
        let r = Rect::from_corners(Point::new(100, 20), Point::new(10, 200));
        assert_eq!(r.left(), 10);
        assert_eq!(r.top(), 20);
        assert_eq!(r.right(), 100);
        assert_eq!(r.bottom(), 200);
        assert_eq!(r.width(), 90);
        assert_eq!(r.height(), 180);
    }

    #[test]
    fn test_from_corners_any_order_agrees() {
        let a = Point::new(-5, 40);
        let b = Point::new(30, -2);
        assert_eq!(Rect::from_corners(a, b), Rect::from_corners(b, a));
    }

    #[test]
    fn test_at_preserves_size() {
        let r = Rect::from_size(500, 500).at(Point::new(116, 116));
        assert_eq!(r.top_left(), Point::new(116, 116));
        assert_eq!(r.width(), 500);
        assert_eq!(r.height(), 500);
    }

    #[test]
    fn test_to_source_space_reference_scenario() {
        // 4000x3000 source fit into a 1024 box -> 1024x768 thumbnail,
        // scale 3.90625 on both axes. A rectangle dragged to display
        // (100, 100) lands at source (328, 328).
        let space = space((4000, 3000), (1024, 768));
        assert!((space.scale_x() - 3.90625).abs() < 1e-9);
        assert!((space.scale_y() - 3.90625).abs() < 1e-9);

        let display = Rect::from_size(500, 500).at(Point::new(100, 100));
        let source = display.to_source_space(&space);
        assert_eq!(source.left(), 328);
        assert_eq!(source.top(), 328);
    }

    #[test]
    fn test_to_source_space_identity_scale() {
        let space = space((800, 600), (800, 600));
        let display = Rect::from_corners(Point::new(16, 16), Point::new(116, 216));
        let source = display.to_source_space(&space);
        assert_eq!(source, Rect::from_corners(Point::new(0, 0), Point::new(100, 200)));
    }

    #[test]
    fn test_to_display_space_identity_scale() {
        let space = space((800, 600), (800, 600));
        let source = Rect::from_corners(Point::new(0, 0), Point::new(100, 200));
        let display = source.to_display_space(&space, Point::new(0, 0));
        assert_eq!(
            display,
            Rect::from_corners(Point::new(16, 16), Point::new(116, 216))
        );
    }

    #[test]
    fn test_display_round_trip_within_one_pixel() {
        // Non-integral scale on both axes.
        let space = space((4000, 3000), (1024, 768));
        let display = Rect::from_corners(Point::new(37, 91), Point::new(412, 303));
        let back = display
            .to_source_space(&space)
            .to_display_space(&space, Point::new(0, 0));

        assert!((back.left() - display.left()).abs() <= 1);
        assert!((back.top() - display.top()).abs() <= 1);
        assert!((back.right() - display.right()).abs() <= 1);
        assert!((back.bottom() - display.bottom()).abs() <= 1);
    }

    #[test]
    fn test_source_round_trip_within_one_pixel_below_double_scale() {
        // scale_x = scale_y = 1.5: the source-side drift bound
        // scale / 2 + 0.5 stays below 1.5, so edges move at most 1.
        let space = space((1536, 1152), (1024, 768));
        let source = Rect::from_corners(Point::new(101, 57), Point::new(1000, 903));
        let back = source
            .to_display_space(&space, Point::new(0, 0))
            .to_source_space(&space);

        assert!((back.left() - source.left()).abs() <= 1);
        assert!((back.top() - source.top()).abs() <= 1);
        assert!((back.right() - source.right()).abs() <= 1);
        assert!((back.bottom() - source.bottom()).abs() <= 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
