//! The crop-rectangle collection and its drag lifecycle.
//!
//! A [`CropSet`] holds one display-space rectangle per configured preset.
//! Rectangle identity is the index into the ordered collection; a toolkit
//! adapter translates raw pointer events into the `begin_drag` /
//! `update_drag` / `end_drag` command sequence, so the set never depends on
//! any rendering backend's object identity.
//!
//! Clamping is deliberately asymmetric: motion updates are unclamped so the
//! rectangle tracks the pointer without jitter, and the release update is
//! clamped so the rectangle always comes to rest fully inside the visible
//! thumbnail.

use log::debug;
use thiserror::Error;

use crate::geometry::{CoordinateSpace, Point, Rect};
use crate::CropPreset;

/// Errors from drag commands issued against the set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DragError {
    /// The token does not match the current selection (the gesture it came
    /// from has already ended).
    #[error("drag token is stale")]
    StaleToken,
}

/// Proof of an in-progress drag on one rectangle.
///
/// Obtained from [`CropSet::begin_drag`] and invalidated by
/// [`CropSet::end_drag`]; commands carrying a stale token are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragToken {
    index: usize,
    generation: u64,
}

/// Source-space export geometry for one rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRegion {
    /// Name of the preset this rectangle belongs to.
    pub name: String,
    /// Source-space crop rectangle, exactly the preset's target size.
    pub rect: Rect,
}

/// Bounds the clamped drag keeps rectangles inside: the displayed thumbnail,
/// offset by the border.
#[derive(Debug, Clone, Copy)]
struct DragBounds {
    offset: i32,
    thumb_width: i32,
    thumb_height: i32,
}

#[derive(Debug)]
struct CropEntry {
    preset: CropPreset,
    rect: Rect,
}

/// One positioned rectangle per preset, with drag/clamp state.
#[derive(Debug)]
pub struct CropSet {
    entries: Vec<CropEntry>,
    bounds: Option<DragBounds>,
    selected: Option<usize>,
    generation: u64,
}

impl CropSet {
    /// Build a set with one (unplaced) rectangle per preset, in preset
    /// order. Call [`CropSet::place_initial`] before issuing drag commands.
    pub fn new(presets: Vec<CropPreset>) -> Self {
        debug_assert!(!presets.is_empty(), "at least one crop preset required");
        let entries = presets
            .into_iter()
            .map(|preset| {
                let rect = Rect::from_size(preset.target_width, preset.target_height);
                CropEntry { preset, rect }
            })
            .collect();
        Self {
            entries,
            bounds: None,
            selected: None,
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current display-space rectangle for `id`, if `id` is valid.
    pub fn rect(&self, id: usize) -> Option<Rect> {
        self.entries.get(id).map(|e| e.rect)
    }

    /// Preset behind `id`, if `id` is valid.
    pub fn preset(&self, id: usize) -> Option<&CropPreset> {
        self.entries.get(id).map(|e| &e.preset)
    }

    /// Index of the preset named `name`, if any.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.preset.name == name)
    }

    /// The presets in set order.
    pub fn presets(&self) -> Vec<CropPreset> {
        self.entries.iter().map(|e| e.preset.clone()).collect()
    }

    /// Place every rectangle at the top-left of the viewport (the border
    /// offset) at its preset's nominal pixel size.
    ///
    /// The initial box is drawn at its nominal size in display space, not
    /// pre-scaled; the operator separates and positions the (initially
    /// stacked) rectangles by dragging, and the scale correction happens at
    /// export. Also records the drag bounds from the space's thumbnail
    /// dimensions.
    pub fn place_initial(&mut self, space: &CoordinateSpace) {
        let offset = space.display_offset();
        let anchor = Point::new(offset, offset);
        for entry in &mut self.entries {
            entry.rect =
                Rect::from_size(entry.preset.target_width, entry.preset.target_height).at(anchor);
        }
        self.bounds = Some(DragBounds {
            offset,
            thumb_width: space.thumb_width() as i32,
            thumb_height: space.thumb_height() as i32,
        });
        self.selected = None;
    }

    /// Select rectangle `id` for dragging.
    ///
    /// Returns `None` for an invalid id or before placement — the adapter
    /// maps presses on the background image layer to exactly this no-op.
    /// Selecting while another rectangle is selected transfers the
    /// selection (a new press implies the old gesture is over).
    pub fn begin_drag(&mut self, id: usize) -> Option<DragToken> {
        if self.bounds.is_none() || id >= self.entries.len() {
            return None;
        }
        self.generation += 1;
        self.selected = Some(id);
        debug!("drag begin: rect {id}");
        Some(DragToken {
            index: id,
            generation: self.generation,
        })
    }

    /// Move the selected rectangle's top-left to `pointer`, preserving its
    /// size.
    ///
    /// With `clamp` set the position is confined so the whole rectangle
    /// stays inside the displayed thumbnail; without it the move is
    /// unconstrained (mid-gesture tracking).
    ///
    /// # Errors
    ///
    /// Returns [`DragError::StaleToken`] if `token` is not the current
    /// selection.
    pub fn update_drag(
        &mut self,
        token: DragToken,
        pointer: Point,
        clamp: bool,
    ) -> Result<(), DragError> {
        self.check(token)?;
        let entry = &mut self.entries[token.index];

        let target = if clamp {
            // Bounds recorded at placement; begin_drag refuses tokens
            // before that, so they are present here.
            let bounds = self.bounds.expect("drag bounds set at placement");
            clamp_top_left(pointer, entry.rect, bounds)
        } else {
            pointer
        };

        entry.rect = entry.rect.at(target);
        Ok(())
    }

    /// Release the selection. A stale token is ignored; the gesture it
    /// belonged to is already over.
    pub fn end_drag(&mut self, token: DragToken) {
        if self.check(token).is_ok() {
            debug!("drag end: rect {}", token.index);
            self.generation += 1;
            self.selected = None;
        }
    }

    /// Project every rectangle into source space and pin its size to the
    /// preset's exact target dimensions.
    ///
    /// The bottom-right corner is recomputed from the projected top-left
    /// plus the target size, so every exported crop is pixel-exact to its
    /// preset regardless of scale rounding drift.
    pub fn export_geometry(&self, space: &CoordinateSpace) -> Vec<ExportRegion> {
        self.entries
            .iter()
            .map(|entry| {
                let projected = entry.rect.to_source_space(space);
                let rect = Rect::from_origin_size(
                    projected.top_left(),
                    entry.preset.target_width,
                    entry.preset.target_height,
                );
                ExportRegion {
                    name: entry.preset.name.clone(),
                    rect,
                }
            })
            .collect()
    }

    fn check(&self, token: DragToken) -> Result<(), DragError> {
        if self.selected == Some(token.index) && self.generation == token.generation {
            Ok(())
        } else {
            Err(DragError::StaleToken)
        }
    }
}

/// Confine a prospective top-left so the rectangle stays inside the
/// thumbnail. A rectangle larger than the thumbnail pins to the near edge.
fn clamp_top_left(pointer: Point, rect: Rect, bounds: DragBounds) -> Point {
    let min_x = bounds.offset;
    let min_y = bounds.offset;
    let max_x = (bounds.offset + bounds.thumb_width - rect.width()).max(min_x);
    let max_y = (bounds.offset + bounds.thumb_height - rect.height()).max(min_y);
    Point::new(pointer.x.clamp(min_x, max_x), pointer.y.clamp(min_y, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_presets;
    use crate::geometry::CoordinateSpace;

    fn space() -> CoordinateSpace {
        // 4000x3000 region shown as a 1024x768 thumbnail behind a 16px
        // border; scale 3.90625 on both axes.
        CoordinateSpace::new(4000, 3000, 1024, 768, 16).unwrap()
    }

    fn placed_set() -> CropSet {
        let mut set = CropSet::new(default_presets());
        set.place_initial(&space());
        set
    }

    #[test]
    fn test_initial_placement_one_rect_per_preset_at_offset() {
        let set = placed_set();
        assert_eq!(set.len(), 4);
        for id in 0..set.len() {
            let rect = set.rect(id).unwrap();
            let preset = set.preset(id).unwrap();
            assert_eq!(rect.top_left(), Point::new(16, 16));
            assert_eq!(rect.width(), preset.target_width as i32);
            assert_eq!(rect.height(), preset.target_height as i32);
        }
    }

    #[test]
    fn test_begin_drag_rejects_invalid_id() {
        let mut set = placed_set();
        assert!(set.begin_drag(99).is_none());
    }

    #[test]
    fn test_begin_drag_before_placement_is_noop() {
        let mut set = CropSet::new(default_presets());
        assert!(set.begin_drag(0).is_none());
    }

    #[test]
    fn test_unclamped_drag_moves_anywhere() {
        let mut set = placed_set();
        let token = set.begin_drag(1).unwrap();
        set.update_drag(token, Point::new(-400, 5000), false).unwrap();

        let rect = set.rect(1).unwrap();
        assert_eq!(rect.top_left(), Point::new(-400, 5000));
        assert_eq!(rect.width(), 500);
        assert_eq!(rect.height(), 500);
    }

    #[test]
    fn test_clamped_drag_stays_inside_thumbnail() {
        let mut set = placed_set();
        let token = set.begin_drag(1).unwrap();
        set.update_drag(token, Point::new(-400, 5000), true).unwrap();

        // 500x500 rect in a 1024x768 thumbnail with a 16px border:
        // x in [16, 540], y in [16, 284].
        let rect = set.rect(1).unwrap();
        assert_eq!(rect.top_left(), Point::new(16, 284));
    }

    #[test]
    fn test_stale_token_rejected_after_end() {
        let mut set = placed_set();
        let token = set.begin_drag(0).unwrap();
        set.end_drag(token);
        assert_eq!(
            set.update_drag(token, Point::new(50, 50), false),
            Err(DragError::StaleToken)
        );
    }

    #[test]
    fn test_new_press_invalidates_previous_token() {
        let mut set = placed_set();
        let first = set.begin_drag(0).unwrap();
        let second = set.begin_drag(2).unwrap();
        assert_eq!(
            set.update_drag(first, Point::new(50, 50), false),
            Err(DragError::StaleToken)
        );
        set.update_drag(second, Point::new(50, 50), false).unwrap();
    }

    #[test]
    fn test_export_geometry_reference_scenario() {
        // Drag the 500x500 preset (B) to display (100, 100) and release
        // clamped; its export rect is 500x500 at source (328, 328).
        let mut set = placed_set();
        let id = set.find("B").unwrap();
        let token = set.begin_drag(id).unwrap();
        set.update_drag(token, Point::new(100, 100), true).unwrap();
        set.end_drag(token);

        let regions = set.export_geometry(&space());
        let region = regions.iter().find(|r| r.name == "B").unwrap();
        assert_eq!(region.rect.top_left(), Point::new(328, 328));
        assert_eq!(region.rect.width(), 500);
        assert_eq!(region.rect.height(), 500);
    }

    #[test]
    fn test_export_geometry_sizes_are_exact() {
        let set = placed_set();
        let regions = set.export_geometry(&space());
        assert_eq!(regions.len(), 4);
        for (id, region) in regions.iter().enumerate() {
            let preset = set.preset(id).unwrap();
            assert_eq!(region.name, preset.name);
            assert_eq!(region.rect.width(), preset.target_width as i32);
            assert_eq!(region.rect.height(), preset.target_height as i32);
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::default_presets;
    use crate::geometry::CoordinateSpace;
    use proptest::prelude::*;

    fn space_strategy() -> impl Strategy<Value = CoordinateSpace> {
        (600u32..=1024, 600u32..=1024, 1.0f64..=8.0, 1.0f64..=8.0).prop_map(
            |(thumb_w, thumb_h, sx, sy)| {
                let region_w = (thumb_w as f64 * sx).round() as u32;
                let region_h = (thumb_h as f64 * sy).round() as u32;
                CoordinateSpace::new(region_w, region_h, thumb_w, thumb_h, 16).unwrap()
            },
        )
    }

    fn pointer_strategy() -> impl Strategy<Value = Point> {
        (-2000i32..=4000, -2000i32..=4000).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        /// Property: a clamped drag always comes to rest with the whole
        /// rectangle inside the displayed thumbnail.
        #[test]
        fn prop_clamped_drag_in_bounds(
            space in space_strategy(),
            pointer in pointer_strategy(),
            id in 0usize..4,
        ) {
            let mut set = CropSet::new(default_presets());
            set.place_initial(&space);

            let token = set.begin_drag(id).unwrap();
            set.update_drag(token, pointer, true).unwrap();
            set.end_drag(token);

            let rect = set.rect(id).unwrap();
            let offset = space.display_offset();
            prop_assert!(rect.left() >= offset);
            prop_assert!(rect.top() >= offset);
            // Rectangles wider/taller than the thumbnail pin to the near
            // edge; otherwise the far edge stays inside too.
            if rect.width() <= space.thumb_width() as i32 {
                prop_assert!(rect.right() <= offset + space.thumb_width() as i32);
            } else {
                prop_assert_eq!(rect.left(), offset);
            }
            if rect.height() <= space.thumb_height() as i32 {
                prop_assert!(rect.bottom() <= offset + space.thumb_height() as i32);
            } else {
                prop_assert_eq!(rect.top(), offset);
            }
        }

        /// Property: an unclamped drag lands exactly on the pointer and
        /// preserves the rectangle's size.
        #[test]
        fn prop_unclamped_drag_unconstrained(
            space in space_strategy(),
            pointer in pointer_strategy(),
            id in 0usize..4,
        ) {
            let mut set = CropSet::new(default_presets());
            set.place_initial(&space);
            let before = set.rect(id).unwrap();

            let token = set.begin_drag(id).unwrap();
            set.update_drag(token, pointer, false).unwrap();

            let after = set.rect(id).unwrap();
            prop_assert_eq!(after.top_left(), pointer);
            prop_assert_eq!(after.width(), before.width());
            prop_assert_eq!(after.height(), before.height());
        }

        /// Property: export geometry is pixel-exact to the presets for any
        /// scale and any rectangle position.
        #[test]
        fn prop_export_sizes_exact(
            space in space_strategy(),
            pointer in pointer_strategy(),
            id in 0usize..4,
        ) {
            let mut set = CropSet::new(default_presets());
            set.place_initial(&space);

            let token = set.begin_drag(id).unwrap();
            set.update_drag(token, pointer, true).unwrap();
            set.end_drag(token);

            for (i, region) in set.export_geometry(&space).iter().enumerate() {
                let preset = set.preset(i).unwrap();
                prop_assert_eq!(region.rect.width(), preset.target_width as i32);
                prop_assert_eq!(region.rect.height(), preset.target_height as i32);
            }
        }
    }
}
