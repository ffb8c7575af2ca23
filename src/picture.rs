//! Picture geometry and hit testing.
//!
//! The rendering tree owns picture positions, scale, and bitmaps; the core
//! only observes them through [`PictureView`]. Everything here is a plain
//! function over that seam - no side effects.

/// Read-only view of one picture, implemented by the host's sprite type.
pub trait PictureView {
    /// Screen position of the anchor point.
    fn position(&self) -> (f64, f64);
    /// Fractional anchor offset in [0, 1] × [0, 1].
    fn anchor(&self) -> (f64, f64);
    /// Per-axis scale; negative values mirror the picture.
    fn scale(&self) -> (f64, f64);
    /// Unscaled bitmap size in pixels.
    fn size(&self) -> (f64, f64);
    fn visible(&self) -> bool;
    /// Whether bitmap data is loaded. Guards every alpha sample.
    fn has_bitmap(&self) -> bool;
    /// Alpha at a point in unscaled bitmap space.
    fn alpha_at(&self, bx: f64, by: f64) -> u8;
}

/// Axis-aligned screen rectangle with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ScreenRect {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.min_x && px <= self.max_x && py >= self.min_y && py <= self.max_y
    }
}

/// The picture's current screen rectangle: origin is the position pulled back
/// by the anchor's share of the scaled size. Min/max are normalized so the
/// rectangle stays correct under negative (mirrored) scale.
pub fn screen_rect(view: &impl PictureView) -> ScreenRect {
    let (x, y) = view.position();
    let (ax, ay) = view.anchor();
    let (sx, sy) = view.scale();
    let (w, h) = view.size();

    let screen_w = w * sx;
    let screen_h = h * sy;
    let origin_x = x - ax * screen_w;
    let origin_y = y - ay * screen_h;

    ScreenRect {
        min_x: origin_x.min(origin_x + screen_w),
        min_y: origin_y.min(origin_y + screen_h),
        max_x: origin_x.max(origin_x + screen_w),
        max_y: origin_y.max(origin_y + screen_h),
    }
}

/// A picture can be touched only with a loaded bitmap, while visible, and
/// with non-zero scale on both axes. The scale condition also keeps the
/// transparency mapping free of division by zero.
pub fn is_touchable(view: &impl PictureView) -> bool {
    let (sx, sy) = view.scale();
    view.has_bitmap() && view.visible() && sx != 0.0 && sy != 0.0
}

/// Whether the pointer position lands on a fully transparent pixel. The
/// screen point is mapped back into unscaled bitmap space before sampling.
///
/// Only call behind [`is_touchable`]; the mapping divides by scale and the
/// sample assumes bitmap data is present.
pub fn is_transparent(view: &impl PictureView, px: f64, py: f64) -> bool {
    let (x, y) = view.position();
    let (ax, ay) = view.anchor();
    let (sx, sy) = view.scale();
    let (w, h) = view.size();

    let bx = (px - x) / sx + ax * w;
    let by = (py - y) / sy + ay * h;
    view.alpha_at(bx, by) == 0
}
