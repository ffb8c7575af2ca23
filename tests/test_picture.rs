//! Tests for `pictap::picture` - screen rectangle math, touchability,
//! and transparency sampling.

use std::cell::Cell;

use pictap::picture::{PictureView, is_touchable, is_transparent, screen_rect};

// -- Test picture ---------------------------------------------

/// Minimal picture whose alpha sampling records where it was asked.
struct TestPicture {
    x: f64,
    y: f64,
    anchor: (f64, f64),
    scale: (f64, f64),
    size: (f64, f64),
    visible: bool,
    bitmap: bool,
    alpha: u8,
    sampled: Cell<Option<(f64, f64)>>,
}

impl TestPicture {
    fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            anchor: (0.0, 0.0),
            scale: (1.0, 1.0),
            size: (w, h),
            visible: true,
            bitmap: true,
            alpha: 255,
            sampled: Cell::new(None),
        }
    }
}

impl PictureView for TestPicture {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn anchor(&self) -> (f64, f64) {
        self.anchor
    }

    fn scale(&self) -> (f64, f64) {
        self.scale
    }

    fn size(&self) -> (f64, f64) {
        self.size
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn has_bitmap(&self) -> bool {
        self.bitmap
    }

    fn alpha_at(&self, bx: f64, by: f64) -> u8 {
        self.sampled.set(Some((bx, by)));
        self.alpha
    }
}

// -- Screen rectangle -----------------------------------------

#[test]
fn test_rect_default_anchor() {
    let p = TestPicture::new(10.0, 20.0, 100.0, 50.0);
    let r = screen_rect(&p);
    assert_eq!((r.min_x, r.min_y, r.max_x, r.max_y), (10.0, 20.0, 110.0, 70.0));
}

#[test]
fn test_rect_centered_anchor() {
    let mut p = TestPicture::new(100.0, 100.0, 40.0, 20.0);
    p.anchor = (0.5, 0.5);
    let r = screen_rect(&p);
    assert_eq!((r.min_x, r.min_y, r.max_x, r.max_y), (80.0, 90.0, 120.0, 110.0));
}

#[test]
fn test_rect_scaled() {
    let p = {
        let mut p = TestPicture::new(0.0, 0.0, 10.0, 10.0);
        p.scale = (2.0, 3.0);
        p
    };
    let r = screen_rect(&p);
    assert_eq!((r.max_x, r.max_y), (20.0, 30.0));
}

#[test]
fn test_rect_negative_scale_normalized() {
    let mut p = TestPicture::new(50.0, 50.0, 10.0, 10.0);
    p.scale = (-2.0, 1.0);
    let r = screen_rect(&p);
    // Mirrored horizontally: the rectangle extends left of the position.
    assert_eq!((r.min_x, r.max_x), (30.0, 50.0));
    assert!(r.min_x <= r.max_x && r.min_y <= r.max_y);
}

#[test]
fn test_rect_bounds_inclusive() {
    let p = TestPicture::new(10.0, 10.0, 20.0, 20.0);
    let r = screen_rect(&p);
    assert!(r.contains(10.0, 10.0));
    assert!(r.contains(30.0, 30.0));
    assert!(r.contains(20.0, 20.0));
    assert!(!r.contains(9.9, 10.0));
    assert!(!r.contains(30.1, 30.0));
}

// -- Touchability ---------------------------------------------

#[test]
fn test_touchable_defaults() {
    let p = TestPicture::new(0.0, 0.0, 10.0, 10.0);
    assert!(is_touchable(&p));
}

#[test]
fn test_not_touchable_without_bitmap() {
    let mut p = TestPicture::new(0.0, 0.0, 10.0, 10.0);
    p.bitmap = false;
    assert!(!is_touchable(&p));
}

#[test]
fn test_not_touchable_when_hidden() {
    let mut p = TestPicture::new(0.0, 0.0, 10.0, 10.0);
    p.visible = false;
    assert!(!is_touchable(&p));
}

#[test]
fn test_not_touchable_with_zero_scale() {
    let mut p = TestPicture::new(0.0, 0.0, 10.0, 10.0);
    p.scale = (0.0, 1.0);
    assert!(!is_touchable(&p));
    p.scale = (1.0, 0.0);
    assert!(!is_touchable(&p));
}

#[test]
fn test_negative_scale_is_touchable() {
    let mut p = TestPicture::new(0.0, 0.0, 10.0, 10.0);
    p.scale = (-1.0, -1.0);
    assert!(is_touchable(&p));
}

// -- Transparency ---------------------------------------------

#[test]
fn test_opaque_pixel_is_not_transparent() {
    let p = TestPicture::new(0.0, 0.0, 10.0, 10.0);
    assert!(!is_transparent(&p, 5.0, 5.0));
}

#[test]
fn test_zero_alpha_is_transparent() {
    let mut p = TestPicture::new(0.0, 0.0, 10.0, 10.0);
    p.alpha = 0;
    assert!(is_transparent(&p, 5.0, 5.0));
}

#[test]
fn test_low_but_nonzero_alpha_counts_as_hit() {
    let mut p = TestPicture::new(0.0, 0.0, 10.0, 10.0);
    p.alpha = 1;
    assert!(!is_transparent(&p, 5.0, 5.0));
}

#[test]
fn test_sample_point_maps_into_bitmap_space() {
    // Anchored center, doubled scale: the screen center must map back to
    // the bitmap center regardless of scale.
    let mut p = TestPicture::new(100.0, 50.0, 40.0, 30.0);
    p.anchor = (0.5, 0.5);
    p.scale = (2.0, 2.0);
    let _ = is_transparent(&p, 100.0, 50.0);
    assert_eq!(p.sampled.get(), Some((20.0, 15.0)));
}

#[test]
fn test_sample_point_accounts_for_offset_and_scale() {
    let mut p = TestPicture::new(100.0, 50.0, 40.0, 30.0);
    p.anchor = (0.5, 0.5);
    p.scale = (2.0, 2.0);
    // 10 screen pixels right of the anchor = 5 bitmap pixels at scale 2.
    let _ = is_transparent(&p, 110.0, 50.0);
    assert_eq!(p.sampled.get(), Some((25.0, 15.0)));
}
