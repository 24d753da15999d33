//! Geometry of the third-party "watch an advertisement" button.
//!
//! The button lives inside a cross-origin document, so its real bounds are
//! unknown. It is approximated by a fixed box relative to the surface rect.

use core_types::{Point, Rect};

pub const AD_REGION_WIDTH: f32 = 240.0;
pub const AD_REGION_HEIGHT: f32 = 50.0;
/// Vertical position of the region centre as a fraction of surface height.
pub const AD_REGION_VERTICAL_RATIO: f32 = 0.6;

pub fn ad_button_region(surface: Rect) -> Rect {
    let center = Point::new(
        surface.x + surface.width / 2.0,
        surface.y + surface.height * AD_REGION_VERTICAL_RATIO,
    );
    Rect::from_center(center, AD_REGION_WIDTH, AD_REGION_HEIGHT)
}

pub fn in_ad_button_region(surface: Rect, p: Point) -> bool {
    ad_button_region(surface).contains(p)
}
