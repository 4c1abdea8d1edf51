//! Placement of frames inside the window.

use jetclock_common::SlotHour;

/// A rectangle in logical window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    /// The whole window.
    pub fn full(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn to_wry(self) -> wry::Rect {
        wry::Rect {
            position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(self.x, self.y)),
            size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(self.width, self.height)),
        }
    }
}

/// Square of side `slot_size` centered on the clock-face position of
/// `hour`, touching the edge of the inscribed circle.
pub fn slot_rect(hour: SlotHour, width: f64, height: f64, slot_size: f64) -> FrameRect {
    let radius = width.min(height) / 2.0 - slot_size / 2.0;
    let angle = hour.angle_degrees().to_radians();
    let cx = width / 2.0 + radius * angle.sin();
    let cy = height / 2.0 - radius * angle.cos();
    FrameRect {
        x: cx - slot_size / 2.0,
        y: cy - slot_size / 2.0,
        width: slot_size,
        height: slot_size,
    }
}
