//! Tap/click input
//!
//! Pointer and touch events are reduced to a drop x coordinate in canvas
//! pixels. No clamping happens here; the walls keep blocks in the arena.

use glam::Vec2;

/// A tap in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub enum TapEvent {
    /// Mouse/pointer press
    Pointer { pos: Vec2 },
    /// Touch start with every active touch point
    Touch { points: Vec<Vec2> },
}

impl TapEvent {
    /// Horizontal drop position: the pointer, or the first touch point
    pub fn drop_x(&self) -> Option<f32> {
        match self {
            TapEvent::Pointer { pos } => Some(pos.x),
            TapEvent::Touch { points } => points.first().map(|p| p.x),
        }
    }
}

/// Convert a client (page) coordinate to canvas pixels
#[inline]
pub fn client_to_canvas(client: Vec2, canvas_left: f32, canvas_top: f32) -> Vec2 {
    Vec2::new(client.x - canvas_left, client.y - canvas_top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_drop_x() {
        let tap = TapEvent::Pointer {
            pos: Vec2::new(123.0, 456.0),
        };
        assert_eq!(tap.drop_x(), Some(123.0));
    }

    #[test]
    fn test_touch_uses_first_point() {
        let tap = TapEvent::Touch {
            points: vec![Vec2::new(10.0, 0.0), Vec2::new(90.0, 0.0)],
        };
        assert_eq!(tap.drop_x(), Some(10.0));
        assert_eq!(TapEvent::Touch { points: vec![] }.drop_x(), None);
    }

    #[test]
    fn test_client_to_canvas() {
        let p = client_to_canvas(Vec2::new(50.0, 100.0), 0.0, 60.0);
        assert_eq!(p, Vec2::new(50.0, 40.0));
    }
}
