//! Unit conversion utilities.
//!
//! DrawingML positions and sizes are stored in EMUs (English Metric Units)
//! and font sizes in hundredths of a point.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const CENTIPOINTS_PER_PT: f64 = 100.0;

#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn emu_to_inches(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_INCH as f64
}

/// Font size in points to the `sz` attribute value of `a:rPr`.
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * CENTIPOINTS_PER_PT).round() as u32
}

/// A rectangle on the slide, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Rect {
    /// Build a rectangle from inch coordinates.
    pub fn from_inches(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            x: inches_to_emu(left),
            y: inches_to_emu(top),
            cx: inches_to_emu(width),
            cy: inches_to_emu(height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_round_trip() {
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(inches_to_emu(0.2), 182_880);
        assert!((emu_to_inches(12_192_000) - 13.333).abs() < 0.001);
    }

    #[test]
    fn test_centipoints() {
        assert_eq!(pt_to_centipoints(14.0), 1400);
        assert_eq!(pt_to_centipoints(10.5), 1050);
    }

    #[test]
    fn test_rect_from_inches() {
        let rect = Rect::from_inches(0.5, 0.5, 5.0, 1.0);
        assert_eq!(rect, Rect { x: 457_200, y: 457_200, cx: 4_572_000, cy: 914_400 });
    }
}
