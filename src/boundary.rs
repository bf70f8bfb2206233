//! Threshold scans that locate the starless sky boundaries.
//!
//! Four independent scans run over the intensity map:
//! 1. **Left**: columns `0..num_columns`, each scanned top to bottom
//! 2. **Right**: columns `width-1` down to `width-num_columns`, same row order
//! 3. **One third**: the column at `width / 3`, top to bottom
//! 4. **Two thirds**: the column at `2 * (width / 3)`, top to bottom
//!
//! A pixel qualifies when its intensity is at or below the threshold. Each
//! scan stops at the first qualifying pixel, so the edge scans report the
//! outermost qualifying column on their side.

use std::fmt;
use std::ops::Range;

use image::GrayImage;

use crate::error::{Error, Result, Scan};

/// One of the three column bands of the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// From the left boundary up to (excluding) the one-third column.
    Left,
    /// From the one-third column up to (excluding) the two-thirds column.
    Middle,
    /// From the two-thirds column up to and including the right boundary.
    Right,
}

impl Band {
    /// All bands, in the order they are written.
    pub const ALL: [Band; 3] = [Band::Left, Band::Middle, Band::Right];
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Band::Left => "left",
            Band::Middle => "middle",
            Band::Right => "right",
        };
        f.write_str(name)
    }
}

/// The six reference values found by [`locate`].
///
/// Constructed only through [`BoundaryPoints::new`] (or [`locate`]), which
/// guarantees `left_x <= one_third_x <= two_thirds_x <= right_x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPoints {
    left_x: u32,
    one_third_x: u32,
    one_third_y: u32,
    two_thirds_x: u32,
    two_thirds_y: u32,
    right_x: u32,
}

impl BoundaryPoints {
    /// Build a set of boundary points, checking the column ordering.
    ///
    /// Equal adjacent columns are accepted; the band between them is
    /// degenerate and renders as a single column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryOutOfOrder`] if the columns are not
    /// non-decreasing from left to right.
    pub fn new(
        left_x: u32,
        one_third_x: u32,
        one_third_y: u32,
        two_thirds_x: u32,
        two_thirds_y: u32,
        right_x: u32,
    ) -> Result<Self> {
        if left_x > one_third_x || one_third_x > two_thirds_x || two_thirds_x > right_x {
            return Err(Error::BoundaryOutOfOrder {
                left_x,
                one_third_x,
                two_thirds_x,
                right_x,
            });
        }

        Ok(Self {
            left_x,
            one_third_x,
            one_third_y,
            two_thirds_x,
            two_thirds_y,
            right_x,
        })
    }

    /// Left boundary column.
    #[must_use]
    pub fn left_x(&self) -> u32 {
        self.left_x
    }

    /// Column at one third of the width.
    #[must_use]
    pub fn one_third_x(&self) -> u32 {
        self.one_third_x
    }

    /// First qualifying row in the one-third column.
    #[must_use]
    pub fn one_third_y(&self) -> u32 {
        self.one_third_y
    }

    /// Column at two thirds of the width.
    #[must_use]
    pub fn two_thirds_x(&self) -> u32 {
        self.two_thirds_x
    }

    /// First qualifying row in the two-thirds column.
    #[must_use]
    pub fn two_thirds_y(&self) -> u32 {
        self.two_thirds_y
    }

    /// Right boundary column.
    #[must_use]
    pub fn right_x(&self) -> u32 {
        self.right_x
    }

    /// The values as a tuple, in `(left_x, one_third_x, one_third_y,
    /// two_thirds_x, two_thirds_y, right_x)` order.
    #[must_use]
    pub fn as_tuple(&self) -> (u32, u32, u32, u32, u32, u32) {
        (
            self.left_x,
            self.one_third_x,
            self.one_third_y,
            self.two_thirds_x,
            self.two_thirds_y,
            self.right_x,
        )
    }

    /// Distance between the two anchor columns of a band.
    #[must_use]
    pub fn span(&self, band: Band) -> u32 {
        match band {
            Band::Left => self.one_third_x - self.left_x,
            Band::Middle => self.two_thirds_x - self.one_third_x,
            Band::Right => self.right_x - self.two_thirds_x,
        }
    }

    /// Output columns covered by a band.
    ///
    /// Left and middle bands are half-open; the right band includes
    /// `right_x`. A degenerate band covers only its start column.
    #[must_use]
    pub fn columns(&self, band: Band) -> Range<u32> {
        let (start, end) = match band {
            Band::Left => (self.left_x, self.one_third_x),
            Band::Middle => (self.one_third_x, self.two_thirds_x),
            Band::Right => (self.two_thirds_x, self.right_x + 1),
        };
        if self.span(band) == 0 {
            start..start + 1
        } else {
            start..end
        }
    }
}

impl fmt::Display for BoundaryPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left={}, one-third=({}, {}), two-thirds=({}, {}), right={}",
            self.left_x,
            self.one_third_x,
            self.one_third_y,
            self.two_thirds_x,
            self.two_thirds_y,
            self.right_x
        )
    }
}

/// First row in column `x` whose intensity is at or below `threshold`.
fn first_row_at_or_below(intensity: &GrayImage, x: u32, threshold: u8) -> Option<u32> {
    (0..intensity.height()).find(|&y| intensity.get_pixel(x, y)[0] <= threshold)
}

/// First column, in iteration order, holding any pixel at or below `threshold`.
fn first_column_at_or_below(
    intensity: &GrayImage,
    mut columns: impl Iterator<Item = u32>,
    threshold: u8,
) -> Option<u32> {
    columns.find(|&x| first_row_at_or_below(intensity, x, threshold).is_some())
}

/// Locate the boundary points of an intensity map.
///
/// # Arguments
///
/// * `intensity` - Grayscale intensity map.
/// * `threshold` - Inclusive intensity cutoff; pixels `<= threshold` are background.
/// * `num_columns` - How many edge columns to scan from each side.
///
/// # Errors
///
/// - [`Error::InvalidDimensions`] if the image is empty or `num_columns` is
///   zero or wider than the image.
/// - [`Error::NoBoundaryFound`] naming the first scan (left, right, one-third,
///   two-thirds) that found no qualifying pixel.
///
/// An edge scan can only pass an interior column that holds no qualifying
/// pixel, in which case the interior scan fails, so successfully located
/// points always satisfy the column ordering.
pub fn locate(intensity: &GrayImage, threshold: u8, num_columns: u32) -> Result<BoundaryPoints> {
    let (width, height) = intensity.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions(format!(
            "intensity map is empty ({width}x{height})"
        )));
    }
    if num_columns == 0 || num_columns > width {
        return Err(Error::InvalidDimensions(format!(
            "num_columns must be in 1..={width}, got {num_columns}"
        )));
    }

    let left_x = first_column_at_or_below(intensity, 0..num_columns, threshold)
        .ok_or(Error::NoBoundaryFound { scan: Scan::Left })?;

    let right_x = first_column_at_or_below(intensity, (width - num_columns..width).rev(), threshold)
        .ok_or(Error::NoBoundaryFound { scan: Scan::Right })?;

    let one_third_x = width / 3;
    let one_third_y = first_row_at_or_below(intensity, one_third_x, threshold)
        .ok_or(Error::NoBoundaryFound {
            scan: Scan::OneThird,
        })?;

    let two_thirds_x = 2 * (width / 3);
    let two_thirds_y = first_row_at_or_below(intensity, two_thirds_x, threshold)
        .ok_or(Error::NoBoundaryFound {
            scan: Scan::TwoThirds,
        })?;

    let points = BoundaryPoints::new(
        left_x,
        one_third_x,
        one_third_y,
        two_thirds_x,
        two_thirds_y,
        right_x,
    )?;
    log::debug!("located boundaries in {width}x{height} map: {points}");

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// 10 rows x 9 columns, bright everywhere except a few dark pixels.
    fn scenario_map() -> GrayImage {
        let mut img = GrayImage::from_pixel(9, 10, Luma([200]));
        for y in 0..10 {
            img.put_pixel(0, y, Luma([0]));
            img.put_pixel(8, y, Luma([0]));
        }
        img.put_pixel(3, 2, Luma([0]));
        img.put_pixel(6, 5, Luma([0]));
        img
    }

    #[test]
    fn locate_finds_scenario_points() {
        let points = locate(&scenario_map(), 50, 3).unwrap();
        assert_eq!(points.as_tuple(), (0, 3, 2, 6, 5, 8));
    }

    #[test]
    fn located_points_respect_ordering() {
        let points = locate(&scenario_map(), 50, 3).unwrap();
        assert!(points.left_x() < points.one_third_x());
        assert!(points.one_third_x() < points.two_thirds_x());
        assert!(points.two_thirds_x() <= points.right_x());
        assert!(points.right_x() < 9);
        assert!(points.one_third_y() < 10 && points.two_thirds_y() < 10);
    }

    #[test]
    fn edge_scans_stop_at_outermost_match() {
        let mut img = scenario_map();
        for y in 0..10 {
            img.put_pixel(1, y, Luma([0]));
            img.put_pixel(7, y, Luma([0]));
        }
        let points = locate(&img, 50, 3).unwrap();
        assert_eq!(points.left_x(), 0);
        assert_eq!(points.right_x(), 8);
    }

    #[test]
    fn edge_scan_skips_bright_columns() {
        let mut img = scenario_map();
        for y in 0..10 {
            img.put_pixel(0, y, Luma([200]));
            img.put_pixel(8, y, Luma([200]));
        }
        // Only a single dark pixel, low in column 1 / column 7.
        img.put_pixel(1, 9, Luma([10]));
        img.put_pixel(7, 9, Luma([10]));
        let points = locate(&img, 50, 3).unwrap();
        assert_eq!(points.left_x(), 1);
        assert_eq!(points.right_x(), 7);
    }

    #[test]
    fn interior_scans_report_first_row() {
        let mut img = scenario_map();
        img.put_pixel(3, 7, Luma([0]));
        img.put_pixel(6, 1, Luma([0]));
        let points = locate(&img, 50, 3).unwrap();
        assert_eq!(points.one_third_y(), 2);
        assert_eq!(points.two_thirds_y(), 1);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut img = GrayImage::from_pixel(9, 4, Luma([50]));
        img.put_pixel(0, 0, Luma([51]));
        let points = locate(&img, 50, 3).unwrap();
        assert_eq!(points.as_tuple(), (0, 3, 0, 6, 0, 8));

        let bright = GrayImage::from_pixel(9, 4, Luma([51]));
        assert!(locate(&bright, 50, 3).is_err());
    }

    #[test]
    fn all_bright_map_reports_left_scan() {
        let img = GrayImage::from_pixel(9, 10, Luma([200]));
        let err = locate(&img, 50, 3).unwrap_err();
        assert!(matches!(err, Error::NoBoundaryFound { scan: Scan::Left }));
    }

    #[test]
    fn missing_right_boundary_is_reported() {
        let mut img = scenario_map();
        // Scanning only columns 8 and 7 would hit column 8; blank it out.
        for y in 0..10 {
            img.put_pixel(8, y, Luma([200]));
        }
        let err = locate(&img, 50, 2).unwrap_err();
        assert!(matches!(err, Error::NoBoundaryFound { scan: Scan::Right }));
    }

    #[test]
    fn missing_interior_boundaries_are_reported() {
        let mut img = scenario_map();
        img.put_pixel(3, 2, Luma([200]));
        let err = locate(&img, 50, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::NoBoundaryFound {
                scan: Scan::OneThird
            }
        ));

        let mut img = scenario_map();
        img.put_pixel(6, 5, Luma([200]));
        let err = locate(&img, 50, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::NoBoundaryFound {
                scan: Scan::TwoThirds
            }
        ));
    }

    #[test]
    fn num_columns_is_validated() {
        let img = scenario_map();
        assert!(matches!(
            locate(&img, 50, 0),
            Err(Error::InvalidDimensions(_))
        ));
        assert!(matches!(
            locate(&img, 50, 10),
            Err(Error::InvalidDimensions(_))
        ));
        assert!(locate(&img, 50, 9).is_ok());
    }

    #[test]
    fn empty_map_is_rejected() {
        let img = GrayImage::new(0, 0);
        assert!(matches!(
            locate(&img, 50, 1),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn wide_edge_scan_cannot_cross_interior_column() {
        // With num_columns past the one-third column, the left scan reaching
        // column 4 means column 3 had no background pixel at all.
        let mut img = scenario_map();
        for y in 0..10 {
            img.put_pixel(0, y, Luma([200]));
            img.put_pixel(4, y, Luma([0]));
        }
        img.put_pixel(3, 2, Luma([200]));
        let err = locate(&img, 50, 5).unwrap_err();
        assert!(matches!(
            err,
            Error::NoBoundaryFound {
                scan: Scan::OneThird
            }
        ));
    }

    #[test]
    fn new_rejects_misordered_columns() {
        assert!(BoundaryPoints::new(4, 3, 0, 6, 0, 8).is_err());
        assert!(BoundaryPoints::new(0, 3, 0, 6, 0, 5).is_err());
        assert!(BoundaryPoints::new(3, 3, 0, 6, 0, 6).is_ok());
    }

    #[test]
    fn band_columns_and_spans() {
        let points = BoundaryPoints::new(0, 3, 2, 6, 5, 8).unwrap();
        assert_eq!(points.columns(Band::Left), 0..3);
        assert_eq!(points.columns(Band::Middle), 3..6);
        assert_eq!(points.columns(Band::Right), 6..9);
        assert_eq!(points.span(Band::Left), 3);
        assert_eq!(points.span(Band::Right), 2);
    }

    #[test]
    fn degenerate_band_covers_single_column() {
        let points = BoundaryPoints::new(3, 3, 0, 6, 0, 6).unwrap();
        assert_eq!(points.span(Band::Left), 0);
        assert_eq!(points.columns(Band::Left), 3..4);
        assert_eq!(points.columns(Band::Right), 6..7);
    }
}
