//! Three-band horizontal gradient synthesis.
//!
//! Four anchor colors are sampled at the boundary points and each band
//! interpolates linearly between its two anchors:
//! `color = (1 - t) * start + t * end`, with `t = offset / span`.
//!
//! The gradient only varies along x, so one strip of `width` pixels is
//! computed and copied into every row of the output.

use image::{Rgb, RgbImage};

use crate::boundary::{Band, BoundaryPoints};
use crate::error::{Error, Result};

/// Colors sampled at the four boundary points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorColors {
    /// Color at `(left_x, 0)`.
    pub left: Rgb<u8>,
    /// Color at `(one_third_x, one_third_y)`.
    pub one_third: Rgb<u8>,
    /// Color at `(two_thirds_x, two_thirds_y)`.
    pub two_thirds: Rgb<u8>,
    /// Color at `(right_x, 0)`.
    pub right: Rgb<u8>,
}

impl AnchorColors {
    /// Sample the anchor colors of `image` at `points`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if any point lies outside the image.
    pub fn sample(image: &RgbImage, points: &BoundaryPoints) -> Result<Self> {
        let (width, height) = image.dimensions();
        if points.right_x() >= width
            || points.one_third_y() >= height
            || points.two_thirds_y() >= height
        {
            return Err(Error::InvalidDimensions(format!(
                "boundary points ({points}) fall outside {width}x{height} image"
            )));
        }

        Ok(Self {
            left: *image.get_pixel(points.left_x(), 0),
            one_third: *image.get_pixel(points.one_third_x(), points.one_third_y()),
            two_thirds: *image.get_pixel(points.two_thirds_x(), points.two_thirds_y()),
            right: *image.get_pixel(points.right_x(), 0),
        })
    }

    /// Start and end anchors of a band.
    #[must_use]
    pub fn endpoints(&self, band: Band) -> (Rgb<u8>, Rgb<u8>) {
        match band {
            Band::Left => (self.left, self.one_third),
            Band::Middle => (self.one_third, self.two_thirds),
            Band::Right => (self.two_thirds, self.right),
        }
    }
}

/// Interpolation fraction for the column at `offset` within a band.
///
/// A zero span yields `0.0`, i.e. the start anchor.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn band_fraction(offset: u32, span: u32) -> f32 {
    if span == 0 {
        return 0.0;
    }
    offset as f32 / span as f32
}

/// Linear interpolation between two colors, channel by channel.
///
/// Values are rounded to the nearest integer and clamped to `0..=255`.
#[must_use]
pub fn interpolate(start: Rgb<u8>, end: Rgb<u8>, t: f32) -> Rgb<u8> {
    let mut out = Rgb([0u8; 3]);
    for ch in 0..3 {
        let value = (1.0 - t) * f32::from(start[ch]) + t * f32::from(end[ch]);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            out[ch] = value.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Colors of every column in a band, left to right.
///
/// A degenerate band (zero span) yields a single start-anchor column.
#[must_use]
pub fn band_colors(points: &BoundaryPoints, anchors: &AnchorColors, band: Band) -> Vec<Rgb<u8>> {
    let span = points.span(band);
    let (start, end) = anchors.endpoints(band);
    if span == 0 {
        log::debug!("degenerate {band} band at column {}", points.columns(band).start);
        return vec![start];
    }

    let columns = points.columns(band);
    (0..columns.end - columns.start)
        .map(|offset| interpolate(start, end, band_fraction(offset, span)))
        .collect()
}

/// Build the single-row gradient strip of length `width`.
///
/// Columns outside `[left_x, right_x]` stay black. Bands are written in
/// [`Band::ALL`] order, so a later band wins a column it shares with a
/// degenerate earlier band.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] if `right_x` does not fit in `width`.
pub fn gradient_strip(
    width: u32,
    points: &BoundaryPoints,
    anchors: &AnchorColors,
) -> Result<Vec<Rgb<u8>>> {
    if points.right_x() >= width {
        return Err(Error::InvalidDimensions(format!(
            "right boundary {} outside strip of width {width}",
            points.right_x()
        )));
    }

    let mut strip = vec![Rgb([0u8; 3]); width as usize];
    for band in Band::ALL {
        let start = points.columns(band).start as usize;
        for (i, color) in band_colors(points, anchors, band).into_iter().enumerate() {
            strip[start + i] = color;
        }
    }
    Ok(strip)
}

/// Copy the strip's bytes into every row of `output`.
fn fill_rows(output: &mut RgbImage, strip: &[Rgb<u8>]) {
    let row: Vec<u8> = strip.iter().flat_map(|px| px.0).collect();
    if row.is_empty() {
        return;
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        output
            .par_chunks_exact_mut(row.len())
            .for_each(|dst| dst.copy_from_slice(&row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        output
            .chunks_exact_mut(row.len())
            .for_each(|dst| dst.copy_from_slice(&row));
    }
}

/// Synthesize the three-band gradient for a color image.
///
/// Returns a new image of the same dimensions whose rows are all equal to
/// the interpolated strip. The input is not modified.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] if the boundary points fall outside
/// the image.
pub fn synthesize(image: &RgbImage, points: &BoundaryPoints) -> Result<RgbImage> {
    let anchors = AnchorColors::sample(image, points)?;
    let strip = gradient_strip(image.width(), points, &anchors)?;

    let mut output = RgbImage::new(image.width(), image.height());
    fill_rows(&mut output, &strip);
    Ok(output)
}
