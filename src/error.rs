//! Error types for the sky-gradient crate.

use std::fmt;

/// One of the four boundary scans performed over the intensity map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Column scan inward from the left edge.
    Left,
    /// Column scan inward from the right edge.
    Right,
    /// Row scan down the column at one third of the width.
    OneThird,
    /// Row scan down the column at two thirds of the width.
    TwoThirds,
}

impl fmt::Display for Scan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scan::Left => "left",
            Scan::Right => "right",
            Scan::OneThird => "one-third",
            Scan::TwoThirds => "two-thirds",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while locating boundaries or synthesizing gradients.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No pixel in the scan was at or below the threshold.
    #[error("no boundary found in {scan} scan")]
    NoBoundaryFound {
        /// The scan that came up empty.
        scan: Scan,
    },

    /// Image sizes or scan parameters do not fit together.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Boundary columns are not ordered left to right.
    #[error(
        "boundary columns out of order (left={left_x}, one-third={one_third_x}, \
         two-thirds={two_thirds_x}, right={right_x})"
    )]
    BoundaryOutOfOrder {
        /// Left boundary column.
        left_x: u32,
        /// Column at one third of the width.
        one_third_x: u32,
        /// Column at two thirds of the width.
        two_thirds_x: u32,
        /// Right boundary column.
        right_x: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
