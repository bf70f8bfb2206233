//! Locate starless sky boundaries and synthesize a background gradient.
//!
//! A grayscale intensity map is scanned for the first background pixels
//! (intensity at or below a threshold) near the left and right edges and in
//! the columns at one and two thirds of the width. The colors at those four
//! points anchor a three-band horizontal gradient that approximates the sky
//! background, ready to be subtracted from the original image.
//!
//! # Quick Start
//!
//! ```no_run
//! use sky_gradient::{boundary, gradient};
//!
//! let img = image::open("nebula.png").unwrap();
//! let points = boundary::locate(&img.to_luma8(), 128, 70).expect("no sky found");
//! let background = gradient::synthesize(&img.to_rgb8(), &points).unwrap();
//! background.save("nebula_gradient.png").unwrap();
//! ```
//!
//! # Files and directories
//!
//! ```no_run
//! use std::path::Path;
//! use sky_gradient::{process_file, OutputMode, ProcessOptions};
//!
//! let opts = ProcessOptions {
//!     mode: OutputMode::Subtract,
//!     ..ProcessOptions::default()
//! };
//! let result = process_file(Path::new("nebula.png"), Path::new("clean.png"), &opts);
//! println!("{}: {}", result.success, result.message);
//! ```

#![deny(missing_docs)]

pub mod boundary;
mod engine;
pub mod error;
pub mod gradient;
pub mod subtract;

pub use boundary::{locate, Band, BoundaryPoints};
pub use engine::{
    default_output_path, generate_gradient, is_supported_image, process_directory, process_file,
    render, save_image, subtract_file, OutputMode, ProcessOptions, ProcessResult, Rendered,
};
pub use error::{Error, Result, Scan};
pub use gradient::{synthesize, AnchorColors};
pub use subtract::subtract_gradient;
