//! File-level pipeline: decode, locate, synthesize, encode.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};

use crate::boundary::{self, BoundaryPoints};
use crate::error::{Error, Result};
use crate::gradient;
use crate::subtract;

/// What to write for each processed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The synthesized gradient itself.
    #[default]
    Gradient,
    /// The input with the synthesized gradient subtracted.
    Subtract,
}

impl OutputMode {
    fn suffix(self) -> &'static str {
        match self {
            OutputMode::Gradient => "gradient",
            OutputMode::Subtract => "subtracted",
        }
    }
}

/// Options controlling gradient processing.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Intensity at or below which a pixel counts as sky background.
    pub threshold: u8,
    /// Number of edge columns scanned from each side.
    pub num_columns: u32,
    /// What to write for each image.
    pub mode: OutputMode,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            threshold: 128,
            num_columns: 70,
            mode: OutputMode::Gradient,
            verbose: false,
            quiet: false,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Boundary points located in the image, when the scan succeeded.
    pub points: Option<BoundaryPoints>,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            success: false,
            points: None,
            message,
        }
    }
}

/// Output of [`render`]: the located points and the image to write.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Boundary points used for the gradient.
    pub points: BoundaryPoints,
    /// Gradient or background-subtracted image, depending on the mode.
    pub image: RgbImage,
}

/// Locate boundaries in `intensity` and synthesize the gradient for `color`.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] if the two images differ in size,
/// before any scanning happens, and otherwise any error from
/// [`boundary::locate`] or [`gradient::synthesize`].
pub fn generate_gradient(
    intensity: &GrayImage,
    color: &RgbImage,
    threshold: u8,
    num_columns: u32,
) -> Result<(BoundaryPoints, RgbImage)> {
    if intensity.dimensions() != color.dimensions() {
        return Err(Error::InvalidDimensions(format!(
            "intensity map is {}x{} but color image is {}x{}",
            intensity.width(),
            intensity.height(),
            color.width(),
            color.height()
        )));
    }

    let points = boundary::locate(intensity, threshold, num_columns)?;
    let gradient = gradient::synthesize(color, &points)?;
    Ok((points, gradient))
}

/// Run the full pipeline on a decoded image.
///
/// The intensity map is the image's luma channel.
///
/// # Errors
///
/// Propagates any error from [`generate_gradient`].
pub fn render(image: &DynamicImage, opts: &ProcessOptions) -> Result<Rendered> {
    let color = image.to_rgb8();
    let intensity = image.to_luma8();
    let (points, gradient) =
        generate_gradient(&intensity, &color, opts.threshold, opts.num_columns)?;

    let image = match opts.mode {
        OutputMode::Gradient => gradient,
        OutputMode::Subtract => subtract::subtract_gradient(&color, &gradient)?,
    };
    Ok(Rendered { points, image })
}

/// Create the parent directory of `output` if it does not exist yet.
fn ensure_parent(output: &Path) -> std::io::Result<()> {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

/// Process a single image file: load, locate, synthesize, save.
#[must_use]
pub fn process_file(input: &Path, output: &Path, opts: &ProcessOptions) -> ProcessResult {
    let dyn_img = match image::open(input) {
        Ok(img) => img,
        Err(e) => return ProcessResult::failed(input, format!("Failed to load: {e}")),
    };

    let rendered = match render(&dyn_img, opts) {
        Ok(r) => r,
        Err(e) => return ProcessResult::failed(input, e.to_string()),
    };
    log::debug!("{}: {}", input.display(), rendered.points);

    if let Err(e) = ensure_parent(output) {
        return ProcessResult::failed(input, format!("Failed to create output directory: {e}"));
    }

    match save_image(&rendered.image, output) {
        Ok(()) => ProcessResult {
            path: input.to_path_buf(),
            success: true,
            points: Some(rendered.points),
            message: match opts.mode {
                OutputMode::Gradient => "Gradient generated".to_string(),
                OutputMode::Subtract => "Gradient subtracted".to_string(),
            },
        },
        Err(e) => ProcessResult::failed(input, format!("Failed to save: {e}")),
    }
}

/// Subtract an existing gradient image file from an image file.
#[must_use]
pub fn subtract_file(input: &Path, gradient: &Path, output: &Path) -> ProcessResult {
    let (img, grad) = match (image::open(input), image::open(gradient)) {
        (Ok(img), Ok(grad)) => (img, grad),
        (Err(e), _) | (_, Err(e)) => {
            return ProcessResult::failed(input, format!("Failed to load: {e}"));
        }
    };

    let subtracted = match subtract::subtract_gradient(&img.to_rgb8(), &grad.to_rgb8()) {
        Ok(s) => s,
        Err(e) => return ProcessResult::failed(input, e.to_string()),
    };

    if let Err(e) = ensure_parent(output) {
        return ProcessResult::failed(input, format!("Failed to create output directory: {e}"));
    }

    match save_image(&subtracted, output) {
        Ok(()) => ProcessResult {
            path: input.to_path_buf(),
            success: true,
            points: None,
            message: format!("Subtracted {}", gradient.display()),
        },
        Err(e) => ProcessResult::failed(input, format!("Failed to save: {e}")),
    }
}

/// Process all supported images in a directory.
///
/// Uses parallel iteration when the `parallel` feature is enabled (via rayon).
/// Returns a [`ProcessResult`] for each image found.
#[must_use]
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    opts: &ProcessOptions,
) -> Vec<ProcessResult> {
    let inputs: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_supported_image(p))
            .collect(),
        Err(e) => {
            return vec![ProcessResult::failed(
                input_dir,
                format!("Failed to read directory: {e}"),
            )];
        }
    };

    if !output_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            return vec![ProcessResult::failed(
                output_dir,
                format!("Failed to create output directory: {e}"),
            )];
        }
    }

    let run = |input_path: &PathBuf| {
        let output_path = match input_path.file_name() {
            Some(name) => output_dir.join(name),
            None => return ProcessResult::failed(input_path, "No file name".to_string()),
        };
        let result = process_file(input_path, &output_path, opts);
        if !result.success {
            log::warn!("{}: {}", input_path.display(), result.message);
        }
        result
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        inputs.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        inputs.iter().map(run).collect()
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Save an RGB image with format-specific quality settings.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(img)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            img.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"sky.jpg"` becomes `"sky_gradient.jpg"` in gradient mode and
/// `"sky_subtracted.jpg"` in subtract mode.
#[must_use]
pub fn default_output_path(input: &Path, mode: OutputMode) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_{}.{ext}", mode.suffix()))
}
