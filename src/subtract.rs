//! Background gradient removal.

use image::{Rgb, RgbImage};

use crate::error::{Error, Result};

/// Remove a gradient from an image.
///
/// Each subpixel becomes `|image - gradient|`, so pixels matching the
/// gradient go to black and foreground detail is kept.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] if the two images differ in size.
pub fn subtract_gradient(image: &RgbImage, gradient: &RgbImage) -> Result<RgbImage> {
    if image.dimensions() != gradient.dimensions() {
        return Err(Error::InvalidDimensions(format!(
            "image is {}x{} but gradient is {}x{}",
            image.width(),
            image.height(),
            gradient.width(),
            gradient.height()
        )));
    }

    Ok(RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let a = image.get_pixel(x, y);
        let b = gradient.get_pixel(x, y);
        Rgb([
            a[0].abs_diff(b[0]),
            a[1].abs_diff(b[1]),
            a[2].abs_diff(b[2]),
        ])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_is_absolute() {
        let image = RgbImage::from_pixel(4, 3, Rgb([100, 20, 255]));
        let gradient = RgbImage::from_pixel(4, 3, Rgb([40, 90, 255]));
        let out = subtract_gradient(&image, &gradient).unwrap();
        for px in out.pixels() {
            assert_eq!(*px, Rgb([60, 70, 0]));
        }
    }

    #[test]
    fn subtracting_itself_gives_black() {
        let mut image = RgbImage::new(5, 5);
        for (x, y, px) in image.enumerate_pixels_mut() {
            #[allow(clippy::cast_possible_truncation)]
            {
                *px = Rgb([(x * 40) as u8, (y * 30) as u8, 7]);
            }
        }
        let out = subtract_gradient(&image, &image).unwrap();
        assert!(out.pixels().all(|px| *px == Rgb([0, 0, 0])));
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let image = RgbImage::new(4, 3);
        let gradient = RgbImage::new(3, 4);
        let err = subtract_gradient(&image, &gradient).unwrap_err();
        assert!(err.to_string().contains("4x3"));
    }
}
