//! Slider validity masks.
//!
//! Slider pieces are shipped as rectangles with transparent (or black)
//! padding around the puzzle shape. Only pixels inside the shape should
//! take part in matching.

use slidetrack_common::MaskConfig;

use crate::decode::DecodedImage;

/// Boolean matrix marking pixels that participate in matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    valid: Vec<bool>,
}

impl Mask {
    /// Mask with every pixel valid.
    pub fn full(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Mask with no valid pixel.
    pub fn empty(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| false)
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut valid = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                valid.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            valid,
        }
    }

    /// Derive the mask for a slider image.
    ///
    /// With an alpha plane a pixel is valid when its alpha exceeds
    /// `alpha_threshold`. Without one, pixels brighter than
    /// `luma_threshold` are valid so black padding drops out.
    pub fn derive(image: &DecodedImage, config: &MaskConfig) -> Self {
        let mask = match image.alpha() {
            Some(alpha) => Self::from_fn(image.width(), image.height(), |x, y| {
                alpha.get_pixel(x, y)[0] > config.alpha_threshold
            }),
            None => {
                let gray = image.gray();
                Self::from_fn(image.width(), image.height(), |x, y| {
                    gray.get_pixel(x, y)[0] > config.luma_threshold
                })
            }
        };
        tracing::debug!(
            valid = mask.count_valid(),
            total = mask.valid.len(),
            from_alpha = image.alpha().is_some(),
            "Derived slider mask"
        );
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` is valid; out-of-range coordinates are not.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.valid[y as usize * self.width as usize + x as usize]
    }

    pub fn count_valid(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }

    /// Valid pixel coordinates in row-major order.
    pub fn valid_coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width as usize;
        self.valid
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(move |(i, _)| ((i % width) as u32, (i / width) as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_alpha_mask() {
        let gray = GrayImage::from_pixel(3, 2, Luma([200]));
        let alpha = GrayImage::from_fn(3, 2, |x, _| Luma([if x == 0 { 0 } else { 255 }]));
        let image = DecodedImage::from_planes(gray, Some(alpha));

        let mask = Mask::derive(&image, &MaskConfig::default());
        assert_eq!(mask.count_valid(), 4);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 1));
    }

    #[test]
    fn test_luma_mask_drops_black_padding() {
        let gray = GrayImage::from_fn(4, 1, |x, _| Luma([[0, 1, 2, 255][x as usize]]));
        let image = DecodedImage::from_planes(gray, None);

        let mask = Mask::derive(&image, &MaskConfig::default());
        assert_eq!(mask.valid_coords().collect::<Vec<_>>(), vec![(2, 0), (3, 0)]);
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        let mask = Mask::full(2, 2);
        assert!(mask.get(1, 1));
        assert!(!mask.get(2, 0));
        assert_eq!(Mask::empty(5, 5).count_valid(), 0);
    }
}
