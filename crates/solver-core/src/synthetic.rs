//! Synthetic slider challenges with a known gap position.
//!
//! The background is a textured scene; the gap is the slider shape drawn
//! as a darkened copy of the scene, the way challenge services render it.
//! The slider is the untouched scene patch with transparent corners.

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use rand::Rng;
use slidetrack_challenge_model::SolveRequest;
use slidetrack_image_buffer::{encode_png_base64, DecodeError, DecodedImage};

/// Layout of a generated challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeSpec {
    pub background_width: u32,
    pub background_height: u32,
    pub slider_size: u32,
    /// Left edge of the gap.
    pub gap_x: u32,
    /// Top edge of the gap.
    pub gap_y: u32,
    /// Radius of the transparent corner cut-outs.
    pub corner_radius: u32,
}

impl Default for ChallengeSpec {
    fn default() -> Self {
        Self {
            background_width: 360,
            background_height: 200,
            slider_size: 50,
            gap_x: 150,
            gap_y: 70,
            corner_radius: 8,
        }
    }
}

/// A generated background/slider pair.
#[derive(Debug, Clone)]
pub struct SyntheticChallenge {
    pub spec: ChallengeSpec,
    pub background: RgbImage,
    pub slider: RgbaImage,
}

impl ChallengeSpec {
    /// Whether local slider pixel `(x, y)` lies inside the rounded square.
    pub fn inside_shape(&self, x: u32, y: u32) -> bool {
        let r = self.corner_radius.min(self.slider_size / 2) as i64;
        if r == 0 {
            return true;
        }
        let size = self.slider_size as i64;
        let (x, y) = (x as i64, y as i64);
        let cx = if x < r {
            r
        } else if x >= size - r {
            size - r - 1
        } else {
            return true;
        };
        let cy = if y < r {
            r
        } else if y >= size - r {
            size - r - 1
        } else {
            return true;
        };
        (x - cx).pow(2) + (y - cy).pow(2) <= r * r
    }

    fn fits(&self) -> bool {
        self.slider_size > 0
            && self
                .gap_x
                .checked_add(self.slider_size)
                .is_some_and(|right| right <= self.background_width)
            && self
                .gap_y
                .checked_add(self.slider_size)
                .is_some_and(|bottom| bottom <= self.background_height)
    }
}

/// Render a challenge from `spec` using `rng` for the scene texture.
///
/// Returns `None` if the gap does not fit inside the background.
pub fn generate<R: Rng>(spec: ChallengeSpec, rng: &mut R) -> Option<SyntheticChallenge> {
    if !spec.fits() {
        return None;
    }

    let scene = textured_scene(spec.background_width, spec.background_height, rng);

    let mut slider = RgbaImage::new(spec.slider_size, spec.slider_size);
    let mut background = scene.clone();
    for y in 0..spec.slider_size {
        for x in 0..spec.slider_size {
            if !spec.inside_shape(x, y) {
                continue;
            }
            let (bx, by) = (spec.gap_x + x, spec.gap_y + y);
            let Rgb([r, g, b]) = *scene.get_pixel(bx, by);
            slider.put_pixel(x, y, Rgba([r, g, b, 255]));
            background.put_pixel(bx, by, Rgb([shade(r), shade(g), shade(b)]));
        }
    }

    Some(SyntheticChallenge {
        spec,
        background,
        slider,
    })
}

/// Darken a channel for the gap shadow.
fn shade(v: u8) -> u8 {
    (u16::from(v) * 3 / 5) as u8
}

fn textured_scene<R: Rng>(width: u32, height: u32, rng: &mut R) -> RgbImage {
    let mut img = RgbImage::from_fn(width, height, |x, y| {
        let base = 60 + (x * 80 / width.max(1)) as u8 + (y * 40 / height.max(1)) as u8;
        let n: u8 = rng.random_range(0..40);
        Rgb([base + n, base / 2 + n, 200 - base / 2 + n / 2])
    });

    for _ in 0..12 {
        let cx = rng.random_range(0..width as i32);
        let cy = rng.random_range(0..height as i32);
        let radius = rng.random_range(6..30);
        let color = Rgb([
            rng.random_range(0..=255),
            rng.random_range(0..=255),
            rng.random_range(0..=255),
        ]);
        draw_filled_circle_mut(&mut img, (cx, cy), radius, color);
    }

    for _ in 0..6 {
        let x = rng.random_range(0..width as i32);
        let y = rng.random_range(0..height as i32);
        let w = rng.random_range(4..40u32);
        let h = rng.random_range(4..40u32);
        let color = Rgb([
            rng.random_range(0..=255),
            rng.random_range(0..=255),
            rng.random_range(0..=255),
        ]);
        draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(w, h), color);
    }

    img
}

impl SyntheticChallenge {
    /// Encode both images as a solve request body.
    pub fn to_request(&self, total_time_ms: u64) -> Result<SolveRequest, DecodeError> {
        let background = encode_png_base64(&DynamicImage::ImageRgb8(self.background.clone()))?;
        let slider = encode_png_base64(&DynamicImage::ImageRgba8(self.slider.clone()))?;
        Ok(SolveRequest::new(background, slider).with_total_time(total_time_ms))
    }

    /// Decoded views, skipping the transport encoding.
    pub fn decoded(&self) -> Result<(DecodedImage, DecodedImage), DecodeError> {
        let background = DecodedImage::from_dynamic(&DynamicImage::ImageRgb8(self.background.clone()))?;
        let slider = DecodedImage::from_dynamic(&DynamicImage::ImageRgba8(self.slider.clone()))?;
        Ok((background, slider))
    }
}
