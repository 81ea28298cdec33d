//! Slider gap localization by masked normalized correlation.
//!
//! The slider piece is compared against every placement that keeps it fully
//! inside the background. Only pixels marked valid in the slider mask take
//! part, and both sides are mean-centered and variance-normalized over those
//! pixels, so transparent padding and lighting differences (the gap is
//! usually drawn as a darkened copy of the piece) do not bias the result.

use image::GrayImage;
use slidetrack_challenge_model::ImageDimensions;
use slidetrack_common::{MatchConfig, SlidetrackError};
use slidetrack_image_buffer::Mask;

/// Best placement of the slider inside the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Left edge of the placement (px).
    pub x: u32,
    /// Top edge of the placement (px).
    pub y: u32,
    /// Normalized correlation in `[-1, 1]`.
    pub score: f64,
}

/// Reasons no placement could be scored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error(
        "slider {}x{} does not fit inside background {}x{}",
        .slider.width, .slider.height, .background.width, .background.height
    )]
    SliderTooLarge {
        slider: ImageDimensions,
        background: ImageDimensions,
    },

    #[error(
        "mask is {}x{} but slider is {}x{}",
        .mask.width, .mask.height, .slider.width, .slider.height
    )]
    MaskShape {
        mask: ImageDimensions,
        slider: ImageDimensions,
    },

    #[error("slider mask has no valid pixels")]
    EmptyMask,

    #[error("masked slider pixels have no variance")]
    FlatTemplate,

    #[error("every candidate window is flat under the slider mask")]
    NoValidPlacement,
}

impl MatchError {
    fn is_dimension(&self) -> bool {
        matches!(self, Self::SliderTooLarge { .. } | Self::MaskShape { .. })
    }
}

impl From<MatchError> for SlidetrackError {
    fn from(err: MatchError) -> Self {
        if err.is_dimension() {
            SlidetrackError::dimension_from(err)
        } else {
            SlidetrackError::matching_from(err)
        }
    }
}

/// Slider pixels prepared for repeated scoring.
///
/// Holds one entry per valid pixel: its offset into a background row-major
/// buffer (relative to the placement origin) and its mean-centered value.
struct MaskedTemplate {
    entries: Vec<(usize, f64)>,
    /// Sum of squared centered values.
    sum_sq: f64,
}

impl MaskedTemplate {
    fn prepare(
        slider: &GrayImage,
        mask: &Mask,
        background_width: u32,
        config: &MatchConfig,
    ) -> Result<Self, MatchError> {
        let coords: Vec<(u32, u32)> = mask.valid_coords().collect();
        if coords.is_empty() {
            return Err(MatchError::EmptyMask);
        }

        let values: Vec<f64> = coords
            .iter()
            .map(|&(x, y)| f64::from(slider.get_pixel(x, y)[0]))
            .collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        let stride = background_width as usize;
        let entries: Vec<(usize, f64)> = coords
            .iter()
            .zip(&values)
            .map(|(&(x, y), &v)| (y as usize * stride + x as usize, v - mean))
            .collect();
        let sum_sq = entries.iter().map(|(_, c)| c * c).sum::<f64>();

        if sum_sq < config.variance_floor {
            return Err(MatchError::FlatTemplate);
        }

        Ok(Self { entries, sum_sq })
    }

    /// Score the placement whose top-left pixel sits at `origin` in `data`.
    ///
    /// Returns `None` when the masked window is flat.
    fn score(&self, data: &[u8], origin: usize, variance_floor: f64) -> Option<f64> {
        let mut sum: u64 = 0;
        let mut sum_sq: u64 = 0;
        let mut cross = 0.0f64;

        for &(offset, centered) in &self.entries {
            let v = data[origin + offset];
            sum += u64::from(v);
            sum_sq += u64::from(v) * u64::from(v);
            cross += centered * f64::from(v);
        }

        // n * Σv² - (Σv)² in exact integer arithmetic; flat windows give 0.
        let n = self.entries.len() as u128;
        let scaled = n * u128::from(sum_sq) - u128::from(sum) * u128::from(sum);
        let window_sq = scaled as f64 / n as f64;
        if window_sq < variance_floor {
            return None;
        }

        // The template is centered, so Σ t'·v equals Σ t'·(v - mean_v).
        let score = cross / (self.sum_sq * window_sq).sqrt();
        Some(score.clamp(-1.0, 1.0))
    }
}

/// Finds where the slider piece fits inside the background.
pub struct GapLocator {
    config: MatchConfig,
}

impl GapLocator {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(MatchConfig::default())
    }

    /// Find the placement with the highest masked correlation.
    ///
    /// Placements are scanned top-to-bottom, then left-to-right; a later
    /// placement only wins if it beats the current best by more than
    /// `score_epsilon`.
    pub fn locate(
        &self,
        background: &GrayImage,
        slider: &GrayImage,
        mask: &Mask,
    ) -> Result<MatchResult, MatchError> {
        let bg_dims = ImageDimensions::new(background.width(), background.height());
        let slider_dims = ImageDimensions::new(slider.width(), slider.height());
        check_shapes(bg_dims, slider_dims, mask)?;

        let template = MaskedTemplate::prepare(slider, mask, bg_dims.width, &self.config)?;
        let data = background.as_raw();
        let stride = bg_dims.width as usize;

        let mut best: Option<MatchResult> = None;
        let mut scored = 0usize;
        for y in 0..=(bg_dims.height - slider_dims.height) {
            for x in 0..=(bg_dims.width - slider_dims.width) {
                let origin = y as usize * stride + x as usize;
                let Some(score) = template.score(data, origin, self.config.variance_floor) else {
                    continue;
                };
                scored += 1;
                let better = match best {
                    None => true,
                    Some(current) => score > current.score + self.config.score_epsilon,
                };
                if better {
                    best = Some(MatchResult { x, y, score });
                }
            }
        }

        match best {
            Some(result) => {
                tracing::debug!(
                    x = result.x,
                    y = result.y,
                    score = result.score,
                    scored,
                    mask_pixels = template.entries.len(),
                    "Located slider gap"
                );
                Ok(result)
            }
            None => Err(MatchError::NoValidPlacement),
        }
    }

    /// Score a single placement, `None` if it is out of bounds or flat.
    pub fn score_at(
        &self,
        background: &GrayImage,
        slider: &GrayImage,
        mask: &Mask,
        x: u32,
        y: u32,
    ) -> Result<Option<f64>, MatchError> {
        let bg_dims = ImageDimensions::new(background.width(), background.height());
        let slider_dims = ImageDimensions::new(slider.width(), slider.height());
        check_shapes(bg_dims, slider_dims, mask)?;

        if x > bg_dims.width - slider_dims.width || y > bg_dims.height - slider_dims.height {
            return Ok(None);
        }

        let template = MaskedTemplate::prepare(slider, mask, bg_dims.width, &self.config)?;
        let origin = y as usize * bg_dims.width as usize + x as usize;
        Ok(template.score(background.as_raw(), origin, self.config.variance_floor))
    }
}

fn check_shapes(
    background: ImageDimensions,
    slider: ImageDimensions,
    mask: &Mask,
) -> Result<(), MatchError> {
    if !background.contains(&slider) {
        return Err(MatchError::SliderTooLarge { slider, background });
    }
    let mask_dims = ImageDimensions::new(mask.width(), mask.height());
    if mask_dims != slider {
        return Err(MatchError::MaskShape {
            mask: mask_dims,
            slider,
        });
    }
    Ok(())
}
