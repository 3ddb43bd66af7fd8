//! Scalar fields over the canvas and the filters applied to them.
//!
//! A [`Field`] is a row-major grid of `f32` samples. Text rasters, ink layers, the
//! cloud background and the final output all share this representation.
pub mod blur;

pub use blur::gaussian_blur;

use crate::error::{Error, Result};

/// A row-major grid of floating point samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Field {
    /// Create a new field with all values set to zero.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Create a new field with all values set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap existing row-major samples, checking that the length matches the size.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::InvalidConfig(format!(
                "field data has {} samples, expected {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the size of the field as `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major samples.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Get the value at the given indices, returning `0.0` if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.data[y * self.width + x]
    }

    /// Apply `f` to every sample.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Field {
        Field {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two equally sized fields sample by sample.
    pub(crate) fn zip_map(&self, other: &Field, f: impl Fn(f32, f32) -> f32) -> Field {
        debug_assert_eq!(self.size(), other.size(), "zip_map on mismatched fields");
        Field {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Clamp every sample into `[min, max]`. NaN samples become `min`.
    pub fn clip(&self, min: f32, max: f32) -> Field {
        self.map(|v| clip(v, min, max))
    }

    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        (sum / self.data.len() as f64) as f32
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mean = self.mean() as f64;
        let var: f64 = self
            .data
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / self.data.len() as f64;
        var.sqrt() as f32
    }

    /// Smallest and largest sample, or `(0.0, 0.0)` for an empty field.
    pub fn min_max(&self) -> (f32, f32) {
        if self.data.is_empty() {
            return (0.0, 0.0);
        }
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Quantize `[0, 1]` samples to 8-bit intensities, truncating `v * 255`.
    pub fn to_luma8(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|&v| (clip(v, 0.0, 1.0) * 255.0) as u8)
            .collect()
    }
}

/// Clamp that maps NaN to `min`, so a bad sample can never leave the valid range.
#[inline]
pub(crate) fn clip(v: f32, min: f32, max: f32) -> f32 {
    if v.is_nan() {
        min
    } else {
        v.clamp(min, max)
    }
}
