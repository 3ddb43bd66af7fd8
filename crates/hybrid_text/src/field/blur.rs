//! Separable Gaussian blur with reflective boundaries.
//!
//! Edges are handled by mirroring the signal about the border (`d c b a | a b c d`), so a
//! constant field stays constant and text near the canvas edge does not pick up a dark or
//! bright rim. Small sigmas use an exact sampled kernel truncated at four standard
//! deviations. Large sigmas use three successive box filters whose combined variance
//! matches the Gaussian, which keeps the cost per sample independent of sigma.
use tracing::trace;

use super::Field;

/// Kernels are truncated at this many standard deviations.
const TRUNCATE: f32 = 4.0;

/// Largest kernel radius evaluated exactly; wider kernels switch to box passes.
const MAX_EXACT_RADIUS: usize = 24;

const BOX_PASSES: usize = 3;

/// Blur `field` with a Gaussian of standard deviation `sigma` pixels.
///
/// A non-positive or non-finite `sigma` returns an unchanged copy.
pub fn gaussian_blur(field: &Field, sigma: f32) -> Field {
    if !sigma.is_finite() || sigma <= 0.0 || field.is_empty() {
        return field.clone();
    }

    let radius = (TRUNCATE * sigma + 0.5) as usize;
    if radius == 0 {
        return field.clone();
    }

    let filter = if radius <= MAX_EXACT_RADIUS {
        LineFilter::Kernel(gaussian_kernel(sigma, radius))
    } else {
        let radii = box_radii(sigma, BOX_PASSES);
        trace!(sigma, ?radii, "gaussian blur via box passes");
        LineFilter::Boxes(radii)
    };

    separable(field, &filter)
}

enum LineFilter {
    Kernel(Vec<f32>),
    Boxes(Vec<usize>),
}

impl LineFilter {
    fn apply(&self, src: &[f32], dst: &mut [f32], scratch: &mut [f32]) {
        match self {
            LineFilter::Kernel(kernel) => convolve_line(src, dst, kernel),
            LineFilter::Boxes(radii) => {
                dst.copy_from_slice(src);
                for &r in radii {
                    box_line(dst, scratch, r);
                    dst.copy_from_slice(scratch);
                }
            }
        }
    }
}

fn separable(field: &Field, filter: &LineFilter) -> Field {
    let (w, h) = field.size();
    let mut out = field.clone();
    let n = w.max(h);
    let mut line = vec![0.0f32; n];
    let mut filtered = vec![0.0f32; n];
    let mut scratch = vec![0.0f32; n];

    let data = out.data_mut();

    for y in 0..h {
        let row = &mut data[y * w..(y + 1) * w];
        line[..w].copy_from_slice(row);
        filter.apply(&line[..w], row, &mut scratch[..w]);
    }

    for x in 0..w {
        for y in 0..h {
            line[y] = data[y * w + x];
        }
        filter.apply(&line[..h], &mut filtered[..h], &mut scratch[..h]);
        for y in 0..h {
            data[y * w + x] = filtered[y];
        }
    }

    out
}

/// Normalized, sampled Gaussian of length `2 * radius + 1`.
fn gaussian_kernel(sigma: f32, radius: usize) -> Vec<f32> {
    let r = radius as i64;
    let denom = 2.0 * (sigma as f64) * (sigma as f64);
    let weights: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Radii of `passes` box filters whose combined variance approximates `sigma^2`.
fn box_radii(sigma: f32, passes: usize) -> Vec<usize> {
    let n = passes as f64;
    let s2 = (sigma as f64) * (sigma as f64);
    let w_ideal = (12.0 * s2 / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f64;
    let m_ideal = (12.0 * s2 - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n) / (-4.0 * wlf - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    (0..passes)
        .map(|i| {
            let width = if i < m { wl } else { wu };
            ((width - 1) / 2) as usize
        })
        .collect()
}

/// Map any index onto `[0, n)` by mirroring about the borders.
#[inline]
fn reflect_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let mut m = i.rem_euclid(period);
    if m >= n {
        m = period - 1 - m;
    }
    m as usize
}

fn convolve_line(src: &[f32], dst: &mut [f32], kernel: &[f32]) {
    let n = src.len();
    let r = (kernel.len() / 2) as isize;
    for (i, out) in dst.iter_mut().enumerate() {
        let base = i as isize - r;
        let mut acc = 0.0f32;
        for (k, &w) in kernel.iter().enumerate() {
            acc += w * src[reflect_index(base + k as isize, n)];
        }
        *out = acc;
    }
}

/// Moving average of width `2 * radius + 1` using a running sum.
fn box_line(src: &[f32], dst: &mut [f32], radius: usize) {
    let n = src.len();
    let r = radius as isize;
    let width = (2 * radius + 1) as f64;

    let mut acc: f64 = (-r..=r).map(|k| src[reflect_index(k, n)] as f64).sum();
    for (i, out) in dst.iter_mut().enumerate() {
        *out = (acc / width) as f32;
        let i = i as isize;
        acc += src[reflect_index(i + r + 1, n)] as f64;
        acc -= src[reflect_index(i - r, n)] as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(width: usize) -> Field {
        let mut field = Field::new(width, 1);
        field.data_mut()[width / 2] = 1.0;
        field
    }

    fn variance_about_center(field: &Field) -> f32 {
        let c = (field.width() / 2) as f32;
        let total: f32 = field.data().iter().sum();
        field
            .data()
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let d = i as f32 - c;
                v * d * d
            })
            .sum::<f32>()
            / total
    }

    #[test]
    fn zero_or_invalid_sigma_is_identity() {
        let field = Field::from_vec(3, 1, vec![0.0, 1.0, 0.5]).unwrap();
        assert_eq!(gaussian_blur(&field, 0.0), field);
        assert_eq!(gaussian_blur(&field, -2.0), field);
        assert_eq!(gaussian_blur(&field, f32::NAN), field);
    }

    #[test]
    fn constant_field_is_preserved_on_both_paths() {
        let field = Field::filled(64, 48, 1.0);
        for sigma in [2.5, 40.0] {
            let out = gaussian_blur(&field, sigma);
            for v in out.data() {
                assert!((v - 1.0).abs() < 1e-5, "sigma {sigma}: {v}");
            }
        }
    }

    #[test]
    fn exact_kernel_matches_requested_variance() {
        let out = gaussian_blur(&impulse(201), 3.0);
        let var = variance_about_center(&out);
        assert!((var - 9.0).abs() < 0.2, "variance {var}");
    }

    #[test]
    fn box_passes_approximate_requested_variance() {
        let out = gaussian_blur(&impulse(401), 20.0);
        let var = variance_about_center(&out);
        assert!((var - 400.0).abs() < 0.05 * 400.0, "variance {var}");
    }

    #[test]
    fn impulse_response_is_symmetric() {
        let out = gaussian_blur(&impulse(101), 4.0);
        let c = 50;
        for d in 1..20 {
            let a = out.get(c - d, 0);
            let b = out.get(c + d, 0);
            assert!((a - b).abs() < 1e-6);
        }
        assert!(out.get(c, 0) > out.get(c + 1, 0));
    }

    #[test]
    fn reflect_index_mirrors_about_borders() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(-9, 4), 0);
        assert_eq!(reflect_index(-10, 4), 1);
        assert_eq!(reflect_index(12, 4), 3);
        assert_eq!(reflect_index(7, 1), 0);
    }

    #[test]
    fn kernel_wider_than_field_stays_finite() {
        let mut field = Field::filled(5, 3, 1.0);
        field.data_mut()[7] = 0.0;
        let out = gaussian_blur(&field, 160.0);
        assert!(out.data().iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
    }
}
