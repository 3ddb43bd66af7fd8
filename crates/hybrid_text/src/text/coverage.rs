//! Anti-aliased coverage rasterization of closed outlines.
//!
//! Outlines are flattened to line segments and accumulated as signed area per cell. A
//! running prefix sum over each row turns the accumulated area into exact coverage, with
//! non-zero winding for overlapping contours.
use glam::Vec2;

/// Tolerance used when choosing how finely to subdivide curves, in pixels.
const FLATTEN_TOLERANCE: f32 = 0.25;

/// Coverage below this is prefix-sum residue, not ink.
const MIN_COVERAGE: f32 = 1e-6;

/// Coverage accumulator for a `width x height` pixel box.
pub struct CoverageRasterizer {
    width: usize,
    height: usize,
    acc: Vec<f32>,
}

impl CoverageRasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            acc: vec![0.0; width * height + 2],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Accumulate a straight edge. Points are in pixel units with y pointing down.
    pub fn line(&mut self, p0: Vec2, p1: Vec2) {
        if (p0.y - p1.y).abs() <= f32::EPSILON {
            return;
        }
        let (dir, p0, p1) = if p0.y < p1.y {
            (1.0, p0, p1)
        } else {
            (-1.0, p1, p0)
        };
        let p0 = self.clamp_point(p0);
        let p1 = self.clamp_point(p1);
        if p1.y - p0.y <= f32::EPSILON {
            return;
        }

        let dxdy = (p1.x - p0.x) / (p1.y - p0.y);
        let mut x = p0.x;
        let y_start = p0.y as usize;
        let y_end = (p1.y.ceil() as usize).min(self.height);

        for y in y_start..y_end {
            let line_start = y * self.width;
            let dy = ((y + 1) as f32).min(p1.y) - (y as f32).max(p0.y);
            let x_next = x + dxdy * dy;
            let d = dy * dir;
            let (x0, x1) = if x < x_next { (x, x_next) } else { (x_next, x) };
            let x0_floor = x0.floor();
            let x0i = x0_floor as usize;
            let x1_ceil = x1.ceil();
            let x1i = x1_ceil as usize;

            if x1i <= x0i + 1 {
                let xmf = 0.5 * (x + x_next) - x0_floor;
                self.acc[line_start + x0i] += d - d * xmf;
                self.acc[line_start + x0i + 1] += d * xmf;
            } else {
                let s = (x1 - x0).recip();
                let x0f = x0 - x0_floor;
                let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
                let x1f = x1 - x1_ceil + 1.0;
                let am = 0.5 * s * x1f * x1f;
                self.acc[line_start + x0i] += d * a0;
                if x1i == x0i + 2 {
                    self.acc[line_start + x0i + 1] += d * (1.0 - a0 - am);
                } else {
                    let a1 = s * (1.5 - x0f);
                    self.acc[line_start + x0i + 1] += d * (a1 - a0);
                    for xi in x0i + 2..x1i - 1 {
                        self.acc[line_start + xi] += d * s;
                    }
                    let a2 = a1 + (x1i - x0i - 3) as f32 * s;
                    self.acc[line_start + x1i - 1] += d * (1.0 - a2 - am);
                }
                self.acc[line_start + x1i] += d * am;
            }
            x = x_next;
        }
    }

    /// Accumulate a quadratic Bezier by flattening it to lines.
    pub fn quad(&mut self, p0: Vec2, p1: Vec2, p2: Vec2) {
        let dev = p0 - 2.0 * p1 + p2;
        let n = segments_for(dev.length());
        let mut prev = p0;
        for i in 1..=n {
            let t = i as f32 / n as f32;
            let mt = 1.0 - t;
            let p = mt * mt * p0 + 2.0 * mt * t * p1 + t * t * p2;
            self.line(prev, p);
            prev = p;
        }
    }

    /// Accumulate a cubic Bezier by flattening it to lines.
    pub fn cubic(&mut self, p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) {
        let dev = (p0 - 2.0 * p1 + p2)
            .length()
            .max((p1 - 2.0 * p2 + p3).length());
        let n = segments_for(1.5 * dev);
        let mut prev = p0;
        for i in 1..=n {
            let t = i as f32 / n as f32;
            let mt = 1.0 - t;
            let p = mt * mt * mt * p0
                + 3.0 * mt * mt * t * p1
                + 3.0 * mt * t * t * p2
                + t * t * t * p3;
            self.line(prev, p);
            prev = p;
        }
    }

    /// Resolve the accumulated area into per-pixel coverage in `[0, 1]`, calling
    /// `f(x, y, coverage)` for every pixel with visible coverage.
    pub fn for_each_pixel(&self, mut f: impl FnMut(usize, usize, f32)) {
        let mut acc = 0.0f32;
        for (i, &a) in self.acc.iter().take(self.width * self.height).enumerate() {
            // Every row's signed area sums to zero; restart so rounding does not carry over.
            if i % self.width == 0 {
                acc = 0.0;
            }
            acc += a;
            let coverage = acc.abs().min(1.0);
            if coverage > MIN_COVERAGE {
                f(i % self.width, i / self.width, coverage);
            }
        }
    }

    fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(0.0, self.width.saturating_sub(1) as f32),
            p.y.clamp(0.0, self.height as f32),
        )
    }
}

fn segments_for(deviation: f32) -> usize {
    if deviation <= FLATTEN_TOLERANCE {
        return 1;
    }
    ((deviation / FLATTEN_TOLERANCE).sqrt().ceil() as usize).clamp(1, 64)
}
