//! Ordinary least-squares fit of y on x with a two-sided slope test

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Keeps the t statistic finite when |r| == 1
const TINY: f64 = 1.0e-20;

/// Simple linear regression result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient
    pub r: f64,
    /// Two-sided p-value for a zero slope
    pub p_value: f64,
    pub slope_stderr: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Fit `ys` on `xs`.
///
/// Returns `None` for fewer than two points, mismatched lengths or when all
/// x values are identical.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return None;
    }

    let nf = n as f64;
    let x_mean = xs.iter().sum::<f64>() / nf;
    let y_mean = ys.iter().sum::<f64>() / nf;

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }
    ss_xx /= nf;
    ss_yy /= nf;
    ss_xy /= nf;

    if ss_xx == 0.0 {
        return None;
    }

    let r_den = (ss_xx * ss_yy).sqrt();
    let r = if r_den == 0.0 {
        0.0
    } else {
        (ss_xy / r_den).clamp(-1.0, 1.0)
    };

    let slope = ss_xy / ss_xx;
    let intercept = y_mean - slope * x_mean;

    let (p_value, slope_stderr) = if n == 2 {
        // A line through two points: exact fit unless the points are level
        let p = if ys[0] == ys[1] { 1.0 } else { 0.0 };
        (p, 0.0)
    } else {
        let dof = (n - 2) as f64;
        let t = r * (dof / ((1.0 - r) * (1.0 + r) + TINY)).sqrt();
        let p = StudentsT::new(0.0, 1.0, dof)
            .map(|dist| 2.0 * dist.sf(t.abs()))
            .unwrap_or(f64::NAN);
        let stderr = ((1.0 - r * r) * ss_yy / ss_xx / dof).sqrt();
        (p.clamp(0.0, 1.0), stderr)
    };

    Some(LinearFit {
        slope,
        intercept,
        r,
        p_value,
        slope_stderr,
        n,
    })
}
