//! Natural cubic spline interpolation
//!
//! Fits y = f(x) through a small set of anchor points with a natural cubic
//! spline. Anchor x values must be strictly increasing; the fit is solved
//! as a tridiagonal system on the segment second derivatives.

extern crate nalgebra as na;

use itertools::Itertools;

use crate::common::{Curve, CurveFitter, PlannerError, PlannerResult};

/// Piecewise cubic y(x) through the fitted anchors.
///
/// Each segment i holds y = a + b*dx + c*dx^2 + d*dx^3 with dx measured
/// from anchor i. Evaluation outside the anchor range extrapolates the
/// nearest segment's polynomial.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
    x: Vec<f64>,
}

impl CubicSpline {
    pub fn fit(x: &[f64], y: &[f64]) -> PlannerResult<CubicSpline> {
        if x.len() != y.len() {
            return Err(PlannerError::Geometry(format!(
                "anchor count mismatch: {} x vs {} y",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(PlannerError::Geometry(format!(
                "need at least 2 anchors, got {}",
                x.len()
            )));
        }
        if !x.iter().tuple_windows().all(|(p, q)| p < q) {
            return Err(PlannerError::Geometry(
                "anchor x must be strictly increasing".to_string(),
            ));
        }

        let nx = x.len();
        let h: Vec<f64> = x.iter().tuple_windows().map(|(p, q)| q - p).collect();
        let a = y.to_vec();

        let system = Self::curvature_system(&h);
        let rhs = Self::curvature_rhs(&h, &a);
        let inverse = system
            .try_inverse()
            .ok_or_else(|| PlannerError::Numerical("spline system is singular".to_string()))?;
        let c_vec = inverse * rhs;
        let c: Vec<f64> = c_vec.iter().copied().collect();

        let mut b: Vec<f64> = Vec::with_capacity(nx - 1);
        let mut d: Vec<f64> = Vec::with_capacity(nx - 1);
        for i in 0..nx - 1 {
            d.push((c[i + 1] - c[i]) / (3.0 * h[i]));
            b.push((a[i + 1] - a[i]) / h[i] - h[i] * (c[i + 1] + 2.0 * c[i]) / 3.0);
        }

        Ok(CubicSpline { a, b, c, d, x: x.to_vec() })
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let i = self.segment_index(t);
        let dx = t - self.x[i];
        self.a[i] + self.b[i] * dx + self.c[i] * dx.powi(2) + self.d[i] * dx.powi(3)
    }

    fn segment_index(&self, t: f64) -> usize {
        let i = self.x.partition_point(|&xi| xi <= t);
        i.saturating_sub(1).min(self.x.len() - 2)
    }

    /// Coefficient matrix of the natural-boundary curvature system.
    fn curvature_system(h: &[f64]) -> na::DMatrix<f64> {
        let nx = h.len() + 1;
        let mut mat = na::DMatrix::zeros(nx, nx);
        mat[(0, 0)] = 1.0;
        for i in 0..nx - 1 {
            if i != nx - 2 {
                mat[(i + 1, i + 1)] = 2.0 * (h[i] + h[i + 1]);
            }
            mat[(i + 1, i)] = h[i];
            mat[(i, i + 1)] = h[i];
        }
        mat[(0, 1)] = 0.0;
        mat[(nx - 1, nx - 2)] = 0.0;
        mat[(nx - 1, nx - 1)] = 1.0;
        mat
    }

    fn curvature_rhs(h: &[f64], a: &[f64]) -> na::DVector<f64> {
        let nx = h.len() + 1;
        let mut rhs = na::DVector::zeros(nx);
        for i in 0..nx - 2 {
            rhs[i + 1] =
                3.0 * (a[i + 2] - a[i + 1]) / h[i + 1] - 3.0 * (a[i + 1] - a[i]) / h[i];
        }
        rhs
    }
}

impl Curve for CubicSpline {
    fn y_at(&self, x: f64) -> f64 {
        self.evaluate(x)
    }
}

/// The default curve fitter of the trajectory generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicSplineFitter;

impl CurveFitter for CubicSplineFitter {
    type Output = CubicSpline;

    fn fit(&self, x: &[f64], y: &[f64]) -> PlannerResult<CubicSpline> {
        CubicSpline::fit(x, y)
    }
}
