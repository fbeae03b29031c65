//! Golden-section minimization of scalar functions
//!
//! Used by the peak finder to refine the frequency of maximum power below
//! the grid resolution.

use snafu::Snafu;

/// Maximum number of interval reductions before giving up.
pub const MAXITER: usize = 100;

// Golden ratio and its complement to one.
const GOLD: f64 = 0.6180339887498948482046;
const IGOLD: f64 = 0.3819660112501051517954;

#[derive(Debug, Snafu)]
pub enum MinimizeError {
    /// The bracket did not shrink below the tolerance
    #[snafu(display("golden-section search: accuracy {:e} not reached in {} iterations", eps, MAXITER))]
    NoConvergence { eps: f64 },
}

/// Find a minimum of `f` on the bracket `[a, b]` by golden-section search.
///
/// Maintains the two interior golden-ratio probe points and shrinks the
/// bracket towards the smaller function value, reusing one evaluation per
/// iteration. Converges when `|b - a| < eps`.
///
/// # Returns
/// `(xmin, f(xmin))` with `xmin` the midpoint of the final bracket, or
/// [`MinimizeError::NoConvergence`] if `MAXITER` iterations were not enough.
pub fn golden_min<F>(f: F, mut a: f64, mut b: f64, eps: f64) -> Result<(f64, f64), MinimizeError>
where
    F: Fn(f64) -> f64,
{
    let mut x1 = GOLD * a + IGOLD * b;
    let mut x2 = IGOLD * a + GOLD * b;
    let mut fx1 = f(x1);
    let mut fx2 = f(x2);

    for _ in 0..MAXITER {
        if fx1 < fx2 {
            // Keep [a, x2]
            b = x2;
            x2 = x1;
            fx2 = fx1;
            x1 = GOLD * a + IGOLD * b;
            fx1 = f(x1);
        } else {
            // Keep [x1, b]
            a = x1;
            x1 = x2;
            fx1 = fx2;
            x2 = IGOLD * a + GOLD * b;
            fx2 = f(x2);
        }

        if (b - a).abs() < eps {
            let xmin = a + (b - a) / 2.0;
            return Ok((xmin, f(xmin)));
        }
    }

    NoConvergenceSnafu { eps }.fail()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_minimum_of_a_parabola() {
        let (xmin, fxmin) = golden_min(|x| (x - 0.375) * (x - 0.375), 0.0, 1.0, 1e-8)
            .expect("parabola minimum should converge");
        assert!((xmin - 0.375).abs() < 1e-4, "xmin = {xmin}");
        assert!(fxmin < 1e-8);
    }

    #[test]
    fn converges_to_a_bracket_edge_for_monotone_functions() {
        let (xmin, _) = golden_min(|x| x, 0.0, 1.0, 1e-8).expect("monotone case should converge");
        assert!(xmin.abs() < 1e-3, "xmin = {xmin}");
    }

    #[test]
    fn reports_failure_when_the_tolerance_is_unreachable() {
        // 100 reductions shrink the bracket by ~1e-21, nowhere near 1e-40.
        let result = golden_min(|x| (x - 0.5) * (x - 0.5), 0.0, 1.0, 1e-40);
        assert!(result.is_err());
    }
}
