//! Loss functions in the form needed by dual coordinate ascent.
//!
//! A loss is written in terms of the signed margin `m = y * (w·x + b)` with
//! `y ∈ {-1, +1}`. Besides its primal value, each loss exposes the matching dual
//! objective term and a solver for the one-dimensional dual subproblem.

/// Numerically stable logistic function `1 / (1 + e^(-z))`.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// A convex margin loss usable by the SDCA trainer.
pub trait DualLoss: Clone + Send + Sync {
    /// Primal loss for a signed margin.
    fn loss(&self, margin: f64) -> f64;

    /// Dual objective contribution of a coefficient, i.e. `-φ*(-alpha)`.
    fn dual_value(&self, alpha: f64) -> f64;

    /// Starting value of every dual coefficient.
    fn initial_dual(&self) -> f64;

    /// Increment `delta` to `alpha` that maximizes the dual along one coordinate.
    ///
    /// `margin` is the current signed margin of the example and `curvature` is
    /// `||x||² / (λ n)`, the rate at which the margin moves per unit of `delta`.
    fn dual_step(&self, alpha: f64, margin: f64, curvature: f64) -> f64;
}

/// Binary logistic loss: `log(1 + e^(-m))`.
///
/// Dual coefficients live in the open interval `(0, 1)`; at the optimum
/// `alpha = sigmoid(-m)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticLoss;

impl LogisticLoss {
    const MAX_NEWTON_STEPS: usize = 20;
    const STEP_TOLERANCE: f64 = 1e-12;
    /// Closest a coefficient may get to either end of `(0, 1)`.
    const EDGE: f64 = 1e-12;
}

impl DualLoss for LogisticLoss {
    fn loss(&self, margin: f64) -> f64 {
        // log(1 + e^(-m)) = max(-m, 0) + log(1 + e^(-|m|))
        (-margin).max(0.0) + (-margin.abs()).exp().ln_1p()
    }

    fn dual_value(&self, alpha: f64) -> f64 {
        let entropy = |p: f64| if p > 0.0 { -p * p.ln() } else { 0.0 };
        entropy(alpha) + entropy(1.0 - alpha)
    }

    fn initial_dual(&self) -> f64 {
        0.5
    }

    fn dual_step(&self, alpha: f64, margin: f64, curvature: f64) -> f64 {
        // Newton's method on g(δ) = H(α + δ) - δ·m - δ²·c/2, which is strictly concave.
        // Steps that would leave (0, 1) are replaced by halving the distance to the edge.
        let mut delta = 0.0;
        for _ in 0..Self::MAX_NEWTON_STEPS {
            let a = alpha + delta;
            let grad = ((1.0 - a) / a).ln() - margin - delta * curvature;
            let hess = -1.0 / (a * (1.0 - a)) - curvature;
            let step = -grad / hess;

            let next = a + step;
            let next = if next <= 0.0 {
                a / 2.0
            } else if next >= 1.0 {
                (1.0 + a) / 2.0
            } else {
                next
            }
            .clamp(Self::EDGE, 1.0 - Self::EDGE);
            let moved = next - a;
            delta += moved;
            if moved.abs() < Self::STEP_TOLERANCE {
                break;
            }
        }
        delta
    }
}
