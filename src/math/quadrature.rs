//! Adaptive two-dimensional quadrature for the surface kernels.
//!
//! The rectangle of integration [xmin, xmax] x [ymin, ymax] is reached
//! through the cosine transform x = (xmax+xmin)/2 + (xmax-xmin)/2 cos(theta)
//! (and y likewise), so that nodes cluster near the edges of the original
//! rectangle, where the integrands steepen. The transformed domain
//! [0, pi] x [0, pi] is subdivided 2x2 at a time; each child rectangle gets
//! a tensor-product Gauss-Kronrod 3/7 estimate, and the children whose
//! adjusted error exceeds their share of the tolerance are queued for
//! further refinement, worst first.

use std::collections::BinaryHeap;
use std::f64::consts::PI;

use log::warn;

use crate::math::gausskronrod::{GAUSS_WEIGHTS, GRID, KRONROD_WEIGHTS, NodeGrid, PACKED_NODES};

const EPS100: f64 = 100. * f64::EPSILON;

/// Convergence settings for one integral
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerance {
    /// Absolute tolerance on the integral
    pub absolute: f64,
    /// Relative tolerance on the integral (clamped to 100 eps)
    pub relative: f64,
    /// Cap on the number of 14x14 kernel evaluations. When reached, the
    /// best estimate so far is returned and a warning is logged.
    pub max_evaluations: usize,
}

impl Default for Tolerance {
    fn default() -> Tolerance {
        Tolerance {
            absolute: 1e-10,
            relative: 1e-6,
            max_evaluations: 1000,
        }
    }
}

impl Tolerance {
    /// Settings read from a parameter file keep the default evaluation cap
    #[must_use]
    pub fn new(absolute: f64, relative: f64) -> Tolerance {
        Tolerance {
            absolute,
            relative,
            ..Default::default()
        }
    }
}

// ----- S U B R E C T A N G L E S -----------------------------------------------------

/// A child rectangle of the transformed domain awaiting refinement.
/// Entries are immutable snapshots: refinement produces new entries
/// rather than updating old ones, so no decrease-key is needed.
#[derive(Debug, Copy, Clone)]
struct SubRectangle {
    /// Estimated integral over this rectangle
    q: f64,
    /// Estimated error of `q`
    e: f64,
    theta: (f64, f64),
    phi: (f64, f64),
    /// Damped error, the heap key
    adjusted: f64,
}

impl PartialEq for SubRectangle {
    fn eq(&self, other: &Self) -> bool {
        self.adjusted == other.adjusted
    }
}
impl Eq for SubRectangle {}

impl PartialOrd for SubRectangle {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SubRectangle {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.adjusted.total_cmp(&other.adjusted)
    }
}

/// Book-keeping for the refinement queue. Maintains the invariant that
/// `err_ok` (the total adjusted error of rectangles accepted as converged)
/// plus the adjusted errors still in the heap equals the global error
/// bound.
#[derive(Debug, Default)]
struct RectangleStore {
    heap: BinaryHeap<SubRectangle>,
    err_ok: f64,
    in_heap: f64,
}

impl RectangleStore {
    /// File the four children of a just-evaluated rectangle: each child
    /// whose adjusted error exceeds its local tolerance (its area share of
    /// the global tolerance) goes on the heap, the rest are accepted.
    fn save(
        &mut self,
        qsub: &[f64; 4],
        esub: &[f64; 4],
        theta: (f64, f64),
        phi: (f64, f64),
        tol: f64,
        area: f64,
        adjust: f64,
    ) {
        let half_dtheta = (theta.1 - theta.0) / 2.;
        let theta_mid = theta.0 + half_dtheta;
        let half_dphi = (phi.1 - phi.0) / 2.;
        let phi_mid = phi.0 + half_dphi;

        let localtol = (tol * half_dtheta * half_dphi / area)
            .abs()
            .max(EPS100 * qsub.iter().sum::<f64>().abs());

        let children = [
            ((theta.0, theta_mid), (phi.0, phi_mid)),
            ((theta_mid, theta.1), (phi.0, phi_mid)),
            ((theta.0, theta_mid), (phi_mid, phi.1)),
            ((theta_mid, theta.1), (phi_mid, phi.1)),
        ];

        for (i, (theta, phi)) in children.into_iter().enumerate() {
            let adjusted = adjust * esub[i];
            if adjusted > localtol {
                self.heap.push(SubRectangle {
                    q: qsub[i],
                    e: esub[i],
                    theta,
                    phi,
                    adjusted,
                });
                self.in_heap += adjusted;
            } else {
                self.err_ok += adjusted;
            }
        }
    }

    /// Pop the rectangle with the largest adjusted error
    fn next(&mut self) -> Option<SubRectangle> {
        let rect = self.heap.pop()?;
        self.in_heap -= rect.adjusted;
        Some(rect)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn error_bound(&self) -> f64 {
        self.err_ok + self.in_heap
    }
}

// ----- C H I L D   E V A L U A T I O N -----------------------------------------------

#[derive(Debug, Copy, Clone)]
struct Domain {
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
}

/// Evaluate the integrand on the 14x14 node grid of the rectangle
/// [thetaL, thetaR] x [phiB, phiT] and reduce it to integral and error
/// estimates for the four 2x2 children.
///
/// Returns `None` when, after the first evaluation, the transformed grid
/// hits an endpoint of the original rectangle again: such a child is
/// degenerate and its contribution is taken as zero by the caller. The
/// first evaluation never short-circuits.
fn partition<F>(
    fun: &F,
    theta: (f64, f64),
    phi: (f64, f64),
    domain: &Domain,
    first: bool,
    evaluations: &mut usize,
) -> Option<([f64; 4], [f64; 4])>
where
    F: Fn(&NodeGrid, &NodeGrid) -> NodeGrid,
{
    let dtheta = theta.1 - theta.0;
    let mut thetas = [0.; GRID];
    let mut x = [0.; GRID];
    for (j, node) in PACKED_NODES.iter().enumerate() {
        thetas[j] = theta.0 + node * dtheta;
        x[j] = 0.5 * (domain.xmax + domain.xmin) + 0.5 * (domain.xmax - domain.xmin) * thetas[j].cos();
    }
    if !first && (x[0] == domain.xmax || x[GRID - 1] == domain.xmin) {
        return None;
    }

    let dphi = phi.1 - phi.0;
    let dy = domain.ymax - domain.ymin;
    let mut phis = [0.; GRID];
    let mut y = [0.; GRID];
    for (i, node) in PACKED_NODES.iter().enumerate() {
        phis[i] = phi.0 + node * dphi;
        y[i] = domain.ymin + (0.5 + 0.5 * phis[i].cos()) * dy;
    }
    if !first && (y[0] == domain.ymax || y[GRID - 1] == domain.ymin) {
        return None;
    }

    // x (the first integrand argument) varies along the columns of the
    // grids, y along the rows
    let mut first_arg = [[0.; GRID]; GRID];
    let mut second_arg = [[0.; GRID]; GRID];
    for i in 0..GRID {
        for j in 0..GRID {
            first_arg[i][j] = x[j];
            second_arg[i][j] = y[i];
        }
    }

    let mut z = fun(&first_arg, &second_arg);
    *evaluations += 1;

    // Jacobian of the cosine transform
    for i in 0..GRID {
        for j in 0..GRID {
            z[i][j] *= 0.25 * (domain.xmax - domain.xmin) * phis[i].sin() * (dy * thetas[j].sin());
        }
    }

    // Tensor-product reduction per child: rows are the phi halves,
    // columns the theta halves
    let scale = (dtheta / 4.) * (dphi / 4.);
    let mut qsub = [0.; 4];
    let mut esub = [0.; 4];
    for child in 0..4 {
        let row0 = (child / 2) * 7;
        let col0 = (child % 2) * 7;
        let mut high = 0.;
        let mut low = 0.;
        for a in 0..7 {
            let mut high_row = 0.;
            let mut low_row = 0.;
            for b in 0..7 {
                let v = z[row0 + a][col0 + b];
                high_row += KRONROD_WEIGHTS[b] * v;
                low_row += GAUSS_WEIGHTS[b] * v;
            }
            high += KRONROD_WEIGHTS[a] * high_row;
            low += GAUSS_WEIGHTS[a] * low_row;
        }
        qsub[child] = high * scale;
        esub[child] = (low * scale - qsub[child]).abs();
    }

    Some((qsub, esub))
}

// ----- T H E   E N G I N E -----------------------------------------------------------

/// Integrate `fun` over [xmin, xmax] x [ymin, ymax] to the given tolerance.
///
/// `fun` is evaluated at 14x14 grids of (x, y) nodes and must return the
/// integrand values at those nodes. Non-finite integrand values propagate
/// into the result unchanged.
pub fn integrate<F>(fun: F, xmin: f64, xmax: f64, ymin: f64, ymax: f64, tolerance: Tolerance) -> f64
where
    F: Fn(&NodeGrid, &NodeGrid) -> NodeGrid,
{
    let domain = Domain {
        xmin,
        xmax,
        ymin,
        ymax,
    };
    let theta = (0., PI);
    let phi = (0., PI);
    let area = PI * PI;

    let mut evaluations = 0;
    let Some((qsub, esub)) = partition(&fun, theta, phi, &domain, true, &mut evaluations) else {
        return 0.;
    };
    let mut q: f64 = qsub.iter().sum();

    let rtol_over_8 = (tolerance.relative.max(EPS100) / 8.).max(EPS100);
    let atol_over_8 = tolerance.absolute / 8.;
    let mut tol = EPS100 * q.abs();

    let mut store = RectangleStore::default();
    store.save(&qsub, &esub, theta, phi, tol, area, 1.);

    while !store.is_empty() && store.error_bound() > tol {
        if evaluations >= tolerance.max_evaluations {
            warn!(
                "quadrature: error bound {:.3e} still above tolerance {:.3e} after {} evaluations - returning best estimate",
                store.error_bound(),
                tol,
                evaluations
            );
            break;
        }

        let Some(rect) = store.next() else {
            break;
        };
        let (qsub, esub) = partition(&fun, rect.theta, rect.phi, &domain, false, &mut evaluations)
            .unwrap_or(([0.; 4], [0.; 4]));

        let newq: f64 = qsub.iter().sum();
        // Damp the children's error when their total agrees with the
        // parent estimate, so already-converged regions stop competing
        // for refinement
        let adjust = 1_f64.min((rect.q - newq).abs() / rect.e);
        q += newq - rect.q;
        tol = atol_over_8.max(rtol_over_8 * q.abs());
        store.save(&qsub, &esub, rect.theta, rect.phi, tol, area, adjust);
    }

    q
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    fn grid_map(f: impl Fn(f64, f64) -> f64) -> impl Fn(&NodeGrid, &NodeGrid) -> NodeGrid {
        move |x: &NodeGrid, y: &NodeGrid| {
            let mut out = [[0.; GRID]; GRID];
            for i in 0..GRID {
                for j in 0..GRID {
                    out[i][j] = f(x[i][j], y[i][j]);
                }
            }
            out
        }
    }

    #[test]
    fn constants_and_polynomials() {
        let tol = Tolerance::default();

        let q = integrate(grid_map(|_, _| 1.), 0., 2., -1., 3., tol);
        assert_float_eq!(q, 8., abs <= 1e-8);

        // int_0^1 int_0^1 x y dx dy = 1/4
        let q = integrate(grid_map(|x, y| x * y), 0., 1., 0., 1., tol);
        assert_float_eq!(q, 0.25, abs <= 1e-8);

        // int_0^2 int_0^3 x^2 y^3 dy dx = (8/3)(81/4)
        let q = integrate(grid_map(|x, y| x * x * y * y * y), 0., 2., 0., 3., tol);
        assert_float_eq!(q, 54., rmax <= 1e-8);
    }

    #[test]
    fn steep_integrand() {
        // A near-singular integrand of the kind the kernels produce
        let q = integrate(
            grid_map(|x, y| 1. / (x * x + y * y).sqrt()),
            1e-3,
            1.,
            1e-3,
            1.,
            Tolerance::default(),
        );
        // Reference from the closed-form antiderivative
        // y ln(x + r) + x ln(y + r)
        assert_float_eq!(q, 1.747_308_116_127_374, rmax <= 1e-4);
    }

    #[test]
    fn tolerance_monotonicity() {
        let f = |x: f64, y: f64| (10. * x).sin() * (-3. * y).exp() + 1. / (0.01 + x * x + y * y);
        let tight = Tolerance {
            absolute: 1e-13,
            relative: 1e-13,
            max_evaluations: 100_000,
        };
        let reference = integrate(grid_map(f), 0., 1., 0., 1., tight);

        let mut previous = f64::INFINITY;
        for atol in [1e-6, 1e-8, 1e-10] {
            let q = integrate(grid_map(f), 0., 1., 0., 1., Tolerance::new(atol, 1e-14));
            let err = (q - reference).abs();
            // Noise floor well below the tolerance steps
            assert!(err <= previous + 1e-9 * reference.abs());
            previous = err;
        }
    }

    #[test]
    fn store_invariant() {
        let mut store = RectangleStore::default();

        // Tight tolerance: everything is queued
        store.save(
            &[1., 2., 3., 4.],
            &[0.1, 0.2, 0.3, 0.4],
            (0., PI),
            (0., PI),
            1e-16,
            PI * PI,
            1.,
        );
        assert_float_eq!(store.error_bound(), store.err_ok + store.in_heap, abs <= 0.);
        assert_float_eq!(store.error_bound(), 1.0, rmax <= 1e-14);

        // Worst rectangle comes out first, and the invariant survives
        let rect = store.next().unwrap();
        assert_float_eq!(rect.adjusted, 0.4, rmax <= 1e-14);
        assert_float_eq!(store.error_bound(), 0.6, rmax <= 1e-14);

        // Loose tolerance: everything is accepted as converged
        let mut store = RectangleStore::default();
        store.save(
            &[1., 2., 3., 4.],
            &[0.1, 0.2, 0.3, 0.4],
            (0., PI),
            (0., PI),
            1e3,
            PI * PI,
            1.,
        );
        assert!(store.is_empty());
        assert_float_eq!(store.error_bound(), 1.0, rmax <= 1e-14);
        assert_float_eq!(store.err_ok, 1.0, rmax <= 1e-14);
    }

    #[test]
    fn evaluation_cap() {
        // A genuinely singular integrand cannot converge; the engine must
        // still return a finite estimate once the evaluation cap is hit
        let mut tol = Tolerance::new(1e-14, 1e-14);
        tol.max_evaluations = 50;
        let q = integrate(
            grid_map(|x, y| 1. / (x * x + y * y)),
            0.,
            1.,
            0.,
            1.,
            tol,
        );
        assert!(q.is_finite());
    }
}
