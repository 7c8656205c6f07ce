//! The Gauss-Kronrod 3/7 rule: a 7-point Kronrod rule with an embedded
//! 3-point Gauss rule sharing its nodes, so one sweep of function values
//! yields both an integral estimate and an error estimate.

/// Number of nodes along each axis of an evaluation grid: the 7 Kronrod
/// nodes of both halves of a bisected interval, packed together
pub const GRID: usize = 14;

/// A stack-allocated grid of function values (or node coordinates) used
/// throughout the quadrature engine. No heap allocation happens inside
/// the refinement loop.
pub type NodeGrid = [[f64; GRID]; GRID];

/// The 7 Kronrod nodes on [-1, 1]
pub const NODES: [f64; 7] = [
    -0.960_491_268_708_020_2,
    -0.774_596_669_241_483_4,
    -0.434_243_749_346_802_6,
    0.0,
    0.434_243_749_346_802_6,
    0.774_596_669_241_483_4,
    0.960_491_268_708_020_2,
];

/// Weights of the embedded 3-point Gauss rule, zero at the Kronrod-only nodes
pub const GAUSS_WEIGHTS: [f64; 7] = [
    0.0,
    0.555_555_555_555_555_6,
    0.0,
    0.888_888_888_888_888_9,
    0.0,
    0.555_555_555_555_555_6,
    0.0,
];

/// Weights of the 7-point Kronrod rule
pub const KRONROD_WEIGHTS: [f64; 7] = [
    0.104_656_226_026_467_2,
    0.268_488_089_868_333_4,
    0.401_397_414_775_962_2,
    0.450_916_538_658_474_4,
    0.401_397_414_775_962_2,
    0.268_488_089_868_333_4,
    0.104_656_226_026_467_2,
];

/// The nodes of both halves of a bisected unit interval, as fractions of
/// the whole: entry `i` of the first half is `(1 + NODES[i]) / 4`, the
/// second half is the same shifted by one half. A single 14x14 grid of
/// function values therefore covers all four children of a 2x2
/// subdivision at once.
pub const PACKED_NODES: [f64; GRID] = [
    0.009_877_182_822_994_962,
    0.056_350_832_689_629_15,
    0.141_439_062_663_299_36,
    0.25,
    0.358_560_937_336_700_64,
    0.443_649_167_310_370_85,
    0.490_122_817_177_005,
    0.509_877_182_822_995,
    0.556_350_832_689_629_1,
    0.641_439_062_663_299_3,
    0.75,
    0.858_560_937_336_700_7,
    0.943_649_167_310_370_9,
    0.990_122_817_177_005,
];

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_consistent() {
        // Both rules integrate the constant 1 over [-1, 1] exactly
        assert!((KRONROD_WEIGHTS.iter().sum::<f64>() - 2.).abs() < 1e-14);
        assert!((GAUSS_WEIGHTS.iter().sum::<f64>() - 2.).abs() < 1e-14);

        // The packed nodes are the Kronrod nodes of the two half-intervals
        for i in 0..7 {
            assert!((PACKED_NODES[i] - (1. + NODES[i]) / 4.).abs() < 1e-15);
            assert!((PACKED_NODES[i + 7] - (0.5 + (1. + NODES[i]) / 4.)).abs() < 1e-15);
        }
    }

    #[test]
    fn gauss_rule_is_exact_for_cubics() {
        // 3-point Gauss integrates polynomials up to degree 5 exactly
        let f = |x: f64| 3. * x * x + x * x * x;
        let q: f64 = (0..7).map(|i| GAUSS_WEIGHTS[i] * f(NODES[i])).sum();
        assert!((q - 2.).abs() < 1e-14);
    }
}
