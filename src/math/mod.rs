//! Numerical machinery for the surface integrals

/// Node and weight tables for the Gauss-Kronrod 3/7 rule.
pub mod gausskronrod;

/// Adaptive two-dimensional quadrature on a cosine-transformed grid.
pub mod quadrature;
