//! Kernels of the six second derivatives (the gravity gradient tensor).
//!
//! The near-source branches of the diagonal components split three ways on
//! the position of the observer radius relative to the bounding spheres,
//! to route around the logarithmic singularity when they coincide. The
//! branch expressions, sign patterns included, follow the reference
//! derivation.

use super::{Geometry, Kernels, Regime, Slant};

impl Kernels {
    /// Kernel of Vxx
    pub(crate) fn vxx(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::NearSource => self.horizontal_diagonal_near(g.cos_lat),
            Regime::Antipodal => self.horizontal_diagonal_far(g.cos_lat),
            Regime::Regular(s) => {
                let (a, b) = self.diagonal_second_parts(s);
                let cos_alpha = g.azimuth().cos();
                g.cos_lat
                    * (cos_alpha * cos_alpha * s.csc() * s.csc() * a
                        + b
                        + (1. - 3. * g.tx * g.tx) * s.log_ratio(self.r2, self.r1))
            }
        }
    }

    /// Kernel of Vyy
    pub(crate) fn vyy(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::NearSource => self.horizontal_diagonal_near(g.cos_lat),
            Regime::Antipodal => self.horizontal_diagonal_far(g.cos_lat),
            Regime::Regular(s) => {
                let (a, b) = self.diagonal_second_parts(s);
                let sin_alpha = g.azimuth().sin();
                g.cos_lat
                    * (sin_alpha * sin_alpha * s.csc() * s.csc() * a
                        + b
                        + (1. - 3. * g.ty * g.ty) * s.log_ratio(self.r2, self.r1))
            }
        }
    }

    /// Kernel of Vxy
    pub(crate) fn vxy(&self, g: &Geometry) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        match &g.regime {
            Regime::Regular(s) => {
                let (l2c, l1c) = (s.l2.powi(3), s.l1.powi(3));
                let cos_phi = s.cos_phi;
                let cos2 = (2. * s.phi).cos();
                let csc = s.csc();

                g.cos_lat
                    * 0.5
                    * (2. * g.azimuth()).sin()
                    * (csc
                        * csc
                        * ((cos_phi * (-5. + 3. * cos_phi * cos_phi) * (l1c - l2c)
                            + 3. * (-1. + 7. * cos_phi * cos_phi - 4. * cos_phi.powi(4))
                                * (r2 * l1c - r1 * l2c)
                            + 6. * cos_phi.powi(3) * (-2. + cos2)
                                * (r2 * r2 * l1c - r1 * r1 * l2c)
                            + (3. * cos2 - (4. * s.phi).cos())
                                * (r2.powi(3) * l1c - r1.powi(3) * l2c))
                            / (l2c * l1c)))
                    - g.cos_lat * g.tx * g.ty * 3. * s.log_ratio(r2, r1)
            }
            _ => 0.,
        }
    }

    /// Kernel of Vzx
    pub(crate) fn vzx(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::Regular(s) => {
                g.cos_lat
                    * (0.5 * g.azimuth().cos() * self.vertical_mixed_second(s)
                        - 3. * s.cos_phi * g.tx * s.log_ratio(self.r2, self.r1))
            }
            _ => 0.,
        }
    }

    /// Kernel of Vzy
    pub(crate) fn vzy(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::Regular(s) => {
                g.cos_lat
                    * (0.5 * g.azimuth().sin() * self.vertical_mixed_second(s)
                        - 3. * s.cos_phi * g.ty * s.log_ratio(self.r2, self.r1))
            }
            _ => 0.,
        }
    }

    /// Kernel of Vzz
    pub(crate) fn vzz(&self, g: &Geometry) -> f64 {
        let (r2, r1) = (self.r2, self.r1);

        match &g.regime {
            Regime::NearSource => {
                if r2 < 1. {
                    return -2.
                        * g.cos_lat
                        * ((3. - 4. * r2) / (2. * (1. - r2).powi(2))
                            - (3. - 4. * r1) / (2. * (1. - r1).powi(2))
                            + ((1. - r2) / (1. - r1)).ln());
                }
                if r1 < 1. {
                    return 2.
                        * g.cos_lat
                        * ((3. - 4. * r2) / (2. * (1. - r2).powi(2))
                            + (3. - 4. * r1) / (2. * (1. - r1).powi(2))
                            + 2. * self.r.ln()
                            + ((r2 - 1.) * (1. - r1)).ln());
                }
                2. * g.cos_lat
                    * ((3. - 4. * r2) / (2. * (1. - r2).powi(2))
                        - (3. - 4. * r1) / (2. * (1. - r1).powi(2))
                        + ((r2 - 1.) / (r1 - 1.)).ln())
            }

            Regime::Antipodal => {
                2. * g.cos_lat
                    * ((3. + 4. * r2) / (2. * (1. + r2).powi(2))
                        - (3. + 4. * r1) / (2. * (1. + r1).powi(2))
                        + ((1. + r2) / (1. + r1)).ln())
            }

            Regime::Regular(s) => {
                let (l2c, l1c) = (s.l2.powi(3), s.l1.powi(3));
                let cos_phi = s.cos_phi;
                let cos2 = (2. * s.phi).cos();

                g.cos_lat
                    * ((3. * cos_phi * (l1c - l2c)
                        + (-5. - 6. * cos2) * (r2 * l1c - r1 * l2c)
                        + 2. * cos_phi * (4. + 3. * cos2) * (r2 * r2 * l1c - r1 * r1 * l2c)
                        + 2. * (-1. - 2. * cos2) * (r2.powi(3) * l1c - r1.powi(3) * l2c))
                        / (l2c * l1c)
                        + (1. - 3. * cos_phi * cos_phi) * s.log_ratio(r2, r1))
            }
        }
    }

    // ----- S H A R E D   P I E C E S -------------------------------------------------

    /// Near-source branch shared by Vxx and Vyy
    fn horizontal_diagonal_near(&self, cos_lat: f64) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        if r2 < 1. {
            return cos_lat
                * ((3. - 4. * r2) / (2. * (1. - r2).powi(2))
                    - (3. - 4. * r1) / (2. * (1. - r1).powi(2))
                    + ((1. - r2) / (1. - r1)).ln());
        }
        if r1 < 1. {
            return -cos_lat
                * ((3. - 4. * r2) / (2. * (1. - r2).powi(2))
                    + (3. - 4. * r1) / (2. * (1. - r1).powi(2))
                    + 2. * self.r.ln()
                    + ((r2 - 1.) / (1. - r1)).ln());
        }
        -cos_lat
            * ((3. - 4. * r2) / (2. * (1. - r2).powi(2))
                - (3. - 4. * r1) / (2. * (1. - r1).powi(2))
                + ((r2 - 1.) / (r1 - 1.)).ln())
    }

    /// Antipodal branch shared by Vxx and Vyy
    fn horizontal_diagonal_far(&self, cos_lat: f64) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        -cos_lat
            * ((3. + 4. * r2) / (2. * (1. + r2).powi(2))
                - (3. + 4. * r1) / (2. * (1. + r1).powi(2))
                + ((1. + r2) / (1. + r1)).ln())
    }

    /// The azimuth-independent regular-branch blocks of Vxx and Vyy:
    /// the csc^2-weighted cubic block and the first-power block
    fn diagonal_second_parts(&self, s: &Slant) -> (f64, f64) {
        let (r2, r1) = (self.r2, self.r1);
        let (l2c, l1c) = (s.l2.powi(3), s.l1.powi(3));
        let cos_phi = s.cos_phi;
        let cos_sq = cos_phi * cos_phi;
        let cos2 = (2. * s.phi).cos();
        let cot = s.cot();

        let a = ((-5. * cos_phi + 3. * cos_phi.powi(3)) * (l1c - l2c)
            + (-3. + 15. * cos_sq - 6. * cos_sq * cos2) * (r2 * l1c - r1 * l2c)
            + (-9. * cos_phi.powi(3) + 3. * cos_sq * (3. * s.phi).cos())
                * (r2 * r2 * l1c - r1 * r1 * l2c)
            + (-4. + 10. * cos_sq - 4. * cos_sq * cos2) * (r2.powi(3) * l1c - r1.powi(3) * l2c))
            / (l2c * l1c);

        let b = (cot * s.csc() * (s.l1 - s.l2) + (1. - cot * cot) * (r2 * s.l1 - r1 * s.l2))
            / (s.l2 * s.l1);

        (a, b)
    }

    /// The azimuth-independent cubic block shared by Vzx and Vzy
    fn vertical_mixed_second(&self, s: &Slant) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        let (l2c, l1c) = (s.l2.powi(3), s.l1.powi(3));
        let csc = s.csc();
        let cos2 = (2. * s.phi).cos();
        let cos3 = (3. * s.phi).cos();

        (csc * (1. - 3. * cos2) * (l1c - l2c)
            + csc * 6. * cos3 * (r2 * l1c - r1 * l2c)
            + csc * 3. * (1. - 2. * cos2 - (4. * s.phi).cos()) * (r2 * r2 * l1c - r1 * r1 * l2c)
            + 2. * (2. * cos3 * csc - s.cot()) * (r2.powi(3) * l1c - r1.powi(3) * l2c))
            / (l2c * l1c)
    }
}
