use super::{Geometry, Kernels, Regime, Slant};

impl Kernels {
    /// Kernel of Vx (north derivative). The near-source and antipodal
    /// limits vanish: the integrand is odd in the azimuth there.
    pub(crate) fn vx(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::Regular(s) => g.cos_lat * g.azimuth().cos() * self.horizontal_first(s),
            _ => 0.,
        }
    }

    /// Kernel of Vy (east derivative)
    pub(crate) fn vy(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::Regular(s) => g.cos_lat * g.azimuth().sin() * self.horizontal_first(s),
            _ => 0.,
        }
    }

    /// The azimuth-independent factor shared by Vx and Vy
    fn horizontal_first(&self, s: &Slant) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        let csc = s.csc();
        let cos2 = (2. * s.phi).cos();
        let cos3 = (3. * s.phi).cos();

        (0.5 * csc * (1. - 3. * cos2) * (s.l1 - s.l2)
            + 0.5 * (-s.cot() + 3. * csc * cos3) * (r2 * s.l1 - r1 * s.l2)
            + 0.5 * csc * (1. - cos2) * (r2 * r2 * s.l1 - r1 * r1 * s.l2))
            / (s.l2 * s.l1)
            - 1.5 * (2. * s.phi).sin() * s.log_ratio(r2, r1)
    }

    /// Kernel of Vz (radial/down derivative)
    pub(crate) fn vz(&self, g: &Geometry) -> f64 {
        let (r2, r1) = (self.r2, self.r1);

        match &g.regime {
            Regime::NearSource => {
                if r2 < 1. {
                    return -g.cos_lat
                        * ((r2 - r1) / ((1. - r2) * (1. - r1))
                            + (r2 - r1)
                            + 2. * ((1. - r2) / (1. - r1)).ln());
                }
                if r1 < 1. {
                    return g.cos_lat
                        * ((2. - r2 - r1) / ((1. - r2) * (1. - r1))
                            + (r2 + r1)
                            + 4. * self.r.ln()
                            + 2. * ((1. - r1) * (r2 - 1.)).ln());
                }
                g.cos_lat
                    * ((r2 - r1) / ((1. - r2) * (1. - r1))
                        + (r2 - r1)
                        + 2. * ((1. - r2) / (1. - r1)).ln())
            }

            Regime::Antipodal => {
                g.cos_lat
                    * ((r1 - r2) / ((1. + r2) * (1. + r1)) - (r2 - r1)
                        + 2. * ((1. + r2) / (1. + r1)).ln())
            }

            Regime::Regular(s) => {
                let cos_phi = s.cos_phi;
                g.cos_lat
                    * ((3. * cos_phi * (s.l1 - s.l2)
                        + (1. - 6. * cos_phi * cos_phi) * (r2 * s.l1 - r1 * s.l2)
                        + cos_phi * (r2 * r2 * s.l1 - r1 * r1 * s.l2))
                        / (s.l2 * s.l1)
                        + (1. - 3. * cos_phi * cos_phi) * s.log_ratio(r2, r1))
            }
        }
    }
}
