use super::{Geometry, Kernels, Regime};

impl Kernels {
    /// Kernel of the potential V
    pub(crate) fn v(&self, g: &Geometry) -> f64 {
        let (r2, r1) = (self.r2, self.r1);

        match &g.regime {
            Regime::NearSource => {
                if r2 < 1. {
                    return -0.5
                        * g.cos_lat
                        * (2. * r2 + r2 * r2 - 2. * r1 - r1 * r1
                            + 2. * ((r2 - 1.) / (r1 - 1.)).ln());
                }
                if r1 < 1. {
                    return 0.5
                        * g.cos_lat
                        * (2. * r2
                            + r2 * r2
                            + 2. * r1
                            + r1 * r1
                            + 4. * self.r.ln()
                            + 2. * ((1. - r1) * (r2 - 1.)).ln());
                }
                -0.5 * g.cos_lat
                    * (2. * r2 + r2 * r2 - 2. * r1 - r1 * r1 + 2. * ((r2 - 1.) / (r1 - 1.)).ln())
            }

            Regime::Antipodal => {
                0.5 * g.cos_lat
                    * (-2. * r2 + r2 * r2 + 2. * r1 - r1 * r1 + 2. * ((r2 + 1.) / (r1 + 1.)).ln())
            }

            Regime::Regular(s) => {
                let cos_phi = s.cos_phi;
                0.5 * g.cos_lat
                    * ((3. * cos_phi + r2) * s.l2 - (3. * cos_phi + r1) * s.l1
                        + (1. - 3. * cos_phi * cos_phi) * s.log_ratio(r2, r1))
            }
        }
    }
}
