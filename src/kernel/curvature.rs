//! Kernels of the ten third derivatives (the gravity curvature
//! components).
//!
//! Only Vxxz, Vyyz and Vzzz have non-vanishing limits at the source
//! direction and the antipode; the limits of the other seven are odd in
//! the azimuth and integrate to zero over the caps.

use super::{Geometry, Kernels, Regime, Slant};

impl Kernels {
    /// Kernel of Vxxx
    pub(crate) fn vxxx(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::Regular(s) => {
                let alpha = g.azimuth();
                let cos_alpha = alpha.cos();
                -g.cos_lat
                    * cos_alpha
                    * s.csc().powi(3)
                    * (cos_alpha * cos_alpha * self.quintic_block(s) + self.cubic_block_major(s))
            }
            _ => 0.,
        }
    }

    /// Kernel of Vxxy
    pub(crate) fn vxxy(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::Regular(s) => {
                let alpha = g.azimuth();
                let cos_alpha = alpha.cos();
                -g.cos_lat
                    * alpha.sin()
                    * s.csc().powi(3)
                    * (cos_alpha * cos_alpha * self.quintic_block(s) + self.cubic_block_minor(s))
            }
            _ => 0.,
        }
    }

    /// Kernel of Vyyx
    pub(crate) fn vyyx(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::Regular(s) => {
                let alpha = g.azimuth();
                let sin_alpha = alpha.sin();
                -g.cos_lat
                    * alpha.cos()
                    * s.csc().powi(3)
                    * (sin_alpha * sin_alpha * self.quintic_block(s) + self.cubic_block_minor(s))
            }
            _ => 0.,
        }
    }

    /// Kernel of Vyyy
    pub(crate) fn vyyy(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::Regular(s) => {
                let alpha = g.azimuth();
                let sin_alpha = alpha.sin();
                -g.cos_lat
                    * sin_alpha
                    * s.csc().powi(3)
                    * (sin_alpha * sin_alpha * self.quintic_block(s) + self.cubic_block_major(s))
            }
            _ => 0.,
        }
    }

    /// Kernel of Vxxz
    pub(crate) fn vxxz(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::NearSource => self.vertical_curvature_near(g.cos_lat),
            Regime::Antipodal => self.vertical_curvature_far(g.cos_lat),
            Regime::Regular(s) => self.vertical_curvature_regular(g.cos_lat, g.tx, s),
        }
    }

    /// Kernel of Vyyz
    pub(crate) fn vyyz(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::NearSource => self.vertical_curvature_near(g.cos_lat),
            Regime::Antipodal => self.vertical_curvature_far(g.cos_lat),
            Regime::Regular(s) => self.vertical_curvature_regular(g.cos_lat, g.ty, s),
        }
    }

    /// Kernel of Vxyz
    pub(crate) fn vxyz(&self, g: &Geometry) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        match &g.regime {
            Regime::Regular(s) => {
                let (l2q, l1q) = (s.l2.powi(5), s.l1.powi(5));
                -3. * g.cos_lat * g.tx * g.ty * (r2.powi(5) * l1q - r1.powi(5) * l2q) / (l2q * l1q)
            }
            _ => 0.,
        }
    }

    /// Kernel of Vzzx
    pub(crate) fn vzzx(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::Regular(s) => 3. * g.cos_lat * g.tx * self.radial_pair_block(s),
            _ => 0.,
        }
    }

    /// Kernel of Vzzy
    pub(crate) fn vzzy(&self, g: &Geometry) -> f64 {
        match &g.regime {
            Regime::Regular(s) => 3. * g.cos_lat * g.ty * self.radial_pair_block(s),
            _ => 0.,
        }
    }

    /// Kernel of Vzzz
    pub(crate) fn vzzz(&self, g: &Geometry) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        match &g.regime {
            Regime::NearSource => {
                let (u2, u1) = self.cubic_near();
                if r2 < 1. {
                    return -2. * g.cos_lat * (u2 - u1);
                }
                if r1 < 1. {
                    return 2. * g.cos_lat * (u2 + u1);
                }
                2. * g.cos_lat * (u2 - u1)
            }

            Regime::Antipodal => {
                let (v2, v1) = self.cubic_far();
                2. * g.cos_lat * (v2 - v1)
            }

            Regime::Regular(s) => {
                let (l2q, l1q) = (s.l2.powi(5), s.l1.powi(5));
                let cos_phi = s.cos_phi;
                g.cos_lat
                    * (-2. * (r2.powi(3) * l1q - r1.powi(3) * l2q)
                        + 4. * cos_phi * (r2.powi(4) * l1q - r1.powi(4) * l2q)
                        + (1. - 3. * cos_phi * cos_phi) * (r2.powi(5) * l1q - r1.powi(5) * l2q))
                    / (l2q * l1q)
            }
        }
    }

    // ----- S H A R E D   P I E C E S -------------------------------------------------

    /// (1 - 3R + 3R^2) / (1 - R)^3 at both radial bounds
    fn cubic_near(&self) -> (f64, f64) {
        let (r2, r1) = (self.r2, self.r1);
        (
            (1. - 3. * r2 + 3. * r2 * r2) / (1. - r2).powi(3),
            (1. - 3. * r1 + 3. * r1 * r1) / (1. - r1).powi(3),
        )
    }

    /// (1 + 3R + 3R^2) / (1 + R)^3 at both radial bounds
    fn cubic_far(&self) -> (f64, f64) {
        let (r2, r1) = (self.r2, self.r1);
        (
            (1. + 3. * r2 + 3. * r2 * r2) / (1. + r2).powi(3),
            (1. + 3. * r1 + 3. * r1 * r1) / (1. + r1).powi(3),
        )
    }

    /// Near-source branch shared by Vxxz and Vyyz
    fn vertical_curvature_near(&self, cos_lat: f64) -> f64 {
        let (u2, u1) = self.cubic_near();
        if self.r2 < 1. {
            return cos_lat * (u2 - u1);
        }
        if self.r1 < 1. {
            return -cos_lat * (u2 + u1);
        }
        -cos_lat * (u2 - u1)
    }

    /// Antipodal branch shared by Vxxz and Vyyz
    fn vertical_curvature_far(&self, cos_lat: f64) -> f64 {
        let (v2, v1) = self.cubic_far();
        -cos_lat * (v2 - v1)
    }

    /// Regular branch shared by Vxxz and Vyyz; `t` is the north or east
    /// direction component
    fn vertical_curvature_regular(&self, cos_lat: f64, t: f64, s: &Slant) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        let (l2q, l1q) = (s.l2.powi(5), s.l1.powi(5));
        cos_lat
            * ((r2.powi(3) * l1q - r1.powi(3) * l2q)
                - 2. * s.cos_phi * (r2.powi(4) * l1q - r1.powi(4) * l2q)
                + (1. - 3. * t * t) * (r2.powi(5) * l1q - r1.powi(5) * l2q))
            / (l2q * l1q)
    }

    /// The fifth-power block common to the four horizontal curvature
    /// kernels (multiplied by cos^2 or sin^2 of the azimuth)
    fn quintic_block(&self, s: &Slant) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        let (l2q, l1q) = (s.l2.powi(5), s.l1.powi(5));
        let cos_phi = s.cos_phi;
        let cos_sq = cos_phi * cos_phi;
        let cos2 = (2. * s.phi).cos();
        let w2 = 1. - r2 * cos_phi;
        let w1 = 1. - r1 * cos_phi;

        (8. * (w2 * l1q - w1 * l2q) - 32. * cos_phi * (r2 * w2 * l1q - r1 * w1 * l2q)
            + 4. * (5. + 7. * cos_sq) * (r2 * r2 * w2 * l1q - r1 * r1 * w1 * l2q)
            + 4. * cos_phi * (-9. + cos2) * (r2.powi(3) * w2 * l1q - r1.powi(3) * w1 * l2q)
            + (15. - 10. * cos_sq + 3. * cos_sq * cos_sq)
                * (r2.powi(4) * w2 * l1q - r1.powi(4) * w1 * l2q))
            / (l2q * l1q)
    }

    /// The third-power block of Vxxx and Vyyy
    fn cubic_block_major(&self, s: &Slant) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        let (l2c, l1c) = (s.l2.powi(3), s.l1.powi(3));
        let cos_phi = s.cos_phi;
        let w2 = 1. - r2 * cos_phi;
        let w1 = 1. - r1 * cos_phi;

        (-6. * (w2 * l1c - w1 * l2c)
            + 12. * cos_phi * (r2 * w2 * l1c - r1 * w1 * l2c)
            + 1.5 * (-5. + (2. * s.phi).cos()) * (r2 * r2 * w2 * l1c - r1 * r1 * w1 * l2c))
            / (l2c * l1c)
    }

    /// The third-power block of Vxxy and Vyyx
    fn cubic_block_minor(&self, s: &Slant) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        let (l2c, l1c) = (s.l2.powi(3), s.l1.powi(3));
        let cos_phi = s.cos_phi;
        let w2 = 1. - r2 * cos_phi;
        let w1 = 1. - r1 * cos_phi;

        (-2. * (w2 * l1c - w1 * l2c)
            + 4. * cos_phi * (r2 * w2 * l1c - r1 * w1 * l2c)
            + (-3. + cos_phi * cos_phi) * (r2 * r2 * w2 * l1c - r1 * r1 * w1 * l2c))
            / (l2c * l1c)
    }

    /// The block shared by Vzzx and Vzzy
    fn radial_pair_block(&self, s: &Slant) -> f64 {
        let (r2, r1) = (self.r2, self.r1);
        let (l2q, l1q) = (s.l2.powi(5), s.l1.powi(5));
        let w2 = 1. - r2 * s.cos_phi;
        let w1 = 1. - r1 * s.cos_phi;
        (r2.powi(4) * w2 * l1q - r1.powi(4) * w1 * l2q) / (l2q * l1q)
    }
}
