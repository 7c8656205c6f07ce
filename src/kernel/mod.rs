//! The radial integral kernels.
//!
//! For each field quantity, the radial part of the Newton integral over a
//! spherical prism has a closed form, leaving a two-dimensional surface
//! integral over the angular footprint. The integrand of that surface
//! integral is the *kernel*: a function of the angular distance between
//! the running surface point and the observer, the azimuth between them,
//! and the two radial bounds.
//!
//! All kernels share a geometric prologue (computed here) and switch
//! between three analytic branches: a tiny cap around the source
//! direction, a tiny cap around its antipode, and the regular expression
//! built from slant distances in between. The caps are where the regular
//! expressions lose all significance; their closed forms also route
//! around the logarithmic singularity arising when the observer radius
//! coincides with one of the radial bounds.

use once_cell::sync::Lazy;
use std::f64::consts::FRAC_PI_2;

use crate::coordinate::{Observer, normalize_longitude};
use crate::math::gausskronrod::{GRID, NodeGrid};

mod curvature;
mod gradient;
mod potential;
mod tensor;

/// Half-width of the caps around the source direction and its antipode,
/// measured from pi/2: the caps themselves span about 1e-5 rad
static CAP: Lazy<f64> = Lazy::new(|| (1e-5_f64).acos());

// ----- C O M P O N E N T S -----------------------------------------------------------

/// The twenty field quantities: the potential and its derivatives up to
/// third order in the local north (x), east (y), down (z) frame at the
/// observer. The discriminants fix the storage and file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Component {
    V = 0,
    Vx,
    Vy,
    Vz,
    Vxx,
    Vxy,
    Vyy,
    Vzx,
    Vzy,
    Vzz,
    Vxxx,
    Vxxy,
    Vxxz,
    Vxyz,
    Vyyx,
    Vyyy,
    Vyyz,
    Vzzx,
    Vzzy,
    Vzzz,
}

impl Component {
    /// All twenty components, in storage order
    pub const ALL: [Component; 20] = [
        Component::V,
        Component::Vx,
        Component::Vy,
        Component::Vz,
        Component::Vxx,
        Component::Vxy,
        Component::Vyy,
        Component::Vzx,
        Component::Vzy,
        Component::Vzz,
        Component::Vxxx,
        Component::Vxxy,
        Component::Vxxz,
        Component::Vxyz,
        Component::Vyyx,
        Component::Vyyy,
        Component::Vyyz,
        Component::Vzzx,
        Component::Vzzy,
        Component::Vzzz,
    ];

    /// The potential and its first and second derivatives: the part of the
    /// family needed for magnetic output
    pub const THROUGH_SECOND: [Component; 10] = [
        Component::V,
        Component::Vx,
        Component::Vy,
        Component::Vz,
        Component::Vxx,
        Component::Vxy,
        Component::Vyy,
        Component::Vzx,
        Component::Vzy,
        Component::Vzz,
    ];
}

// ----- T H E   K E R N E L   F A M I L Y ---------------------------------------------

/// The kernel family bound to one (observer, radial bounds) pair.
///
/// Radii enter the kernels only through the dimensionless ratios
/// `R/r`; the raw observer radius is kept for the log terms of the
/// near-source branches. Values are pure functions of the node
/// coordinates: no caches, no side effects, safe to share across threads.
#[derive(Debug, Copy, Clone)]
pub struct Kernels {
    /// Radial bounds over observer radius
    r2: f64,
    r1: f64,
    /// Normalized heights of the observer over the bounds: h = (r - R)/r
    h2: f64,
    h1: f64,
    /// Raw observer radius
    r: f64,
    sin_lat: f64,
    cos_lat: f64,
    /// Observer longitude, degrees on (-180, 180]
    lon: f64,
}

impl Kernels {
    /// Bind the kernel family to the radial bounds `(r1, r2)` of a prism
    /// and an observer
    #[must_use]
    pub fn new(radial_bounds: (f64, f64), observer: &Observer) -> Kernels {
        let r = observer.radius;
        let h2 = (r - radial_bounds.1) / r;
        let h1 = (r - radial_bounds.0) / r;
        let lat = observer.latitude.to_radians();
        Kernels {
            r2: 1. - h2,
            r1: 1. - h1,
            h2,
            h1,
            r,
            sin_lat: lat.sin(),
            cos_lat: lat.cos(),
            lon: normalize_longitude(observer.longitude),
        }
    }

    /// Evaluate one kernel at a 14x14 grid of node latitudes and
    /// longitudes (degrees)
    #[must_use]
    pub fn grid(&self, component: Component, lat: &NodeGrid, lon: &NodeGrid) -> NodeGrid {
        let mut out = [[0.; GRID]; GRID];
        for i in 0..GRID {
            for j in 0..GRID {
                out[i][j] = self.node(component, lat[i][j], lon[i][j]);
            }
        }
        out
    }

    /// One kernel at one surface node
    #[must_use]
    pub fn node(&self, component: Component, lat: f64, lon: f64) -> f64 {
        let g = Geometry::new(self, lat, lon);
        match component {
            Component::V => self.v(&g),
            Component::Vx => self.vx(&g),
            Component::Vy => self.vy(&g),
            Component::Vz => self.vz(&g),
            Component::Vxx => self.vxx(&g),
            Component::Vxy => self.vxy(&g),
            Component::Vyy => self.vyy(&g),
            Component::Vzx => self.vzx(&g),
            Component::Vzy => self.vzy(&g),
            Component::Vzz => self.vzz(&g),
            Component::Vxxx => self.vxxx(&g),
            Component::Vxxy => self.vxxy(&g),
            Component::Vxxz => self.vxxz(&g),
            Component::Vxyz => self.vxyz(&g),
            Component::Vyyx => self.vyyx(&g),
            Component::Vyyy => self.vyyy(&g),
            Component::Vyyz => self.vyyz(&g),
            Component::Vzzx => self.vzzx(&g),
            Component::Vzzy => self.vzzy(&g),
            Component::Vzzz => self.vzzz(&g),
        }
    }
}

// ----- N O D E   G E O M E T R Y -----------------------------------------------------

/// Per-node geometry shared by all kernels: the cosine of the source
/// latitude (the surface element), the tangent-plane direction components
/// towards the source, and the branch selection.
pub(crate) struct Geometry {
    /// cos of the source-point latitude
    cos_lat: f64,
    /// North component of the direction towards the source
    tx: f64,
    /// East component of the direction towards the source
    ty: f64,
    regime: Regime,
}

pub(crate) enum Regime {
    /// The source node (angularly) coincides with the observer
    NearSource,
    /// The source node is antipodal to the observer
    Antipodal,
    /// Anywhere else: the slant-distance expressions apply
    Regular(Slant),
}

/// Slant distances from the observer to the two bounding spheres along
/// the node direction, normalized by the observer radius, plus the trig
/// of the angular distance they derive from
pub(crate) struct Slant {
    pub phi: f64,
    pub sin_phi: f64,
    pub cos_phi: f64,
    pub l2: f64,
    pub l1: f64,
}

impl Slant {
    pub fn csc(&self) -> f64 {
        1. / self.sin_phi
    }

    pub fn cot(&self) -> f64 {
        1. / self.phi.tan()
    }

    /// The log ratio common to the even-order kernels
    pub fn log_ratio(&self, r2: f64, r1: f64) -> f64 {
        ((self.cos_phi - r2 + self.l2) / (self.cos_phi - r1 + self.l1)).ln()
    }
}

impl Geometry {
    fn new(k: &Kernels, lat: f64, lon: f64) -> Geometry {
        let lat = lat.to_radians();
        let dlon = (lon - k.lon).to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_dlon, cos_dlon) = dlon.sin_cos();

        let tx = k.cos_lat * sin_lat - k.sin_lat * cos_lat * cos_dlon;
        let ty = cos_lat * sin_dlon;
        let num = ty.hypot(tx);
        let den = k.sin_lat * sin_lat + k.cos_lat * cos_lat * cos_dlon;
        let phi = num.atan2(den);

        let regime = if phi < FRAC_PI_2 - *CAP {
            Regime::NearSource
        } else if phi > FRAC_PI_2 + *CAP {
            Regime::Antipodal
        } else {
            let sin_half_sq = (phi / 2.).sin().powi(2);
            let (sin_phi, cos_phi) = phi.sin_cos();
            Regime::Regular(Slant {
                phi,
                sin_phi,
                cos_phi,
                l2: (4. * sin_half_sq * (1. - k.h2) + k.h2 * k.h2).sqrt(),
                l1: (4. * sin_half_sq * (1. - k.h1) + k.h1 * k.h1).sqrt(),
            })
        };

        Geometry {
            cos_lat,
            tx,
            ty,
            regime,
        }
    }

    /// Azimuth of the source direction seen from the observer
    pub fn azimuth(&self) -> f64 {
        self.ty.atan2(self.tx)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn node_grid(lat: f64, lon: f64) -> (NodeGrid, NodeGrid) {
        let mut lats = [[0.; GRID]; GRID];
        let mut lons = [[0.; GRID]; GRID];
        for i in 0..GRID {
            for j in 0..GRID {
                lats[i][j] = lat + 0.3 * i as f64;
                lons[i][j] = lon + 0.3 * j as f64;
            }
        }
        (lats, lons)
    }

    #[test]
    fn all_kernels_finite() {
        // Exterior, interior and in-between observer radii, nodes covering
        // regular geometry a few degrees away from the observer
        for radius in [6_390_000., 6_350_000., 6_250_000.] {
            let observer = Observer::new(10., 10., radius);
            let kernels = Kernels::new((6_300_000., 6_371_000.), &observer);
            let (lats, lons) = node_grid(20., 20.);
            for component in Component::ALL {
                let z = kernels.grid(component, &lats, &lons);
                for row in &z {
                    for v in row {
                        assert!(v.is_finite(), "{component:?} not finite at r={radius}");
                    }
                }
            }
        }
    }

    #[test]
    fn branch_values_finite_in_caps() {
        // Nodes exactly on top of the observer and at its antipode take
        // the closed-form branches. With the observer radius strictly
        // between the bounds, off either bound, every branch is finite.
        let observer = Observer::new(45., 0., 6_350_000.);
        let kernels = Kernels::new((6_300_000., 6_371_000.), &observer);
        for component in Component::ALL {
            assert!(kernels.node(component, 45., 0.).is_finite());
            assert!(kernels.node(component, -45., 180.).is_finite());
        }
    }

    #[test]
    fn longitude_translation_invariance() {
        // Shifting observer and nodes by a constant longitude changes nothing
        let kernels_a = Kernels::new((6_300_000., 6_371_000.), &Observer::new(10., 10., 6_390_000.));
        let kernels_b = Kernels::new((6_300_000., 6_371_000.), &Observer::new(10., 95., 6_390_000.));
        for component in Component::ALL {
            let a = kernels_a.node(component, 17., 23.);
            let b = kernels_b.node(component, 17., 23. + 85.);
            assert_eq!(a, b, "{component:?}");
        }
    }

    #[test]
    fn latitude_reflection_parity() {
        // Mirroring through the equator flips the north axis: components
        // with an odd number of x indices change sign, the rest are even
        let kernels_n = Kernels::new((6_300_000., 6_371_000.), &Observer::new(10., 0., 6_390_000.));
        let kernels_s = Kernels::new((6_300_000., 6_371_000.), &Observer::new(-10., 0., 6_390_000.));

        let odd = [
            Component::Vx,
            Component::Vxy,
            Component::Vzx,
            Component::Vxxx,
            Component::Vxyz,
            Component::Vyyx,
            Component::Vzzx,
        ];
        for component in Component::ALL {
            let north = kernels_n.node(component, 17., 5.);
            let south = kernels_s.node(component, -17., 5.);
            let expected = if odd.contains(&component) { -north } else { north };
            assert!(
                (south - expected).abs() <= 1e-12 * north.abs().max(1.),
                "{component:?}: {south} vs {expected}"
            );
        }
    }
}
