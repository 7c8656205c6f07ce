//! The closed-form field of a complete spherical shell.
//!
//! By Newton's shell theorem the field of a homogeneous shell depends
//! only on where the observer radius sits relative to the bounding
//! spheres. Everything that is not radially symmetric vanishes; the
//! surviving components are V, Vz, the tensor diagonal, and the
//! vertical curvature triple.

use std::f64::consts::PI;

use crate::field::{RADIAN_CORRECTION, Tensors};
use crate::kernel::Component;

/// Field of the shell bounded by `r1 < r2`, seen from radius `r`, in the
/// raw units of the surface integrals: each component is pre-divided by
/// the final scale factor its group receives in the aggregator, so shell
/// and quadrature contributions can be combined before scaling.
#[must_use]
pub fn shell_field(r1: f64, r2: f64, r: f64) -> Tensors {
    let mut shell = Tensors::default();

    if r >= r2 {
        // Outside: the shell acts as a point mass
        let m0 = 4. * PI / 3. * (r2.powi(3) - r1.powi(3));
        shell[Component::V] = m0 / r;
        shell[Component::Vz] = -m0 / (r * r);
        shell[Component::Vxx] = -m0 / (r * r * r);
        shell[Component::Vyy] = -m0 / (r * r * r);
        shell[Component::Vzz] = 2. * m0 / (r * r * r);
        shell[Component::Vxxz] = 3. * m0 / r.powi(4);
        shell[Component::Vyyz] = 3. * m0 / r.powi(4);
        shell[Component::Vzzz] = -6. * m0 / r.powi(4);
    } else if r <= r1 {
        // Inside the cavity: constant potential, no field
        shell[Component::V] = 2. * PI * (r2 * r2 - r1 * r1);
    } else {
        // Within the mass: only the part below the observer attracts
        shell[Component::V] = 2. * PI * (r2 * r2 - r * r / 3. - 2. * r1.powi(3) / (3. * r));
        shell[Component::Vz] = -4. * PI / 3. * (r - r1.powi(3) / (r * r));
        shell[Component::Vxx] = -4. * PI / 3. * (1. - r1.powi(3) / r.powi(3));
        shell[Component::Vyy] = shell[Component::Vxx];
        shell[Component::Vzz] = -4. * PI / 3. * (1. + 2. * r1.powi(3) / r.powi(3));
        shell[Component::Vxxz] = -4. * PI * r1.powi(3) / r.powi(4);
        shell[Component::Vyyz] = shell[Component::Vxxz];
        shell[Component::Vzzz] = 8. * PI * r1.powi(3) / r.powi(4);
    }

    // Undo, per group, the scaling the aggregator will apply
    shell[Component::V] /= r * r * RADIAN_CORRECTION;
    shell[Component::Vz] /= r * RADIAN_CORRECTION;
    shell[Component::Vxx] /= RADIAN_CORRECTION;
    shell[Component::Vyy] /= RADIAN_CORRECTION;
    shell[Component::Vzz] /= RADIAN_CORRECTION;
    shell[Component::Vxxz] *= r / RADIAN_CORRECTION;
    shell[Component::Vyyz] *= r / RADIAN_CORRECTION;
    shell[Component::Vzzz] *= r / RADIAN_CORRECTION;

    shell
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn symmetry_zeros() {
        // Everything that is zero by symmetry stays zero in all three cases
        let zero = [
            Component::Vx,
            Component::Vy,
            Component::Vxy,
            Component::Vzx,
            Component::Vzy,
            Component::Vxxx,
            Component::Vxxy,
            Component::Vxyz,
            Component::Vyyx,
            Component::Vyyy,
            Component::Vzzx,
            Component::Vzzy,
        ];
        for r in [6_400_000., 6_350_000., 6_200_000.] {
            let shell = shell_field(6_300_000., 6_371_000., r);
            for component in zero {
                assert_eq!(shell[component], 0., "{component:?} at r={r}");
            }
        }
    }

    #[test]
    fn branches_agree_at_the_bounds() {
        let (r1, r2) = (6_300_000., 6_371_000.);

        // The potential and its gradient are continuous across a volume
        // density, as are the tangential second derivatives; Vzz and the
        // vertical curvatures jump with the density. Compare raw values,
        // with the group normalizations undone.
        let raw = |r: f64, c: Component| {
            let shell = shell_field(r1, r2, r);
            match c {
                Component::V => shell[c] * r * r * RADIAN_CORRECTION,
                Component::Vz => shell[c] * r * RADIAN_CORRECTION,
                Component::Vxx | Component::Vyy | Component::Vzz => shell[c] * RADIAN_CORRECTION,
                _ => shell[c] * RADIAN_CORRECTION / r,
            }
        };

        let continuous = [Component::V, Component::Vz, Component::Vxx, Component::Vyy];
        for bound in [r1, r2] {
            for component in continuous {
                let outside = raw(bound + 1e-3, component);
                let inside = raw(bound - 1e-3, component);
                assert_float_eq!(outside, inside, rmax <= 1e-6, abs <= 1e-12);
            }
        }

        // Vzz jumps by 4 pi rho across each bounding sphere (rho = 1 here)
        let jump_at_r2 = raw(r2 + 1e-3, Component::Vzz) - raw(r2 - 1e-3, Component::Vzz);
        assert_float_eq!(jump_at_r2, 4. * PI, rmax <= 1e-6);
        let jump_at_r1 = raw(r1 + 1e-3, Component::Vzz) - raw(r1 - 1e-3, Component::Vzz);
        assert_float_eq!(jump_at_r1, -4. * PI, rmax <= 1e-6);
    }

    #[test]
    fn exterior_matches_point_mass() {
        let (r1, r2, r): (f64, f64, f64) = (6_300_000., 6_371_000., 6_400_000.);
        let m0 = 4. * PI / 3. * (r2.powi(3) - r1.powi(3));
        let shell = shell_field(r1, r2, r);

        assert_float_eq!(
            shell[Component::V] * r * r * RADIAN_CORRECTION,
            m0 / r,
            rmax <= 1e-14
        );
        assert_float_eq!(
            shell[Component::Vz] * r * RADIAN_CORRECTION,
            -m0 / (r * r),
            rmax <= 1e-14
        );
        // The trace of the tensor vanishes outside the mass
        let trace = shell[Component::Vxx] + shell[Component::Vyy] + shell[Component::Vzz];
        assert_float_eq!(trace, 0., abs <= 1e-9 * shell[Component::Vzz].abs());
    }
}
