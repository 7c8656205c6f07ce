//! The per-point evaluator: one (tesseroid, observer) pair in, all
//! twenty field quantities out.
//!
//! The kernels are singular where the angular distance vanishes, which
//! happens exactly when the observer is angularly inside the prism
//! footprint. In that case the integral over the footprint is traded for
//! the closed-form field of the enclosing spherical shell minus the
//! integral over the whole-sphere complement of a patch around the
//! prism, which keeps the quadrature away from the singularity.

use crate::coordinate::{AngularRect, Observer, Tesseroid};
use crate::field::{Tensors, shell_field};
use crate::kernel::{Component, Kernels};
use crate::math::quadrature::{Tolerance, integrate};

/// Subtract from `outer` a patch of half-widths `(half_dlat, half_dlon)`
/// centered on `(lat, lon)` (clamped to `outer`), and return what
/// remains as up to four rectangles. A center outside `outer` returns
/// `outer` untouched.
///
/// Note that the caller centers the patch on the *prism centroid* with
/// the prism's own half-widths, not on the observer: the patch must
/// cover the whole footprint, and with the observer strictly inside the
/// footprint it is thereby also inside the patch.
#[must_use]
pub fn split_footprint(
    outer: AngularRect,
    center: (f64, f64),
    half_widths: (f64, f64),
) -> Vec<AngularRect> {
    let (lat, lon) = center;
    if lat < outer.lat1 || lat > outer.lat2 || lon < outer.lon1 || lon > outer.lon2 {
        return vec![outer];
    }

    let patch_lat1 = (lat - half_widths.0).max(outer.lat1);
    let patch_lat2 = (lat + half_widths.0).min(outer.lat2);
    let patch_lon1 = (lon - half_widths.1).max(outer.lon1);
    let patch_lon2 = (lon + half_widths.1).min(outer.lon2);

    let mut remainder = Vec::with_capacity(4);

    if patch_lat2 < outer.lat2 {
        remainder.push(AngularRect::new(
            patch_lat2, outer.lat2, outer.lon1, outer.lon2,
        ));
    }
    if patch_lat1 > outer.lat1 {
        remainder.push(AngularRect::new(
            outer.lat1, patch_lat1, outer.lon1, outer.lon2,
        ));
    }
    if patch_lon1 > outer.lon1 {
        remainder.push(AngularRect::new(
            patch_lat1, patch_lat2, outer.lon1, patch_lon1,
        ));
    }
    if patch_lon2 < outer.lon2 {
        remainder.push(AngularRect::new(
            patch_lat1, patch_lat2, patch_lon2, outer.lon2,
        ));
    }

    remainder
}

/// All twenty field quantities of one prism at one observer, in the raw
/// units of the surface integrals: density weighting and the final
/// radial/radian scaling belong to the aggregator.
#[must_use]
pub fn point_field(tesseroid: &Tesseroid, observer: &Observer, tolerance: Tolerance) -> Tensors {
    let kernels = Kernels::new((tesseroid.r1, tesseroid.r2), observer);

    let quadrature = |component: Component, rect: &AngularRect| {
        integrate(
            |lat, lon| kernels.grid(component, lat, lon),
            rect.lat1,
            rect.lat2,
            rect.lon1,
            rect.lon2,
            tolerance,
        )
    };

    // At the poles the azimuth degenerates but the kernels stay regular
    // over the footprint, so direct integration applies
    if observer.latitude.abs() == 90. {
        let mut field = Tensors::default();
        let footprint = tesseroid.footprint();
        for component in Component::ALL {
            field[component] = quadrature(component, &footprint);
        }
        return field;
    }

    if tesseroid.encloses_angularly(observer) {
        // Whole sphere minus a patch around the prism, plus the shell
        let sphere = AngularRect::new(-90., 90., -180., 180.);
        let half_widths = (
            (tesseroid.lat2 - tesseroid.lat1) / 2.,
            (tesseroid.lon2 - tesseroid.lon1) / 2.,
        );
        let remainder = split_footprint(sphere, tesseroid.centroid(), half_widths);

        let mut field = shell_field(tesseroid.r1, tesseroid.r2, observer.radius);
        for component in Component::ALL {
            for rect in &remainder {
                field[component] -= quadrature(component, rect);
            }
        }
        return field;
    }

    let mut field = Tensors::default();
    let footprint = tesseroid.footprint();
    for component in Component::ALL {
        field[component] = quadrature(component, &footprint);
    }
    field
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_splitting() {
        let sphere = AngularRect::new(-90., 90., -180., 180.);

        // A patch well inside leaves all four rectangles
        let parts = split_footprint(sphere, (0., 0.), (10., 10.));
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], AngularRect::new(10., 90., -180., 180.));
        assert_eq!(parts[1], AngularRect::new(-90., -10., -180., 180.));
        assert_eq!(parts[2], AngularRect::new(-10., 10., -180., -10.));
        assert_eq!(parts[3], AngularRect::new(-10., 10., 10., 180.));

        // The remainder tiles the sphere: areas must add up
        let area = |r: &AngularRect| (r.lat2 - r.lat1) * (r.lon2 - r.lon1);
        let total: f64 = parts.iter().map(area).sum();
        assert_eq!(total + 20. * 20., 180. * 360.);

        // A patch reaching the north pole drops the top rectangle
        let parts = split_footprint(sphere, (85., 0.), (10., 10.));
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], AngularRect::new(-90., 75., -180., 180.));

        // A patch covering everything leaves nothing
        let parts = split_footprint(sphere, (0., 0.), (90., 180.));
        assert!(parts.is_empty());

        // A center outside the outer rectangle returns it unchanged
        let outer = AngularRect::new(0., 10., 0., 10.);
        let parts = split_footprint(outer, (40., 40.), (1., 1.));
        assert_eq!(parts, vec![outer]);
    }

    #[test]
    fn whole_sphere_prism_reduces_to_the_shell() {
        // A prism covering the full sphere has an empty complement, so
        // the evaluator must return exactly the closed-form shell
        let tess = Tesseroid::new(-90., 90., -180., 180., 6_300_000., 6_371_000.);
        let observer = Observer::new(0., 0., 6_371_000.);

        let field = point_field(&tess, &observer, Tolerance::default());
        let shell = shell_field(tess.r1, tess.r2, observer.radius);
        for component in Component::ALL {
            assert_eq!(field[component], shell[component], "{component:?}");
        }
    }
}
