//! The gravity aggregator: density-weighted per-prism contributions
//! summed into per-observer totals, then scaled into field units.

use log::{debug, info};

use crate::Error;
use crate::coordinate::{DensityTesseroid, Observer};
use crate::field::{RADIAN_CORRECTION, Tensors, point_field};
use crate::kernel::Component;
use crate::math::quadrature::Tolerance;

/// The final scaling per derivative order: the integrals are computed in
/// the normalized radial variable and per squared degree
fn scale_tensors(field: &mut Tensors, radius: f64) {
    field[Component::V] *= radius * radius * RADIAN_CORRECTION;

    for component in [Component::Vx, Component::Vy, Component::Vz] {
        field[component] *= radius * RADIAN_CORRECTION;
    }

    for component in [
        Component::Vxx,
        Component::Vxy,
        Component::Vyy,
        Component::Vzx,
        Component::Vzy,
        Component::Vzz,
    ] {
        field[component] *= RADIAN_CORRECTION;
    }

    for component in &Component::ALL[Component::Vxxx as usize..] {
        field[*component] *= RADIAN_CORRECTION / radius;
    }
}

fn validate(shapes: &[DensityTesseroid], observers: &[Observer]) -> Result<(), Error> {
    for prism in shapes {
        prism.shape.validate()?;
        if !prism.density.is_finite() {
            return Err(Error::Invalid(format!(
                "non-finite density: {}",
                prism.density
            )));
        }
    }
    for observer in observers {
        observer.validate()?;
    }
    Ok(())
}

/// One observer against all prisms: the inner loop shared by every
/// execution mode. The accumulator is owned by the caller's worker; no
/// synchronization happens here.
fn observe(prisms: &[DensityTesseroid], observer: &Observer, tolerance: Tolerance) -> Tensors {
    let mut total = Tensors::default();
    for prism in prisms {
        let contribution = point_field(&prism.shape, observer, tolerance);
        for component in Component::ALL {
            total[component] += contribution[component] * prism.density;
        }
    }
    scale_tensors(&mut total, observer.radius);
    total
}

/// Gravitational potential and derivatives of a set of prisms at a set of
/// observers, serially. Results carry no gravitational constant.
pub fn gravity_field(
    prisms: &[DensityTesseroid],
    observers: &[Observer],
    tolerance: Tolerance,
) -> Result<Vec<Tensors>, Error> {
    validate(prisms, observers)?;
    info!(
        "gravity: {} prism(s) x {} observer(s), serial",
        prisms.len(),
        observers.len()
    );

    let mut report_at = 0.05;
    let mut fields = Vec::with_capacity(observers.len());
    for (i, observer) in observers.iter().enumerate() {
        fields.push(observe(prisms, observer, tolerance));

        if (i + 1) as f64 / observers.len() as f64 >= report_at {
            debug!("gravity: {} of {} observers done", i + 1, observers.len());
            report_at += 0.05;
        }
    }
    Ok(fields)
}

/// As [`gravity_field`], but fanned out over a thread pool. Each
/// observer's accumulator is written by exactly one worker, and the
/// per-observer summation order equals the serial one, so results are
/// identical to the serial mode.
#[cfg(feature = "parallel")]
pub fn gravity_field_parallel(
    prisms: &[DensityTesseroid],
    observers: &[Observer],
    tolerance: Tolerance,
) -> Result<Vec<Tensors>, Error> {
    use rayon::prelude::*;

    validate(prisms, observers)?;
    info!(
        "gravity: {} prism(s) x {} observer(s), thread pool",
        prisms.len(),
        observers.len()
    );

    Ok(observers
        .par_iter()
        .map(|observer| observe(prisms, observer, tolerance))
        .collect())
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data;

    #[test]
    fn rejects_bad_domains() {
        let mut prism = test_data::basalt_block();
        prism.shape.r1 = -1.;
        let result = gravity_field(
            &[prism],
            &[test_data::airborne_observer()],
            Tolerance::default(),
        );
        assert!(result.is_err());

        let result = gravity_field(
            &[test_data::basalt_block()],
            &[Observer::new(0., 0., f64::NAN)],
            Tolerance::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn density_weighting_is_linear() {
        // Doubling the density doubles every component
        let observer = test_data::offset_observer();
        let prism = test_data::basalt_block();
        let mut double = prism;
        double.density *= 2.;

        let tolerance = Tolerance::new(1e-8, 1e-6);
        let single = gravity_field(&[prism], &[observer], tolerance).unwrap();
        let doubled = gravity_field(&[double], &[observer], tolerance).unwrap();
        for component in Component::ALL {
            let a = single[0][component];
            let b = doubled[0][component];
            assert!((b - 2. * a).abs() <= 1e-12 * a.abs().max(1e-30), "{component:?}");
        }
    }

    #[test]
    fn prisms_superpose() {
        // Two stacked half-prisms equal the full prism
        let observer = test_data::offset_observer();
        let full = test_data::basalt_block();
        let mid = (full.shape.r1 + full.shape.r2) / 2.;
        let mut lower = full;
        lower.shape.r2 = mid;
        let mut upper = full;
        upper.shape.r1 = mid;

        let tolerance = Tolerance::new(1e-10, 1e-8);
        let whole = gravity_field(&[full], &[observer], tolerance).unwrap();
        let halves = gravity_field(&[lower, upper], &[observer], tolerance).unwrap();

        // Components with solid magnitude in this geometry; the ones that
        // nearly vanish by symmetry drown in quadrature noise
        let checked = [
            Component::V,
            Component::Vy,
            Component::Vz,
            Component::Vxx,
            Component::Vyy,
            Component::Vzz,
            Component::Vzzz,
        ];
        for component in checked {
            let a = whole[0][component];
            let b = halves[0][component];
            assert!(
                (b - a).abs() <= 1e-4 * a.abs(),
                "{component:?}: {a} vs {b}"
            );
        }
    }

    #[test]
    #[cfg(feature = "parallel")]
    fn parallel_matches_serial() {
        let observers = [
            test_data::airborne_observer(),
            test_data::offset_observer(),
            Observer::new(30., -40., 6_500_000.),
        ];
        let prisms = [test_data::basalt_block()];

        let tolerance = Tolerance::new(1e-8, 1e-6);
        let serial = gravity_field(&prisms, &observers, tolerance).unwrap();
        let parallel = gravity_field_parallel(&prisms, &observers, tolerance).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn radial_scaling_law() {
        // Scaling all radii by s scales V by s^2, first derivatives by s,
        // second derivatives by 1 and third derivatives by 1/s
        let s = 2.;
        let prism = test_data::basalt_block();
        let observer = test_data::offset_observer();

        let mut scaled_prism = prism;
        scaled_prism.shape.r1 *= s;
        scaled_prism.shape.r2 *= s;
        let scaled_observer = Observer::new(
            observer.latitude,
            observer.longitude,
            observer.radius * s,
        );

        let tolerance = Tolerance::new(1e-8, 1e-6);
        let base = gravity_field(&[prism], &[observer], tolerance).unwrap();
        let scaled = gravity_field(&[scaled_prism], &[scaled_observer], tolerance).unwrap();

        let groups: [(&[Component], f64); 4] = [
            (&[Component::V], s * s),
            (&Component::ALL[1..4], s),
            (&Component::ALL[4..10], 1.),
            (&Component::ALL[10..], 1. / s),
        ];
        for (components, factor) in groups {
            for component in components {
                let a = base[0][*component] * factor;
                let b = scaled[0][*component];
                assert!(
                    (b - a).abs() <= 1e-9 * a.abs().max(1e-25),
                    "{component:?}: {a} vs {b}"
                );
            }
        }
    }
}
