//! The magnetic aggregator.
//!
//! The magnetic potential of a uniformly magnetized prism is the
//! directional derivative of the gravitational one, so each magnetic
//! quantity is a magnetization-weighted combination of the gravity
//! kernels one derivative order up. The prism's magnetization, given in
//! the local north-east-radial frame at the prism centroid, is first
//! rotated into the observer's local frame.

use log::{debug, info};

use crate::Error;
use crate::coordinate::{MagneticTesseroid, Magnetization, Observer, Tesseroid};
use crate::field::{MagneticTensors, RADIAN_CORRECTION, point_field};
use crate::kernel::Component;
use crate::math::quadrature::Tolerance;

/// Rotate a magnetization vector from the prism-centroid frame into the
/// observer frame. `beta` is the longitude of the centroid minus the
/// longitude of the observer.
fn rotate_magnetization(
    magnetization: &Magnetization,
    prism: &Tesseroid,
    observer: &Observer,
) -> (f64, f64, f64) {
    let (centroid_lat, centroid_lon) = prism.centroid();
    let beta = (centroid_lon - observer.longitude).to_radians();
    let (sin_beta, cos_beta) = beta.sin_cos();
    let (sin_o, cos_o) = observer.latitude.to_radians().sin_cos();
    let (sin_s, cos_s) = centroid_lat.to_radians().sin_cos();

    let (mx, my, mz) = (magnetization.north, magnetization.east, magnetization.radial);

    let north = (cos_beta * sin_o * sin_s + cos_o * cos_s) * mx
        + (sin_beta * sin_o) * my
        + (cos_beta * sin_o * cos_s - cos_o * sin_s) * mz;
    let east = (-sin_beta * sin_s) * mx + cos_beta * my - sin_beta * cos_s * mz;
    let radial = (cos_beta * cos_o * sin_s - sin_o * cos_s) * mx
        + (sin_beta * cos_o) * my
        + (cos_beta * cos_o * cos_s + sin_o * sin_s) * mz;

    (north, east, radial)
}

fn validate(prisms: &[MagneticTesseroid], observers: &[Observer]) -> Result<(), Error> {
    for prism in prisms {
        prism.shape.validate()?;
        let m = &prism.magnetization;
        if !(m.north.is_finite() && m.east.is_finite() && m.radial.is_finite()) {
            return Err(Error::Invalid(format!("non-finite magnetization: {m:?}")));
        }
    }
    for observer in observers {
        observer.validate()?;
    }
    Ok(())
}

/// One observer against all prisms
fn observe(prisms: &[MagneticTesseroid], observer: &Observer, tolerance: Tolerance) -> MagneticTensors {
    use Component::*;

    let mut total = MagneticTensors::default();
    for prism in prisms {
        let (mx, my, mz) = rotate_magnetization(&prism.magnetization, &prism.shape, observer);
        let g = point_field(&prism.shape, observer, tolerance);

        total[V] += mx * g[Vx] + my * g[Vy] + mz * g[Vz];

        total[Vx] += mx * g[Vxx] + my * g[Vxy] + mz * g[Vzx];
        total[Vy] += mx * g[Vxy] + my * g[Vyy] + mz * g[Vzy];
        total[Vz] += mx * g[Vzx] + my * g[Vzy] + mz * g[Vzz];

        total[Vxx] += mx * g[Vxxx] + my * g[Vxxy] + mz * g[Vxxz];
        total[Vxy] += mx * g[Vxxy] + my * g[Vyyx] + mz * g[Vxyz];
        total[Vyy] += mx * g[Vyyx] + my * g[Vyyy] + mz * g[Vyyz];
        total[Vzx] += mx * g[Vxxz] + my * g[Vxyz] + mz * g[Vzzx];
        total[Vzy] += mx * g[Vxyz] + my * g[Vyyz] + mz * g[Vzzy];
        total[Vzz] += mx * g[Vzzx] + my * g[Vzzy] + mz * g[Vzzz];
    }

    let radius = observer.radius;
    total[V] *= radius * radius * RADIAN_CORRECTION;
    for component in [Vx, Vy, Vz] {
        total[component] *= radius * RADIAN_CORRECTION;
    }
    for component in [Vxx, Vxy, Vyy, Vzx, Vzy, Vzz] {
        total[component] *= RADIAN_CORRECTION;
    }

    total
}

/// Magnetic potential and derivatives of a set of magnetized prisms at a
/// set of observers, serially. Results carry no magnetic constant.
pub fn magnetic_field(
    prisms: &[MagneticTesseroid],
    observers: &[Observer],
    tolerance: Tolerance,
) -> Result<Vec<MagneticTensors>, Error> {
    validate(prisms, observers)?;
    info!(
        "magnetics: {} prism(s) x {} observer(s), serial",
        prisms.len(),
        observers.len()
    );

    let mut report_at = 0.05;
    let mut fields = Vec::with_capacity(observers.len());
    for (i, observer) in observers.iter().enumerate() {
        fields.push(observe(prisms, observer, tolerance));

        if (i + 1) as f64 / observers.len() as f64 >= report_at {
            debug!("magnetics: {} of {} observers done", i + 1, observers.len());
            report_at += 0.05;
        }
    }
    Ok(fields)
}

/// As [`magnetic_field`], but fanned out over a thread pool. Results are
/// identical to the serial mode.
#[cfg(feature = "parallel")]
pub fn magnetic_field_parallel(
    prisms: &[MagneticTesseroid],
    observers: &[Observer],
    tolerance: Tolerance,
) -> Result<Vec<MagneticTensors>, Error> {
    use rayon::prelude::*;

    validate(prisms, observers)?;
    info!(
        "magnetics: {} prism(s) x {} observer(s), thread pool",
        prisms.len(),
        observers.len()
    );

    Ok(observers
        .par_iter()
        .map(|observer| observe(prisms, observer, tolerance))
        .collect())
}

// ----- T E S T S ---------------------------------------------------------------------
