use crate::Error;

/// Wrap an arbitrary longitude in degrees onto (-180, 180]
pub fn normalize_longitude(longitude: f64) -> f64 {
    if longitude <= -180. {
        return longitude + 360.;
    }
    if longitude > 180. {
        return longitude - 360.;
    }
    longitude
}

// ----- O B S E R V E R ---------------------------------------------------------------

/// An observation point in geocentric spherical coordinates: latitude and
/// longitude in degrees, radius in the user's unit of choice
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

impl Observer {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, radius: f64) -> Observer {
        Observer {
            latitude,
            longitude: normalize_longitude(longitude),
            radius,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.latitude.is_finite() && self.longitude.is_finite() && self.radius.is_finite()) {
            return Err(Error::Invalid(format!("non-finite observer: {self:?}")));
        }
        if self.radius <= 0. {
            return Err(Error::Invalid(format!(
                "observer radius must be strictly positive: {}",
                self.radius
            )));
        }
        Ok(())
    }
}

// ----- T E S S E R O I D -------------------------------------------------------------

/// A spherical prism: bounded by the parallels `lat1 < lat2`, the meridians
/// `lon1 < lon2` (degrees, on (-180, 180]) and the spheres `r1 < r2`
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct Tesseroid {
    pub lat1: f64,
    pub lat2: f64,
    pub lon1: f64,
    pub lon2: f64,
    pub r1: f64,
    pub r2: f64,
}

impl Tesseroid {
    #[must_use]
    pub fn new(lat1: f64, lat2: f64, lon1: f64, lon2: f64, r1: f64, r2: f64) -> Tesseroid {
        Tesseroid {
            lat1,
            lat2,
            lon1,
            lon2,
            r1,
            r2,
        }
    }

    /// Angular midpoint `(latitude, longitude)` of the footprint
    #[must_use]
    pub fn centroid(&self) -> (f64, f64) {
        ((self.lat1 + self.lat2) / 2., (self.lon1 + self.lon2) / 2.)
    }

    /// The angular footprint as an integration region
    #[must_use]
    pub fn footprint(&self) -> AngularRect {
        AngularRect {
            lat1: self.lat1,
            lat2: self.lat2,
            lon1: self.lon1,
            lon2: self.lon2,
        }
    }

    /// Is the observer strictly inside the angular footprint?
    #[must_use]
    pub fn encloses_angularly(&self, observer: &Observer) -> bool {
        let lon = normalize_longitude(observer.longitude);
        observer.latitude > self.lat1
            && observer.latitude < self.lat2
            && lon > self.lon1
            && lon < self.lon2
    }

    pub fn validate(&self) -> Result<(), Error> {
        let fields = [self.lat1, self.lat2, self.lon1, self.lon2, self.r1, self.r2];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(Error::Invalid(format!("non-finite tesseroid: {self:?}")));
        }
        if self.lat1 >= self.lat2 || self.lon1 >= self.lon2 {
            return Err(Error::Invalid(format!(
                "degenerate tesseroid footprint: {self:?}"
            )));
        }
        if !(-90. ..=90.).contains(&self.lat1) || !(-90. ..=90.).contains(&self.lat2) {
            return Err(Error::Invalid(format!(
                "tesseroid latitudes outside [-90, 90]: {self:?}"
            )));
        }
        if self.r1 <= 0. || self.r1 >= self.r2 {
            return Err(Error::Invalid(format!(
                "tesseroid radii must satisfy 0 < r1 < r2: {self:?}"
            )));
        }
        Ok(())
    }
}

/// A tesseroid with a mass density (user units)
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct DensityTesseroid {
    pub shape: Tesseroid,
    pub density: f64,
}

/// Magnetization vector in the local north-east-radial frame at the
/// prism centroid
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct Magnetization {
    pub north: f64,
    pub east: f64,
    pub radial: f64,
}

/// A tesseroid with a (constant) magnetization
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct MagneticTesseroid {
    pub shape: Tesseroid,
    pub magnetization: Magnetization,
}

// ----- A N G U L A R   R E C T A N G L E ---------------------------------------------

/// A rectangle in (latitude, longitude), the domain handed to the
/// quadrature engine
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct AngularRect {
    pub lat1: f64,
    pub lat2: f64,
    pub lon1: f64,
    pub lon2: f64,
}

impl AngularRect {
    #[must_use]
    pub fn new(lat1: f64, lat2: f64, lon1: f64, lon2: f64) -> AngularRect {
        AngularRect {
            lat1,
            lat2,
            lon1,
            lon2,
        }
    }
}

// ----- T E S T S ---------------------------------------------------------------------
