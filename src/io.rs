//! Little-endian binary parameter and result files.
//!
//! A gravity parameter file holds the two tolerances as f64, the prism
//! count as i32, seven f64 arrays of that length (lat1, lat2, lon1,
//! lon2, r1, r2, density), the observer count as i32, and three f64
//! arrays of that length (longitude, latitude, radius). A magnetic
//! parameter file is identical except the density array is replaced by
//! the three magnetization arrays.
//!
//! A result file holds the observer count as i32, the observer
//! coordinate arrays, and one array per field component in storage
//! order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::Error;
use crate::coordinate::{DensityTesseroid, MagneticTesseroid, Magnetization, Observer, Tesseroid};
use crate::field::{MagneticTensors, Tensors};
use crate::kernel::Component;
use crate::math::quadrature::Tolerance;

/// A gravity run read from a parameter file
#[derive(Debug, Clone, PartialEq)]
pub struct GravityJob {
    pub tolerance: Tolerance,
    pub prisms: Vec<DensityTesseroid>,
    pub observers: Vec<Observer>,
}

/// A magnetic run read from a parameter file
#[derive(Debug, Clone, PartialEq)]
pub struct MagneticJob {
    pub tolerance: Tolerance,
    pub prisms: Vec<MagneticTesseroid>,
    pub observers: Vec<Observer>,
}

fn read_count<R: Read>(reader: &mut R, what: &str) -> Result<usize, Error> {
    let count = reader.read_i32::<LittleEndian>()?;
    if count < 0 {
        return Err(Error::InvalidHeader {
            expected: format!("non-negative {what} count"),
            found: count.to_string(),
        });
    }
    Ok(count as usize)
}

fn read_array<R: Read>(reader: &mut R, len: usize) -> Result<Vec<f64>, Error> {
    let mut values = vec![0.; len];
    reader.read_f64_into::<LittleEndian>(&mut values)?;
    Ok(values)
}

fn read_observers<R: Read>(reader: &mut R) -> Result<Vec<Observer>, Error> {
    let count = read_count(reader, "observer")?;
    let longitude = read_array(reader, count)?;
    let latitude = read_array(reader, count)?;
    let radius = read_array(reader, count)?;

    Ok((0..count)
        .map(|i| Observer::new(latitude[i], longitude[i], radius[i]))
        .collect())
}

struct PrismColumns {
    lat1: Vec<f64>,
    lat2: Vec<f64>,
    lon1: Vec<f64>,
    lon2: Vec<f64>,
    r1: Vec<f64>,
    r2: Vec<f64>,
}

fn read_prism_columns<R: Read>(reader: &mut R, count: usize) -> Result<PrismColumns, Error> {
    Ok(PrismColumns {
        lat1: read_array(reader, count)?,
        lat2: read_array(reader, count)?,
        lon1: read_array(reader, count)?,
        lon2: read_array(reader, count)?,
        r1: read_array(reader, count)?,
        r2: read_array(reader, count)?,
    })
}

impl PrismColumns {
    fn shape(&self, i: usize) -> Tesseroid {
        Tesseroid::new(
            self.lat1[i],
            self.lat2[i],
            self.lon1[i],
            self.lon2[i],
            self.r1[i],
            self.r2[i],
        )
    }
}

/// Read a gravity parameter file
pub fn read_gravity_params<P: AsRef<Path>>(path: P) -> Result<GravityJob, Error> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);

    let absolute = reader.read_f64::<LittleEndian>()?;
    let relative = reader.read_f64::<LittleEndian>()?;

    let count = read_count(&mut reader, "prism")?;
    let columns = read_prism_columns(&mut reader, count)?;
    let density = read_array(&mut reader, count)?;

    let prisms = (0..count)
        .map(|i| DensityTesseroid {
            shape: columns.shape(i),
            density: density[i],
        })
        .collect();

    let observers = read_observers(&mut reader)?;
    debug!(
        "read {} prism(s) and {} observer(s) from {}",
        count,
        observers.len(),
        path.as_ref().display()
    );

    Ok(GravityJob {
        tolerance: Tolerance::new(absolute, relative),
        prisms,
        observers,
    })
}

/// Read a magnetic parameter file
pub fn read_magnetic_params<P: AsRef<Path>>(path: P) -> Result<MagneticJob, Error> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);

    let absolute = reader.read_f64::<LittleEndian>()?;
    let relative = reader.read_f64::<LittleEndian>()?;

    let count = read_count(&mut reader, "prism")?;
    let columns = read_prism_columns(&mut reader, count)?;
    let north = read_array(&mut reader, count)?;
    let east = read_array(&mut reader, count)?;
    let radial = read_array(&mut reader, count)?;

    let prisms = (0..count)
        .map(|i| MagneticTesseroid {
            shape: columns.shape(i),
            magnetization: Magnetization {
                north: north[i],
                east: east[i],
                radial: radial[i],
            },
        })
        .collect();

    let observers = read_observers(&mut reader)?;
    debug!(
        "read {} prism(s) and {} observer(s) from {}",
        count,
        observers.len(),
        path.as_ref().display()
    );

    Ok(MagneticJob {
        tolerance: Tolerance::new(absolute, relative),
        prisms,
        observers,
    })
}

fn write_observers<W: Write>(writer: &mut W, observers: &[Observer]) -> Result<(), Error> {
    writer.write_i32::<LittleEndian>(observers.len() as i32)?;
    for observer in observers {
        writer.write_f64::<LittleEndian>(observer.longitude)?;
    }
    for observer in observers {
        writer.write_f64::<LittleEndian>(observer.latitude)?;
    }
    for observer in observers {
        writer.write_f64::<LittleEndian>(observer.radius)?;
    }
    Ok(())
}

/// Write a gravity result file: observer coordinates followed by the
/// twenty component arrays
pub fn write_gravity_results<P: AsRef<Path>>(
    path: P,
    observers: &[Observer],
    fields: &[Tensors],
) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_observers(&mut writer, observers)?;
    for component in Component::ALL {
        for field in fields {
            writer.write_f64::<LittleEndian>(field[component])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write a magnetic result file: observer coordinates followed by the
/// ten component arrays
pub fn write_magnetic_results<P: AsRef<Path>>(
    path: P,
    observers: &[Observer],
    fields: &[MagneticTensors],
) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_observers(&mut writer, observers)?;
    for component in Component::THROUGH_SECOND {
        for field in fields {
            writer.write_f64::<LittleEndian>(field[component])?;
        }
    }
    writer.flush()?;
    Ok(())
}

// ----- T E S T S ---------------------------------------------------------------------
