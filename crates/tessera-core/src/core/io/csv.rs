use super::IoError;
use crate::core::forcefield::term::ForceResult;
use crate::core::models::mesh::Triangle;
use crate::core::models::particles::ParticleData;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PositionRow {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Deserialize)]
struct TriangleRow {
    a: usize,
    b: usize,
    c: usize,
    #[serde(rename = "type", default)]
    type_id: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ForceRow {
    tag: usize,
    fx: f64,
    fy: f64,
    fz: f64,
    energy: f64,
}

/// Triangles read from a table, with per-triangle type ids when the table
/// has a `type` column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriangleTable {
    pub triangles: Vec<Triangle>,
    pub type_ids: Option<Vec<usize>>,
}

fn path_label(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Reads positions from a table with `x`, `y`, `z` columns. Row order gives
/// the particle tag; other columns are ignored.
pub fn read_particles_from<R: Read>(reader: R, label: &str) -> Result<ParticleData, IoError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(reader);
    let mut positions = Vec::new();
    for (row, record) in reader.deserialize::<PositionRow>().enumerate() {
        let record = record.map_err(|e| IoError::Csv {
            path: label.to_string(),
            source: e,
        })?;
        if !(record.x.is_finite() && record.y.is_finite() && record.z.is_finite()) {
            return Err(IoError::NonFiniteCoordinate {
                path: label.to_string(),
                row,
            });
        }
        positions.push(Point3::new(record.x, record.y, record.z));
    }
    Ok(ParticleData::new(positions))
}

pub fn read_particles(path: &Path) -> Result<ParticleData, IoError> {
    let file = std::fs::File::open(path).map_err(|e| IoError::Io {
        path: path_label(path),
        source: e,
    })?;
    read_particles_from(file, &path_label(path))
}

/// Reads triangles from a table with `a`, `b`, `c` columns and an optional
/// `type` column. A partially filled `type` column is treated as type 0
/// where empty.
pub fn read_triangles_from<R: Read>(reader: R, label: &str) -> Result<TriangleTable, IoError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(reader);
    let mut triangles = Vec::new();
    let mut type_ids = Vec::new();
    let mut typed = false;
    for record in reader.deserialize::<TriangleRow>() {
        let record = record.map_err(|e| IoError::Csv {
            path: label.to_string(),
            source: e,
        })?;
        triangles.push([record.a, record.b, record.c]);
        typed |= record.type_id.is_some();
        type_ids.push(record.type_id.unwrap_or(0));
    }
    Ok(TriangleTable {
        triangles,
        type_ids: typed.then_some(type_ids),
    })
}

pub fn read_triangles(path: &Path) -> Result<TriangleTable, IoError> {
    let file = std::fs::File::open(path).map_err(|e| IoError::Io {
        path: path_label(path),
        source: e,
    })?;
    read_triangles_from(file, &path_label(path))
}

pub fn write_force_report_to<W: Write>(writer: W, result: &ForceResult) -> Result<(), ::csv::Error> {
    let mut writer = ::csv::Writer::from_writer(writer);
    for (tag, (force, energy)) in result.forces().iter().zip(result.energies()).enumerate() {
        writer.serialize(ForceRow {
            tag,
            fx: force.x,
            fy: force.y,
            fz: force.z,
            energy: *energy,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes one `tag,fx,fy,fz,energy` row per particle.
pub fn write_force_report(path: &Path, result: &ForceResult) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Io {
        path: path_label(path),
        source: e,
    })?;
    write_force_report_to(file, result).map_err(|e| IoError::Csv {
        path: path_label(path),
        source: e,
    })
}
