use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// A run file as written by the user. Every section is optional here; the
/// builder decides what each command requires.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RunFile {
    pub system: Option<FileSystem>,
    pub mesh: Option<FileMesh>,
    pub potentials: Option<FilePotentials>,
    #[serde(rename = "box-variant")]
    pub box_variant: Option<FileBoxVariant>,
    pub trajectory: Option<FileTrajectory>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileSystem {
    pub particles: Option<PathBuf>,
    /// `[Lx, Ly, Lz]` or `[Lx, Ly, Lz, xy, xz, yz]`.
    #[serde(rename = "box")]
    pub simbox: Option<Vec<f64>>,
    pub timestep: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileMesh {
    pub triangles: Option<PathBuf>,
    pub types: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FilePotentials {
    pub parameters: Option<PathBuf>,
    pub only: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum FileBoxVariant {
    Constant,
    Ramp {
        #[serde(rename = "final")]
        final_box: Vec<f64>,
        #[serde(rename = "t-start")]
        t_start: u64,
        #[serde(rename = "t-ramp")]
        t_ramp: u64,
    },
    LinearInverseVolume {
        #[serde(rename = "final-volume")]
        final_volume: f64,
        #[serde(rename = "t-start")]
        t_start: u64,
        #[serde(rename = "t-ramp")]
        t_ramp: u64,
    },
}

impl FileBoxVariant {
    /// The timestep at which the box stops changing.
    pub fn end(&self) -> Option<u64> {
        match self {
            Self::Constant => None,
            Self::Ramp {
                t_start, t_ramp, ..
            }
            | Self::LinearInverseVolume {
                t_start, t_ramp, ..
            } => Some(t_start.saturating_add(*t_ramp)),
        }
    }

    fn timing_mut(&mut self) -> Option<(&mut u64, &mut u64)> {
        match self {
            Self::Constant => None,
            Self::Ramp {
                t_start, t_ramp, ..
            }
            | Self::LinearInverseVolume {
                t_start, t_ramp, ..
            } => Some((t_start, t_ramp)),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileTrajectory {
    pub first: Option<u64>,
    pub last: Option<u64>,
    pub stride: Option<u64>,
}

impl RunFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Argument(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "system.timestep" => {
                    self.system.get_or_insert_with(Default::default).timestep =
                        Some(parse_value(key, value_str)?);
                }
                "trajectory.first" => {
                    self.trajectory.get_or_insert_with(Default::default).first =
                        Some(parse_value(key, value_str)?);
                }
                "trajectory.last" => {
                    self.trajectory.get_or_insert_with(Default::default).last =
                        Some(parse_value(key, value_str)?);
                }
                "trajectory.stride" => {
                    self.trajectory.get_or_insert_with(Default::default).stride =
                        Some(parse_value(key, value_str)?);
                }
                "box-variant.t-start" | "box-variant.t-ramp" => {
                    let value = parse_value(key, value_str)?;
                    let (t_start, t_ramp) = self
                        .box_variant
                        .as_mut()
                        .and_then(FileBoxVariant::timing_mut)
                        .ok_or_else(|| {
                            CliError::Config(format!(
                                "'{}' requires a ramp or linear-inverse-volume [box-variant]",
                                key
                            ))
                        })?;
                    if key == "box-variant.t-start" {
                        *t_start = value;
                    } else {
                        *t_ramp = value;
                    }
                }
                "box-variant.final-volume" => {
                    let value = parse_value(key, value_str)?;
                    match self.box_variant.as_mut() {
                        Some(FileBoxVariant::LinearInverseVolume { final_volume, .. }) => {
                            *final_volume = value;
                        }
                        _ => {
                            return Err(CliError::Config(format!(
                                "'{}' requires a linear-inverse-volume [box-variant]",
                                key
                            )));
                        }
                    }
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value_str))
    })
}
