use super::defaults::DefaultsConfig;
use super::file::{FileBoxVariant, RunFile};
use super::models::{BoxJob, EvaluateJob};
use crate::cli::{BoxArgs, EvaluateArgs};
use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tessera::core::forcefield::params::PotentialKind;
use tessera::core::models::simbox::SimBox;
use tessera::core::variant::boxes::BoxVariant;
use tessera::core::variant::scalar::RampVariant;
use tessera::engine::config::{EvaluationConfigBuilder, SamplingConfig};
use tessera::engine::error::EngineError;

pub fn build_evaluate_config(args: &EvaluateArgs) -> Result<EvaluateJob> {
    let defaults = DefaultsConfig::default();
    let mut file_config = RunFile::from_file(&args.config)?;
    file_config.apply_set_values(&args.set_values)?;
    let base_dir = base_dir(&args.config);

    let system = file_config
        .system
        .take()
        .ok_or_else(|| CliError::Config("`[system]` section is required.".to_string()))?;
    let particles = system.particles.ok_or_else(|| {
        CliError::Config("`system.particles` is required for evaluation.".to_string())
    })?;
    let initial = parse_box(system.simbox.as_deref(), "system.box")?;
    let timestep = args
        .timestep
        .or(system.timestep)
        .unwrap_or(defaults.timestep);

    let simbox = match file_config.box_variant.take() {
        Some(variant) => build_box_variant(initial, variant)?
            .simbox(timestep)
            .map_err(EngineError::from)?,
        None => initial,
    };

    let mesh = file_config
        .mesh
        .take()
        .ok_or_else(|| CliError::Config("`[mesh]` section is required.".to_string()))?;
    let triangles = mesh
        .triangles
        .ok_or_else(|| CliError::Config("`mesh.triangles` is required.".to_string()))?;

    let potentials = file_config
        .potentials
        .take()
        .ok_or_else(|| CliError::Config("`[potentials]` section is required.".to_string()))?;
    let parameters = potentials
        .parameters
        .ok_or_else(|| CliError::Config("`potentials.parameters` is required.".to_string()))?;

    let mut builder = EvaluationConfigBuilder::new()
        .particles_path(resolve(&base_dir, particles))
        .triangles_path(resolve(&base_dir, triangles))
        .parameters_path(resolve(&base_dir, parameters))
        .simbox(simbox)
        .mesh_types(mesh.types.unwrap_or(defaults.mesh_types))
        .timestep(timestep);

    if !args.potentials.is_empty() {
        builder = builder.potentials(args.potentials.clone());
    } else if let Some(names) = potentials.only {
        builder = builder.potentials(parse_potential_names(&names)?);
    }

    let config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(EvaluateJob {
        config,
        output: args.output.clone(),
    })
}

pub fn build_box_config(args: &BoxArgs) -> Result<BoxJob> {
    let defaults = DefaultsConfig::default();
    let mut file_config = RunFile::from_file(&args.config)?;
    file_config.apply_set_values(&args.set_values)?;

    let system = file_config
        .system
        .take()
        .ok_or_else(|| CliError::Config("`[system]` section is required.".to_string()))?;
    let initial = parse_box(system.simbox.as_deref(), "system.box")?;

    let file_variant = file_config
        .box_variant
        .take()
        .unwrap_or(FileBoxVariant::Constant);
    let trajectory = file_config.trajectory.take().unwrap_or_default();

    let first = args.first.or(trajectory.first).unwrap_or(defaults.first);
    let last = args
        .last
        .or(trajectory.last)
        .or_else(|| file_variant.end())
        .unwrap_or(first);
    let stride = args.stride.or(trajectory.stride).unwrap_or(defaults.stride);

    let sampling = SamplingConfig::new(first, last, stride)
        .map_err(|e| CliError::Config(e.to_string()))?;
    let variant = build_box_variant(initial, file_variant)?;

    Ok(BoxJob { variant, sampling })
}

fn build_box_variant(initial: SimBox, file_variant: FileBoxVariant) -> Result<BoxVariant> {
    Ok(match file_variant {
        FileBoxVariant::Constant => BoxVariant::constant(initial),
        FileBoxVariant::Ramp {
            final_box,
            t_start,
            t_ramp,
        } => {
            let final_box = parse_box(Some(&final_box), "box-variant.final")?;
            BoxVariant::ramp(
                initial,
                final_box,
                Arc::new(RampVariant::unit(t_start, t_ramp)),
            )
        }
        FileBoxVariant::LinearInverseVolume {
            final_volume,
            t_start,
            t_ramp,
        } => BoxVariant::linear_inverse_volume(initial, final_volume, t_start, t_ramp)
            .map_err(EngineError::from)?,
    })
}

fn parse_box(values: Option<&[f64]>, key: &str) -> Result<SimBox> {
    let values = values.ok_or_else(|| CliError::Config(format!("`{}` is required.", key)))?;
    let simbox = match *values {
        [lx, ly, lz] => SimBox::new(lx, ly, lz, 0.0, 0.0, 0.0),
        [lx, ly, lz, xy, xz, yz] => SimBox::new(lx, ly, lz, xy, xz, yz),
        _ => {
            return Err(CliError::Config(format!(
                "`{}` must list 3 lengths or 6 box parameters, got {} values.",
                key,
                values.len()
            )));
        }
    };
    Ok(simbox.map_err(EngineError::from)?)
}

fn parse_potential_names(names: &[String]) -> Result<Vec<PotentialKind>> {
    names
        .iter()
        .map(|name| {
            name.parse::<PotentialKind>()
                .map_err(|e| CliError::Config(format!("`potentials.only`: {}", e)))
        })
        .collect()
}

fn base_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn resolve(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}
