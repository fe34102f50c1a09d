use crate::cli::EvaluateArgs;
use crate::config::builder;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use std::fmt::Write;
use tessera::{
    core::io::csv,
    engine::{error::EngineError, progress::ProgressReporter},
    workflows::{self, evaluate::EvaluationReport},
};
use tracing::{info, warn};

pub fn run(args: EvaluateArgs) -> Result<()> {
    info!("Merging configuration from run file and CLI arguments...");
    let job = builder::build_evaluate_config(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_sink(progress_handler.sink());

    println!("Evaluating mesh potentials at timestep {}...", job.config.timestep);
    info!("Invoking the core evaluation workflow...");
    let report = workflows::evaluate::run(&job.config, &reporter)?;

    if report.contributors.is_empty() {
        warn!("Evaluation finished without any force contributors.");
        println!("Warning: no mesh potentials were evaluated; all forces are zero.");
    }
    print!("{}", format_summary(&report));

    if let Some(output_path) = &job.output {
        info!("Writing per-particle forces to {:?}", output_path);
        csv::write_force_report(output_path, &report.total).map_err(EngineError::from)?;
        println!("✓ Forces written to: {}", output_path.display());
    }

    Ok(())
}

fn format_summary(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Mesh: {} particles, {} triangles, {} bonds",
        report.particle_count, report.triangle_count, report.bond_count
    );
    for contributor in &report.contributors {
        let _ = writeln!(
            out,
            "  {:<20} {:>16.6}",
            contributor.kind.as_str(),
            contributor.energy
        );
    }
    let _ = writeln!(out, "  {:<20} {:>16.6}", "total", report.total_energy());

    let virial = report.total.total_virial();
    let _ = writeln!(
        out,
        "Virial (xx, xy, xz, yy, yz, zz): [{}]",
        virial
            .iter()
            .map(|v| format!("{:.6}", v))
            .collect::<Vec<_>>()
            .join(", ")
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera::core::forcefield::params::PotentialKind;
    use tessera::core::forcefield::term::ForceResult;
    use tessera::workflows::evaluate::ContributorEnergy;

    #[test]
    fn summary_lists_each_contributor_and_total() {
        let mut total = ForceResult::zeros(4);
        total.add_energy(0, 1.5);
        total.add_energy(3, 2.0);
        let report = EvaluationReport {
            timestep: 0,
            particle_count: 4,
            triangle_count: 4,
            bond_count: 6,
            contributors: vec![
                ContributorEnergy {
                    kind: PotentialKind::Harmonic,
                    energy: 1.5,
                },
                ContributorEnergy {
                    kind: PotentialKind::AreaConservation,
                    energy: 2.0,
                },
            ],
            total,
        };

        let summary = format_summary(&report);
        assert!(summary.starts_with("Mesh: 4 particles, 4 triangles, 6 bonds"));
        assert!(summary.contains("harmonic"));
        assert!(summary.contains("area-conservation"));
        assert!(summary.contains("3.500000"));
        assert!(summary.contains("Virial"));
    }
}
