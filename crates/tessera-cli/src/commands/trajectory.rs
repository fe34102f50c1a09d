use crate::cli::BoxArgs;
use crate::config::builder;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use std::fmt::Write;
use tessera::{
    engine::progress::{Progress, ProgressReporter},
    workflows::{self, box_trajectory::BoxSample},
};
use tracing::info;

pub fn run(args: BoxArgs) -> Result<()> {
    info!("Merging configuration from run file and CLI arguments...");
    let job = builder::build_box_config(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_sink(progress_handler.sink());

    info!(
        variant = job.variant.name(),
        samples = job.sampling.count(),
        "Invoking the core box trajectory workflow..."
    );
    reporter.emit(Progress::StageStart {
        name: "Sampling box",
    });
    let samples = workflows::box_trajectory::run(&job.variant, &job.sampling, &reporter)?;
    reporter.emit(Progress::StageFinish);

    print!("{}", format_samples(&samples));
    Ok(())
}

fn format_samples(samples: &[BoxSample]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>12} {:>12} {:>12} {:>12} {:>10} {:>10} {:>10} {:>14}",
        "timestep", "Lx", "Ly", "Lz", "xy", "xz", "yz", "volume"
    );
    for sample in samples {
        let [lx, ly, lz, xy, xz, yz] = sample.parameters;
        let _ = writeln!(
            out,
            "{:>12} {:>12.6} {:>12.6} {:>12.6} {:>10.4} {:>10.4} {:>10.4} {:>14.6}",
            sample.timestep, lx, ly, lz, xy, xz, yz, sample.volume
        );
    }
    out
}
