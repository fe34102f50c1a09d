use crate::core::models::simbox::BoxArray;
use crate::core::variant::boxes::BoxVariant;
use crate::engine::config::SamplingConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSample {
    pub timestep: u64,
    pub parameters: BoxArray,
    pub volume: f64,
}

/// Samples a box variant at every timestep of `sampling`.
///
/// Each sampled box is validated, so a custom variant that drives a ramp to
/// a non-positive length fails with the offending timestep's box error.
#[instrument(skip_all, name = "box_trajectory_workflow")]
pub fn run(
    variant: &BoxVariant,
    sampling: &SamplingConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<BoxSample>, EngineError> {
    info!(
        variant = variant.name(),
        samples = sampling.count(),
        "Sampling box variant."
    );
    reporter.emit(Progress::StepsStart {
        total: sampling.count(),
    });

    let mut samples = Vec::with_capacity(usize::try_from(sampling.count()).unwrap_or(0));
    for timestep in sampling.timesteps() {
        let simbox = variant.simbox(timestep)?;
        samples.push(BoxSample {
            timestep,
            parameters: simbox.to_array(),
            volume: simbox.volume(),
        });
        reporter.emit(Progress::StepDone);
    }

    reporter.emit(Progress::StepsFinish);
    Ok(samples)
}
