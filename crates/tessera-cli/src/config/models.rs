use std::path::PathBuf;
use tessera::core::variant::boxes::BoxVariant;
use tessera::engine::config::{EvaluationConfig, SamplingConfig};

/// Everything the `evaluate` command needs after merging the run file with
/// the command line.
#[derive(Debug)]
pub struct EvaluateJob {
    pub config: EvaluationConfig,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct BoxJob {
    pub variant: BoxVariant,
    pub sampling: SamplingConfig,
}
