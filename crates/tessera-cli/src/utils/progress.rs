use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;
use tessera::engine::progress::{Progress, ProgressSink};

const STAGE_TEMPLATE: &str = "{spinner:.green} {msg}";
const STEPS_TEMPLATE: &str = "{msg:<20} [{bar:40.cyan/blue}] {pos}/{len}";

/// Draws workflow stages as a spinner and step batches (contributors
/// evaluated, box samples taken) as a bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    #[cfg(test)]
    fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target);
        pb.finish_and_clear();
        Self { pb }
    }

    pub fn sink(&self) -> ProgressSink<'static> {
        let pb = self.pb.clone();
        Box::new(move |event: Progress| apply(&pb, event))
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(pb: &ProgressBar, event: Progress) {
    match event {
        Progress::StageStart { name } => {
            pb.reset();
            pb.set_style(style(STAGE_TEMPLATE));
            pb.set_message(name);
            pb.enable_steady_tick(Duration::from_millis(80));
        }
        Progress::StageFinish => {
            pb.disable_steady_tick();
            pb.finish_with_message("✓ Done");
        }
        Progress::StepsStart { total } => {
            pb.disable_steady_tick();
            pb.reset();
            pb.set_length(total);
            pb.set_style(style(STEPS_TEMPLATE).progress_chars("##-"));
        }
        Progress::StepDone => pb.inc(1),
        Progress::StepsFinish => {
            if let Some(length) = pb.length() {
                pb.set_position(length);
            }
            pb.finish();
        }
        Progress::Note(msg) if pb.is_finished() => pb.set_message(msg),
        Progress::Note(msg) => pb.println(format!("  {}", msg)),
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_starts_finished_and_empty() {
        let handler = CliProgressHandler::hidden();
        assert_eq!(handler.pb.length(), Some(0));
        assert!(handler.pb.is_finished());
    }

    #[test]
    fn steps_fill_the_bar_on_finish() {
        let handler = CliProgressHandler::hidden();
        let sink = handler.sink();

        sink(Progress::StageStart {
            name: "Evaluating forces",
        });
        assert_eq!(handler.pb.message(), "Evaluating forces");
        assert!(!handler.pb.is_finished());

        sink(Progress::StepsStart { total: 4 });
        sink(Progress::StepDone);
        assert_eq!(handler.pb.length(), Some(4));
        assert_eq!(handler.pb.position(), 1);

        sink(Progress::StepsFinish);
        assert!(handler.pb.is_finished());
        assert_eq!(handler.pb.position(), 4);

        sink(Progress::StageFinish);
        assert_eq!(handler.pb.message(), "✓ Done");
    }

    #[test]
    fn note_after_finish_replaces_message() {
        let handler = CliProgressHandler::hidden();
        let sink = handler.sink();
        sink(Progress::Note("2 contributors".to_string()));
        assert_eq!(handler.pb.message(), "2 contributors");
    }

    #[test]
    fn sink_is_usable_from_another_thread() {
        let handler = CliProgressHandler::hidden();
        let sink = handler.sink();

        thread::spawn(move || {
            sink(Progress::StageStart {
                name: "Sampling box",
            });
            sink(Progress::StepDone);
            sink(Progress::StageFinish);
        })
        .join()
        .unwrap();

        assert!(handler.pb.is_finished());
        assert_eq!(handler.pb.message(), "✓ Done");
    }
}
