/// Events emitted while a workflow runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    StageStart { name: &'static str },
    StageFinish,

    StepsStart { total: u64 },
    StepDone,
    StepsFinish,

    Note(String),
}

pub type ProgressSink<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional sink.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    sink: Option<ProgressSink<'a>>,
}

impl<'a> ProgressReporter<'a> {
    /// A reporter that drops every event.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: ProgressSink<'a>) -> Self {
        Self { sink: Some(sink) }
    }

    #[inline]
    pub fn emit(&self, event: Progress) {
        if let Some(sink) = &self.sink {
            sink(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn silent_reporter_accepts_events() {
        ProgressReporter::silent().emit(Progress::StepDone);
    }

    #[test]
    fn sink_receives_events_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_sink(Box::new(|event| {
            seen.lock().unwrap().push(event);
        }));
        reporter.emit(Progress::StepsStart { total: 2 });
        reporter.emit(Progress::StepDone);
        drop(reporter);

        assert_eq!(
            seen.into_inner().unwrap(),
            vec![Progress::StepsStart { total: 2 }, Progress::StepDone]
        );
    }
}
