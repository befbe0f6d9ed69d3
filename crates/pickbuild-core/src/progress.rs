//! Start/stop progress cue around long-running commands.

use crate::reporter::Reporter;
use crate::runner::StepResult;
use std::future::Future;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Frames cycled by [`Spinner`].
pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Visual "in progress" cue.
pub trait ProgressIndicator: Send + Sync {
    /// Show the cue labelled with a step description.
    fn start(&self, label: &str);

    /// Clear the cue.
    fn stop(&self);
}

/// No output at all. Used when stderr is not a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressIndicator for SilentProgress {
    fn start(&self, _label: &str) {}

    fn stop(&self) {}
}

/// Terminal spinner drawn on stderr by a background tokio task.
///
/// `start` must be called from within a tokio runtime.
#[derive(Debug, Default)]
pub struct Spinner {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressIndicator for Spinner {
    fn start(&self, label: &str) {
        self.stop();

        let label = label.to_string();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);
            for frame in SPINNER_FRAMES.iter().cycle() {
                ticker.tick().await;
                draw(&format!("\r{} -> {}", label, frame));
            }
        });

        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        *task = Some(handle);
    }

    fn stop(&self) {
        let handle = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            handle.abort();
            // carriage return + erase line
            draw("\r\x1b[2K");
        }
    }
}

fn draw(text: &str) {
    let mut stderr = std::io::stderr().lock();
    let _ = stderr.write_all(text.as_bytes());
    let _ = stderr.flush();
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run `work` with the cue shown.
///
/// On success a `<label> -> done` line goes to the reporter; on failure the
/// cue is cleared without a message and the caller reports the diagnostic.
/// The result is returned unchanged either way.
pub async fn track<F>(
    progress: &dyn ProgressIndicator,
    reporter: &dyn Reporter,
    label: &str,
    work: F,
) -> StepResult
where
    F: Future<Output = StepResult>,
{
    progress.start(label);
    let result = work.await;
    progress.stop();

    if result.is_success() {
        reporter.info(&format!("{} -> done", label));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{ProgressEvent, RecordingProgress, RecordingReporter};

    #[tokio::test]
    async fn test_track_success_reports_done() {
        let progress = RecordingProgress::new();
        let reporter = RecordingReporter::new();

        let result = track(&progress, &reporter, "step4: checkout main", async {
            StepResult::Success("ok".to_string())
        })
        .await;

        assert_eq!(result, StepResult::Success("ok".to_string()));
        assert_eq!(
            progress.events(),
            vec![
                ProgressEvent::Start("step4: checkout main".to_string()),
                ProgressEvent::Stop,
            ]
        );
        assert_eq!(reporter.infos(), vec!["step4: checkout main -> done".to_string()]);
    }

    #[tokio::test]
    async fn test_track_failure_clears_silently() {
        let progress = RecordingProgress::new();
        let reporter = RecordingReporter::new();

        let result = track(&progress, &reporter, "step8: npm run build", async {
            StepResult::Failure("boom".to_string())
        })
        .await;

        assert_eq!(result, StepResult::Failure("boom".to_string()));
        assert_eq!(progress.events().last(), Some(&ProgressEvent::Stop));
        assert!(reporter.messages().is_empty());
    }

    #[tokio::test]
    async fn test_spinner_start_stop() {
        let spinner = Spinner::new();
        spinner.start("step1: clone repo");
        tokio::time::sleep(Duration::from_millis(20)).await;
        spinner.stop();
        assert!(spinner.task.lock().unwrap().is_none());

        // stopping twice is harmless
        spinner.stop();
    }
}
