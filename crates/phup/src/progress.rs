use indicatif::{ProgressBar, ProgressStyle};

use phup_backend::{OperationEvent, OperationHandle, OperationOutcome};

/// Render an operation's event stream as a terminal progress bar and wait
/// for it to finish.
///
/// Raw progress values are clamped to `0..=100` for display; the source
/// stream deliberately forwards whatever the subprocess printed. Returns
/// `None` only if the worker died without its completion signal.
pub async fn drive(mut handle: OperationHandle) -> Option<OperationOutcome> {
    let bar = ProgressBar::new(100);
    if let Ok(style) = ProgressStyle::with_template("[{bar:40}] {pos:>3}%") {
        bar.set_style(style.progress_chars("=> "));
    }

    let mut outcome = None;
    while let Some(event) = handle.recv().await {
        match event {
            OperationEvent::Progress(raw) => {
                bar.set_position(u64::from(raw.min(100)));
            }
            OperationEvent::Completed(result) => {
                outcome = Some(result);
                break;
            }
        }
    }

    if outcome.is_some() {
        bar.set_position(100);
        bar.finish();
    } else {
        bar.abandon();
    }
    handle.join().await;

    outcome
}
