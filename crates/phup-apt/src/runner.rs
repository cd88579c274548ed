//! Sequential command execution with progress scraping.
//!
//! Each command runs to completion before the next starts. Both output
//! streams are read line by line; the last `NN%` token on a line becomes a
//! progress event. A failing command never aborts the sequence under the
//! default policy; its exit status is recorded in the terminal outcome
//! instead.

use std::process::Stdio;
use std::sync::LazyLock;

use log::{debug, info, trace, warn};
use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;

use phup_backend::{
    CommandFailure, OperationEvent, OperationOutcome, SequencingPolicy,
};

use crate::plan::CommandSpec;

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)%").expect("literal regex compiles"));

/// Last `NN%` token on the line, raw and unclamped. Overlong digit runs
/// that overflow `u32` are ignored like any other non-match.
pub(crate) fn parse_progress(line: &str) -> Option<u32> {
    PERCENT_RE
        .captures_iter(line)
        .last()?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

enum CommandDisposition {
    Exited(std::process::ExitStatus),
    SpawnFailed(String),
}

/// Run every command of `plan` in order, streaming progress into `events`,
/// then emit exactly one [`OperationEvent::Completed`].
///
/// The stream always starts with a `Progress(0)` reset, even for an empty
/// plan. Under [`SequencingPolicy::ContinueOnError`] a failing command is
/// recorded and the sequence keeps going; under
/// [`SequencingPolicy::AbortOnError`] the first failure ends the sequence
/// early. Either way the completion event fires once, last.
pub async fn run_sequence(
    plan: Vec<CommandSpec>,
    policy: SequencingPolicy,
    events: UnboundedSender<OperationEvent>,
) {
    let _ = events.send(OperationEvent::Progress(0));

    let mut failures = Vec::new();
    for spec in &plan {
        info!("running: {spec}");
        match run_streaming(spec, &events).await {
            CommandDisposition::Exited(status) if status.success() => {
                debug!("{} finished cleanly", spec.program);
            }
            CommandDisposition::Exited(status) => {
                warn!("{} exited with {status}", spec.program);
                failures.push(CommandFailure {
                    program: spec.program.clone(),
                    exit_code: status.code(),
                });
                if policy == SequencingPolicy::AbortOnError {
                    break;
                }
            }
            CommandDisposition::SpawnFailed(message) => {
                warn!("{} could not be started: {message}", spec.program);
                failures.push(CommandFailure {
                    program: spec.program.clone(),
                    exit_code: None,
                });
                if policy == SequencingPolicy::AbortOnError {
                    break;
                }
            }
        }
    }

    let _ = events.send(OperationEvent::Completed(OperationOutcome { failures }));
}

async fn run_streaming(
    spec: &CommandSpec,
    events: &UnboundedSender<OperationEvent>,
) -> CommandDisposition {
    let mut child = match Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(error) => return CommandDisposition::SpawnFailed(error.to_string()),
    };

    // Package managers report download progress on either stream, so both
    // are scraped. Per-stream line order is preserved; interleaving between
    // the two matches whatever the child actually wrote first.
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    tokio::join!(
        forward_progress(stdout, events.clone()),
        forward_progress(stderr, events.clone()),
    );

    match child.wait().await {
        Ok(status) => CommandDisposition::Exited(status),
        Err(error) => CommandDisposition::SpawnFailed(error.to_string()),
    }
}

async fn forward_progress<R>(reader: Option<R>, events: UnboundedSender<OperationEvent>)
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else { return };

    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        trace!("output: {line}");
        if let Some(value) = parse_progress(&line) {
            let _ = events.send(OperationEvent::Progress(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_progress;

    #[test]
    fn single_token_is_extracted() {
        assert_eq!(parse_progress("Fetching... 12%"), Some(12));
    }

    #[test]
    fn last_token_on_a_line_wins() {
        assert_eq!(parse_progress("Unpacking 45% done 50%"), Some(50));
    }

    #[test]
    fn lines_without_tokens_emit_nothing() {
        assert_eq!(parse_progress("no percent here"), None);
        assert_eq!(parse_progress(""), None);
    }

    #[test]
    fn bare_percent_sign_is_not_a_token() {
        assert_eq!(parse_progress("100 % done"), None);
    }

    #[test]
    fn values_are_not_clamped_at_the_source() {
        assert_eq!(parse_progress("overshoot 250%"), Some(250));
    }

    #[test]
    fn digit_runs_overflowing_u32_are_ignored() {
        assert_eq!(parse_progress("99999999999999999999%"), None);
    }
}
