use std::ffi::OsStr;
use std::process::{Output, Stdio};

use tokio::process::Command;

use analysis_domain::DomainError;

/// Runs a media tool to completion; spawn failures and non-zero exits are
/// reported as upstream failures of `tool`.
pub(crate) async fn run_tool<I, S>(
    program: &str,
    tool: &str,
    args: I,
) -> Result<Output, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|err| {
            DomainError::external_service_error(tool, format!("failed to run {program}: {err}"))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let last_line = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");
        return Err(DomainError::external_service_error(
            tool,
            format!("{program} exited with {}: {last_line}", output.status),
        ));
    }

    Ok(output)
}
