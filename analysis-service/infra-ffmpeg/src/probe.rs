use std::path::PathBuf;

use async_trait::async_trait;

use analysis_domain::{DomainError, MediaDurationPort, MediaHandle};

use crate::process::run_tool;

const SERVICE: &str = "media-duration";

pub struct FfprobeDuration {
    ffprobe_path: PathBuf,
}

impl FfprobeDuration {
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

/// Parses the single value printed by
/// `ffprobe -show_entries format=duration -of default=noprint_wrappers=1:nokey=1`.
pub fn parse_duration(stdout: &str) -> Result<f64, DomainError> {
    let value = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| DomainError::external_service_error(SERVICE, "ffprobe printed no duration"))?;

    let seconds: f64 = value.parse().map_err(|_| {
        DomainError::external_service_error(SERVICE, format!("unparseable duration `{value}`"))
    })?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(DomainError::external_service_error(
            SERVICE,
            format!("unusable duration {seconds}"),
        ));
    }
    Ok(seconds)
}

#[async_trait]
impl MediaDurationPort for FfprobeDuration {
    async fn duration(&self, media: &MediaHandle) -> Result<f64, DomainError> {
        let program = self.ffprobe_path.to_string_lossy();
        let output = run_tool(
            &program,
            SERVICE,
            [
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                media.location.as_str(),
            ],
        )
        .await?;

        let seconds = parse_duration(&String::from_utf8_lossy(&output.stdout))?;
        tracing::debug!(item_id = %media.item_id, duration_seconds = seconds, "media duration probed");
        Ok(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_output() {
        assert_eq!(parse_duration("125.480000\n").expect("duration"), 125.48);
        assert_eq!(parse_duration("\n  42\n").expect("duration"), 42.0);
    }

    #[test]
    fn rejects_missing_or_unusable_values() {
        for output in ["", "N/A\n", "0.000000\n", "-3\n", "inf\n"] {
            let error = parse_duration(output).expect_err(output);
            assert!(error.is_upstream(), "{output:?} gave {error:?}");
        }
    }

    #[tokio::test]
    async fn missing_binary_is_an_upstream_failure() {
        let probe = FfprobeDuration::new("/nonexistent/ffprobe");
        let error = probe
            .duration(&MediaHandle::new("item", "/tmp/item.mp4"))
            .await
            .expect_err("binary missing");
        assert!(matches!(error, DomainError::Upstream { ref service, .. } if service == "media-duration"));
    }
}
