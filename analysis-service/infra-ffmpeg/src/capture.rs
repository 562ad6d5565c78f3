use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use analysis_domain::{DomainError, FrameCapturePort, MediaHandle};

use crate::process::run_tool;

const SERVICE: &str = "frame-capture";

#[derive(Debug, Clone)]
pub struct FrameCaptureConfig {
    pub ffmpeg_path: PathBuf,
    /// Directory frames are written under, one subdirectory per item.
    pub output_dir: PathBuf,
    /// URL prefix the output directory is served from.
    pub public_path: String,
    pub max_width: u32,
    pub jpeg_quality: u8,
}

impl Default for FrameCaptureConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            output_dir: PathBuf::from("uploads/images"),
            public_path: "/uploads/images".to_string(),
            max_width: 800,
            jpeg_quality: 2,
        }
    }
}

pub struct FfmpegFrameCapture {
    config: FrameCaptureConfig,
}

impl FfmpegFrameCapture {
    pub fn new(config: FrameCaptureConfig) -> Self {
        Self { config }
    }

    /// Frames for an item land in `output_dir/<item_id>/`; ids and names that
    /// would resolve anywhere else are refused.
    fn output_path(&self, item_id: &str, output_name: &str) -> Result<PathBuf, DomainError> {
        for (what, segment) in [("item id", item_id), ("frame name", output_name)] {
            if !is_single_segment(segment) {
                return Err(DomainError::validation(format!(
                    "{what} `{segment}` is not a single path segment"
                )));
            }
        }
        Ok(self
            .config
            .output_dir
            .join(item_id)
            .join(format!("{output_name}.jpg")))
    }

    fn locator(&self, item_id: &str, output_name: &str) -> String {
        format!(
            "{}/{item_id}/{output_name}.jpg",
            self.config.public_path.trim_end_matches('/')
        )
    }

    pub(crate) fn arguments(
        &self,
        media: &MediaHandle,
        offset_seconds: f64,
        output: &std::path::Path,
    ) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-ss".to_string(),
            format!("{offset_seconds:.3}"),
            "-i".to_string(),
            media.location.clone(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-vf".to_string(),
            format!("scale='min({},iw)':-2", self.config.max_width),
            "-q:v".to_string(),
            self.config.jpeg_quality.to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }
}

fn is_single_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    !segment.contains(['/', '\\'])
        && matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
}

#[async_trait]
impl FrameCapturePort for FfmpegFrameCapture {
    async fn capture(
        &self,
        media: &MediaHandle,
        offset_seconds: f64,
        output_name: &str,
    ) -> Result<String, DomainError> {
        let output = self.output_path(&media.item_id, output_name)?;
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                DomainError::internal_error(format!("failed to create {}: {err}", parent.display()))
            })?;
        }

        let program = self.config.ffmpeg_path.to_string_lossy();
        run_tool(&program, SERVICE, self.arguments(media, offset_seconds, &output)).await?;

        if tokio::fs::metadata(&output).await.is_err() {
            return Err(DomainError::external_service_error(
                SERVICE,
                format!("ffmpeg produced no frame at {offset_seconds:.3}s"),
            ));
        }

        tracing::debug!(
            item_id = %media.item_id,
            offset_seconds,
            output = %output.display(),
            "frame captured"
        );
        Ok(self.locator(&media.item_id, output_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(output_dir: PathBuf) -> FfmpegFrameCapture {
        FfmpegFrameCapture::new(FrameCaptureConfig {
            ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg"),
            output_dir,
            public_path: "/uploads/images/".to_string(),
            ..FrameCaptureConfig::default()
        })
    }

    #[test]
    fn arguments_seek_before_input_and_scale_down() {
        let capture = capture(PathBuf::from("out"));
        let media = MediaHandle::new("lecture", "/media/lecture.mp4");
        let args = capture.arguments(&media, 12.5, std::path::Path::new("out/lecture/f.jpg"));

        assert_eq!(
            args,
            vec![
                "-y",
                "-ss",
                "12.500",
                "-i",
                "/media/lecture.mp4",
                "-frames:v",
                "1",
                "-vf",
                "scale='min(800,iw)':-2",
                "-q:v",
                "2",
                "out/lecture/f.jpg",
            ]
        );
    }

    #[test]
    fn locator_joins_public_path_item_and_name() {
        let capture = capture(PathBuf::from("out"));
        assert_eq!(
            capture.locator("lecture", "frame_1_20s"),
            "/uploads/images/lecture/frame_1_20s.jpg"
        );
        assert_eq!(
            capture.output_path("lecture", "frame_1_20s").expect("plain id"),
            PathBuf::from("out/lecture/frame_1_20s.jpg")
        );
    }

    #[test]
    fn output_path_refuses_ids_with_path_components() {
        let capture = capture(PathBuf::from("out"));
        for item_id in ["../escaped", "a/b", "..", ".", "/abs", "a\\b", ""] {
            let error = capture
                .output_path(item_id, "frame_1_1s")
                .expect_err("outside output_dir");
            assert!(matches!(error, DomainError::Validation(_)), "{item_id}");
        }
        assert!(capture.output_path("lecture", "../frame").is_err());
    }

    #[tokio::test]
    async fn traversal_id_writes_nothing_outside_output_dir() {
        let root = tempfile::tempdir().expect("tempdir");
        let output_dir = root.path().join("frames");
        let capture = capture(output_dir.clone());

        let error = capture
            .capture(&MediaHandle::new("../escaped", "/media/x.mp4"), 1.0, "frame_1_1s")
            .await
            .expect_err("refused");
        assert!(matches!(error, DomainError::Validation(_)));
        assert!(!root.path().join("escaped").exists());
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn missing_binary_is_an_upstream_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let capture = capture(dir.path().to_path_buf());

        let error = capture
            .capture(&MediaHandle::new("lecture", "/media/lecture.mp4"), 1.0, "frame_1_1s")
            .await
            .expect_err("binary missing");
        assert!(matches!(error, DomainError::Upstream { ref service, .. } if service == "frame-capture"));
        assert!(dir.path().join("lecture").is_dir());
    }
}
