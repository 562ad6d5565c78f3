use futures::{stream, StreamExt, TryStreamExt};

use analysis_domain::{captured_frame, DomainError, Frame, FrameCapturePort, FrameRequest, MediaHandle};

/// Captures every requested frame with at most `concurrency` captures in
/// flight. Frames come back in request order; any capture failure fails the
/// whole batch.
pub async fn capture_frames(
    capture: &dyn FrameCapturePort,
    media: &MediaHandle,
    requests: Vec<FrameRequest>,
    concurrency: usize,
) -> Result<Vec<Frame>, DomainError> {
    stream::iter(requests)
        .map(|request| async move {
            let locator = capture
                .capture(media, request.offset_seconds, &request.name)
                .await?;
            Ok::<_, DomainError>(captured_frame(request, locator))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}
