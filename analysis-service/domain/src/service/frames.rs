use crate::service::format_timestamp;
use crate::{Frame, FrameRequest, SamplePoint};

pub fn frame_name(index: u32, offset_seconds: f64) -> String {
    format!("frame_{index}_{}s", offset_seconds.floor() as u64)
}

pub fn build_frame_requests(points: &[SamplePoint]) -> Vec<FrameRequest> {
    points
        .iter()
        .map(|point| FrameRequest {
            index: point.index,
            offset_seconds: point.offset_seconds,
            name: frame_name(point.index, point.offset_seconds),
        })
        .collect()
}

pub fn captured_frame(request: FrameRequest, locator: String) -> Frame {
    Frame {
        index: request.index,
        timestamp: format_timestamp(request.offset_seconds),
        offset_seconds: request.offset_seconds,
        name: request.name,
        locator,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::sample_points;

    #[test]
    fn names_encode_index_and_floored_seconds() {
        let requests = build_frame_requests(&sample_points(100.0, 4).expect("points"));
        let names: Vec<&str> = requests.iter().map(|request| request.name.as_str()).collect();
        assert_eq!(names, vec!["frame_1_20s", "frame_2_40s", "frame_3_60s", "frame_4_80s"]);
    }

    #[test]
    fn names_stay_unique_when_offsets_share_a_second() {
        let requests = build_frame_requests(&sample_points(2.0, 5).expect("points"));
        let unique: HashSet<&str> = requests.iter().map(|request| request.name.as_str()).collect();
        assert_eq!(unique.len(), requests.len());
        assert_eq!(requests[0].name, "frame_1_0s");
    }

    #[test]
    fn captured_frame_carries_display_timestamp() {
        let request = FrameRequest {
            index: 3,
            offset_seconds: 3725.2,
            name: frame_name(3, 3725.2),
        };
        let frame = captured_frame(request, "/uploads/images/item/frame_3_3725s.jpg".to_string());

        assert_eq!(frame.index, 3);
        assert_eq!(frame.name, "frame_3_3725s");
        assert_eq!(frame.timestamp, "1:02:05");
    }
}
