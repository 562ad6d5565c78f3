use crate::{Frame, LinkedRecord, Reference};

/// Pairs references with frames by position.
///
/// Every reference yields a record; references past the last frame get no
/// frame, and frames past the last reference are left out.
pub fn link_references(references: &[Reference], frames: &[Frame]) -> Vec<LinkedRecord> {
    references
        .iter()
        .enumerate()
        .map(|(position, reference)| LinkedRecord {
            number: reference.number,
            description: reference.description.clone(),
            frame: frames.get(position).cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn references(count: u32) -> Vec<Reference> {
        (1..=count)
            .map(|number| Reference {
                number,
                description: format!("reference {number}"),
            })
            .collect()
    }

    fn frames(count: u32) -> Vec<Frame> {
        (1..=count)
            .map(|index| Frame {
                index,
                offset_seconds: f64::from(index),
                name: format!("frame_{index}_{index}s"),
                timestamp: format!("0:0{index}"),
                locator: format!("frame-{index}"),
            })
            .collect()
    }

    #[test]
    fn surplus_references_get_no_frame() {
        let linked = link_references(&references(5), &frames(3));

        assert_eq!(linked.len(), 5);
        for record in &linked[..3] {
            let frame = record.frame.as_ref().expect("frame attached");
            assert_eq!(frame.index, record.number);
        }
        assert!(linked[3].frame.is_none());
        assert!(linked[4].frame.is_none());
    }

    #[test]
    fn surplus_frames_are_not_represented() {
        let linked = link_references(&references(2), &frames(6));

        assert_eq!(linked.len(), 2);
        assert!(linked.iter().all(|record| record.frame.is_some()));
    }

    #[test]
    fn linking_is_positional_not_by_number() {
        let refs = vec![
            Reference {
                number: 7,
                description: "seven".to_string(),
            },
            Reference {
                number: 2,
                description: "two".to_string(),
            },
        ];
        let linked = link_references(&refs, &frames(2));

        assert_eq!(linked[0].number, 7);
        assert_eq!(linked[0].frame.as_ref().map(|frame| frame.index), Some(1));
        assert_eq!(linked[1].frame.as_ref().map(|frame| frame.index), Some(2));
    }

    #[test]
    fn no_references_means_no_records() {
        assert!(link_references(&[], &frames(3)).is_empty());
    }
}
