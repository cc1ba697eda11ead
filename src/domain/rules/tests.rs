// Unit tests for business rules

use super::*;

fn scene(sequence: u32, start: f64, end: f64, description: &str) -> Scene {
    Scene {
        sequence,
        start_time: start,
        end_time: end,
        description: description.to_string(),
    }
}

#[test]
fn test_parse_plain_scene_list() {
    let scenes = ResponseValidator::parse(
        r#"{"scenes": [{"startTime": "00:00.000", "endTime": "00:04.500", "description": "intro"}]}"#,
    )
    .unwrap();
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].end_time, "00:04.500");
}

#[test]
fn test_parse_fenced_response() {
    let text = "```json\n{\"scenes\": [{\"startTime\": \"0\", \"endTime\": \"2\", \"description\": \"a\"}]}\n```";
    let scenes = ResponseValidator::parse(text).unwrap();
    assert_eq!(scenes[0].description, "a");
}

#[test]
fn test_parse_zero_scenes_is_success() {
    assert!(ResponseValidator::parse(r#"{"scenes": []}"#).unwrap().is_empty());
}

#[test]
fn test_parse_rejects_missing_scenes_key() {
    let failure = ResponseValidator::parse(r#"{"shots": []}"#).unwrap_err();
    assert!(matches!(failure, ChunkFailure::Malformed(_)));
}

#[test]
fn test_parse_rejects_non_json_and_empty() {
    assert!(matches!(
        ResponseValidator::parse("I could not watch the video").unwrap_err(),
        ChunkFailure::Malformed(_)
    ));
    assert!(matches!(
        ResponseValidator::parse("   ").unwrap_err(),
        ChunkFailure::Malformed(_)
    ));
    assert!(matches!(
        ResponseValidator::parse(r#"[{"startTime": "0", "endTime": "1"}]"#).unwrap_err(),
        ChunkFailure::Malformed(_)
    ));
}

#[test]
fn test_conclude_partial_success_is_analyzed() {
    let mut tally = RunTally::new(3);
    tally.record_success(2);
    tally.record_failure(1, ChunkFailure::Timeout(30));
    tally.record_success(1);

    let (status, error) = RunPolicy::conclude(&tally);
    assert_eq!(status, ProjectStatus::Analyzed);
    assert!(error.is_none());
}

#[test]
fn test_conclude_all_failed_is_error() {
    let mut tally = RunTally::new(2);
    tally.record_failure(0, ChunkFailure::Inference("503".to_string()));
    tally.record_failure(1, ChunkFailure::Timeout(30));

    let (status, error) = RunPolicy::conclude(&tally);
    assert_eq!(status, ProjectStatus::Error);
    assert!(error.unwrap().starts_with("All 2 chunks failed"));
}

#[test]
fn test_conclude_empty_plan_is_analyzed() {
    let (status, _) = RunPolicy::conclude(&RunTally::new(0));
    assert_eq!(status, ProjectStatus::Analyzed);
}

#[test]
fn test_conclude_credential_rejection_wins_over_partial_success() {
    let mut tally = RunTally::new(3);
    tally.record_success(4);
    tally.record_failure(1, ChunkFailure::Unauthorized("401".to_string()));

    let (status, error) = RunPolicy::conclude(&tally);
    assert_eq!(status, ProjectStatus::Error);
    assert!(error.unwrap().contains("credential"));
}

#[test]
fn test_conclude_cancelled() {
    let mut tally = RunTally::new(3);
    tally.record_success(1);
    tally.cancelled = true;

    let (status, error) = RunPolicy::conclude(&tally);
    assert_eq!(status, ProjectStatus::Error);
    assert_eq!(error.as_deref(), Some("Analysis cancelled"));
}

#[test]
fn test_merge_fuses_scenes_split_at_boundary() {
    let scenes = vec![
        scene(1, 200.0, 240.0, "beach"),
        scene(2, 240.0, 260.0, "beach continues"),
        scene(3, 260.0, 300.0, "car"),
    ];

    let merged = merge_boundary_scenes(&scenes, &[240.0], 0.5);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].start_time, 200.0);
    assert_eq!(merged[0].end_time, 260.0);
    assert_eq!(merged[0].description, "beach");
    assert_eq!(merged[1].sequence, 2);
}

#[test]
fn test_merge_leaves_interior_cuts_alone() {
    let scenes = vec![scene(1, 0.0, 10.0, "a"), scene(2, 10.0, 20.0, "b")];
    let merged = merge_boundary_scenes(&scenes, &[240.0], 0.5);
    assert_eq!(merged, scenes);

    // A real cut just before the boundary, both scenes from the first chunk
    let near_boundary = vec![
        scene(1, 200.0, 239.7, "street"),
        scene(2, 239.7, 239.9, "flash"),
    ];
    assert_eq!(merge_boundary_scenes(&near_boundary, &[240.0], 0.5), near_boundary);

    // Both scenes from the second chunk
    let after_boundary = vec![
        scene(1, 240.0, 240.3, "flash"),
        scene(2, 240.3, 250.0, "street"),
    ];
    assert_eq!(merge_boundary_scenes(&after_boundary, &[240.0], 0.5), after_boundary);
}

#[test]
fn test_merge_respects_tolerance() {
    let scenes = vec![scene(1, 200.0, 239.0, "a"), scene(2, 240.2, 250.0, "b")];
    assert_eq!(merge_boundary_scenes(&scenes, &[240.0], 0.5).len(), 2);
    assert_eq!(merge_boundary_scenes(&scenes, &[240.0], 1.0).len(), 1);
}
