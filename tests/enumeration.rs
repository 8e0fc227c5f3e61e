//! Frame pattern, enumeration and scratch directory tests.

use std::fs;
use std::path::Path;

use framestrip::{DEFAULT_FRAME_PATTERN, FramePattern, StripError, enumerate_frames, scratch};

fn touch(directory: &Path, name: &str) {
    fs::write(directory.join(name), b"").expect("Failed to write frame file");
}

// ── FramePattern ───────────────────────────────────────────────────

#[test]
fn default_pattern() {
    let pattern = FramePattern::default();
    assert_eq!(pattern.as_str(), DEFAULT_FRAME_PATTERN);
    assert_eq!(pattern.filename(1), "frame_1.png");
    assert_eq!(pattern.filename(42), "frame_42.png");
    assert_eq!(pattern.extension(), Some("png"));
    assert_eq!(
        FramePattern::parse(DEFAULT_FRAME_PATTERN).expect("valid pattern"),
        pattern
    );
}

#[test]
fn zero_padded_pattern() {
    let pattern = FramePattern::parse("img-%04d.jpg").expect("valid pattern");
    assert_eq!(pattern.filename(7), "img-0007.jpg");
    assert_eq!(pattern.filename(12345), "img-12345.jpg");
    assert_eq!(pattern.index_of("img-0007.jpg"), Some(7));
    assert_eq!(pattern.extension(), Some("jpg"));
}

#[test]
fn literal_percent() {
    let pattern = FramePattern::parse("100%%_%d.png").expect("valid pattern");
    assert_eq!(pattern.filename(3), "100%_3.png");
    assert_eq!(pattern.index_of("100%_3.png"), Some(3));
}

#[test]
fn index_of_rejects_foreign_names() {
    let pattern = FramePattern::default();
    assert_eq!(pattern.index_of("frame_9.png"), Some(9));
    assert_eq!(pattern.index_of("frame_.png"), None);
    assert_eq!(pattern.index_of("frame_x.png"), None);
    assert_eq!(pattern.index_of("frame_9.jpg"), None);
    assert_eq!(pattern.index_of("notes.txt"), None);
    assert_eq!(pattern.index_of("frame_01.png"), None);
    assert_eq!(pattern.index_of("frame_007.png"), None);

    let padded = FramePattern::parse("%03d.png").expect("valid pattern");
    assert_eq!(padded.index_of("007.png"), Some(7));
    assert_eq!(padded.index_of("7.png"), None);
    assert_eq!(padded.index_of("0007.png"), None);
    assert_eq!(padded.index_of("1234.png"), Some(1234));
}

#[test]
fn invalid_patterns() {
    for raw in ["frame.png", "frame_%d_%d.png", "frame_%s.png", "frame_%"] {
        let result = FramePattern::parse(raw);
        assert!(
            matches!(result, Err(StripError::InvalidFramePattern(_))),
            "{raw:?} should be rejected",
        );
    }
}

#[test]
fn oversized_padding_is_rejected() {
    let result = FramePattern::parse("frame_%099999999999999999999d.png");
    assert!(matches!(result, Err(StripError::InvalidFramePattern(_))));
}

#[test]
fn pattern_display() {
    let pattern = FramePattern::parse("f%03d.bmp").expect("valid pattern");
    assert_eq!(pattern.to_string(), "f%03d.bmp");
}

// ── enumerate_frames ───────────────────────────────────────────────

#[test]
fn enumerate_contiguous() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    for index in 1..=4 {
        touch(directory.path(), &format!("frame_{index}.png"));
    }

    let frames = enumerate_frames(directory.path(), &FramePattern::default());
    assert_eq!(frames.count(), 4);
    assert!(!frames.is_empty());

    let indices: Vec<u32> = frames.iter().map(|(index, _)| index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
    assert_eq!(frames.path(2), directory.path().join("frame_2.png"));
}

#[test]
fn enumerate_stops_at_first_gap() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    for index in [1, 2, 3, 5] {
        touch(directory.path(), &format!("frame_{index}.png"));
    }

    let frames = enumerate_frames(directory.path(), &FramePattern::default());
    assert_eq!(frames.count(), 3);
}

#[test]
fn enumerate_without_frame_one() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    touch(directory.path(), "frame_2.png");

    let frames = enumerate_frames(directory.path(), &FramePattern::default());
    assert!(frames.is_empty());
}

#[test]
fn enumerate_missing_directory() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let frames = enumerate_frames(directory.path().join("absent"), &FramePattern::default());
    assert_eq!(frames.count(), 0);
}

#[test]
fn enumerate_ignores_directories() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    touch(directory.path(), "frame_1.png");
    fs::create_dir(directory.path().join("frame_2.png")).expect("Failed to create dir");

    let frames = enumerate_frames(directory.path(), &FramePattern::default());
    assert_eq!(frames.count(), 1);
}

#[test]
fn enumerate_padded_pattern() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let pattern = FramePattern::parse("%03d.png").expect("valid pattern");
    touch(directory.path(), "001.png");
    touch(directory.path(), "002.png");
    touch(directory.path(), "3.png");

    let frames = enumerate_frames(directory.path(), &pattern);
    assert_eq!(frames.count(), 2);
}

// ── Scratch directory ──────────────────────────────────────────────

#[test]
fn clear_frames_removes_only_pattern_matches() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    for index in 1..=3 {
        touch(directory.path(), &format!("frame_{index}.png"));
    }
    touch(directory.path(), "notes.txt");
    touch(directory.path(), "other_1.png");
    touch(directory.path(), "frame_01.png");

    let removed =
        scratch::clear_frames(directory.path(), &FramePattern::default()).expect("Failed to clear");
    assert_eq!(removed, 3);
    assert!(!directory.path().join("frame_1.png").exists());
    assert!(directory.path().join("notes.txt").exists());
    assert!(directory.path().join("other_1.png").exists());
    assert!(directory.path().join("frame_01.png").exists());
}

#[test]
fn ensure_dir_creates_parents() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let nested = directory.path().join("a").join("b");
    scratch::ensure_dir(&nested).expect("Failed to create dirs");
    assert!(nested.is_dir());
    scratch::ensure_dir(&nested).expect("Existing dir should be fine");
}
