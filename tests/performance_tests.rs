use assert_cmd::cargo_bin;
use serde_json::Value;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_many_rooms_concurrent_replay() {
    const ROOMS: usize = 300;

    let dir = tempdir().unwrap();
    let rooms = dir.path().join("rooms.json");
    let submissions = dir.path().join("submissions.csv");
    common::generate_rooms_json(&rooms, ROOMS).expect("Failed to generate rooms");
    common::generate_submissions_csv(&submissions, ROOMS).expect("Failed to generate CSV");

    let output = Command::new(cargo_bin!("quiz-settle"))
        .arg("replay")
        .arg(&submissions)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--concurrent")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Binary failed to replay {ROOMS} rooms");

    let finals: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(finals.len(), ROOMS);
    for room in finals {
        assert_eq!(room["round"], 10);
        assert_eq!(room["players"]["A"]["score"], 1000);
        assert_eq!(room["endMessage"], "Alice wins!");
    }
}
