#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");
    let rooms = dir.path().join("rooms.json");
    common::generate_rooms_json(&rooms, 1).unwrap();

    // 1. First run: both players answer round 0
    let first = dir.path().join("first.csv");
    common::write_lines(
        &first,
        &["room,round,player,chosen", "room-0,0,A,A", "room-0,0,B,A"],
    )
    .unwrap();

    let output1 = Command::new(cargo_bin!("quiz-settle"))
        .arg("replay")
        .arg(&first)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let rooms1: serde_json::Value = serde_json::from_slice(&output1.stdout).unwrap();
    assert_eq!(rooms1[0]["round"], 1);

    // 2. Second run continues from the stored room instead of re-seeding it
    let second = dir.path().join("second.csv");
    common::write_lines(
        &second,
        &["room,round,player,chosen", "room-0,1,A,B", "room-0,1,B,A"],
    )
    .unwrap();

    let output2 = Command::new(cargo_bin!("quiz-settle"))
        .arg("replay")
        .arg(&second)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let rooms2: serde_json::Value = serde_json::from_slice(&output2.stdout).unwrap();
    assert_eq!(rooms2[0]["round"], 2);
    assert_eq!(rooms2[0]["players"]["A"]["score"], 200);
    assert_eq!(rooms2[0]["players"]["A"]["combo"], 2);
    assert_eq!(rooms2[0]["players"]["B"]["score"], 100);
    assert_eq!(rooms2[0]["players"]["B"]["combo"], 0);

    // 3. The room can be read back on its own
    let output3 = Command::new(cargo_bin!("quiz-settle"))
        .args(["show", "room-0"])
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output3.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output3.stdout).unwrap();
    assert_eq!(shown, rooms2[0]);
}

#[test]
fn test_rocksdb_leaderboard_persistence() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    for (name, score) in [("bob", "300"), ("alice", "800")] {
        let status = Command::new(cargo_bin!("quiz-settle"))
            .args(["rank", "submit", "quiz", name, score])
            .arg("--db-path")
            .arg(&db_path)
            .status()
            .expect("Failed to execute command");
        assert!(status.success());
    }

    let output = Command::new(cargo_bin!("quiz-settle"))
        .args(["rank", "show", "quiz"])
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    let ranks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ranks[0]["name"], "alice");
    assert_eq!(ranks[1]["name"], "bob");
}
