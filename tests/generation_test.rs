use signal_digest::generation::{completed_outputs, GenerationClient, GenerationTracker, HistoryEntry};
use signal_digest::FetchConfig;
use std::collections::BTreeMap;
use std::time::Duration;

#[test]
fn test_tracker_purges_expired_entries() {
    let mut tracker = GenerationTracker::new(8, Duration::from_millis(10));
    tracker.insert("a castle in the clouds", "id-1");
    assert_eq!(tracker.len(), 1);

    std::thread::sleep(Duration::from_millis(20));
    tracker.purge_expired();
    assert!(tracker.is_empty());
}

#[test]
fn test_tracker_evicts_oldest_at_capacity() {
    let mut tracker = GenerationTracker::new(2, Duration::from_secs(60));
    let first = tracker.insert("first", "id-1");
    std::thread::sleep(Duration::from_millis(5));
    let second = tracker.insert("second", "id-2");
    std::thread::sleep(Duration::from_millis(5));
    let third = tracker.insert("third", "id-3");

    assert_eq!(tracker.len(), 2, "capacity is enforced");
    assert!(tracker.get(&first).is_none(), "the oldest entry is evicted");
    assert!(tracker.get(&second).is_some());
    assert!(tracker.get(&third).is_some());
}

#[test]
fn test_tracker_remove_returns_the_entry() {
    let mut tracker = GenerationTracker::new(8, Duration::from_secs(60));
    let key = tracker.insert("a red bicycle", "id-1");

    let tracked = tracker.remove(&key).expect("entry was tracked");
    assert_eq!(tracked.prompt, "a red bicycle");
    assert_eq!(tracked.prompt_id, "id-1");
    assert!(tracker.is_empty());
}

#[test]
fn test_history_outputs_collected_only_when_completed() {
    let payload = r#"{
        "abc": {
            "status": {"completed": true},
            "outputs": {
                "9": {"images": [{"filename": "signal_00001.png", "subfolder": "", "type": "output"}]},
                "10": {"images": [{"filename": "signal_00002.png"}]}
            }
        }
    }"#;
    let history: BTreeMap<String, HistoryEntry> = serde_json::from_str(payload).unwrap();

    let images = completed_outputs(&history, "abc").expect("completed entry has outputs");
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].filename, "signal_00001.png");
    assert_eq!(images[1].image_type, "output", "type defaults to output");

    assert!(completed_outputs(&history, "missing").is_none());
}

#[test]
fn test_incomplete_generation_yields_no_outputs() {
    let payload = r#"{"abc": {"status": {"completed": false}, "outputs": {}}}"#;
    let history: BTreeMap<String, HistoryEntry> = serde_json::from_str(payload).unwrap();
    assert!(completed_outputs(&history, "abc").is_none());
}

#[test]
fn test_client_rejects_invalid_base_url() {
    assert!(GenerationClient::new("not a url", FetchConfig::default()).is_err());
}
