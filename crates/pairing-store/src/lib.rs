//! Two-slot pairing record persisted to a local JSON file.
//!
//! Each slot starts out holding a one-time invitation code. The first
//! participant presenting that code is bound to the slot and the code is
//! consumed. Messages are relayed between the two bound participants.

mod error;
mod store;
mod types;

pub use error::PairingError;
pub use store::PairingStore;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pending_record() -> PairingRecord {
        PairingRecord {
            user1_id: 0,
            user2_id: 0,
            user1_key: "aZ3kT9".into(),
            user2_key: "Qw7pL2".into(),
        }
    }

    fn state_path(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join("config").join("dialogue.json")
    }

    #[test]
    fn test_generate_secret_alphabet_and_length() {
        for _ in 0..100 {
            let secret = generate_secret(SECRET_LENGTH);
            assert_eq!(secret.len(), 6);
            assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_fresh_record() {
        let record = PairingRecord::fresh();

        assert_eq!(record.user1_id, 0);
        assert_eq!(record.user2_id, 0);
        assert_eq!(record.user1_key.len(), SECRET_LENGTH);
        assert_eq!(record.user2_key.len(), SECRET_LENGTH);
        assert_ne!(record.user1_key, record.user2_key);
        assert_eq!(record.pending_invitations().len(), 2);
    }

    #[test]
    fn test_record_serialization_keys() {
        let record = PairingRecord {
            user1_id: 111,
            user2_id: 0,
            user1_key: String::new(),
            user2_key: "Qw7pL2".into(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "User1ID": 111,
                "User2ID": 0,
                "User1Key": "",
                "User2Key": "Qw7pL2"
            })
        );
    }

    #[test]
    fn test_record_deserialization_defaults_missing_fields() {
        let record: PairingRecord = serde_json::from_str(r#"{"User1Key": "abc123"}"#).unwrap();

        assert_eq!(record.user1_id, 0);
        assert_eq!(record.user2_id, 0);
        assert_eq!(record.user1_key, "abc123");
        assert!(record.user2_key.is_empty());
    }

    #[test]
    fn test_matching_slot() {
        let record = pending_record();

        assert_eq!(record.matching_slot("aZ3kT9"), Some(Slot::A));
        assert_eq!(record.matching_slot("Qw7pL2"), Some(Slot::B));
        assert_eq!(record.matching_slot("wrong"), None);
        assert_eq!(record.matching_slot(""), None);
    }

    #[test]
    fn test_matching_slot_prefers_a_on_equal_secrets() {
        let mut record = pending_record();
        record.user2_key = record.user1_key.clone();

        assert_eq!(record.matching_slot("aZ3kT9"), Some(Slot::A));
    }

    #[test]
    fn test_consumed_secret_no_longer_matches() {
        let mut record = pending_record();
        record.bind(Slot::A, 111);

        assert_eq!(record.user1_id, 111);
        assert!(record.user1_key.is_empty());
        assert_eq!(record.matching_slot("aZ3kT9"), None);
        assert_eq!(record.pending_invitations(), vec![(Slot::B, "Qw7pL2".to_string())]);
    }

    #[test]
    fn test_counterpart_combinations() {
        let mut record = pending_record();

        // Nobody bound
        assert_eq!(record.counterpart(111), None);

        // Caller bound, partner vacant
        record.bind(Slot::A, 111);
        assert_eq!(record.counterpart(111), None);

        // Both bound
        record.bind(Slot::B, 222);
        assert_eq!(record.counterpart(111), Some(222));
        assert_eq!(record.counterpart(222), Some(111));

        // Caller unknown
        assert_eq!(record.counterpart(333), None);
        assert_eq!(record.counterpart(0), None);
    }

    #[test]
    fn test_counterpart_slot_b_only() {
        let mut record = pending_record();
        record.bind(Slot::B, 222);

        assert_eq!(record.counterpart(222), None);
    }

    // File-backed store tests

    #[tokio::test]
    async fn test_load_bootstraps_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);

        let store = PairingStore::load(&path).await.unwrap();
        let record = store.snapshot().await;

        assert!(path.exists());
        assert_eq!(record.user1_id, 0);
        assert_eq!(record.user2_id, 0);
        assert_eq!(record.user1_key.len(), 6);
        assert_eq!(record.user2_key.len(), 6);

        let on_disk: PairingRecord =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk, record);
    }

    #[tokio::test]
    async fn test_save_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);

        let store = PairingStore::with_record(&path, pending_record());
        store.save().await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"User1ID\": 0,"));
        assert!(text.contains("\"User2Key\": \"Qw7pL2\""));
    }

    #[tokio::test]
    async fn test_save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);

        let record = PairingRecord {
            user1_id: 111,
            user2_id: 0,
            user1_key: String::new(),
            user2_key: "Qw7pL2".into(),
        };
        PairingStore::with_record(&path, record.clone())
            .save()
            .await
            .unwrap();

        let reloaded = PairingStore::load(&path).await.unwrap();
        assert_eq!(reloaded.snapshot().await, record);
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dialogue.json");
        std::fs::write(&path, "not json").unwrap();

        let result = PairingStore::load(&path).await;
        assert!(matches!(result, Err(PairingError::Config(_))));
    }

    #[tokio::test]
    async fn test_load_wrong_shape_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dialogue.json");
        std::fs::write(&path, r#"{"User1ID": "not a number"}"#).unwrap();

        let result = PairingStore::load(&path).await;
        assert!(matches!(result, Err(PairingError::Config(_))));
    }

    #[tokio::test]
    async fn test_register_empty_code_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);
        let store = PairingStore::with_record(&path, pending_record());

        assert_eq!(store.register(111, "").await, Registration::Ignored);
        assert_eq!(store.register(111, "   ").await, Registration::Ignored);
        assert_eq!(store.snapshot().await, pending_record());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_register_wrong_code_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);
        let store = PairingStore::with_record(&path, pending_record());

        assert_eq!(store.register(111, "nope").await, Registration::Rejected);
        assert_eq!(store.snapshot().await, pending_record());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_register_both_participants() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);
        let store = PairingStore::with_record(&path, pending_record());

        let first = store.register(111, "aZ3kT9").await;
        assert_eq!(
            first,
            Registration::Bound {
                slot: Slot::A,
                counterpart: None,
                persisted: true,
            }
        );

        let second = store.register(222, "Qw7pL2").await;
        assert_eq!(
            second,
            Registration::Bound {
                slot: Slot::B,
                counterpart: Some(111),
                persisted: true,
            }
        );

        let record = store.snapshot().await;
        assert_eq!(record.user1_id, 111);
        assert_eq!(record.user2_id, 222);
        assert!(record.user1_key.is_empty());
        assert!(record.user2_key.is_empty());

        let reloaded = PairingStore::load(&path).await.unwrap();
        assert_eq!(reloaded.snapshot().await, record);
        assert_eq!(reloaded.counterpart(111).await, Some(222));
    }

    #[tokio::test]
    async fn test_register_reused_code_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = PairingStore::with_record(state_path(&dir), pending_record());

        store.register(111, "aZ3kT9").await;
        assert_eq!(store.register(333, "aZ3kT9").await, Registration::Rejected);
        assert_eq!(store.snapshot().await.user1_id, 111);
    }

    #[tokio::test]
    async fn test_register_same_account_cannot_take_both_slots() {
        let dir = TempDir::new().unwrap();
        let store = PairingStore::with_record(state_path(&dir), pending_record());

        store.register(111, "aZ3kT9").await;
        assert_eq!(store.register(111, "Qw7pL2").await, Registration::Rejected);

        let record = store.snapshot().await;
        assert_eq!(record.user2_id, 0);
        assert_eq!(record.user2_key, "Qw7pL2");
        assert_eq!(store.counterpart(111).await, None);

        // The real second invitee can still join
        assert_eq!(
            store.register(222, "Qw7pL2").await,
            Registration::Bound {
                slot: Slot::B,
                counterpart: Some(111),
                persisted: true,
            }
        );
    }

    #[tokio::test]
    async fn test_register_storage_failure_keeps_binding() {
        let dir = TempDir::new().unwrap();
        // Parent "directory" is a regular file, so create_dir_all fails
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = PairingStore::with_record(blocker.join("dialogue.json"), pending_record());

        let outcome = store.register(111, "aZ3kT9").await;
        assert_eq!(
            outcome,
            Registration::Bound {
                slot: Slot::A,
                counterpart: None,
                persisted: false,
            }
        );
        assert_eq!(store.snapshot().await.user1_id, 111);
        assert!(matches!(store.save().await, Err(PairingError::Storage(_))));
    }
}
