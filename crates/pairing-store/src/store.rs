//! File-backed pairing store.

use crate::error::PairingError;
use crate::types::*;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Pairing store backed by a JSON file.
///
/// The record lives behind a single lock. Registration binds, persists and
/// reports while holding the write lock, so concurrent handlers can never
/// interleave a read-modify-write cycle.
#[derive(Debug, Clone)]
pub struct PairingStore {
    record: Arc<RwLock<PairingRecord>>,
    path: PathBuf,
}

impl PairingStore {
    /// Load the record from `path`, bootstrapping a fresh one if the file is absent.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, PairingError> {
        let path = path.into();

        let record = match fs::read(&path).await {
            Ok(data) => {
                let record: PairingRecord = serde_json::from_slice(&data).map_err(|e| {
                    PairingError::Config(format!("invalid pairing file {:?}: {}", path, e))
                })?;
                info!(
                    "Loaded pairing record from {:?} (slot 1: {}, slot 2: {})",
                    path,
                    describe(&record, Slot::A),
                    describe(&record, Slot::B)
                );
                record
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let record = PairingRecord::fresh();
                persist(&path, &record).await?;
                info!("New pairing record created at {:?}", path);
                record
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self::with_record(path, record))
    }

    /// Wrap an existing record without touching the filesystem.
    pub fn with_record(path: impl Into<PathBuf>, record: PairingRecord) -> Self {
        Self {
            record: Arc::new(RwLock::new(record)),
            path: path.into(),
        }
    }

    /// Copy of the current record.
    pub async fn snapshot(&self) -> PairingRecord {
        self.record.read().await.clone()
    }

    /// Slots still waiting for a participant.
    pub async fn pending_invitations(&self) -> Vec<(Slot, String)> {
        self.record.read().await.pending_invitations()
    }

    /// Write the current record to disk.
    pub async fn save(&self) -> Result<(), PairingError> {
        let record = self.record.read().await;
        persist(&self.path, &record).await
    }

    /// Try to claim a slot for `identity` with an invitation code.
    ///
    /// A persistence failure is logged and reported through
    /// `Registration::Bound::persisted`; the in-memory binding stands.
    #[instrument(skip(self, candidate))]
    pub async fn register(&self, identity: i64, candidate: &str) -> Registration {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Registration::Ignored;
        }

        let mut record = self.record.write().await;

        // One account never holds both slots
        if let Some(held) = record.slot_of(identity) {
            info!("{} already holds slot {}, ignoring code", identity, held);
            return Registration::Rejected;
        }

        let Some(slot) = record.matching_slot(candidate) else {
            info!("Rejected invitation code from {}", identity);
            return Registration::Rejected;
        };

        record.bind(slot, identity);
        info!("Saved user {}: {}", slot, identity);

        let counterpart = record.identity(slot.other());
        let persisted = match persist(&self.path, &record).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to persist pairing record: {}", e);
                false
            }
        };

        Registration::Bound {
            slot,
            counterpart,
            persisted,
        }
    }

    /// Identity a message from `identity` should be relayed to.
    pub async fn counterpart(&self, identity: i64) -> Option<i64> {
        let recipient = self.record.read().await.counterpart(identity);
        if recipient.is_none() {
            info!("No companion found for {}", identity);
        }
        recipient
    }
}

fn describe(record: &PairingRecord, slot: Slot) -> String {
    match (record.identity(slot), record.secret(slot)) {
        (Some(id), None) => format!("bound to {}", id),
        (None, Some(_)) => "awaiting invitation".into(),
        (Some(id), Some(_)) => {
            warn!("Slot {} is bound to {} but still has a pending code", slot, id);
            format!("bound to {}", id)
        }
        (None, None) => "closed".into(),
    }
}

/// Serialize `record` as four-space indented JSON and replace `path` with it.
async fn persist(path: &Path, record: &PairingRecord) -> Result<(), PairingError> {
    let mut data = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut data, formatter);
    record
        .serialize(&mut serializer)
        .map_err(|e| PairingError::Storage(format!("JSON serialization error: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            PairingError::Storage(format!("unable to create directories {:?}: {}", parent, e))
        })?;
    }

    // Write atomically using temp file + rename
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, &data).await?;
    fs::rename(&temp_path, path).await?;

    debug!("Saved pairing record ({} bytes) to {:?}", data.len(), path);
    Ok(())
}
