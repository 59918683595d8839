//! Pairing record and slot types.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a generated invitation secret.
pub const SECRET_LENGTH: usize = 6;

const SECRET_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// One of the two fixed positions in the pairing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// The opposite slot.
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::A => write!(f, "1"),
            Slot::B => write!(f, "2"),
        }
    }
}

/// The whole persisted pairing state.
///
/// An identity of `0` marks a vacant slot; an empty key marks a slot whose
/// invitation has been consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingRecord {
    #[serde(rename = "User1ID")]
    pub user1_id: i64,
    #[serde(rename = "User2ID")]
    pub user2_id: i64,
    #[serde(rename = "User1Key")]
    pub user1_key: String,
    #[serde(rename = "User2Key")]
    pub user2_key: String,
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// No invitation code was supplied.
    Ignored,
    /// The code matched neither slot.
    Rejected,
    /// The caller now occupies `slot`.
    Bound {
        slot: Slot,
        /// Identity already waiting in the other slot, if any.
        counterpart: Option<i64>,
        /// Whether the updated record reached disk.
        persisted: bool,
    },
}

impl PairingRecord {
    /// Create a record with two fresh, distinct invitation secrets.
    pub fn fresh() -> Self {
        let user1_key = generate_secret(SECRET_LENGTH);
        let mut user2_key = generate_secret(SECRET_LENGTH);
        while user2_key == user1_key {
            user2_key = generate_secret(SECRET_LENGTH);
        }

        Self {
            user1_id: 0,
            user2_id: 0,
            user1_key,
            user2_key,
        }
    }

    /// Bound identity in `slot`, or `None` if vacant.
    pub fn identity(&self, slot: Slot) -> Option<i64> {
        let id = match slot {
            Slot::A => self.user1_id,
            Slot::B => self.user2_id,
        };
        (id != 0).then_some(id)
    }

    /// Pending invitation secret for `slot`, or `None` once consumed.
    pub fn secret(&self, slot: Slot) -> Option<&str> {
        let key = match slot {
            Slot::A => &self.user1_key,
            Slot::B => &self.user2_key,
        };
        (!key.is_empty()).then_some(key.as_str())
    }

    /// Slot occupied by `identity`, if any.
    pub fn slot_of(&self, identity: i64) -> Option<Slot> {
        [Slot::A, Slot::B]
            .into_iter()
            .find(|slot| self.identity(*slot) == Some(identity))
    }

    /// Slot whose pending secret equals `candidate`. Slot A is checked first.
    pub fn matching_slot(&self, candidate: &str) -> Option<Slot> {
        if candidate.is_empty() {
            return None;
        }
        [Slot::A, Slot::B]
            .into_iter()
            .find(|slot| self.secret(*slot) == Some(candidate))
    }

    /// Bind `identity` to `slot` and consume its secret.
    pub fn bind(&mut self, slot: Slot, identity: i64) {
        match slot {
            Slot::A => {
                self.user1_id = identity;
                self.user1_key.clear();
            }
            Slot::B => {
                self.user2_id = identity;
                self.user2_key.clear();
            }
        }
    }

    /// Identity in the slot opposite the caller's, when both are bound.
    pub fn counterpart(&self, identity: i64) -> Option<i64> {
        let slot = self.slot_of(identity)?;
        self.identity(slot.other())
    }

    /// Slots still waiting for a participant, with their secrets.
    pub fn pending_invitations(&self) -> Vec<(Slot, String)> {
        [Slot::A, Slot::B]
            .into_iter()
            .filter_map(|slot| self.secret(slot).map(|s| (slot, s.to_string())))
            .collect()
    }
}

/// Generate a random alphanumeric secret of `length` characters.
pub fn generate_secret(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..SECRET_ALPHABET.len());
            SECRET_ALPHABET[idx] as char
        })
        .collect()
}
