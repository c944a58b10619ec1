//! Per-instance event log
//!
//! Append-only, sequence-numbered and hash chained: every record's hash
//! covers its sequence, timestamp, event and the previous record's hash,
//! so any edit to a stored record breaks [`EventLog::verify_chain`].
//! The chain is tamper-evident, not a signature.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use upbox_core::{BoxEvent, Error, Result};

/// Hash preceding the first record
pub const GENESIS_HASH: [u8; 32] = [0u8; 32];

/// A committed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 0
    pub sequence: u64,
    /// The event
    pub event: BoxEvent,
    /// Microseconds since the Unix epoch
    pub timestamp: i64,
    /// Hash of the previous record ([`GENESIS_HASH`] for the first)
    pub prev_hash: [u8; 32],
    /// Hash of this record
    pub hash: [u8; 32],
}

impl EventRecord {
    fn compute_hash(
        sequence: u64,
        event: &BoxEvent,
        timestamp: i64,
        prev_hash: &[u8; 32],
    ) -> Result<[u8; 32]> {
        let payload = bincode::serialize(event)
            .map_err(|e| Error::internal(format!("failed to encode event: {}", e)))?;
        let mut hasher = Sha256::new();
        hasher.update(sequence.to_le_bytes());
        hasher.update(timestamp.to_le_bytes());
        hasher.update(prev_hash);
        hasher.update(&payload);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Ok(out)
    }
}

/// Chain verification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVerification {
    /// Whether the chain is valid
    pub is_valid: bool,
    /// Total number of records
    pub length: u64,
    /// Sequence of the first invalid record, if any
    pub first_invalid: Option<u64>,
    /// Description of the problem, if any
    pub error: Option<String>,
}

/// Ordered events of one instance
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap previously committed records without checking them
    ///
    /// Call [`verify_chain`](Self::verify_chain) before trusting the result.
    pub fn from_records(records: Vec<EventRecord>) -> Self {
        Self { records }
    }

    /// Append events in order, all or nothing
    pub fn append_all(&mut self, events: impl IntoIterator<Item = BoxEvent>) -> Result<()> {
        let timestamp = chrono::Utc::now().timestamp_micros();
        let mut prev_hash = self.last_hash();
        let mut sequence = self.records.len() as u64;
        let mut sealed = Vec::new();
        for event in events {
            let hash = EventRecord::compute_hash(sequence, &event, timestamp, &prev_hash)?;
            sealed.push(EventRecord {
                sequence,
                event,
                timestamp,
                prev_hash,
                hash,
            });
            prev_hash = hash;
            sequence += 1;
        }
        self.records.extend(sealed);
        Ok(())
    }

    /// Append a single event
    pub fn append(&mut self, event: BoxEvent) -> Result<()> {
        self.append_all(std::iter::once(event))
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, oldest first
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with `sequence >= from`
    pub fn since(&self, from: u64) -> &[EventRecord] {
        let start = usize::try_from(from)
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    /// Records whose event has the given kind
    pub fn by_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a EventRecord> + 'a {
        self.records.iter().filter(move |r| r.event.kind() == kind)
    }

    /// Hash of the newest record ([`GENESIS_HASH`] when empty)
    pub fn last_hash(&self) -> [u8; 32] {
        self.records.last().map(|r| r.hash).unwrap_or(GENESIS_HASH)
    }

    /// Recompute every hash and link
    pub fn verify_chain(&self) -> ChainVerification {
        let length = self.records.len() as u64;
        let mut prev_hash = GENESIS_HASH;
        for (index, record) in self.records.iter().enumerate() {
            let expected_sequence = index as u64;
            let problem = if record.sequence != expected_sequence {
                Some(format!(
                    "expected sequence {}, found {}",
                    expected_sequence, record.sequence
                ))
            } else if record.prev_hash != prev_hash {
                Some("broken link to previous record".to_string())
            } else {
                match EventRecord::compute_hash(
                    record.sequence,
                    &record.event,
                    record.timestamp,
                    &record.prev_hash,
                ) {
                    Ok(hash) if hash == record.hash => None,
                    Ok(_) => Some("hash mismatch".to_string()),
                    Err(e) => Some(e.to_string()),
                }
            };
            if let Some(error) = problem {
                return ChainVerification {
                    is_valid: false,
                    length,
                    first_invalid: Some(expected_sequence),
                    error: Some(error),
                };
            }
            prev_hash = record.hash;
        }
        ChainVerification {
            is_valid: true,
            length,
            first_invalid: None,
            error: None,
        }
    }
}
