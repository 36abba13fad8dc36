//! `AuditTrail`: an append-only, hash-chained log of trust-affecting
//! events.

use isnad_core::canonical::{sha256_hex, CanonicalBuilder};
use isnad_core::time::now_iso8601;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AuditResult;

/// `prev_hash` for the first entry in a trail -- there is no real
/// predecessor to hash, so the chain starts from a fixed sentinel rather
/// than an empty string (which would be indistinguishable from "hash
/// computation failed").
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// One entry in an [`AuditTrail`].
///
/// `details` is an opaque property bag rather than a fixed struct, since
/// every event type (attestation added, revocation issued, policy
/// decision, key rotation) carries different shapes of context -- it is
/// never the record's full payload or key material, only
/// small fields useful for investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Zero-based position in the trail.
    pub sequence: u64,
    /// ISO-8601 UTC timestamp of when this entry was logged.
    pub timestamp: String,
    /// Short tag for what happened, e.g. `"attestation_added"`,
    /// `"revocation_issued"`, `"policy_decision"`.
    pub event_type: String,
    /// `agent_id` this event is principally about.
    pub agent_id: String,
    /// Opaque, event-type-specific detail bag.
    pub details: Value,
    /// `entry_hash` of the preceding entry, or [`GENESIS_HASH`] for the
    /// first entry.
    pub prev_hash: String,
    /// `sha256` of this entry's own fields (excluding itself), binding it
    /// to `prev_hash` and therefore to everything before it.
    pub entry_hash: String,
}

impl AuditEntry {
    fn content_bytes(
        sequence: u64,
        timestamp: &str,
        event_type: &str,
        agent_id: &str,
        details: &Value,
        prev_hash: &str,
    ) -> Vec<u8> {
        CanonicalBuilder::new("audit_entry")
            .number(sequence)
            .field(timestamp)
            .field(event_type)
            .field(agent_id)
            .field(details.to_string())
            .field(prev_hash)
            .finish()
    }

    fn recompute_hash(&self) -> String {
        sha256_hex(&Self::content_bytes(
            self.sequence,
            &self.timestamp,
            &self.event_type,
            &self.agent_id,
            &self.details,
            &self.prev_hash,
        ))
    }
}

/// A filter for [`AuditTrail::query_filtered`]. Every field left unset
/// matches everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditQuery<'a> {
    agent_id: Option<&'a str>,
    event_type: Option<&'a str>,
    since: Option<&'a str>,
    until: Option<&'a str>,
    limit: Option<usize>,
}

impl<'a> AuditQuery<'a> {
    /// An unfiltered query matching every entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to entries about this `agent_id`.
    pub fn agent_id(mut self, agent_id: Option<&'a str>) -> Self {
        self.agent_id = agent_id;
        self
    }

    /// Restrict to entries with this `event_type`.
    pub fn event_type(mut self, event_type: Option<&'a str>) -> Self {
        self.event_type = event_type;
        self
    }

    /// Restrict to entries at or after this ISO-8601 timestamp.
    pub fn since(mut self, since: Option<&'a str>) -> Self {
        self.since = since;
        self
    }

    /// Restrict to entries at or before this ISO-8601 timestamp.
    pub fn until(mut self, until: Option<&'a str>) -> Self {
        self.until = until;
        self
    }

    /// Cap the number of matching entries returned.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// An append-only log of trust-affecting events, hash-chained so any
/// after-the-fact edit to an entry is detectable.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    /// An empty audit trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry and return it.
    pub fn log(&mut self, event_type: impl Into<String>, agent_id: impl Into<String>, details: Value) -> &AuditEntry {
        let sequence = self.entries.len() as u64;
        let timestamp = now_iso8601();
        let event_type = event_type.into();
        let agent_id = agent_id.into();
        let prev_hash = self
            .entries
            .last()
            .map(|e| e.entry_hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        let entry_hash = sha256_hex(&AuditEntry::content_bytes(
            sequence,
            &timestamp,
            &event_type,
            &agent_id,
            &details,
            &prev_hash,
        ));
        self.entries.push(AuditEntry {
            sequence,
            timestamp,
            event_type,
            agent_id,
            details,
            prev_hash,
            entry_hash,
        });
        self.entries.last().expect("just pushed")
    }

    /// Convenience wrapper over [`AuditTrail::log`] for events with no
    /// structured detail beyond a short human-readable note.
    pub fn log_note(&mut self, event_type: impl Into<String>, agent_id: impl Into<String>, note: impl Into<String>) -> &AuditEntry {
        self.log(event_type, agent_id, Value::String(note.into()))
    }

    /// All entries, in sequence order.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Entries whose `event_type` matches `event_type`, if given,
    /// otherwise every entry.
    pub fn query(&self, event_type: Option<&str>) -> Vec<&AuditEntry> {
        self.query_filtered(&AuditQuery::new().event_type(event_type))
    }

    /// Entries matching every field set on `filter`, newest constraints
    /// applied first: `agent_id` and `event_type` are exact matches,
    /// `since`/`until` bound the ISO-8601 timestamp range (inclusive), and
    /// `limit` caps how many of the matching entries (in sequence order)
    /// are returned.
    pub fn query_filtered(&self, filter: &AuditQuery) -> Vec<&AuditEntry> {
        let matches = self.entries.iter().filter(|e| {
            filter.agent_id.map(|a| e.agent_id == a).unwrap_or(true)
                && filter.event_type.map(|t| e.event_type == t).unwrap_or(true)
                && filter.since.map(|s| e.timestamp.as_str() >= s).unwrap_or(true)
                && filter.until.map(|u| e.timestamp.as_str() <= u).unwrap_or(true)
        });
        match filter.limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        }
    }

    /// Verify that every entry's `prev_hash` matches its predecessor's
    /// `entry_hash`, that `entry_hash` itself is correctly derived, and
    /// that the first entry's `prev_hash` is [`GENESIS_HASH`].
    ///
    /// Returns `(true, None)` if the chain is intact, or
    /// `(false, Some(index))` naming the first entry that fails to
    /// verify.
    pub fn verify_integrity(&self) -> (bool, Option<usize>) {
        let mut expected_prev = GENESIS_HASH.to_string();
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.prev_hash != expected_prev {
                return (false, Some(index));
            }
            if entry.entry_hash != entry.recompute_hash() {
                return (false, Some(index));
            }
            expected_prev = entry.entry_hash.clone();
        }
        (true, None)
    }

    /// Serialize the full trail as JSON.
    pub fn export_json(&self) -> AuditResult<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Reconstruct a trail from JSON produced by [`AuditTrail::export_json`].
    ///
    /// Does not itself verify integrity -- callers should call
    /// [`AuditTrail::verify_integrity`] on the result before trusting it.
    pub fn from_json(json: &str) -> AuditResult<Self> {
        let entries: Vec<AuditEntry> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }
}
