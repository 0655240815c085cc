//! Append-only log of calls made against one mock instance.
//!
//! Appends go through a mutex so sequence numbers stay gap-free and ordered
//! even when several tasks call the same mock. Every query is read-only.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Method identifier.
    pub method_id: String,
    /// Arguments passed to the call.
    pub arguments: Vec<Value>,
    /// Position of this call among all calls on the instance.
    pub sequence_number: u64,
    /// When the call was recorded.
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct LedgerState {
    records: Vec<CallRecord>,
    next_sequence: u64,
}

/// Call log owned by a mock instance.
#[derive(Debug, Default)]
pub struct CallLedger {
    state: Mutex<LedgerState>,
}

impl CallLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a call and returns its sequence number.
    pub fn record(&self, method_id: &str, arguments: &[Value]) -> u64 {
        let mut state = self.lock();
        let sequence_number = state.next_sequence;
        state.next_sequence += 1;
        state.records.push(CallRecord {
            method_id: method_id.to_string(),
            arguments: arguments.to_vec(),
            sequence_number,
            recorded_at: Utc::now(),
        });
        sequence_number
    }

    /// Number of calls recorded for `method_id`.
    pub fn call_count(&self, method_id: &str) -> usize {
        self.lock()
            .records
            .iter()
            .filter(|r| r.method_id == method_id)
            .count()
    }

    /// Calls recorded for `method_id`, in insertion order.
    pub fn history(&self, method_id: &str) -> Vec<CallRecord> {
        self.lock()
            .records
            .iter()
            .filter(|r| r.method_id == method_id)
            .cloned()
            .collect()
    }

    /// Every recorded call, in insertion order.
    pub fn records(&self) -> Vec<CallRecord> {
        self.lock().records.clone()
    }

    /// Number of calls across all methods.
    pub fn total_calls(&self) -> usize {
        self.lock().records.len()
    }

    /// True when `method_id` was called at least once.
    pub fn was_called(&self, method_id: &str) -> bool {
        self.call_count(method_id) > 0
    }

    /// True when `method_id` has no recorded call.
    pub fn never_called(&self, method_id: &str) -> bool {
        self.call_count(method_id) == 0
    }

    /// True if at least one call to `method_id` had exactly `arguments`.
    pub fn was_called_with(&self, method_id: &str, arguments: &[Value]) -> bool {
        self.lock()
            .records
            .iter()
            .any(|r| r.method_id == method_id && r.arguments == arguments)
    }

    /// True if the recorded calls contain `methods` as an ordered
    /// subsequence, possibly interleaved with other calls. An empty sequence
    /// is trivially satisfied.
    pub fn called_in_order<S: AsRef<str>>(&self, methods: &[S]) -> bool {
        let state = self.lock();
        let mut expected = methods.iter().map(AsRef::as_ref).peekable();

        // Records are appended under the lock, so storage order is sequence order.
        for record in &state.records {
            let Some(next) = expected.peek() else {
                break;
            };
            if *next == record.method_id {
                expected.next();
            }
        }

        expected.peek().is_none()
    }

    /// Drops all records and restarts sequence numbering.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.records.clear();
        state.next_sequence = 0;
    }
}
