//! Candidate output-set construction via the builder pattern.
//!
//! The [`OutputSetBuilder`] assembles the output side of a spend the way
//! a transaction-construction layer actually thinks about it: one
//! state-continuation output that the validator will scrutinize, plus any
//! number of free outputs (change, fee sweeps) the validator ignores.
//!
//! The builder does not sign and does not validate — it only lays outputs
//! out in a deterministic order. The state output, when present, always
//! lands at index 0, matching the convention the issuance helper uses
//! ([`crate::config::GENESIS_STATE_INDEX`]). Validators accept any
//! designated index; the builder just never needs another one.

use super::outputs::TxOutput;

/// Fluent builder for a candidate output set.
///
/// # Usage
///
/// ```
/// use sigil_protocol::transaction::OutputSetBuilder;
///
/// let outputs = OutputSetBuilder::new()
///     .state_output(b"serialized record state".to_vec(), 100)
///     .change_output(b"owner change lock".to_vec(), 9_900)
///     .build();
///
/// assert_eq!(outputs.len(), 2);
/// assert_eq!(outputs[0].value, 100);
/// ```
#[derive(Debug, Default)]
pub struct OutputSetBuilder {
    state: Option<TxOutput>,
    rest: Vec<TxOutput>,
}

impl OutputSetBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the state-continuation output: the serialized successor state
    /// and the value locked with it. Calling this twice replaces the
    /// previous state output — a spend carries exactly one.
    pub fn state_output(mut self, state: impl Into<Vec<u8>>, value: u64) -> Self {
        self.state = Some(TxOutput::new(value, state));
        self
    }

    /// Appends a free output (change, fee sweep). Free outputs keep their
    /// insertion order, after the state output.
    pub fn change_output(mut self, lock: impl Into<Vec<u8>>, value: u64) -> Self {
        self.rest.push(TxOutput::new(value, lock));
        self
    }

    /// Produces the ordered output set: state output first (if any),
    /// then free outputs in insertion order.
    pub fn build(self) -> Vec<TxOutput> {
        let mut outputs = Vec::with_capacity(1 + self.rest.len());
        if let Some(state) = self.state {
            outputs.push(state);
        }
        outputs.extend(self.rest);
        outputs
    }
}
