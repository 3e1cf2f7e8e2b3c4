//! Latest-wins coordination of overlapping refreshes.
//!
//! A screen may start a second fetch before the first returns (a manual
//! refresh after a create, say). Completions can arrive in any order; only
//! the most recently started fetch is allowed to replace the collection.

use tracing::debug;

/// Identifies one started refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Sequence number, starting at 1.
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Issues tickets and decides which completions may be applied.
#[derive(Debug, Clone, Default)]
pub struct RefreshGate {
    issued: u64,
    settled: u64,
    last_error: Option<String>,
}

impl RefreshGate {
    pub fn new() -> Self {
        RefreshGate::default()
    }

    /// Starts a refresh. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Returns `true` while the latest refresh has not completed.
    pub fn is_pending(&self) -> bool {
        self.settled < self.issued
    }

    /// Returns `true` if `ticket` is the latest issued and still open.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued && self.settled < ticket.0
    }

    /// Settles `ticket`. Returns `false` for a stale or repeated completion,
    /// which must then be discarded.
    pub fn admit(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                latest = self.issued,
                "discarding stale refresh"
            );
            return false;
        }
        self.settled = ticket.0;
        true
    }

    /// Records a successful refresh.
    pub fn succeeded(&mut self) {
        self.last_error = None;
    }

    /// Records a failed refresh for the retry affordance.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// Message of the last failed refresh, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_admitted() {
        let mut gate = RefreshGate::new();
        let first = gate.begin();
        let second = gate.begin();
        assert!(gate.is_pending());

        assert!(gate.admit(second));
        assert!(!gate.is_pending());
        // The older fetch comes back late.
        assert!(!gate.admit(first));
    }

    #[test]
    fn repeated_completion_is_rejected() {
        let mut gate = RefreshGate::new();
        let ticket = gate.begin();
        assert!(gate.admit(ticket));
        assert!(!gate.admit(ticket));
    }

    #[test]
    fn out_of_order_start_completion() {
        let mut gate = RefreshGate::new();
        let first = gate.begin();
        assert!(gate.admit(first));
        let second = gate.begin();
        assert!(gate.is_current(second));
        assert!(!gate.is_current(first));
        assert_eq!(second.seq(), 2);
    }

    #[test]
    fn error_is_cleared_by_success() {
        let mut gate = RefreshGate::new();
        gate.failed("timeout");
        assert_eq!(gate.last_error(), Some("timeout"));
        gate.succeeded();
        assert_eq!(gate.last_error(), None);
    }
}
