use chrono::Utc;

/// Default ticket lifetime in seconds (two hours)
pub const DEFAULT_TICKET_DURATION: i64 = 7200;

/// Time configuration for ticket validity.
///
/// When a ticket is issued without an explicit `valid_until`, the expiration
/// is `start_time + duration`, with `start_time` defaulting to the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketTimeConfig {
    /// Optional custom start time in seconds since epoch
    pub start_time: Option<i64>,
    /// Duration of validity in seconds
    pub duration: i64,
}

impl Default for TicketTimeConfig {
    fn default() -> Self {
        Self {
            start_time: None,
            duration: DEFAULT_TICKET_DURATION,
        }
    }
}

impl TicketTimeConfig {
    /// Expiration timestamp for a ticket issued with this configuration
    pub fn expiration(&self) -> i64 {
        let start_time = self.start_time.unwrap_or_else(now);
        start_time.saturating_add(self.duration)
    }
}

/// Current wall-clock time as a Unix timestamp
pub fn now() -> i64 {
    Utc::now().timestamp()
}
