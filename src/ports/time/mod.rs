use chrono::{DateTime, Utc};

/// Source of the current time, injected so timestamps are testable
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}
