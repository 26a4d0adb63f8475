use chrono::{DateTime, Utc};

/// Clock port so cache freshness can be tested without waiting a day.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
