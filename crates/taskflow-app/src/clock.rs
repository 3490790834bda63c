//! Injectable time source for stores.

use std::sync::Arc;
use time::OffsetDateTime;

/// Shared function returning the current UTC time.
pub type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;

/// Clock backed by the system time.
#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(OffsetDateTime::now_utc)
}
