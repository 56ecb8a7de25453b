//! Human friendly rendering of note timestamps
//!
//! Outputs times as `3:04 PM 01/02/2006`

use crate::notes::NullTime;

/// Format used for all rendered timestamps
const FORMAT: &str = "%-I:%M %p %m/%d/%Y";

/// Render a nullable timestamp, `null` when absent
pub fn null_time(time: &NullTime) -> String {
    time.time()
        .map_or_else(|| "null".to_string(), |time| time.format(FORMAT).to_string())
}

/// Render the last update of a note, falling back to its creation
pub fn pretty_time(created_at: &NullTime, updated_at: &NullTime) -> String {
    if updated_at.is_valid() {
        return null_time(updated_at);
    }

    null_time(created_at)
}
