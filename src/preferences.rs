//! Persisted "animation enabled" preference.

use crate::storage::Storage;
use time::{Duration, OffsetDateTime};

pub const ANIMATION_KEY: &str = "animation";

/// How long a written preference survives without being rewritten.
pub const RETENTION: Duration = Duration::days(30);

/// True unless the stored value is explicitly `"false"`.
pub fn get_animation_preference(store: &Storage) -> anyhow::Result<bool> {
    get_animation_preference_at(store, OffsetDateTime::now_utc())
}

pub fn set_animation_preference(store: &Storage, enabled: bool) -> anyhow::Result<()> {
    set_animation_preference_at(store, enabled, OffsetDateTime::now_utc())
}

fn get_animation_preference_at(store: &Storage, now: OffsetDateTime) -> anyhow::Result<bool> {
    let value = store.get_value(ANIMATION_KEY, now.unix_timestamp())?;
    Ok(value.as_deref() != Some("false"))
}

fn set_animation_preference_at(
    store: &Storage,
    enabled: bool,
    now: OffsetDateTime,
) -> anyhow::Result<()> {
    let expires_at = (now + RETENTION).unix_timestamp();
    let value = if enabled { "true" } else { "false" };
    store.set_value(ANIMATION_KEY, value, expires_at, now.unix_timestamp())?;
    tracing::debug!(enabled, "animation preference stored");
    Ok(())
}
