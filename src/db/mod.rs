mod load;
mod migrate;
mod query;

pub use load::load_world;
pub use migrate::migrate;
pub use query::{AllianceSnapshot, fetch_alliance_snapshot, fetch_settings, store_settings};

/// Convert an unsigned id or timestamp to a BIGINT value, refusing values
/// above `i64::MAX` instead of wrapping them.
fn to_bigint(value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}
