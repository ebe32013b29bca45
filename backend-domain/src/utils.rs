use chrono::{DateTime, Utc};
use time::OffsetDateTime;

pub fn current_millis() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as i64 / 1_000_000
}

pub fn millis_to_offset(ms: i64) -> OffsetDateTime {
    let nanos = i128::from(ms).saturating_mul(1_000_000);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn chrono_to_offset(value: DateTime<Utc>) -> OffsetDateTime {
    millis_to_offset(value.timestamp_millis())
}

pub fn offset_to_chrono(value: OffsetDateTime) -> DateTime<Utc> {
    let ms = (value.unix_timestamp_nanos() / 1_000_000) as i64;
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}
