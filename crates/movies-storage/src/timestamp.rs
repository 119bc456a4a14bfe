//! Conversions between [`Timestamp`] and the Unix-microsecond `BIGINT`
//! columns the SQL backends store.

use crate::error::Result;
use jiff::Timestamp;
use movies_core::StoreError;

pub(crate) fn to_micros(ts: Timestamp) -> i64 {
    ts.as_microsecond()
}

pub(crate) fn from_micros(column: &str, value: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(value).map_err(|e| {
        StoreError::InvalidData(format!("invalid {column} timestamp '{value}': {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micros_keep_sub_second_precision() {
        let ts: Timestamp = "2010-07-16T12:30:45.123456Z".parse().unwrap();
        assert_eq!(from_micros("release_date", to_micros(ts)).unwrap(), ts);
    }

    #[test]
    fn out_of_range_is_invalid_data() {
        let err = from_micros("created_at", i64::MAX).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }
}
