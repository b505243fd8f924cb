use std::time::{SystemTime, UNIX_EPOCH};

use crate::row::{DataRow, DataSet};

/// Source of the processing timestamp.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Set `total = a + b` and stamp every row with the current time.
///
/// `total` only depends on the row, but the timestamp is the processing time,
/// so transforming the same data twice gives different timestamps.
pub fn transform(data: DataSet, clock: &dyn Clock) -> DataSet {
    data.into_rows()
        .into_iter()
        .map(|row| DataRow {
            total: Some(row.a + row.b),
            timestamp: Some(clock.now_millis()),
            ..row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;

    struct TickingClock(AtomicI64);

    impl Clock for TickingClock {
        fn now_millis(&self) -> i64 {
            self.0.fetch_add(1, Ordering::SeqCst)
        }
    }

    #[test]
    fn test_total_is_sum() {
        let data = DataSet::new(vec![DataRow::new(1.0, 2.0), DataRow::new(-1.5, 0.25)]);
        let out = transform(data, &FixedClock(1_586_207_144_149));

        assert_eq!(out.rows()[0].total, Some(3.0));
        assert_eq!(out.rows()[1].total, Some(-1.25));
        assert!(out.rows().iter().all(|r| r.timestamp == Some(1_586_207_144_149)));
        assert_eq!(out.rows()[0].a, 1.0);
        assert_eq!(out.rows()[0].b, 2.0);
    }

    #[test]
    fn test_timestamp_reflects_processing_time() {
        let clock = TickingClock(AtomicI64::new(100));
        let data = DataSet::new(vec![DataRow::new(1.0, 2.0)]);

        let first = transform(data.clone(), &clock);
        let second = transform(data, &clock);

        assert_eq!(first.rows()[0].total, second.rows()[0].total);
        assert_ne!(first.rows()[0].timestamp, second.rows()[0].timestamp);
    }

    #[test]
    fn test_overwrites_existing_derived_fields() {
        let row = DataRow {
            a: 1.0,
            b: 2.0,
            total: Some(10.0),
            timestamp: Some(1),
        };
        let out = transform(DataSet::new(vec![row]), &FixedClock(5));
        assert_eq!(out.rows()[0].total, Some(3.0));
        assert_eq!(out.rows()[0].timestamp, Some(5));
    }

    #[test]
    fn test_non_finite_values_propagate() {
        let data = DataSet::new(vec![
            DataRow::new(f32::NAN, 1.0),
            DataRow::new(f32::INFINITY, 1.0),
            DataRow::new(f32::MAX, f32::MAX),
        ]);
        let out = transform(data, &FixedClock(0));

        assert!(out.rows()[0].total.unwrap().is_nan());
        assert_eq!(out.rows()[1].total, Some(f32::INFINITY));
        assert_eq!(out.rows()[2].total, Some(f32::INFINITY));
    }

    #[test]
    fn test_empty() {
        assert!(transform(DataSet::default(), &SystemClock).is_empty());
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
