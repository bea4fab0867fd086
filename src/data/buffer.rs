//! Bounded rolling window for one metric series.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Default number of points kept per series.
pub const DEFAULT_CAPACITY: usize = 60;

/// Scalar series values, plotted as `f64`.
pub trait Scalar: Copy {
    fn as_f64(self) -> f64;
}

impl Scalar for f64 {
    fn as_f64(self) -> f64 {
        self
    }
}

impl Scalar for u64 {
    fn as_f64(self) -> f64 {
        self as f64
    }
}

/// One sample in a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint<T> {
    /// Wall-clock capture time, assigned when the sample was aggregated.
    pub at: DateTime<Utc>,
    pub value: T,
}

/// Insertion-ordered FIFO holding at most `capacity` points.
///
/// Pushing onto a full buffer evicts exactly the oldest point. Timestamps are
/// non-decreasing from front to back: a point stamped earlier than the newest
/// stored point is re-stamped with the newest point's time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesBuffer<T> {
    points: VecDeque<SeriesPoint<T>>,
    capacity: usize,
}

impl<T> Default for SeriesBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<T> SeriesBuffer<T> {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest one if the buffer is full.
    ///
    /// Returns the evicted point, if any.
    pub fn push(&mut self, at: DateTime<Utc>, value: T) -> Option<SeriesPoint<T>> {
        let at = match self.points.back() {
            Some(last) if at < last.at => last.at,
            _ => at,
        };

        self.points.push_back(SeriesPoint { at, value });
        if self.points.len() > self.capacity {
            self.points.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-first iterator over the stored points.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, SeriesPoint<T>> {
        self.points.iter()
    }

    /// The most recent point.
    pub fn latest(&self) -> Option<&SeriesPoint<T>> {
        self.points.back()
    }

    /// The oldest retained point.
    pub fn oldest(&self) -> Option<&SeriesPoint<T>> {
        self.points.front()
    }
}

impl<T: Scalar> SeriesBuffer<T> {
    /// Smallest and largest value in the window.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.value.as_f64()).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

impl<'a, T> IntoIterator for &'a SeriesBuffer<T> {
    type Item = &'a SeriesPoint<T>;
    type IntoIter = std::collections::vec_deque::Iter<'a, SeriesPoint<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer: SeriesBuffer<f64> = SeriesBuffer::new(60);
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.latest().is_none());
        assert_eq!(buffer.capacity(), 60);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut buffer = SeriesBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        buffer.push(t(0), 1u64);
        buffer.push(t(1), 2u64);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.latest().unwrap().value, 2);
    }

    #[test]
    fn test_length_is_min_of_pushes_and_capacity() {
        for pushes in [0usize, 1, 59, 60, 61, 150] {
            let mut buffer = SeriesBuffer::new(60);
            for i in 0..pushes {
                buffer.push(t(i as i64), i as u64);
            }
            assert_eq!(buffer.len(), pushes.min(60), "after {} pushes", pushes);
        }
    }

    #[test]
    fn test_eviction_is_strict_fifo() {
        let mut buffer = SeriesBuffer::new(60);
        let mut evicted = Vec::new();
        for i in 0..75u64 {
            if let Some(point) = buffer.push(t(i as i64), i) {
                evicted.push(point.value);
            }
        }

        assert_eq!(evicted, (0..15).collect::<Vec<u64>>());
        let values: Vec<u64> = buffer.iter().map(|p| p.value).collect();
        assert_eq!(values, (15..75).collect::<Vec<u64>>());
        assert_eq!(buffer.oldest().unwrap().at, t(15));
        assert_eq!(buffer.latest().unwrap().at, t(74));
    }

    #[test]
    fn test_push_below_capacity_evicts_nothing() {
        let mut buffer = SeriesBuffer::new(3);
        assert!(buffer.push(t(0), 1.0).is_none());
        assert!(buffer.push(t(1), 2.0).is_none());
        assert!(buffer.push(t(2), 3.0).is_none());
        assert_eq!(buffer.push(t(3), 4.0).unwrap().value, 1.0);
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let mut buffer = SeriesBuffer::new(10);
        buffer.push(t(10), 1.0);
        buffer.push(t(5), 2.0);
        buffer.push(t(12), 3.0);

        let stamps: Vec<_> = buffer.iter().map(|p| p.at).collect();
        assert_eq!(stamps, vec![t(10), t(10), t(12)]);
    }

    #[test]
    fn test_value_range_covers_window() {
        let mut buffer = SeriesBuffer::<u64>::new(3);
        assert!(buffer.value_range().is_none());

        for (i, v) in [5u64, 1, 9, 4].into_iter().enumerate() {
            buffer.push(t(i as i64), v);
        }
        // 5 was evicted
        assert_eq!(buffer.value_range(), Some((1.0, 9.0)));
    }
}
