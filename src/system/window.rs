use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 30;

/// Fixed-capacity FIFO series: the last `capacity` values, oldest first.
///
/// The window starts full of `T::default()` so a chart always has a complete
/// series to draw, even before the first real sample arrives.
#[derive(Debug, Clone)]
pub struct SlidingWindow<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone + Default> SlidingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut values = VecDeque::with_capacity(capacity + 1);
        values.resize(capacity, T::default());
        Self { values, capacity }
    }
}

impl<T: Clone> SlidingWindow<T> {
    pub fn push(&mut self, value: T) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn values(&self) -> Vec<T> {
        self.values.iter().cloned().collect()
    }
}

impl<T> SlidingWindow<T> {
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.values.back()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone + Default> Default for SlidingWindow<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_full_of_neutral_values() {
        let window: SlidingWindow<f64> = SlidingWindow::default();
        assert_eq!(window.len(), DEFAULT_CAPACITY);
        assert!(window.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn push_evicts_oldest_first() {
        let mut window = SlidingWindow::new(3);
        for i in 1..=5u32 {
            window.push(i);
        }
        assert_eq!(window.values(), vec![3, 4, 5]);
        assert_eq!(window.latest(), Some(&5));
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut window = SlidingWindow::new(0);
        window.push(9u8);
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.values(), vec![9]);
    }

    #[test]
    fn length_settles_at_capacity() {
        let mut window = SlidingWindow::new(5);
        for i in 0..100 {
            window.push(i as f64);
            assert_eq!(window.len(), 5);
        }
        assert_eq!(window.values(), vec![95.0, 96.0, 97.0, 98.0, 99.0]);
    }
}
