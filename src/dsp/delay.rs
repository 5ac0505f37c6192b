use rand::Rng;

/// Shortest line the two-sample average can run on.
pub const MIN_LEN: usize = 2;

/// Fixed-length ring of samples used as the string of a plucked voice.
///
/// The line always holds exactly `len()` samples: [`DelayLine::advance`]
/// drops the oldest sample and appends the new one in a single step, so the
/// read position just walks around the buffer and nothing reallocates.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    read_pos: usize,
}

impl DelayLine {
    /// Fill a line of `len` samples with uniform noise in `[-0.5, 0.5)`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is below [`MIN_LEN`].
    pub fn with_noise<R: Rng>(len: usize, rng: &mut R) -> Self {
        assert!(len >= MIN_LEN, "delay line needs at least {MIN_LEN} samples, got {len}");
        let buffer = (0..len).map(|_| rng.random::<f32>() - 0.5).collect();
        Self {
            buffer,
            read_pos: 0,
        }
    }

    /// Build a line from explicit contents, oldest sample first.
    ///
    /// # Panics
    ///
    /// Panics if `samples` holds fewer than [`MIN_LEN`] samples.
    pub fn from_samples(samples: Vec<f32>) -> Self {
        assert!(
            samples.len() >= MIN_LEN,
            "delay line needs at least {MIN_LEN} samples, got {}",
            samples.len()
        );
        Self {
            buffer: samples,
            read_pos: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Oldest sample in the line.
    #[inline]
    pub fn head(&self) -> f32 {
        self.buffer[self.read_pos]
    }

    /// The two oldest samples: the head and its successor.
    #[inline]
    pub fn head2(&self) -> (f32, f32) {
        let next = (self.read_pos + 1) % self.buffer.len();
        (self.buffer[self.read_pos], self.buffer[next])
    }

    /// Pop the oldest sample and push `sample` as the newest one.
    #[inline]
    pub fn advance(&mut self, sample: f32) {
        // The slot being vacated at the head becomes the new tail.
        self.buffer[self.read_pos] = sample;
        self.read_pos = (self.read_pos + 1) % self.buffer.len();
    }

    /// Contents from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let (newer, older) = self.buffer.split_at(self.read_pos);
        older.iter().chain(newer.iter()).copied()
    }

    /// Copy the contents, oldest first, into `out` (replacing what was there).
    pub fn snapshot_into(&self, out: &mut Vec<f32>) {
        out.clear();
        out.extend(self.iter());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn noise_stays_in_half_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let line = DelayLine::with_noise(4096, &mut rng);

        assert_eq!(line.len(), 4096);
        assert!(line.iter().all(|s| (-0.5..0.5).contains(&s)));
    }

    #[test]
    fn head2_returns_two_oldest() {
        let line = DelayLine::from_samples(vec![1.0, 2.0, 3.0]);
        assert_eq!(line.head2(), (1.0, 2.0));
        assert_eq!(line.head(), 1.0);
    }

    #[test]
    fn advance_pops_head_and_pushes_tail() {
        let mut line = DelayLine::from_samples(vec![1.0, 2.0, 3.0]);

        line.advance(4.0);
        assert_eq!(line.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(line.head2(), (2.0, 3.0));

        line.advance(5.0);
        line.advance(6.0);
        assert_eq!(line.iter().collect::<Vec<_>>(), vec![4.0, 5.0, 6.0]);
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn head2_wraps_around_the_ring() {
        let mut line = DelayLine::from_samples(vec![1.0, 2.0]);
        line.advance(3.0);
        // Head is now the last physical slot; its successor is slot zero.
        assert_eq!(line.head2(), (2.0, 3.0));
    }

    #[test]
    #[should_panic(expected = "at least 2 samples")]
    fn single_sample_line_is_rejected() {
        DelayLine::from_samples(vec![0.25]);
    }

    #[test]
    #[should_panic(expected = "at least 2 samples")]
    fn empty_noise_line_is_rejected() {
        DelayLine::with_noise(0, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn snapshot_matches_iteration_order() {
        let mut line = DelayLine::from_samples(vec![0.1, 0.2, 0.3, 0.4]);
        line.advance(0.5);

        let mut snap = vec![9.0; 10];
        line.snapshot_into(&mut snap);
        assert_eq!(snap, vec![0.2, 0.3, 0.4, 0.5]);
    }
}
