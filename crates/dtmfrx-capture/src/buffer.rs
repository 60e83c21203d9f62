use dtmfrx_detect::Sample;

/// Fixed-capacity block of samples with a single write cursor.
///
/// The cursor always stays below the capacity: it returns to zero on the
/// write that fills the block.
pub struct AcquisitionBuffer {
    samples: Box<[Sample]>,
    cursor: usize,
}

impl AcquisitionBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0; capacity.max(1)].into_boxed_slice(),
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Store one sample. Returns true when this write completed the block.
    pub fn push(&mut self, sample: Sample) -> bool {
        self.samples[self.cursor] = sample;
        self.cursor += 1;
        if self.cursor == self.samples.len() {
            self.cursor = 0;
            return true;
        }
        false
    }

    /// The whole block, oldest sample first once the block is complete.
    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    /// Drop a partially written block.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}
