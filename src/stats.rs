use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PerfSample {
    pub payload_len: usize,
    pub writes: usize,
    pub elapsed: Duration,
}

impl PerfSample {
    pub fn new(payload_len: usize, writes: usize, elapsed: Duration) -> Self {
        Self {
            payload_len,
            writes,
            elapsed,
        }
    }

    pub fn total_bytes(&self) -> u64 {
        (self.payload_len * self.writes) as u64
    }

    /// Bytes per second over the loop; elapsed is floored at 1ms.
    pub fn bytes_per_sec(&self) -> f64 {
        let dur = self.elapsed.as_secs_f64().max(1e-3);
        (self.total_bytes() as f64) / dur
    }
}
