//! Sequential, zero-padded identifiers (`job_001`, `cloned_voice_005`).

/// Hands out ids of the form `{prefix}_{n:03}` in increasing order.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: &'static str,
    start: u32,
    next: u32,
}

impl IdSequence {
    pub fn new(prefix: &'static str, start: u32) -> Self {
        Self {
            prefix,
            start,
            next: start,
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}_{:03}", self.prefix, self.next);
        self.next += 1;
        id
    }

    /// Rewind to the first id this sequence ever issued.
    pub fn reset(&mut self) {
        self.next = self.start;
    }
}
