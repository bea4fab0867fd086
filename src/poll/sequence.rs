/// Ordering guard for overlapping fetches.
///
/// Every fetch is tagged with a number from [`issue`](Self::issue). When the
/// fetch completes, [`admit`](Self::admit) decides whether its outcome may be
/// applied: only outcomes newer than everything applied so far get through,
/// so a slow response can never overwrite a fresher one.
#[derive(Debug, Default)]
pub struct SequenceGate {
    last_issued: u64,
    highest_applied: Option<u64>,
    closed: bool,
}

impl SequenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next sequence number. Numbers start at 1.
    pub fn issue(&mut self) -> u64 {
        self.last_issued += 1;
        self.last_issued
    }

    /// Returns true if the outcome tagged `seq` should be applied, and records
    /// it as the newest applied outcome.
    pub fn admit(&mut self, seq: u64) -> bool {
        if self.closed {
            return false;
        }
        match self.highest_applied {
            Some(highest) if seq <= highest => false,
            _ => {
                self.highest_applied = Some(seq);
                true
            }
        }
    }

    /// Refuse every later completion.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn highest_applied(&self) -> Option<u64> {
        self.highest_applied
    }
}
