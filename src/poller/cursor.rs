//! Poll cursor - the next offset to request.

/// Watermark marking the next unconsumed update id.
///
/// Seeded from the caller's initial offset, which may be negative (the
/// remote reads that as "the last N updates"). After the first advance the
/// value is always past an update id the remote handed out.
///
/// Remote ordering is trusted: an advance overwrites the value even if the
/// new last id is below the current cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCursor {
    next_offset: i64,
}

impl PollCursor {
    pub fn new(initial_offset: i64) -> Self {
        Self {
            next_offset: initial_offset,
        }
    }

    pub fn next_offset(&self) -> i64 {
        self.next_offset
    }

    /// Move past the last update of a consumed batch; returns the new offset
    pub fn advance_past(&mut self, last_update_id: i64) -> i64 {
        self.next_offset = last_update_id.saturating_add(1);
        self.next_offset
    }
}
