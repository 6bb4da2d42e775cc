/// Collapses redraw requests into at most one redraw per frame.
#[derive(Debug, Clone, Default)]
pub struct RedrawThrottle {
    pending: bool,
    requested: u64,
    drawn: u64,
}

impl RedrawThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when this request scheduled a redraw, false when one was
    /// already pending.
    pub fn request(&mut self) -> bool {
        self.requested += 1;
        !std::mem::replace(&mut self.pending, true)
    }

    /// Called at a frame boundary; true means draw now.
    pub fn take(&mut self) -> bool {
        if std::mem::take(&mut self.pending) {
            self.drawn += 1;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn drawn(&self) -> u64 {
        self.drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_collapse_until_frame() {
        let mut t = RedrawThrottle::new();
        assert!(t.request());
        assert!(!t.request());
        assert!(!t.request());
        assert!(t.take());
        assert!(!t.take());
        assert_eq!((t.requested(), t.drawn()), (3, 1));
    }

    #[test]
    fn idle_frames_draw_nothing() {
        let mut t = RedrawThrottle::new();
        assert!(!t.take());
        assert!(!t.is_pending());
    }
}
