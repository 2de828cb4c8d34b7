use crate::{BoardState, Quad, SuggestedMove};
use nalgebra::Point2;
use std::time::{Duration, Instant};

/// The most recent board detection accepted as valid, with the spatial
/// metadata needed to map a suggestion back into frame coordinates.
///
/// Cell contours are owned copies: the canonical grid frame they came from
/// is overwritten on the next successful detection.
#[derive(Clone, Debug)]
pub struct TrackedDetection {
    pub board: BoardState,
    /// Outer board quadrilateral in (mirrored) frame coordinates.
    pub outer_quad: Quad,
    /// Canonical-space contours of the nine ordered cells.
    pub cell_contours: Vec<Vec<Point2<i32>>>,
    /// Dimensions of the canonical grid frame the contours live in.
    pub canonical_size: (usize, usize),
    pub suggestion: SuggestedMove,
    /// Wall-clock time of the accepting detection.
    pub last_seen: Instant,
}

/// Cross-frame detection state.
///
/// The tracker is the only pipeline component with memory between frames.
/// A saved detection is overwritten by any newer 9-cell detection and is
/// logically expired (not displayable) once the time since last acceptance
/// exceeds the staleness window; it is not destroyed until replaced, so a
/// single-frame dropout never discards state.
#[derive(Debug)]
pub struct BoardTracker {
    saved: Option<TrackedDetection>,
    staleness: Duration,
}

impl BoardTracker {
    pub fn new(staleness: Duration) -> Self {
        Self {
            saved: None,
            staleness,
        }
    }

    /// Promote a fresh detection, replacing whatever was saved.
    pub fn accept(&mut self, detection: TrackedDetection) {
        log::debug!(
            "tracker accepted move at cell {} ({:?})",
            detection.suggestion.cell,
            detection.suggestion.mark
        );
        self.saved = Some(detection);
    }

    /// The saved detection if it is still within its staleness window.
    ///
    /// Past the window the overlay is suppressed but the detection is kept;
    /// a later successful detection re-arms the tracker.
    pub fn displayable(&self, now: Instant) -> Option<&TrackedDetection> {
        let det = self.saved.as_ref()?;
        if now.duration_since(det.last_seen) < self.staleness {
            Some(det)
        } else {
            None
        }
    }

    /// The saved detection regardless of staleness.
    pub fn saved(&self) -> Option<&TrackedDetection> {
        self.saved.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mark;

    fn detection(at: Instant) -> TrackedDetection {
        TrackedDetection {
            board: BoardState::empty(),
            outer_quad: Quad::canonicalize(&[
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 90.0),
                Point2::new(90.0, 90.0),
                Point2::new(90.0, 0.0),
            ]),
            cell_contours: vec![Vec::new(); 9],
            canonical_size: (100, 100),
            suggestion: SuggestedMove {
                cell: 4,
                mark: Mark::X,
            },
            last_seen: at,
        }
    }

    #[test]
    fn overlay_visible_within_window_and_suppressed_after() {
        let t0 = Instant::now();
        let mut tracker = BoardTracker::new(Duration::from_millis(500));
        tracker.accept(detection(t0));

        // Detection dropouts through t=0.4s: still visible.
        for ms in [1u64, 100, 250, 400] {
            assert!(tracker.displayable(t0 + Duration::from_millis(ms)).is_some());
        }
        // By t=0.6s the overlay is suppressed.
        assert!(tracker.displayable(t0 + Duration::from_millis(600)).is_none());
        // But the detection itself is retained.
        assert!(tracker.saved().is_some());
    }

    #[test]
    fn fresh_detection_rearms_a_stale_tracker() {
        let t0 = Instant::now();
        let mut tracker = BoardTracker::new(Duration::from_millis(500));
        tracker.accept(detection(t0));

        let later = t0 + Duration::from_secs(5);
        assert!(tracker.displayable(later).is_none());

        tracker.accept(detection(later));
        assert!(tracker
            .displayable(later + Duration::from_millis(100))
            .is_some());
    }

    #[test]
    fn empty_tracker_displays_nothing() {
        let tracker = BoardTracker::new(Duration::from_millis(500));
        assert!(tracker.displayable(Instant::now()).is_none());
    }
}
