//! Drag trajectory types.
//!
//! A trajectory is a motion phase that walks the pointer to the target
//! displacement, followed by a settle phase that holds it there.

use serde::{Deserialize, Serialize};

/// One sample of a synthesized drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Cumulative horizontal displacement (px).
    pub x: u32,
    /// Momentary vertical tremor (px), not cumulative.
    pub y: i32,
    /// Cumulative elapsed time (ms).
    pub t: u64,
}

impl TrackPoint {
    pub fn new(x: u32, y: i32, t: u64) -> Self {
        Self { x, y, t }
    }
}

/// Which segment of a trajectory a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackPhase {
    Motion,
    Settle,
}

/// An ordered drag: motion points followed by settle points.
///
/// Serializes as a bare array of points; the phase boundary is kept only
/// in memory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    points: Vec<TrackPoint>,
    #[serde(skip)]
    motion_len: usize,
}

impl Trajectory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            motion_len: 0,
        }
    }

    /// Append a point to the given phase.
    ///
    /// Motion points must all precede settle points.
    pub fn push(&mut self, phase: TrackPhase, point: TrackPoint) {
        match phase {
            TrackPhase::Motion => {
                debug_assert_eq!(self.motion_len, self.points.len());
                self.motion_len += 1;
            }
            TrackPhase::Settle => {}
        }
        self.points.push(point);
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn motion(&self) -> &[TrackPoint] {
        &self.points[..self.motion_len]
    }

    pub fn settle(&self) -> &[TrackPoint] {
        &self.points[self.motion_len..]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&TrackPoint> {
        self.points.last()
    }

    /// Final cumulative displacement, 0 for an empty trajectory.
    pub fn final_x(&self) -> u32 {
        self.points.last().map_or(0, |p| p.x)
    }

    /// Total elapsed time, 0 for an empty trajectory.
    pub fn duration_ms(&self) -> u64 {
        self.points.last().map_or(0, |p| p.t)
    }

    /// Whether `x` never decreases and `t` strictly increases.
    pub fn is_well_ordered(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[1].x >= w[0].x && w[1].t > w[0].t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        let mut trajectory = Trajectory::default();
        trajectory.push(TrackPhase::Motion, TrackPoint::new(7, 2, 20));
        trajectory.push(TrackPhase::Motion, TrackPoint::new(12, -1, 45));
        trajectory.push(TrackPhase::Settle, TrackPoint::new(12, 0, 60));
        trajectory
    }

    #[test]
    fn test_phase_split() {
        let trajectory = sample();
        assert_eq!(trajectory.motion().len(), 2);
        assert_eq!(trajectory.settle().len(), 1);
        assert_eq!(trajectory.final_x(), 12);
        assert_eq!(trajectory.duration_ms(), 60);
        assert!(trajectory.is_well_ordered());
    }

    #[test]
    fn test_serializes_as_point_array() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"[{"x":7,"y":2,"t":20},{"x":12,"y":-1,"t":45},{"x":12,"y":0,"t":60}]"#
        );
    }

    #[test]
    fn test_repeated_time_is_not_well_ordered() {
        let mut trajectory = Trajectory::default();
        trajectory.push(TrackPhase::Motion, TrackPoint::new(5, 0, 10));
        trajectory.push(TrackPhase::Settle, TrackPoint::new(5, 0, 10));
        assert!(!trajectory.is_well_ordered());
    }

    #[test]
    fn test_empty_trajectory() {
        let trajectory = Trajectory::default();
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.final_x(), 0);
        assert!(trajectory.motion().is_empty());
        assert!(trajectory.settle().is_empty());
    }
}
