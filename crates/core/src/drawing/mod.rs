use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::figure::Point;

/// Samples closer than this to the previous point are dropped.
const MIN_POINT_DIST_SQ: f64 = 9.0;
/// Oldest points fall off a trail beyond this length.
const MAX_TRAIL_POINTS: usize = 512;
/// Oldest trails are forgotten beyond this count.
const MAX_TRAILS: usize = 64;

/// One freehand stroke on one surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingTrail {
    pub surface: usize,
    pub points: Vec<Point>,
    /// Session time of the most recent sample.
    pub last_sample_at: f64,
    pub closed: bool,
}

impl DrawingTrail {
    pub fn new(surface: usize, start: Point, now: f64) -> Self {
        Self {
            surface,
            points: vec![start],
            last_sample_at: now,
            closed: false,
        }
    }

    fn push(&mut self, point: Point, now: f64) -> bool {
        self.last_sample_at = now;
        if !should_append_point(self.points.last().copied(), point) {
            return false;
        }

        self.points.push(point);
        if self.points.len() > MAX_TRAIL_POINTS {
            let overflow = self.points.len() - MAX_TRAIL_POINTS;
            self.points.drain(0..overflow);
        }
        true
    }
}

/// Owns every trail and the open stroke per surface.
#[derive(Debug, Default)]
pub struct DrawingBoard {
    trails: Vec<DrawingTrail>,
    open: HashMap<usize, usize>,
}

impl DrawingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pointer sample, starting a new trail if none is open on `surface`.
    /// Returns whether the visible trail set changed.
    pub fn record_point(&mut self, surface: usize, point: Point, now: f64) -> bool {
        if let Some(&index) = self.open.get(&surface) {
            return self.trails[index].push(point, now);
        }

        self.trails.push(DrawingTrail::new(surface, point, now));
        self.open.insert(surface, self.trails.len() - 1);
        self.enforce_trail_limit();
        true
    }

    /// Closes every open trail. The next sample on any surface starts afresh.
    pub fn end_drawing(&mut self) -> bool {
        if self.open.is_empty() {
            return false;
        }

        for (_, index) in self.open.drain() {
            self.trails[index].closed = true;
        }
        true
    }

    /// Drops trails that belong to surfaces that no longer exist.
    pub fn retain_surfaces(&mut self, surface_count: usize) -> bool {
        let before = self.trails.len();
        self.trails.retain(|trail| trail.surface < surface_count);
        if self.trails.len() == before {
            return false;
        }
        self.reindex_open();
        true
    }

    pub fn trails(&self) -> &[DrawingTrail] {
        &self.trails
    }

    pub fn is_drawing(&self, surface: usize) -> bool {
        self.open.contains_key(&surface)
    }

    fn enforce_trail_limit(&mut self) {
        if self.trails.len() <= MAX_TRAILS {
            return;
        }

        let overflow = self.trails.len() - MAX_TRAILS;
        self.trails.drain(0..overflow);
        self.reindex_open();
    }

    fn reindex_open(&mut self) {
        self.open = self
            .trails
            .iter()
            .enumerate()
            .filter(|(_, trail)| !trail.closed)
            .map(|(index, trail)| (trail.surface, index))
            .collect();
    }
}

fn should_append_point(last: Option<Point>, point: Point) -> bool {
    let Some(last) = last else {
        return true;
    };

    last.distance_squared(point) >= MIN_POINT_DIST_SQ
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_extend_the_open_trail() {
        let mut board = DrawingBoard::new();
        board.record_point(0, Point::new(10.0, 10.0), 0.0);
        board.record_point(0, Point::new(10.0, 11.0), 0.1);
        board.record_point(0, Point::new(20.0, 20.0), 0.2);

        assert_eq!(board.trails().len(), 1);
        assert_eq!(board.trails()[0].points.len(), 2);
        assert_eq!(board.trails()[0].last_sample_at, 0.2);
    }

    #[test]
    fn end_drawing_starts_a_new_trail_on_next_sample() {
        let mut board = DrawingBoard::new();
        board.record_point(0, Point::new(0.0, 0.0), 0.0);
        board.record_point(0, Point::new(50.0, 0.0), 0.1);
        assert!(board.end_drawing());
        assert!(!board.end_drawing());

        board.record_point(0, Point::new(100.0, 100.0), 0.5);

        assert_eq!(board.trails().len(), 2);
        assert!(board.trails()[0].closed);
        assert!(!board.trails()[1].closed);
        assert!(board.is_drawing(0));
    }

    #[test]
    fn each_surface_keeps_its_own_trail() {
        let mut board = DrawingBoard::new();
        board.record_point(0, Point::new(0.0, 0.0), 0.0);
        board.record_point(1, Point::new(0.0, 0.0), 0.0);
        board.record_point(0, Point::new(40.0, 0.0), 0.1);

        assert_eq!(board.trails().len(), 2);
        assert_eq!(board.trails()[0].points.len(), 2);
        assert_eq!(board.trails()[1].points.len(), 1);
    }

    #[test]
    fn long_strokes_keep_only_recent_points() {
        let mut board = DrawingBoard::new();
        for step in 0..(MAX_TRAIL_POINTS + 10) {
            board.record_point(0, Point::new(step as f64 * 5.0, 0.0), step as f64);
        }

        let trail = &board.trails()[0];
        assert_eq!(trail.points.len(), MAX_TRAIL_POINTS);
        assert_eq!(trail.points[0], Point::new(50.0, 0.0));
    }

    #[test]
    fn trail_count_is_capped_and_open_trail_survives() {
        let mut board = DrawingBoard::new();
        for stroke in 0..MAX_TRAILS {
            board.record_point(0, Point::new(stroke as f64, 0.0), 0.0);
            board.end_drawing();
        }
        board.record_point(1, Point::new(0.0, 0.0), 1.0);

        assert_eq!(board.trails().len(), MAX_TRAILS);
        assert!(board.is_drawing(1));
        board.record_point(1, Point::new(30.0, 0.0), 1.1);
        assert_eq!(board.trails().last().unwrap().points.len(), 2);
    }

    #[test]
    fn removed_surfaces_drop_their_trails() {
        let mut board = DrawingBoard::new();
        board.record_point(0, Point::new(0.0, 0.0), 0.0);
        board.record_point(2, Point::new(0.0, 0.0), 0.0);

        assert!(board.retain_surfaces(1));
        assert_eq!(board.trails().len(), 1);
        assert!(board.is_drawing(0));
        assert!(!board.is_drawing(2));
    }
}
