use std::sync::Arc;

use crate::{drawing::DrawingTrail, figure::Figure};

/// Seconds a figure takes to fade from fully opaque to removed.
pub const FADE_TAIL_SECONDS: f64 = 2.0;

/// Cheap, immutable view of the store at one instant.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub figures: Arc<Vec<Figure>>,
    pub trails: Arc<Vec<DrawingTrail>>,
}

/// Canonical collections of live figures and drawing trails.
///
/// Collections sit behind `Arc` and are replaced wholesale (or cloned on write)
/// so a snapshot handed out earlier never observes a half-applied update.
#[derive(Debug)]
pub struct EntityStore {
    figures: Arc<Vec<Figure>>,
    trails: Arc<Vec<DrawingTrail>>,
    max_figures: usize,
}

impl EntityStore {
    pub fn new(max_figures: usize) -> Self {
        Self {
            figures: Arc::new(Vec::new()),
            trails: Arc::new(Vec::new()),
            max_figures,
        }
    }

    pub fn max_figures(&self) -> usize {
        self.max_figures
    }

    /// Changes the cap and evicts immediately if the population is above it.
    pub fn set_max_figures(&mut self, max_figures: usize) {
        self.max_figures = max_figures;
        if self.figures.len() > max_figures {
            let figures = Arc::make_mut(&mut self.figures);
            evict_oldest(figures, max_figures);
        }
    }

    /// Appends a figure, evicting the oldest entries once over the cap.
    pub fn add_figure(&mut self, figure: Figure) {
        let figures = Arc::make_mut(&mut self.figures);
        figures.push(figure);
        evict_oldest(figures, self.max_figures);
    }

    /// Live figures in insertion order, optionally restricted to one surface.
    pub fn current_figures(&self, surface: Option<usize>) -> Vec<Figure> {
        match surface {
            Some(surface) => self
                .figures
                .iter()
                .filter(|figure| figure.surface == surface)
                .cloned()
                .collect(),
            None => self.figures.as_ref().clone(),
        }
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// Fades figures older than `fade_after` and drops those past the tail.
    pub fn age_step(&mut self, now: f64, fade_after: f64) {
        let before = self.figures.len();
        let aged: Vec<Figure> = self
            .figures
            .iter()
            .filter_map(|figure| {
                let age = now - figure.created_at;
                if age > fade_after + FADE_TAIL_SECONDS {
                    return None;
                }

                let mut figure = figure.clone();
                if age > fade_after {
                    let opacity = 1.0 - (age - fade_after) / FADE_TAIL_SECONDS;
                    figure.set_opacity(opacity.max(0.0));
                }
                Some(figure)
            })
            .collect();

        let removed = before - aged.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = aged.len(), "faded figures removed");
        }
        self.figures = Arc::new(aged);
    }

    /// Replaces every trail with the drawing subsystem's current set.
    pub fn set_trails(&mut self, trails: Vec<DrawingTrail>) {
        self.trails = Arc::new(trails);
    }

    pub fn trails(&self) -> &[DrawingTrail] {
        &self.trails
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            figures: Arc::clone(&self.figures),
            trails: Arc::clone(&self.trails),
        }
    }
}

fn evict_oldest(figures: &mut Vec<Figure>, max_figures: usize) {
    if figures.len() > max_figures {
        let overflow = figures.len() - max_figures;
        figures.drain(0..overflow);
        tracing::debug!(overflow, "evicted oldest figures");
    }
}
