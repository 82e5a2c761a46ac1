use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    config::DisplayMode,
    figure::{Point, Size},
};

/// Keep spawned figures at least this far from every surface edge.
pub const SPAWN_MARGIN: f64 = 150.0;

/// One render target as reported by the window layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceInfo {
    pub index: usize,
    pub size: Size,
}

/// Enumerates the active physical displays.
pub trait TopologyProvider: Send {
    /// Every active surface, primary first.
    fn active_surfaces(&self) -> Vec<SurfaceInfo>;
}

/// Fixed topology, handy for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTopology {
    surfaces: Vec<SurfaceInfo>,
}

impl StaticTopology {
    pub fn new(sizes: impl IntoIterator<Item = Size>) -> Self {
        Self {
            surfaces: sizes
                .into_iter()
                .enumerate()
                .map(|(index, size)| SurfaceInfo { index, size })
                .collect(),
        }
    }
}

impl TopologyProvider for StaticTopology {
    fn active_surfaces(&self) -> Vec<SurfaceInfo> {
        self.surfaces.clone()
    }
}

/// Surfaces that may receive keyboard-spawned figures under `mode`.
pub fn eligible_surfaces(
    mode: DisplayMode,
    selected: usize,
    provider: &dyn TopologyProvider,
) -> Vec<usize> {
    eligible_from(mode, selected, &provider.active_surfaces())
}

fn eligible_from(mode: DisplayMode, selected: usize, surfaces: &[SurfaceInfo]) -> Vec<usize> {
    if surfaces.is_empty() {
        return Vec::new();
    }

    match mode {
        DisplayMode::All => surfaces.iter().map(|surface| surface.index).collect(),
        DisplayMode::Primary => vec![surfaces[0].index],
        DisplayMode::Selected => {
            let clamped = selected.min(surfaces.len() - 1);
            vec![surfaces[clamped].index]
        }
    }
}

/// Picks the surface for a keyboard spawn. Never fails: no surfaces means 0.
pub fn resolve_target<R: Rng>(
    mode: DisplayMode,
    selected: usize,
    provider: &dyn TopologyProvider,
    rng: &mut R,
) -> usize {
    pick_surface(&eligible_surfaces(mode, selected, provider), rng)
}

pub fn pick_surface<R: Rng>(eligible: &[usize], rng: &mut R) -> usize {
    match eligible.len() {
        0 => 0,
        1 => eligible[0],
        len => eligible[rng.gen_range(0..len)],
    }
}

/// Uniform point inside the spawn margin of a surface.
///
/// A dimension too small to fit the margin on both sides yields its midpoint.
pub fn random_position<R: Rng>(size: Size, rng: &mut R) -> Point {
    Point::new(
        random_axis(size.width, rng),
        random_axis(size.height, rng),
    )
}

fn random_axis<R: Rng>(len: f64, rng: &mut R) -> f64 {
    let len = if len.is_finite() { len.max(0.0) } else { 0.0 };
    if len < 2.0 * SPAWN_MARGIN + 1.0 {
        return len / 2.0;
    }
    rng.gen_range(SPAWN_MARGIN..=len - SPAWN_MARGIN)
}

/// Cached view of the eligible surfaces plus lazily recorded surface sizes.
#[derive(Debug, Default)]
pub struct SurfaceTopology {
    surfaces: Vec<SurfaceInfo>,
    eligible: Vec<usize>,
    recorded: HashMap<usize, Size>,
}

impl SurfaceTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-enumerates surfaces after a topology or display mode change.
    pub fn refresh(&mut self, mode: DisplayMode, selected: usize, provider: &dyn TopologyProvider) {
        self.surfaces = provider.active_surfaces();
        self.eligible = eligible_from(mode, selected, &self.surfaces);
        if self.eligible.is_empty() {
            tracing::warn!("no display surfaces available, falling back to surface 0");
        }
        tracing::debug!(
            surfaces = self.surfaces.len(),
            eligible = ?self.eligible,
            ?mode,
            "surface topology resolved"
        );
    }

    pub fn eligible(&self) -> &[usize] {
        &self.eligible
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn record_size(&mut self, surface: usize, size: Size) {
        self.recorded.insert(surface, size);
    }

    /// Last recorded size, then the enumerated size, then zero.
    pub fn size_of(&self, surface: usize) -> Size {
        self.recorded
            .get(&surface)
            .copied()
            .or_else(|| {
                self.surfaces
                    .iter()
                    .find(|info| info.index == surface)
                    .map(|info| info.size)
            })
            .unwrap_or(Size::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn topology(count: usize) -> StaticTopology {
        StaticTopology::new((0..count).map(|_| Size::new(1920.0, 1080.0)))
    }

    #[test]
    fn selected_index_is_clamped() {
        let provider = topology(2);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(eligible_surfaces(DisplayMode::Selected, 2, &provider), vec![1]);
        assert_eq!(
            resolve_target(DisplayMode::Selected, 2, &provider, &mut rng),
            1
        );
    }

    #[test]
    fn primary_and_all_modes() {
        let provider = topology(3);
        assert_eq!(eligible_surfaces(DisplayMode::Primary, 2, &provider), vec![0]);
        assert_eq!(
            eligible_surfaces(DisplayMode::All, 0, &provider),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn empty_topology_falls_back_to_surface_zero() {
        let provider = topology(0);
        let mut rng = StdRng::seed_from_u64(7);

        for mode in [DisplayMode::All, DisplayMode::Primary, DisplayMode::Selected] {
            assert!(eligible_surfaces(mode, 4, &provider).is_empty());
            assert_eq!(resolve_target(mode, 4, &provider, &mut rng), 0);
        }
    }

    #[test]
    fn all_mode_reaches_every_surface() {
        let provider = topology(3);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 3];

        for _ in 0..200 {
            seen[resolve_target(DisplayMode::All, 0, &provider, &mut rng)] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn positions_respect_the_margin() {
        let mut rng = StdRng::seed_from_u64(3);
        let size = Size::new(800.0, 600.0);

        for _ in 0..500 {
            let point = random_position(size, &mut rng);
            assert!((SPAWN_MARGIN..=size.width - SPAWN_MARGIN).contains(&point.x));
            assert!((SPAWN_MARGIN..=size.height - SPAWN_MARGIN).contains(&point.y));
        }
    }

    #[test]
    fn tiny_surfaces_yield_the_midpoint() {
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(
            random_position(Size::new(200.0, 300.0), &mut rng),
            Point::new(100.0, 150.0)
        );
        assert_eq!(random_position(Size::ZERO, &mut rng), Point::new(0.0, 0.0));

        let mixed = random_position(Size::new(1000.0, 100.0), &mut rng);
        assert!((SPAWN_MARGIN..=850.0).contains(&mixed.x));
        assert_eq!(mixed.y, 50.0);
    }

    #[test]
    fn recorded_sizes_win_over_enumerated_sizes() {
        let provider = topology(2);
        let mut surfaces = SurfaceTopology::new();
        surfaces.refresh(DisplayMode::All, 0, &provider);

        assert_eq!(surfaces.size_of(1), Size::new(1920.0, 1080.0));
        surfaces.record_size(1, Size::new(1280.0, 720.0));
        assert_eq!(surfaces.size_of(1), Size::new(1280.0, 720.0));
        assert_eq!(surfaces.size_of(9), Size::ZERO);
    }
}
