// overlay.rs - The "wrench": a coloured box swept across the grid after each generation

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::color::Rgba;
use crate::config::OverlayConfig;
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayStatus {
    /// Armed with a placement, not yet drawing.
    #[default]
    Fresh,
    Running,
    /// Finished its sweep; idle until rearmed.
    Stopped,
}

/// Where the next sweep goes and how big the box is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub y: usize,
    pub box_height: usize,
    pub box_width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayState {
    pub y: usize,
    /// Horizontal scroll offset of the box.
    pub progress: usize,
    pub status: OverlayStatus,
    pub step_size: usize,
    pub box_height: usize,
    pub box_width: usize,
    pub color: Rgba,
    pub text: Option<String>,
    /// Character of `text` being typed by the current sweep.
    pub text_index: usize,
}

impl OverlayState {
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self {
            y: 0,
            progress: 0,
            status: OverlayStatus::Fresh,
            step_size: config.step_size,
            box_height: config.box_height.min,
            box_width: config.box_width.min,
            color: config.color,
            text: config.text.clone(),
            text_index: 0,
        }
    }

    /// Character count in text mode; `None` when there is no (or empty) text.
    pub fn text_len(&self) -> Option<usize> {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| t.chars().count())
    }

    pub fn current_char(&self) -> Option<char> {
        self.text.as_deref()?.chars().nth(self.text_index)
    }

    /// Advances the state machine by one generation and stamps onto `grid`.
    pub fn tick(&mut self, grid: &mut Grid) {
        let width = grid.width();
        let text_len = self.text_len();

        if self.status == OverlayStatus::Fresh {
            self.status = OverlayStatus::Running;
            debug!(y = self.y, "wrench running");
        }

        let text_done = text_len.is_none_or(|len| self.text_index >= len);
        if self.progress >= width && text_done {
            if self.status != OverlayStatus::Stopped {
                debug!(y = self.y, "wrench stopped");
            }
            self.status = OverlayStatus::Stopped;
            self.progress = 0;
            self.text_index = 0;
        }

        if self.status == OverlayStatus::Running {
            if text_len.is_some() && self.progress >= width {
                self.progress = 0;
                self.text_index += 1;
                debug!(text_index = self.text_index, "wrench typing next character");
            }
            self.stamp(grid);
            self.progress += self.step_size;
        }
    }

    /// Fills the box at (progress, y). Only the buffer length bounds the write, so a
    /// box hanging off the right edge continues at the start of the next row.
    fn stamp(&self, grid: &mut Grid) {
        let width = grid.width();
        let cells = grid.cells_mut();
        let len = cells.len();
        for h in 0..self.box_height {
            let row_start = (self.y + h) * width + self.progress;
            for w in 0..self.box_width {
                let index = row_start + w;
                if index < len {
                    cells[index] = self.color;
                }
            }
        }
    }

    fn apply(&mut self, placement: Placement) {
        self.y = placement.y;
        self.box_height = placement.box_height;
        self.box_width = placement.box_width;
        self.status = OverlayStatus::Fresh;
    }
}

/// Shared handle to the overlay record. Every check-and-mutate sequence runs
/// under a single lock acquisition.
#[derive(Debug, Clone)]
pub struct Overlay {
    state: Arc<Mutex<OverlayState>>,
}

impl Overlay {
    pub fn new(state: OverlayState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(OverlayState::from_config(config))
    }

    fn lock(&self) -> MutexGuard<'_, OverlayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn tick(&self, grid: &mut Grid) {
        self.lock().tick(grid);
    }

    /// Rearms the overlay unless a sweep is in progress. `place` is only called
    /// when the rearm goes ahead.
    pub fn rearm_with<F>(&self, place: F) -> Option<Placement>
    where
        F: FnOnce(&OverlayState) -> Placement,
    {
        let mut state = self.lock();
        if state.status == OverlayStatus::Running {
            return None;
        }
        let placement = place(&state);
        state.apply(placement);
        Some(placement)
    }

    pub fn status(&self) -> OverlayStatus {
        self.lock().status
    }

    pub fn snapshot(&self) -> OverlayState {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;
    use crate::config::SizeRange;

    const RED: Rgba = Rgba::opaque(250, 50, 0);

    fn state(step_size: usize, box_height: usize, box_width: usize) -> OverlayState {
        OverlayState::from_config(&OverlayConfig {
            step_size,
            box_height: SizeRange::fixed(box_height),
            box_width: SizeRange::fixed(box_width),
            color: RED,
            text: None,
            interval_ms: 5_000,
        })
    }

    fn grid(width: usize, height: usize) -> Grid {
        Grid::new(width, height, Palette::default()).unwrap()
    }

    #[test]
    fn first_tick_promotes_and_stamps() {
        let mut g = grid(10, 10);
        let mut s = state(1, 2, 2);
        s.y = 3;

        s.tick(&mut g);

        assert_eq!(s.status, OverlayStatus::Running);
        assert_eq!(s.progress, 1);
        assert_eq!(g.get(0, 3), Some(RED));
        assert_eq!(g.get(1, 4), Some(RED));
        assert_eq!(g.population(), 4);
    }

    #[test]
    fn sweep_stops_after_crossing_the_width() {
        let mut g = grid(10, 5);
        let mut s = state(3, 1, 1);

        let mut ticks = 0;
        while s.status != OverlayStatus::Stopped {
            s.tick(&mut g);
            ticks += 1;
            assert!(ticks < 100);
        }

        // Stamps at 0, 3, 6, 9, then the fifth tick notices progress 12 >= 10
        assert_eq!(ticks, 5);
        assert_eq!(s.progress, 0);
        for x in [0, 3, 6, 9] {
            assert_eq!(g.get(x, 0), Some(RED));
        }
    }

    #[test]
    fn progress_advances_by_step_size() {
        let mut g = grid(100, 5);
        let mut s = state(4, 1, 1);
        for n in 1..=5 {
            s.tick(&mut g);
            assert_eq!(s.progress, 4 * n);
            assert_eq!(s.status, OverlayStatus::Running);
        }
    }

    #[test]
    fn stopped_overlay_is_idle() {
        let mut g = grid(4, 4);
        let mut s = state(4, 1, 1);
        s.tick(&mut g);
        s.tick(&mut g);
        assert_eq!(s.status, OverlayStatus::Stopped);

        let mut fresh = grid(4, 4);
        s.tick(&mut fresh);
        assert_eq!(fresh.population(), 0);
        assert_eq!(s.status, OverlayStatus::Stopped);
    }

    #[test]
    fn text_mode_types_one_character_per_sweep() {
        let mut g = grid(4, 4);
        let mut s = state(2, 1, 1);
        s.text = Some("AB".to_string());

        let mut indices = Vec::new();
        while s.status != OverlayStatus::Stopped {
            s.tick(&mut g);
            indices.push(s.text_index);
            assert!(indices.len() < 100);
        }

        // Sweep 'A' (index 0), sweep 'B' (index 1), a final sweep at index 2, then stop
        assert_eq!(indices, vec![0, 0, 1, 1, 2, 2, 0]);
        assert_eq!(s.progress, 0);
    }

    #[test]
    fn text_sweep_resets_progress_and_advances_pointer() {
        let mut g = grid(4, 4);
        let mut s = state(4, 1, 1);
        s.text = Some("xyz".to_string());

        s.tick(&mut g);
        assert_eq!((s.progress, s.text_index), (4, 0));
        assert_eq!(s.current_char(), Some('x'));
        s.tick(&mut g);
        assert_eq!((s.progress, s.text_index), (4, 1));
        assert_eq!(s.current_char(), Some('y'));
        assert_eq!(s.status, OverlayStatus::Running);
    }

    #[test]
    fn empty_text_behaves_like_plain_box() {
        let mut s = state(1, 1, 1);
        s.text = Some(String::new());
        assert_eq!(s.text_len(), None);
    }

    #[test]
    fn stamp_never_writes_past_the_buffer() {
        let mut g = grid(6, 6);
        let mut s = state(1, 15, 3);
        s.y = 5;
        s.tick(&mut g);
        assert_eq!(g.population(), 3);
    }

    #[test]
    fn box_overhanging_the_right_edge_wraps_to_next_row() {
        let mut g = grid(4, 4);
        let mut s = state(1, 1, 3);
        s.progress = 3;
        s.status = OverlayStatus::Running;
        s.tick(&mut g);
        assert_eq!(g.get(3, 0), Some(RED));
        assert_eq!(g.get(0, 1), Some(RED));
        assert_eq!(g.get(1, 1), Some(RED));
    }

    #[test]
    fn stamp_overwrites_live_cells() {
        let palette = Palette::default();
        let mut g = grid(4, 4);
        g.set(0, 0, palette.alive);
        let mut s = state(1, 1, 1);
        s.tick(&mut g);
        assert_eq!(g.get(0, 0), Some(RED));
    }

    #[test]
    fn rearm_skips_a_running_sweep() {
        let overlay = Overlay::new(state(1, 1, 1));
        let mut g = grid(8, 8);
        overlay.tick(&mut g);
        let before = overlay.snapshot();

        let placement = overlay.rearm_with(|_| Placement {
            y: 7,
            box_height: 2,
            box_width: 2,
        });

        assert_eq!(placement, None);
        assert_eq!(overlay.snapshot(), before);
    }

    #[test]
    fn rearm_after_stop_makes_it_fresh() {
        let overlay = Overlay::new(state(8, 1, 1));
        let mut g = grid(8, 8);
        overlay.tick(&mut g);
        overlay.tick(&mut g);
        assert_eq!(overlay.status(), OverlayStatus::Stopped);

        let placement = overlay.rearm_with(|_| Placement {
            y: 5,
            box_height: 2,
            box_width: 4,
        });

        assert!(placement.is_some());
        let s = overlay.snapshot();
        assert_eq!(s.status, OverlayStatus::Fresh);
        assert_eq!((s.y, s.box_height, s.box_width), (5, 2, 4));
        assert_eq!(s.progress, 0);
    }
}
