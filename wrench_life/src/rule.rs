// rule.rs - Moore neighbourhood evaluation and Conway's rule

use serde::{Deserialize, Serialize};

use crate::color::{Palette, Rgba};
use crate::grid::Grid;

/// Colour given to cells that are alive in the next generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Always the palette's alive colour.
    #[default]
    Fixed,
    /// Average of the live neighbours' colours.
    Emergent,
}

impl ColorMode {
    pub fn cell_color(self, palette: &Palette, neighbourhood: &Neighbourhood) -> Rgba {
        match self {
            ColorMode::Fixed => palette.alive,
            ColorMode::Emergent => neighbourhood.color,
        }
    }
}

/// Live neighbour count and their averaged colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbourhood {
    pub count: u8,
    pub color: Rgba,
}

/// Evaluates the 8 cells around (x, y). Edges do not wrap.
///
/// The colour sums start from the alive colour's channels and are divided by the
/// live count when it is non-zero, so an empty neighbourhood yields the alive
/// colour itself. Channels are narrowed to `u8` by truncation.
pub fn neighbourhood(grid: &Grid, x: usize, y: usize) -> Neighbourhood {
    let palette = grid.palette();
    let (width, height) = (grid.width(), grid.height());
    let cells = grid.cells();

    let mut count: u32 = 0;
    let mut r = u32::from(palette.alive.r);
    let mut g = u32::from(palette.alive.g);
    let mut b = u32::from(palette.alive.b);

    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
            else {
                continue;
            };
            if nx >= width || ny >= height {
                continue;
            }
            let cell = cells[ny * width + nx];
            if palette.is_alive(cell) {
                count += 1;
                r += u32::from(cell.r);
                g += u32::from(cell.g);
                b += u32::from(cell.b);
            }
        }
    }

    if count > 0 {
        r /= count;
        g /= count;
        b /= count;
    }

    Neighbourhood {
        count: count as u8,
        color: Rgba::new(r as u8, g as u8, b as u8, 255),
    }
}

/// Conway's B3/S23 rule.
#[inline]
pub fn survives(alive: bool, count: u8) -> bool {
    match (alive, count) {
        (true, 2) | (true, 3) => true, // Survival
        (false, 3) => true,            // Birth
        _ => false,                    // Death or stays dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize, palette: Palette) -> Grid {
        Grid::new(width, height, palette).unwrap()
    }

    #[test]
    fn corner_has_at_most_three_neighbours() {
        let palette = Palette::default();
        let mut g = grid(4, 4, palette);
        g.cells_mut().fill(palette.alive);

        assert_eq!(neighbourhood(&g, 0, 0).count, 3);
        assert_eq!(neighbourhood(&g, 3, 3).count, 3);
        assert_eq!(neighbourhood(&g, 1, 0).count, 5);
        assert_eq!(neighbourhood(&g, 1, 1).count, 8);
    }

    #[test]
    fn no_wraparound_across_edges() {
        let palette = Palette::default();
        let mut g = grid(5, 5, palette);
        g.set(4, 2, palette.alive);
        g.set(2, 4, palette.alive);
        assert_eq!(neighbourhood(&g, 0, 2).count, 0);
        assert_eq!(neighbourhood(&g, 2, 0).count, 0);
    }

    #[test]
    fn centre_cell_is_not_counted() {
        let palette = Palette::default();
        let mut g = grid(3, 3, palette);
        g.set(1, 1, palette.alive);
        assert_eq!(neighbourhood(&g, 1, 1).count, 0);
    }

    #[test]
    fn empty_neighbourhood_yields_alive_colour() {
        let palette = Palette::default();
        let g = grid(3, 3, palette);
        let n = neighbourhood(&g, 1, 1);
        assert_eq!(n.count, 0);
        assert_eq!(n.color, Rgba::opaque(60, 200, 40));
    }

    #[test]
    fn red_and_blue_average_to_purple() {
        let palette = Palette {
            background: Rgba::TRANSPARENT,
            alive: Rgba::opaque(0, 0, 0),
        };
        let mut g = grid(3, 3, palette);
        g.set(0, 1, Rgba::opaque(255, 0, 0));
        g.set(2, 1, Rgba::opaque(0, 0, 255));

        let n = neighbourhood(&g, 1, 1);
        assert_eq!(n.count, 2);
        assert_eq!(n.color, Rgba::new(127, 0, 127, 255));
    }

    #[test]
    fn average_is_seeded_with_alive_colour() {
        let palette = Palette::default();
        let mut g = grid(3, 3, palette);
        g.set(0, 0, Rgba::opaque(0, 0, 0));
        g.set(1, 0, Rgba::opaque(0, 0, 0));

        // (60 + 0 + 0) / 2, (200 + 0 + 0) / 2, (40 + 0 + 0) / 2
        assert_eq!(neighbourhood(&g, 1, 1).color, Rgba::opaque(30, 100, 20));
    }

    #[test]
    fn color_mode_picks_source() {
        let palette = Palette::default();
        let n = Neighbourhood {
            count: 3,
            color: Rgba::opaque(1, 2, 3),
        };
        assert_eq!(ColorMode::Fixed.cell_color(&palette, &n), palette.alive);
        assert_eq!(ColorMode::Emergent.cell_color(&palette, &n), Rgba::opaque(1, 2, 3));
    }

    #[test]
    fn conway_rule_table() {
        for count in 0..=8u8 {
            assert_eq!(survives(true, count), count == 2 || count == 3, "alive {count}");
            assert_eq!(survives(false, count), count == 3, "dead {count}");
        }
    }
}
