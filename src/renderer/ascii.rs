//! Text frame for headless runs
//!
//! Rasterizes a [`FrameView`] onto a character grid. Shapes near an edge are
//! drawn again at their wrap ghosts and everything is clipped to the arena,
//! so anything crossing a seam shows up on both sides.

use glam::Vec2;

use super::hud::hud_lines;
use super::shapes::{draw_positions, fragment_outline, ship_bright, ship_flame, ship_hull};
use crate::sim::{Arena, FrameView};

const EMPTY: char = ' ';
const FRAGMENT_EDGE: char = '*';
const PROJECTILE: char = '.';
const FLAME: char = '~';
const SHIP: char = 'A';
const SHIP_DIM: char = 'a';

struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
}

impl Grid {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![EMPTY; cols * rows],
        }
    }

    /// Points outside the arena are dropped
    fn plot(&mut self, arena: &Arena, pos: Vec2, ch: char) {
        if !arena.contains(pos) {
            return;
        }
        let col = ((pos.x / arena.width) * self.cols as f32) as usize;
        let row = ((pos.y / arena.height) * self.rows as f32) as usize;
        let (col, row) = (col.min(self.cols - 1), row.min(self.rows - 1));
        self.cells[row * self.cols + col] = ch;
    }

    fn into_string(self) -> String {
        let mut out = String::with_capacity((self.cols + 3) * (self.rows + 2));
        let border = format!("+{}+\n", "-".repeat(self.cols));
        out.push_str(&border);
        for row in self.cells.chunks(self.cols) {
            out.push('|');
            out.extend(row);
            out.push_str("|\n");
        }
        out.push_str(&border);
        out
    }
}

/// Draw the frame into a `cols` x `rows` box followed by the HUD lines.
/// Returns an empty string for a zero-sized grid.
pub fn render(frame: &FrameView, cols: usize, rows: usize) -> String {
    if cols == 0 || rows == 0 {
        return String::new();
    }
    let arena = &frame.arena;
    let mut grid = Grid::new(cols, rows);

    for fragment in &frame.fragments {
        for center in draw_positions(fragment.pos, arena) {
            for v in fragment_outline(fragment, center) {
                grid.plot(arena, v, FRAGMENT_EDGE);
            }
        }
    }
    // Points, so a ghost copy would always be clipped
    for projectile in &frame.projectiles {
        grid.plot(arena, projectile.pos, PROJECTILE);
    }
    if !frame.game_over {
        let ship = &frame.ship;
        let ch = if ship_bright(ship) { SHIP } else { SHIP_DIM };
        for center in draw_positions(ship.pos, arena) {
            if let Some(flame) = ship_flame(ship, center) {
                grid.plot(arena, flame[1], FLAME);
            }
            for v in ship_hull(ship, center) {
                grid.plot(arena, v, ch);
            }
            grid.plot(arena, center, ch);
        }
    }

    let mut out = grid.into_string();
    for line in hud_lines(frame) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
