//! Presentation adapter
//!
//! Turns read-only frame snapshots into drawable geometry and text. Nothing
//! here touches the simulation.

pub mod ascii;
pub mod hud;
pub mod shapes;

pub use ascii::render;
pub use hud::hud_lines;
pub use shapes::{WRAP_MARGIN, draw_positions, wrap_ghosts};
