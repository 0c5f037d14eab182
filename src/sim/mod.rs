//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or audio dependencies

pub mod arena;
pub mod autopilot;
pub mod collision;
pub mod shared;
pub mod state;
pub mod tick;

pub use arena::Arena;
pub use collision::{circles_overlap, projectile_hits_fragment, ship_hits_fragment};
pub use shared::{FrameView, PulseView, SharedGame};
pub use state::{
    FRAGMENT_VERTICES, Fragment, FragmentTier, GameEvent, GamePhase, GameState, Projectile, Ship,
    generate_outline,
};
pub use tick::{TickInput, tick};
