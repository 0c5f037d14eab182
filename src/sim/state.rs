//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here. Gameplay randomness comes
//! from the seeded generator stored in [`GameState`], so a seed plus an input
//! sequence replays a run exactly.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::Arena;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Simulation frozen until pause is toggled again
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// Something that happened during the most recent tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ProjectileFired,
    /// Emitted at most every few ticks while thrust is held
    ThrustPulse,
    FragmentDestroyed { tier: FragmentTier, pos: Vec2 },
    ShipDestroyed { lives_left: u8 },
    GameOver { score: u32 },
    WaveStarted { fragments: u32 },
    Restarted,
}

/// The player's craft
#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians (0 = +x, y grows downward so -π/2 faces up)
    pub angle: f32,
    pub radius: f32,
    /// Presentation only
    pub thrusting: bool,
    pub lives: u8,
    pub invulnerable: bool,
    pub invuln_ticks: u32,
}

impl Ship {
    /// A fresh ship at the arena centre, facing up
    pub fn new(arena: &Arena) -> Self {
        Self {
            pos: arena.center(),
            vel: Vec2::ZERO,
            angle: -FRAC_PI_2,
            radius: SHIP_RADIUS,
            thrusting: false,
            lives: SHIP_START_LIVES,
            invulnerable: false,
            invuln_ticks: 0,
        }
    }

    /// Put the ship back at the centre with a grace period. Lives are kept.
    pub fn respawn(&mut self, arena: &Arena) {
        self.pos = arena.center();
        self.vel = Vec2::ZERO;
        self.angle = -FRAC_PI_2;
        self.thrusting = false;
        self.invulnerable = true;
        self.invuln_ticks = SHIP_INVULN_TICKS;
    }

    /// Count down the grace period by one tick
    pub fn tick_invulnerability(&mut self) {
        if self.invulnerable {
            self.invuln_ticks = self.invuln_ticks.saturating_sub(1);
            if self.invuln_ticks == 0 {
                self.invulnerable = false;
            }
        }
    }

    /// Where projectiles leave the hull
    pub fn nose(&self) -> Vec2 {
        self.pos + crate::heading_vector(self.angle) * self.radius * PROJECTILE_NOSE_OFFSET
    }
}

/// A shot fired by the ship
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left before the shot fizzles
    pub life: u32,
}

/// Fragment size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FragmentTier {
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl FragmentTier {
    pub fn value(self) -> u32 {
        self as u32
    }

    /// Tier of the pieces this one breaks into
    pub fn child(self) -> Option<Self> {
        match self {
            FragmentTier::Large => Some(FragmentTier::Medium),
            FragmentTier::Medium => Some(FragmentTier::Small),
            FragmentTier::Small => None,
        }
    }

    pub fn radius(self) -> f32 {
        FRAGMENT_RADIUS_PER_TIER * self.value() as f32
    }

    /// Score for destroying a fragment of this tier
    pub fn points(self) -> u32 {
        FRAGMENT_POINTS_PER_TIER * self.value()
    }
}

/// Number of vertices in a fragment outline
pub const FRAGMENT_VERTICES: usize = 8;

/// Build a jagged outline around the origin.
///
/// Vertex `i` sits at angle `i * 2π / 8` with its distance jittered to
/// 0.7..1.3 times `radius`.
pub fn generate_outline<R: Rng>(radius: f32, rng: &mut R) -> [Vec2; FRAGMENT_VERTICES] {
    std::array::from_fn(|i| {
        let a = TAU * i as f32 / FRAGMENT_VERTICES as f32;
        let r = radius * (0.7 + rng.random::<f32>() * 0.6);
        Vec2::new(r * a.cos(), r * a.sin())
    })
}

/// An asteroid
#[derive(Debug, Clone)]
pub struct Fragment {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rotation drift per tick (radians), rendering only
    pub spin: f32,
    /// Accumulated rotation, rendering only
    pub rotation: f32,
    tier: FragmentTier,
    outline: [Vec2; FRAGMENT_VERTICES],
}

impl Fragment {
    pub fn new<R: Rng>(id: u32, pos: Vec2, vel: Vec2, tier: FragmentTier, rng: &mut R) -> Self {
        let spin = (rng.random::<f32>() - 0.5) * 0.05;
        let outline = generate_outline(tier.radius(), rng);
        Self {
            id,
            pos,
            vel,
            spin,
            rotation: 0.0,
            tier,
            outline,
        }
    }

    pub fn tier(&self) -> FragmentTier {
        self.tier
    }

    /// Collision radius, always 15 x tier
    pub fn radius(&self) -> f32 {
        self.tier.radius()
    }

    /// Outline relative to the fragment centre, unrotated
    pub fn outline(&self) -> &[Vec2; FRAGMENT_VERTICES] {
        &self.outline
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub arena: Arena,
    pub phase: GamePhase,
    pub score: u32,
    pub ship: Ship,
    /// Live shots, oldest first
    pub projectiles: Vec<Projectile>,
    /// Live fragments, in spawn order
    pub fragments: Vec<Fragment>,
    /// Ticks until the gun is ready again
    pub fire_cooldown: u32,
    /// Ticks until the next thrust sound pulse
    pub thrust_sound_cooldown: u32,
    /// Running ticks simulated since start
    pub time_ticks: u64,
    /// Waves spawned this run (the opening wave is 1)
    pub waves: u32,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the opening wave already spawned
    pub fn new(seed: u64) -> Self {
        Self::with_arena(seed, Arena::default())
    }

    pub fn with_arena(seed: u64, arena: Arena) -> Self {
        let mut state = Self {
            seed,
            arena,
            phase: GamePhase::Running,
            score: 0,
            ship: Ship::new(&arena),
            projectiles: Vec::new(),
            fragments: Vec::new(),
            fire_cooldown: 0,
            thrust_sound_cooldown: 0,
            time_ticks: 0,
            waves: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.spawn_wave(BASE_WAVE_SIZE);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn lives(&self) -> u8 {
        self.ship.lives
    }

    /// 1 + one level per thousand points
    pub fn level(&self) -> u32 {
        1 + self.score / SCORE_PER_LEVEL
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Fragments in the next wave: the base size plus one per level gained
    pub fn next_wave_size(&self) -> u32 {
        BASE_WAVE_SIZE + self.score / SCORE_PER_LEVEL
    }

    /// Replace all fragments with `count` large ones drifting in from the edges
    pub fn spawn_wave(&mut self, count: u32) {
        self.fragments.clear();
        for _ in 0..count {
            let pos = self.arena.random_edge_position(&mut self.rng);
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 1.2,
                (self.rng.random::<f32>() - 0.5) * 1.2,
            );
            self.spawn_fragment(pos, vel, FragmentTier::Large);
        }
        self.waves += 1;
        self.events.push(GameEvent::WaveStarted { fragments: count });
        log::info!("Wave {}: {} large fragments (score {})", self.waves, count, self.score);
    }

    /// Add a fragment with freshly generated spin and outline
    pub fn spawn_fragment(&mut self, pos: Vec2, vel: Vec2, tier: FragmentTier) -> u32 {
        let id = self.next_entity_id();
        let pos = self.arena.wrap(pos);
        let fragment = Fragment::new(id, pos, vel, tier, &mut self.rng);
        self.fragments.push(fragment);
        id
    }

    /// Score a fragment that has already been removed and drop its children
    /// in its place.
    pub fn destroy_fragment(&mut self, fragment: Fragment) {
        let tier = fragment.tier();
        self.score += tier.points();
        self.events.push(GameEvent::FragmentDestroyed {
            tier,
            pos: fragment.pos,
        });

        if let Some(child) = tier.child() {
            for _ in 0..2 {
                let vel = Vec2::new(
                    (self.rng.random::<f32>() - 0.5) * 2.0,
                    (self.rng.random::<f32>() - 0.5) * 2.0,
                );
                self.spawn_fragment(fragment.pos, vel, child);
            }
        }
    }

    /// Fire a shot from the ship's nose
    pub fn spawn_projectile(&mut self) {
        let dir = crate::heading_vector(self.ship.angle);
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            pos: self.arena.wrap(self.ship.nose()),
            vel: dir * PROJECTILE_SPEED + self.ship.vel,
            life: PROJECTILE_LIFETIME_TICKS,
        });
        self.events.push(GameEvent::ProjectileFired);
    }

    /// Start a new run: fresh ship, empty field, opening wave
    pub fn restart(&mut self) {
        self.score = 0;
        self.ship = Ship::new(&self.arena);
        self.projectiles.clear();
        self.fragments.clear();
        self.fire_cooldown = 0;
        self.thrust_sound_cooldown = 0;
        self.waves = 0;
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Restarted);
        self.spawn_wave(BASE_WAVE_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.fragments.len(), 4);
        assert!(state.fragments.iter().all(|f| f.tier() == FragmentTier::Large));
        assert_eq!(state.lives(), 3);
        assert_eq!(state.level(), 1);
        assert!(!state.ship.invulnerable);
        assert_eq!(state.ship.pos, state.arena.center());
    }

    #[test]
    fn test_tier_radius_and_points() {
        assert_eq!(FragmentTier::Large.radius(), 45.0);
        assert_eq!(FragmentTier::Medium.radius(), 30.0);
        assert_eq!(FragmentTier::Small.radius(), 15.0);
        assert_eq!(FragmentTier::Large.points(), 300);
        assert_eq!(FragmentTier::Small.points(), 100);
    }

    #[test]
    fn test_outline_jitter_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        let outline = generate_outline(30.0, &mut rng);
        for (i, v) in outline.iter().enumerate() {
            let len = v.length();
            assert!((21.0 - 1e-3..=39.0 + 1e-3).contains(&len), "vertex {i} at {len}");
            let expected = TAU * i as f32 / FRAGMENT_VERTICES as f32;
            let angle = v.y.atan2(v.x).rem_euclid(TAU);
            assert!((angle - expected).abs() < 1e-3 || (angle - expected).abs() > TAU - 1e-3);
        }
    }

    #[test]
    fn test_split_large_gives_two_medium_in_place() {
        let mut state = GameState::new(5);
        state.fragments.clear();
        let pos = Vec2::new(120.0, 80.0);
        state.spawn_fragment(pos, Vec2::ZERO, FragmentTier::Large);
        let parent = state.fragments.remove(0);
        state.destroy_fragment(parent);

        assert_eq!(state.score, 300);
        assert_eq!(state.fragments.len(), 2);
        for child in &state.fragments {
            assert_eq!(child.tier(), FragmentTier::Medium);
            assert_eq!(child.pos, pos);
            assert!(child.vel.x.abs() <= 1.0 && child.vel.y.abs() <= 1.0);
        }
    }

    #[test]
    fn test_split_small_leaves_nothing() {
        let mut state = GameState::new(5);
        state.fragments.clear();
        state.spawn_fragment(Vec2::new(10.0, 10.0), Vec2::ZERO, FragmentTier::Small);
        let parent = state.fragments.remove(0);
        state.destroy_fragment(parent);
        assert!(state.fragments.is_empty());
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_large_resolves_into_four_smalls() {
        let mut state = GameState::new(9);
        state.fragments.clear();
        state.spawn_fragment(Vec2::new(300.0, 300.0), Vec2::ZERO, FragmentTier::Large);

        let mut smalls_destroyed = 0;
        while let Some(frag) = state.fragments.pop() {
            if frag.tier() == FragmentTier::Small {
                smalls_destroyed += 1;
            }
            state.destroy_fragment(frag);
        }
        assert_eq!(smalls_destroyed, 4);
        // 300 + 2*200 + 4*100
        assert_eq!(state.score, 1100);
    }

    #[test]
    fn test_respawn_keeps_lives() {
        let arena = Arena::default();
        let mut ship = Ship::new(&arena);
        ship.lives = 2;
        ship.pos = Vec2::new(5.0, 5.0);
        ship.vel = Vec2::new(3.0, 1.0);
        ship.angle = 1.0;
        ship.respawn(&arena);
        assert_eq!(ship.lives, 2);
        assert_eq!(ship.pos, arena.center());
        assert_eq!(ship.vel, Vec2::ZERO);
        assert_eq!(ship.angle, -FRAC_PI_2);
        assert!(ship.invulnerable);
        assert_eq!(ship.invuln_ticks, SHIP_INVULN_TICKS);
    }

    #[test]
    fn test_invulnerability_runs_out() {
        let arena = Arena::default();
        let mut ship = Ship::new(&arena);
        ship.respawn(&arena);
        for _ in 0..SHIP_INVULN_TICKS - 1 {
            ship.tick_invulnerability();
        }
        assert!(ship.invulnerable);
        ship.tick_invulnerability();
        assert!(!ship.invulnerable);
    }

    #[test]
    fn test_restart_recreates_everything() {
        let mut state = GameState::new(11);
        state.score = 4200;
        state.ship.lives = 0;
        state.phase = GamePhase::GameOver;
        state.spawn_projectile();
        state.restart();

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives(), 3);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.fragments.len(), 4);
        assert!(state.events.contains(&GameEvent::Restarted));
    }
}
