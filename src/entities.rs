//! All game entity types — pure data, no game rules.
//!
//! Coordinates are logical play-field pixels with the origin at the top-left
//! corner; `y` grows downward.

use std::collections::BTreeSet;

// ── Geometry & colour ─────────────────────────────────────────────────────────

/// Axis-aligned rectangle, the only collision shape in the game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + 2.0 * margin,
            h: self.h + 2.0 * margin,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const RED: Rgb = Rgb(255, 0, 0);
pub const GREEN: Rgb = Rgb(0, 255, 0);
pub const BLUE: Rgb = Rgb(0, 0, 255);

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per frame along each held direction.
    pub speed: f32,
    pub shield: bool,
    pub color: Rgb,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    /// Upward speed in pixels per frame.
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    /// Downward speed, fixed at spawn from the session's enemy speed.
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
    pub health: i32,
}

impl Boss {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Upgrades ──────────────────────────────────────────────────────────────────

/// The five one-shot upgrades offered between levels.  Each id (1..=5) is
/// what the player types to pick it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Upgrade {
    /// Player speed +1.
    PlayerSpeed,
    /// Speed +1 for projectiles alive at the moment of selection.
    BulletSpeed,
    /// Width/height +2 for projectiles alive at the moment of selection.
    BulletSize,
    /// Every fire command spawns three projectiles.
    DoubleBullets,
    /// Shield that lasts until the next level advance.
    Shield,
}

impl Upgrade {
    pub const ALL: [Upgrade; 5] = [
        Upgrade::PlayerSpeed,
        Upgrade::BulletSpeed,
        Upgrade::BulletSize,
        Upgrade::DoubleBullets,
        Upgrade::Shield,
    ];

    pub fn id(self) -> u8 {
        match self {
            Upgrade::PlayerSpeed => 1,
            Upgrade::BulletSpeed => 2,
            Upgrade::BulletSize => 3,
            Upgrade::DoubleBullets => 4,
            Upgrade::Shield => 5,
        }
    }

    pub fn from_id(id: u8) -> Option<Upgrade> {
        Upgrade::ALL.iter().copied().find(|u| u.id() == id)
    }

    /// Menu line shown on the upgrade screen.
    pub fn label(self) -> &'static str {
        match self {
            Upgrade::PlayerSpeed => "1. Increase Player Speed",
            Upgrade::BulletSpeed => "2. Increase Bullet Speed",
            Upgrade::BulletSize => "3. Increase Bullet Size",
            Upgrade::DoubleBullets => "4. Double Bullets",
            Upgrade::Shield => "5. Shield for One Level",
        }
    }

    pub fn full_set() -> BTreeSet<Upgrade> {
        Upgrade::ALL.iter().copied().collect()
    }
}

// ── Session mode ──────────────────────────────────────────────────────────────

/// What a pause suspended, restored on resume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    UpgradeSelect,
}

/// Exactly one mode is active per frame.  Game over is not a mode: it is
/// resolved and reset inside the frame that triggers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Playing,
    UpgradeSelect,
    Paused(Phase),
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    /// Starts at 1, only ever increases during a run.
    pub level: u32,
    /// Enemies destroyed since the last level advance.
    pub kills: u32,
    /// Frames until the next regular enemy spawns.
    pub spawn_timer: u32,
    /// Descent speed handed to newly spawned enemies and bosses.
    pub enemy_speed: f32,
    pub score: u32,
    pub lives: u32,
    pub double_bullets: bool,
    /// The player's shield came from the one-level upgrade.
    pub shield_active: bool,
    /// Upgrades not yet consumed this run.
    pub offerable: BTreeSet<Upgrade>,
    pub mode: Mode,
    pub frame: u64,
}
