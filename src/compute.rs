//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` plus the `GameConfig` (and, where needed, an RNG handle) and
//! returns a brand-new `GameState`.  Side effects are limited to the injected
//! RNG; sound cues are returned to the caller instead of played.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Boss, Enemy, GameState, Mode, Phase, Player, Projectile, Rect, Upgrade, GREEN, RED,
};
use crate::frame::{Cue, InputSnapshot};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Strict AABB overlap.  Rectangles that only share an edge do not collide.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

// ── Difficulty curve ──────────────────────────────────────────────────────────

/// Frames between regular enemy spawns: shrinks with level, floored.
pub fn spawn_interval(level: u32, config: &GameConfig) -> u32 {
    config
        .spawn_base_interval
        .saturating_sub(level.saturating_mul(config.spawn_interval_step))
        .max(config.spawn_min_interval)
}

pub fn is_boss_level(level: u32, config: &GameConfig) -> bool {
    level >= config.boss_level
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// A fresh player, centred in the field.
pub fn new_player(config: &GameConfig) -> Player {
    Player {
        x: ((config.field_width - config.player_width) / 2.0).floor(),
        y: ((config.field_height - config.player_height) / 2.0).floor(),
        width: config.player_width,
        height: config.player_height,
        speed: config.player_speed,
        shield: false,
        color: GREEN,
    }
}

/// Build the run-start state.  Used both for a new session and for the
/// reset after a game over.
pub fn init_state(config: &GameConfig) -> GameState {
    GameState {
        player: new_player(config),
        projectiles: Vec::new(),
        enemies: Vec::new(),
        boss: None,
        level: 1,
        kills: 0,
        spawn_timer: config.initial_spawn_timer,
        enemy_speed: config.enemy_initial_speed,
        score: 0,
        lives: config.starting_lives,
        double_bullets: false,
        shield_active: false,
        offerable: Upgrade::full_set(),
        mode: Mode::Playing,
        frame: 0,
    }
}

fn new_projectile(x: f32, y: f32, config: &GameConfig) -> Projectile {
    Projectile {
        x,
        y,
        speed: config.projectile_speed,
        width: config.projectile_width,
        height: config.projectile_height,
        color: RED,
    }
}

// ── Input-driven state transitions ────────────────────────────────────────────

/// Move the player along every held direction, keeping its whole bounding
/// box inside the field.  Opposite directions cancel out.
pub fn move_player(state: &GameState, input: &InputSnapshot, config: &GameConfig) -> GameState {
    let p = &state.player;
    let dx = (input.right as i8 - input.left as i8) as f32;
    let dy = (input.down as i8 - input.up as i8) as f32;
    let max_x = (config.field_width - p.width).max(0.0);
    let max_y = (config.field_height - p.height).max(0.0);

    GameState {
        player: Player {
            x: (p.x + dx * p.speed).clamp(0.0, max_x),
            y: (p.y + dy * p.speed).clamp(0.0, max_y),
            ..p.clone()
        },
        ..state.clone()
    }
}

/// Fire from the player's top edge, horizontally centred.  With double
/// bullets two extra shots are added left and right of centre.  Side shots
/// are not clamped: near the left wall one may start slightly off-field.
///
/// Only fires while playing; paused or upgrade-select states are returned
/// unchanged.
pub fn fire(state: &GameState, config: &GameConfig) -> (GameState, Vec<Cue>) {
    if state.mode != Mode::Playing {
        return (state.clone(), Vec::new());
    }
    let p = &state.player;
    let x = p.x + p.width / 2.0 - config.projectile_width / 2.0;
    let y = p.y;

    let mut projectiles = state.projectiles.clone();
    projectiles.push(new_projectile(x, y, config));
    if state.double_bullets {
        projectiles.push(new_projectile(x - config.double_bullet_offset, y, config));
        projectiles.push(new_projectile(x + config.double_bullet_offset, y, config));
    }

    (
        GameState {
            projectiles,
            ..state.clone()
        },
        vec![Cue::Shoot],
    )
}

/// Pause or resume, remembering which phase the pause suspended.
pub fn toggle_pause(state: &GameState) -> GameState {
    let mode = match state.mode {
        Mode::Playing => Mode::Paused(Phase::Playing),
        Mode::UpgradeSelect => Mode::Paused(Phase::UpgradeSelect),
        Mode::Paused(Phase::Playing) => Mode::Playing,
        Mode::Paused(Phase::UpgradeSelect) => Mode::UpgradeSelect,
    };
    GameState {
        mode,
        ..state.clone()
    }
}

/// Apply one upgrade effect and consume it.  `None` if it was already used
/// this run.
///
/// Bullet speed and size only touch projectiles alive right now; shots
/// fired later use the configured defaults again.
pub fn apply_upgrade(state: &GameState, upgrade: Upgrade) -> Option<GameState> {
    if !state.offerable.contains(&upgrade) {
        return None;
    }
    let mut next = state.clone();
    match upgrade {
        Upgrade::PlayerSpeed => next.player.speed += 1.0,
        Upgrade::BulletSpeed => {
            for p in &mut next.projectiles {
                p.speed += 1.0;
            }
        }
        Upgrade::BulletSize => {
            for p in &mut next.projectiles {
                p.width += 2.0;
                p.height += 2.0;
            }
        }
        Upgrade::DoubleBullets => next.double_bullets = true,
        Upgrade::Shield => {
            next.player.shield = true;
            next.shield_active = true;
        }
    }
    next.offerable.remove(&upgrade);
    Some(next)
}

/// Handle an upgrade-menu key press.  Valid only in upgrade-select mode and
/// only for an id still on offer; otherwise `None` and nothing changes.
pub fn select_upgrade(state: &GameState, id: u8) -> Option<GameState> {
    if state.mode != Mode::UpgradeSelect {
        return None;
    }
    let upgrade = Upgrade::from_id(id)?;
    let next = apply_upgrade(state, upgrade)?;
    Some(GameState {
        mode: Mode::Playing,
        ..next
    })
}

// ── Per-frame movement ────────────────────────────────────────────────────────

/// Move projectiles up; drop those fully above the top edge.
pub fn move_projectiles(state: &GameState) -> GameState {
    let projectiles = state
        .projectiles
        .iter()
        .map(|p| Projectile {
            y: p.y - p.speed,
            ..p.clone()
        })
        .filter(|p| p.y + p.height >= 0.0)
        .collect();
    GameState {
        projectiles,
        ..state.clone()
    }
}

/// Move enemies down; drop those fully below the bottom edge.  A miss costs
/// nothing.
pub fn move_enemies(state: &GameState, config: &GameConfig) -> GameState {
    let enemies = state
        .enemies
        .iter()
        .map(|e| Enemy {
            y: e.y + e.speed,
            ..e.clone()
        })
        .filter(|e| e.y <= config.field_height)
        .collect();
    GameState {
        enemies,
        ..state.clone()
    }
}

pub fn move_boss(state: &GameState) -> GameState {
    GameState {
        boss: state.boss.as_ref().map(|b| Boss {
            y: b.y + b.speed,
            ..b.clone()
        }),
        ..state.clone()
    }
}

// ── Spawner ───────────────────────────────────────────────────────────────────

/// Count the spawn timer down; when it has run out, add one enemy at a
/// random x fully inside the field, above the visible area, and rearm the
/// timer from the level's difficulty curve.
pub fn spawn_step(state: &GameState, config: &GameConfig, rng: &mut impl Rng) -> GameState {
    if state.spawn_timer > 0 {
        return GameState {
            spawn_timer: state.spawn_timer - 1,
            ..state.clone()
        };
    }

    let max_x = (config.field_width - config.enemy_width).max(0.0);
    let enemy = Enemy {
        x: rng.gen_range(0.0..=max_x).floor(),
        y: rng
            .gen_range(config.enemy_spawn_y_min..=config.enemy_spawn_y_max)
            .floor(),
        speed: state.enemy_speed,
        width: config.enemy_width,
        height: config.enemy_height,
        color: RED,
    };
    log::trace!("enemy spawned at ({}, {}) on level {}", enemy.x, enemy.y, state.level);

    let mut enemies = state.enemies.clone();
    enemies.push(enemy);
    GameState {
        enemies,
        spawn_timer: spawn_interval(state.level, config),
        ..state.clone()
    }
}

/// Place the level's single boss, centred above the field.  Leftover regular
/// enemies are cleared so the two never share the field.
pub fn spawn_boss(state: &GameState, config: &GameConfig) -> GameState {
    if state.boss.is_some() {
        return state.clone();
    }
    GameState {
        boss: Some(Boss {
            x: ((config.field_width - config.boss_width) / 2.0).floor(),
            y: config.boss_spawn_y,
            speed: state.enemy_speed,
            width: config.boss_width,
            height: config.boss_height,
            color: RED,
            health: config.boss_health,
        }),
        enemies: Vec::new(),
        ..state.clone()
    }
}

// ── Collision & combat ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Kill threshold reached or boss destroyed.
    LevelCleared,
    /// Lives ran out or the boss got through.  The returned state is the
    /// losing one; the caller is expected to reset.
    GameOver,
}

#[derive(Clone, Debug)]
pub struct Resolution {
    pub state: GameState,
    pub cues: Vec<Cue>,
    pub outcome: Outcome,
}

/// Resolve all hits for the frame: boss rules when a boss is present,
/// regular enemy rules otherwise.
pub fn resolve_collisions(state: &GameState, config: &GameConfig) -> Resolution {
    match &state.boss {
        Some(boss) => resolve_boss(state, boss, config),
        None => resolve_enemies(state, config),
    }
}

fn resolve_enemies(state: &GameState, config: &GameConfig) -> Resolution {
    let player_rect = state.player.rect();
    let mut lives = state.lives;
    let mut removed = vec![false; state.enemies.len()];

    // ── 1. Player ↔ enemies: one life per overlapping enemy ──────────────────
    for (ei, enemy) in state.enemies.iter().enumerate() {
        if !overlaps(&player_rect, &enemy.rect()) {
            continue;
        }
        removed[ei] = true;
        if !state.player.shield {
            lives = lives.saturating_sub(1);
            if lives == 0 {
                return Resolution {
                    state: GameState {
                        lives,
                        ..state.clone()
                    },
                    cues: Vec::new(),
                    outcome: Outcome::GameOver,
                };
            }
        }
    }

    // ── 2. Projectiles ↔ enemies: each projectile kills at most one ──────────
    let mut spent = vec![false; state.projectiles.len()];
    let mut kills = state.kills;
    let mut score = state.score;
    let mut cues = Vec::new();

    for (pi, projectile) in state.projectiles.iter().enumerate() {
        let rect = projectile.rect();
        let target = (0..state.enemies.len())
            .find(|&ei| !removed[ei] && overlaps(&rect, &state.enemies[ei].rect()));
        if let Some(ei) = target {
            removed[ei] = true;
            spent[pi] = true;
            kills += 1;
            score += config.score_per_hit;
            cues.push(Cue::Hit);
        }
    }

    // ── 3. Compact ────────────────────────────────────────────────────────────
    let enemies = state
        .enemies
        .iter()
        .zip(&removed)
        .filter(|&(_, &gone)| !gone)
        .map(|(e, _)| e.clone())
        .collect();
    let projectiles = state
        .projectiles
        .iter()
        .zip(&spent)
        .filter(|&(_, &gone)| !gone)
        .map(|(p, _)| p.clone())
        .collect();

    let outcome = if kills >= config.enemies_per_level {
        Outcome::LevelCleared
    } else {
        Outcome::Continue
    };

    Resolution {
        state: GameState {
            enemies,
            projectiles,
            lives,
            kills,
            score,
            ..state.clone()
        },
        cues,
        outcome,
    }
}

fn resolve_boss(state: &GameState, boss: &Boss, config: &GameConfig) -> Resolution {
    let game_over = |lives| Resolution {
        state: GameState {
            lives,
            ..state.clone()
        },
        cues: Vec::new(),
        outcome: Outcome::GameOver,
    };

    // Fully past the bottom edge.
    if boss.y > config.field_height {
        return game_over(state.lives);
    }

    let boss_rect = boss.rect();

    // The boss is not consumed by contact, so it keeps draining a life for
    // every frame it overlaps an unshielded player.
    let mut lives = state.lives;
    if !state.player.shield && overlaps(&state.player.rect(), &boss_rect) {
        lives = lives.saturating_sub(1);
        if lives == 0 {
            return game_over(lives);
        }
    }

    // At most one projectile lands on the boss per frame.
    let hit = state
        .projectiles
        .iter()
        .position(|p| overlaps(&p.rect(), &boss_rect));

    let Some(pi) = hit else {
        return Resolution {
            state: GameState {
                lives,
                ..state.clone()
            },
            cues: Vec::new(),
            outcome: Outcome::Continue,
        };
    };

    let mut projectiles = state.projectiles.clone();
    projectiles.remove(pi);
    let health = boss.health - 1;
    let (boss, outcome) = if health <= 0 {
        (None, Outcome::LevelCleared)
    } else {
        (
            Some(Boss {
                health,
                ..boss.clone()
            }),
            Outcome::Continue,
        )
    };

    Resolution {
        state: GameState {
            projectiles,
            boss,
            lives,
            score: state.score + config.score_per_hit,
            ..state.clone()
        },
        cues: vec![Cue::Hit],
        outcome,
    }
}

// ── Progression ───────────────────────────────────────────────────────────────

/// Level advance: bump the level and enemy speed, reset the kill count,
/// revoke a one-level shield and open the upgrade menu.
pub fn advance_level(state: &GameState, config: &GameConfig) -> GameState {
    let shield = state.player.shield && !state.shield_active;
    // With every upgrade used there is nothing to pick; play straight on.
    let mode = if state.offerable.is_empty() {
        Mode::Playing
    } else {
        Mode::UpgradeSelect
    };
    GameState {
        level: state.level + 1,
        kills: 0,
        enemy_speed: state.enemy_speed + config.enemy_speed_increment,
        shield_active: false,
        player: Player {
            shield,
            ..state.player.clone()
        },
        mode,
        ..state.clone()
    }
}
