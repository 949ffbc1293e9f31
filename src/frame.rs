//! Per-frame values exchanged with the presentation layer: the input
//! snapshot going in, cues and draw commands coming out.

use crate::config::GameConfig;
use crate::entities::{Boss, Enemy, Player, Projectile, Rect, Rgb, Upgrade, BLACK, BLUE, RED, WHITE};

// ── Input ─────────────────────────────────────────────────────────────────────

/// One frame of input.  Directions are held flags; the rest are edge events
/// that happened since the previous frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub pause: bool,
    /// Upgrade id typed on the keyboard, not necessarily a valid one.
    pub select: Option<u8>,
    pub quit: bool,
}

// ── Audio ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Shoot,
    Hit,
    GameOver,
}

// ── Render state ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    pub level: u32,
    pub score: u32,
    pub lives: u32,
}

/// Everything visible on the play-field during a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub hud: Hud,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderFrame {
    Play(Scene),
    /// Offerable upgrades, in id order.
    UpgradeMenu(Vec<Upgrade>),
    Paused,
    GameOver,
}

/// Result of one `Session::advance_frame`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    pub render: RenderFrame,
    pub cues: Vec<Cue>,
}

// ── Draw commands ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fill {
    Solid,
    /// Border only, thickness in pixels.
    Outline(u16),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSize {
    Hud,
    Banner,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub anchor: Anchor,
    pub size: FontSize,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    Rect { rect: Rect, color: Rgb, fill: Fill },
    Text(TextLabel),
}

fn solid(rect: Rect, color: Rgb) -> DrawCommand {
    DrawCommand::Rect { rect, color, fill: Fill::Solid }
}

fn hud_label(text: String, x: f32, y: f32) -> DrawCommand {
    DrawCommand::Text(TextLabel {
        text,
        x,
        y,
        anchor: Anchor::TopLeft,
        size: FontSize::Hud,
        color: WHITE,
    })
}

fn banner(text: &str, color: Rgb, config: &GameConfig) -> DrawCommand {
    DrawCommand::Text(TextLabel {
        text: text.to_string(),
        x: config.field_width / 2.0,
        y: config.field_height / 2.0,
        anchor: Anchor::Center,
        size: FontSize::Banner,
        color,
    })
}

impl RenderFrame {
    /// Flatten the frame into draw calls, back to front.
    pub fn draw_commands(&self, config: &GameConfig) -> Vec<DrawCommand> {
        match self {
            RenderFrame::Play(scene) => {
                let mut cmds = vec![DrawCommand::Clear(BLACK)];

                cmds.push(solid(scene.player.rect(), scene.player.color));
                if scene.player.shield {
                    cmds.push(DrawCommand::Rect {
                        rect: scene.player.rect().inflate(config.shield_margin),
                        color: BLUE,
                        fill: Fill::Outline(config.shield_thickness),
                    });
                }
                cmds.extend(scene.projectiles.iter().map(|p| solid(p.rect(), p.color)));
                cmds.extend(scene.enemies.iter().map(|e| solid(e.rect(), e.color)));
                if let Some(boss) = &scene.boss {
                    cmds.push(solid(boss.rect(), boss.color));
                }

                let right = config.field_width - 150.0;
                cmds.push(hud_label(format!("Level {}", scene.hud.level), 10.0, 10.0));
                cmds.push(hud_label(format!("Score: {}", scene.hud.score), right, 10.0));
                cmds.push(hud_label(format!("Lives: {}", scene.hud.lives), right, 50.0));
                cmds
            }
            RenderFrame::UpgradeMenu(options) => {
                let mut cmds = vec![DrawCommand::Clear(BLACK)];
                // Each upgrade keeps its own row, consumed ones leave a gap.
                for (i, upgrade) in Upgrade::ALL.iter().enumerate() {
                    if options.contains(upgrade) {
                        cmds.push(hud_label(
                            upgrade.label().to_string(),
                            50.0,
                            150.0 + i as f32 * 50.0,
                        ));
                    }
                }
                cmds
            }
            // Overlays: drawn on top of whatever the last frame left.
            RenderFrame::Paused => vec![banner("Paused", WHITE, config)],
            RenderFrame::GameOver => vec![banner("Game Over", RED, config)],
        }
    }
}
