//! The game session: owns the state and runs the per-frame pipeline.

use std::io;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::compute::{
    advance_level, fire, init_state, is_boss_level, move_boss, move_enemies, move_player,
    move_projectiles, resolve_collisions, select_upgrade, spawn_boss, spawn_step, toggle_pause,
    Outcome,
};
use crate::config::GameConfig;
use crate::entities::{GameState, Mode};
use crate::frame::{Cue, FrameOutput, Hud, InputSnapshot, RenderFrame, Scene};
use crate::frontend::Frontend;

/// What the outer loop should do after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    /// The game-over banner is up; hold it before the next frame.
    GameOver,
    Quit,
}

/// Owns all mutable game state.  Each `advance_frame` call is one complete
/// transaction: callers never observe a half-processed frame.
pub struct Session<R: Rng = StdRng> {
    config: GameConfig,
    state: GameState,
    rng: R,
}

impl Session<StdRng> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    /// Build a session with an injected RNG (seed it for deterministic runs).
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let state = init_state(&config);
        Session { config, state, rng }
    }

    /// Resume from a prepared state, e.g. one built with `compute`.
    pub fn from_state(config: GameConfig, state: GameState, rng: R) -> Self {
        Session { config, state, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Scripted setups only; not part of the play API.
    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Back to run-start defaults.
    pub fn reset(&mut self) {
        self.state = init_state(&self.config);
    }

    pub fn toggle_pause(&mut self) {
        self.state = toggle_pause(&self.state);
    }

    /// Run one frame of the simulation and describe what to show.
    pub fn advance_frame(&mut self, input: &InputSnapshot) -> FrameOutput {
        if input.pause {
            self.toggle_pause();
        }
        self.state.frame += 1;

        match self.state.mode {
            Mode::Paused(_) => FrameOutput {
                render: RenderFrame::Paused,
                cues: Vec::new(),
            },
            Mode::UpgradeSelect => {
                if let Some(id) = input.select {
                    if let Some(next) = select_upgrade(&self.state, id) {
                        log::debug!("upgrade {id} applied, {} left on offer", next.offerable.len());
                        self.state = next;
                        return self.play_output(Vec::new());
                    }
                }
                FrameOutput {
                    render: RenderFrame::UpgradeMenu(self.state.offerable.iter().copied().collect()),
                    cues: Vec::new(),
                }
            }
            Mode::Playing => self.step(input),
        }
    }

    /// Poll the frontend, advance, then play cues and draw.
    pub fn run_frame<F: Frontend>(&mut self, frontend: &mut F) -> io::Result<FrameControl> {
        let input = frontend.poll_input();
        if input.quit {
            log::info!("quit requested on frame {}", self.state.frame);
            return Ok(FrameControl::Quit);
        }

        let output = self.advance_frame(&input);
        for cue in &output.cues {
            frontend.play_cue(*cue);
        }
        for cmd in output.render.draw_commands(&self.config) {
            frontend.execute(&cmd)?;
        }
        frontend.present()?;

        Ok(match output.render {
            RenderFrame::GameOver => FrameControl::GameOver,
            _ => FrameControl::Continue,
        })
    }

    // ── Playing pipeline ──────────────────────────────────────────────────────

    fn step(&mut self, input: &InputSnapshot) -> FrameOutput {
        let config = &self.config;
        let mut cues = Vec::new();

        let mut state = if input.fire {
            let (next, fired) = fire(&self.state, config);
            cues.extend(fired);
            next
        } else {
            self.state.clone()
        };

        state = move_player(&state, input, config);
        state = move_projectiles(&state);

        let resolution = if is_boss_level(state.level, config) {
            if state.boss.is_none() {
                // The boss gets its first frame on the field before it moves.
                self.state = spawn_boss(&state, config);
                log::info!("boss spawned on level {}", self.state.level);
                return self.play_output(cues);
            }
            resolve_collisions(&move_boss(&state), config)
        } else {
            state = spawn_step(&state, config, &mut self.rng);
            resolve_collisions(&move_enemies(&state, config), config)
        };
        cues.extend(resolution.cues);

        match resolution.outcome {
            Outcome::GameOver => {
                log::info!(
                    "game over on level {} with score {}",
                    resolution.state.level,
                    resolution.state.score
                );
                cues.push(Cue::GameOver);
                self.reset();
                return FrameOutput {
                    render: RenderFrame::GameOver,
                    cues,
                };
            }
            Outcome::LevelCleared => {
                self.state = advance_level(&resolution.state, config);
                log::info!("level {} reached, score {}", self.state.level, self.state.score);
            }
            Outcome::Continue => self.state = resolution.state,
        }

        self.play_output(cues)
    }

    fn play_output(&self, cues: Vec<Cue>) -> FrameOutput {
        let s = &self.state;
        FrameOutput {
            render: RenderFrame::Play(Scene {
                player: s.player.clone(),
                projectiles: s.projectiles.clone(),
                enemies: s.enemies.clone(),
                boss: s.boss.clone(),
                hud: Hud {
                    level: s.level,
                    score: s.score,
                    lives: s.lives,
                },
            }),
            cues,
        }
    }
}
