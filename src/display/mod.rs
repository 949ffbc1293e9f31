//! Rendering layer — all terminal I/O lives here.
//!
//! `Terminal` implements `Frontend` on top of crossterm.  It maps the logical
//! play-field onto whatever terminal size is available, paints rectangles
//! as block characters and turns key events into `InputSnapshot`s.  No game
//! logic is performed here.

use std::collections::HashMap;
use std::io::Write;
use std::sync::mpsc;

use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Attribute, Color, Print},
    terminal, QueueableCommand,
};

use crate::config::GameConfig;
use crate::entities::{Rect, Rgb};
use crate::frame::{Anchor, Cue, Fill, FontSize, InputSnapshot, TextLabel};
use crate::frontend::Frontend;

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this long.  Covers terminals that don't emit key-release events.
const HOLD_MS: u64 = 130;

const SOLID: &str = "█";
const BORDER: &str = "▒";

/// `HOLD_MS` in frames at the configured frame rate, at least one.
fn hold_window(frame_ms: u64) -> u64 {
    (HOLD_MS / frame_ms.max(1)).max(1)
}

/// Returns true if `key` was seen within the last `window` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64, window: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= window)
        .unwrap_or(false)
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

pub struct Terminal<W: Write> {
    out: W,
    rx: mpsc::Receiver<Event>,
    /// Maps each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    hold_window: u64,
    cols: u16,
    rows: u16,
    field_width: f32,
    field_height: f32,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W, rx: mpsc::Receiver<Event>, cols: u16, rows: u16, config: &GameConfig) -> Self {
        Terminal {
            out,
            rx,
            key_frame: HashMap::new(),
            frame: 0,
            hold_window: hold_window(config.frame_ms),
            cols,
            rows,
            field_width: config.field_width,
            field_height: config.field_height,
        }
    }

    /// Logical pixel → terminal cell.  May fall outside the screen.
    fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        let col = (x / self.field_width * self.cols as f32).floor() as i32;
        let row = (y / self.field_height * self.rows as f32).floor() as i32;
        (col, row)
    }

    /// Cell span covered by `rect`, clipped to the screen; at least one cell
    /// wide and tall so small projectiles stay visible.
    fn cell_span(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let (c0, r0) = self.to_cell(rect.x, rect.y);
        let (c1, r1) = self.to_cell(rect.x + rect.w, rect.y + rect.h);
        let (c1, r1) = (c1.max(c0 + 1), r1.max(r0 + 1));

        let c0 = c0.max(0);
        let r0 = r0.max(0);
        let c1 = c1.min(self.cols as i32);
        let r1 = r1.min(self.rows as i32);
        if c0 >= c1 || r0 >= r1 {
            return None;
        }
        Some((c0 as u16, r0 as u16, c1 as u16, r1 as u16))
    }
}

impl<W: Write> Frontend for Terminal<W> {
    /// Drains all pending key events (non-blocking).  Directions use the
    /// hold window; Space, P, 1-5 and quit keys are one-shot.
    fn poll_input(&mut self) -> InputSnapshot {
        self.frame += 1;
        let frame = self.frame;
        let mut input = InputSnapshot::default();

        while let Ok(event) = self.rx.try_recv() {
            match event {
                Event::Key(KeyEvent {
                    code, kind, modifiers, ..
                }) => match kind {
                    KeyEventKind::Press => {
                        self.key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                input.quit = true;
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                input.quit = true;
                            }
                            KeyCode::Char(' ') => input.fire = true,
                            KeyCode::Char('p') | KeyCode::Char('P') => input.pause = true,
                            KeyCode::Char(c @ '1'..='5') => {
                                input.select = c.to_digit(10).map(|d| d as u8);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        self.key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        self.key_frame.remove(&code);
                    }
                },
                Event::Resize(cols, rows) => {
                    log::debug!("terminal resized to {cols}x{rows}");
                    self.cols = cols;
                    self.rows = rows;
                }
                _ => {}
            }
        }

        let window = self.hold_window;
        let held = |keys: &[KeyCode]| {
            keys.iter()
                .any(|k| is_held(&self.key_frame, k, frame, window))
        };
        input.left = held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]);
        input.right = held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]);
        input.up = held(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]);
        input.down = held(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]);
        input
    }

    fn clear(&mut self, color: Rgb) -> std::io::Result<()> {
        self.out.queue(style::SetBackgroundColor(to_color(color)))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.out.queue(style::ResetColor)?;
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb, fill: Fill) -> std::io::Result<()> {
        let Some((c0, r0, c1, r1)) = self.cell_span(&rect) else {
            return Ok(());
        };
        let width = (c1 - c0) as usize;

        self.out.queue(style::SetForegroundColor(to_color(color)))?;
        for row in r0..r1 {
            self.out.queue(cursor::MoveTo(c0, row))?;
            match fill {
                Fill::Solid => {
                    self.out.queue(Print(SOLID.repeat(width)))?;
                }
                // Terminal cells are far coarser than the outline thickness,
                // so the border is always a single cell.
                Fill::Outline(_) if row == r0 || row == r1 - 1 => {
                    self.out.queue(Print(BORDER.repeat(width)))?;
                }
                Fill::Outline(_) => {
                    self.out.queue(Print(BORDER))?;
                    self.out.queue(cursor::MoveTo(c1 - 1, row))?;
                    self.out.queue(Print(BORDER))?;
                }
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, label: &TextLabel) -> std::io::Result<()> {
        let (mut col, row) = self.to_cell(label.x, label.y);
        if label.anchor == Anchor::Center {
            col -= label.text.chars().count() as i32 / 2;
        }
        let col = col.clamp(0, self.cols.saturating_sub(1) as i32) as u16;
        let row = row.clamp(0, self.rows.saturating_sub(1) as i32) as u16;

        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(to_color(label.color)))?;
        if label.size == FontSize::Banner {
            self.out.queue(style::SetAttribute(Attribute::Bold))?;
        }
        self.out.queue(Print(&label.text))?;
        self.out.queue(style::SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    /// The terminal has one sound: the bell, kept for hits and game over.
    fn play_cue(&mut self, cue: Cue) {
        log::debug!("cue {cue:?}");
        if matches!(cue, Cue::Hit | Cue::GameOver) {
            if let Err(e) = self.out.queue(Print('\x07')) {
                log::warn!("failed to ring bell: {e}");
            }
        }
    }

    fn present(&mut self) -> std::io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(cols: u16, rows: u16) -> (Terminal<Vec<u8>>, mpsc::Sender<Event>) {
        let (tx, rx) = mpsc::channel();
        let config = GameConfig::default();
        (Terminal::new(Vec::new(), rx, cols, rows, &config), tx)
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn field_scales_to_terminal_cells() {
        let (t, _tx) = terminal(80, 30);
        assert_eq!(t.to_cell(0.0, 0.0), (0, 0));
        assert_eq!(t.to_cell(400.0, 300.0), (40, 15));
    }

    #[test]
    fn tiny_rect_still_covers_one_cell() {
        let (t, _tx) = terminal(80, 30);
        let span = t.cell_span(&Rect::new(400.0, 300.0, 5.0, 10.0));
        assert_eq!(span, Some((40, 15, 41, 16)));
    }

    #[test]
    fn rect_fully_off_screen_is_skipped() {
        let (t, _tx) = terminal(80, 30);
        assert_eq!(t.cell_span(&Rect::new(100.0, -200.0, 50.0, 50.0)), None);
    }

    #[test]
    fn key_presses_become_edge_events() {
        let (mut t, tx) = terminal(80, 30);
        tx.send(press(KeyCode::Char(' '))).unwrap();
        tx.send(press(KeyCode::Char('p'))).unwrap();
        tx.send(press(KeyCode::Char('4'))).unwrap();

        let input = t.poll_input();
        assert!(input.fire);
        assert!(input.pause);
        assert_eq!(input.select, Some(4));
        assert!(!input.quit);

        // Edge events do not repeat on the next frame.
        let input = t.poll_input();
        assert!(!input.fire);
        assert!(!input.pause);
        assert_eq!(input.select, None);
    }

    #[test]
    fn arrow_stays_held_within_window() {
        let (mut t, tx) = terminal(80, 30);
        tx.send(press(KeyCode::Left)).unwrap();
        assert!(t.poll_input().left);
        assert!(t.poll_input().left);

        for _ in 0..t.hold_window {
            t.poll_input();
        }
        assert!(!t.poll_input().left);
    }

    #[test]
    fn hold_window_tracks_frame_rate() {
        assert_eq!(hold_window(8), 16);
        assert_eq!(hold_window(33), 3);
        assert_eq!(hold_window(500), 1);
        assert_eq!(hold_window(0), HOLD_MS);

        let (t, _tx) = terminal(80, 30);
        assert!(t.hold_window * GameConfig::default().frame_ms <= HOLD_MS);
    }

    #[test]
    fn escape_requests_quit() {
        let (mut t, tx) = terminal(80, 30);
        tx.send(press(KeyCode::Esc)).unwrap();
        assert!(t.poll_input().quit);
    }

    #[test]
    fn present_flushes_queued_output() {
        let (mut t, _tx) = terminal(80, 30);
        t.draw_rect(Rect::new(0.0, 0.0, 50.0, 50.0), Rgb(0, 255, 0), Fill::Solid)
            .unwrap();
        t.present().unwrap();
        let text = String::from_utf8_lossy(&t.out);
        assert!(text.contains(SOLID));
    }
}
