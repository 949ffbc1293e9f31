//! The presentation adapter the session is driven through: input polling,
//! drawing primitives and sound cues.  `display::Terminal` is the crossterm
//! implementation; tests use a recording double.

use std::io;

use crate::entities::{Rect, Rgb};
use crate::frame::{Cue, DrawCommand, Fill, InputSnapshot, TextLabel};

pub trait Frontend {
    /// Input gathered since the previous call.
    fn poll_input(&mut self) -> InputSnapshot;

    fn clear(&mut self, color: Rgb) -> io::Result<()>;

    fn draw_rect(&mut self, rect: Rect, color: Rgb, fill: Fill) -> io::Result<()>;

    fn draw_text(&mut self, label: &TextLabel) -> io::Result<()>;

    /// Fire-and-forget.
    fn play_cue(&mut self, cue: Cue);

    /// Show everything drawn since the last call.
    fn present(&mut self) -> io::Result<()>;

    fn execute(&mut self, cmd: &DrawCommand) -> io::Result<()> {
        match cmd {
            DrawCommand::Clear(color) => self.clear(*color),
            DrawCommand::Rect { rect, color, fill } => self.draw_rect(*rect, *color, *fill),
            DrawCommand::Text(label) => self.draw_text(label),
        }
    }
}
