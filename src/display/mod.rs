/// Rendering layer: all terminal I/O lives here.
///
/// `TerminalSink` receives a `RenderFrame` and scales the 256×240 world
/// onto whatever character grid the terminal offers.  No game logic is
/// performed; this module only translates snapshots into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use boss_arena::entities::{GamePhase, ProjectileKind, ProjectileOwner};
use boss_arena::render::{RenderFrame, RenderSink, SpriteKind, SpriteView};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_TITLE: Color = Color::Cyan;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_BOSS: Color = Color::Green;
const C_PLATFORM: Color = Color::DarkYellow;
const C_PLAYER: Color = Color::Red;
const C_BOSS: Color = Color::Green;
const C_BOSS_FLASH: Color = Color::White;
const C_EGG: Color = Color::White;
const C_ORB: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;
const FIREBALL_CYCLE: [Color; 3] = [Color::DarkYellow, Color::Yellow, Color::Red];

/// Rows used by the HUD, the top border, the bottom border and the hint.
const CHROME_ROWS: u16 = 4;

pub struct TerminalSink<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_size(out, cols, rows))
    }

    pub fn with_size(out: W, cols: u16, rows: u16) -> Self {
        TerminalSink { out, cols, rows }
    }

    /// Adopt a new terminal size; the next frame is laid out for it.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        tracing::debug!(cols, rows, "terminal resized");
        self.cols = cols;
        self.rows = rows;
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// World x → terminal column inside the side walls.
    fn col(&self, frame: &RenderFrame, x: f32) -> u16 {
        let inner = self.cols.saturating_sub(2).max(1) as f32;
        let c = (x / frame.world_width * inner).floor().clamp(0.0, inner - 1.0);
        1 + c as u16
    }

    /// World y → terminal row between the top and bottom borders.
    fn row(&self, frame: &RenderFrame, y: f32) -> u16 {
        let inner = self.rows.saturating_sub(CHROME_ROWS).max(1) as f32;
        let r = (y / frame.world_height * inner).floor().clamp(0.0, inner - 1.0);
        2 + r as u16
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    type Error = std::io::Error;

    /// Render one complete frame.
    fn present(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        self.draw_border()?;
        self.draw_hud(frame)?;

        match frame.phase {
            GamePhase::Approach => self.draw_approach(frame)?,
            _ => {
                self.draw_platforms(frame)?;
                for sprite in &frame.sprites {
                    self.draw_sprite(frame, sprite)?;
                }
            }
        }

        self.draw_overlay(frame)?;
        self.draw_controls_hint()?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalSink<W> {
    // ── Border ────────────────────────────────────────────────────────────────

    fn draw_border(&mut self) -> std::io::Result<()> {
        let w = self.cols as usize;
        let h = self.rows;

        self.out.queue(style::SetForegroundColor(C_BORDER))?;

        self.out.queue(cursor::MoveTo(0, 1))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

        self.out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

        for row in 2..h.saturating_sub(2) {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(self.cols.saturating_sub(1), row))?;
            self.out.queue(Print("│"))?;
        }

        Ok(())
    }

    // ── HUD (row 0) ───────────────────────────────────────────────────────────

    fn draw_hud(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        let hud = &frame.hud;

        // Title, left
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(C_TITLE))?;
        self.out.queue(Print(frame.title))?;

        // Boss health in the centre, only once the fight is on
        if matches!(frame.phase, GamePhase::Battle | GamePhase::Defeat) {
            let filled = hud.boss_health as usize;
            let empty = hud.boss_max_health.saturating_sub(hud.boss_health) as usize;
            let bar = format!(
                "BOSS [{}{}] P{}",
                "#".repeat(filled),
                ".".repeat(empty),
                hud.boss_phase.number()
            );
            let bx = (self.cols / 2).saturating_sub(bar.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(bx, 0))?;
            self.out.queue(style::SetForegroundColor(C_HUD_BOSS))?;
            self.out.queue(Print(&bar))?;
        }

        // Lives, right
        let lives_text = format!("Lives: {}", "♥".repeat(hud.lives as usize));
        let rx = self
            .cols
            .saturating_sub(lives_text.chars().count() as u16 + 1);
        self.out.queue(cursor::MoveTo(rx, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
        self.out.queue(Print(&lives_text))?;

        Ok(())
    }

    // ── Level ─────────────────────────────────────────────────────────────────

    fn draw_platforms(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        self.out.queue(style::SetForegroundColor(C_PLATFORM))?;
        for p in &frame.platforms {
            let left = self.col(frame, p.x);
            let right = self.col(frame, p.right() - 0.01);
            let row = self.row(frame, p.y);
            self.out.queue(cursor::MoveTo(left, row))?;
            self.out.queue(Print("▀".repeat((right - left + 1) as usize)))?;
        }
        Ok(())
    }

    // ── Entities ──────────────────────────────────────────────────────────────

    fn draw_sprite(&mut self, frame: &RenderFrame, sprite: &SpriteView) -> std::io::Result<()> {
        match sprite.kind {
            SpriteKind::Player => {
                // Blink while invincible
                if sprite.flashing {
                    return Ok(());
                }
                let glyph = if sprite.facing_right { "►" } else { "◄" };
                let col = self.col(frame, sprite.x + sprite.width / 2.0);
                let row = self.row(frame, sprite.y + sprite.height - 0.01);
                self.out.queue(style::SetForegroundColor(C_PLAYER))?;
                self.out.queue(cursor::MoveTo(col, row))?;
                self.out.queue(Print(glyph))?;
            }
            SpriteKind::Boss => {
                let left = self.col(frame, sprite.x);
                let right = self.col(frame, sprite.x + sprite.width - 0.01);
                let top = self.row(frame, sprite.y);
                let bottom = self.row(frame, sprite.y + sprite.height - 0.01);
                let color = if sprite.flashing { C_BOSS_FLASH } else { C_BOSS };
                self.out.queue(style::SetForegroundColor(color))?;
                for row in top..=bottom {
                    self.out.queue(cursor::MoveTo(left, row))?;
                    self.out.queue(Print("█".repeat((right - left + 1) as usize)))?;
                }
                // Eye on the facing side
                let eye = if sprite.facing_right { right } else { left };
                self.out.queue(cursor::MoveTo(eye, top))?;
                self.out.queue(style::SetForegroundColor(Color::Red))?;
                self.out.queue(Print("◉"))?;
            }
            SpriteKind::Projectile { owner, kind } => {
                let (glyph, color) = match kind {
                    ProjectileKind::Fireball => {
                        ("*", FIREBALL_CYCLE[sprite.anim_frame as usize % FIREBALL_CYCLE.len()])
                    }
                    ProjectileKind::Egg => ("o", C_EGG),
                    ProjectileKind::Orb => ("●", C_ORB),
                };
                let player_fireball =
                    owner == ProjectileOwner::Player && kind == ProjectileKind::Fireball;
                let glyph = if player_fireball { "∘" } else { glyph };
                let col = self.col(frame, sprite.x + sprite.width / 2.0);
                let row = self.row(frame, sprite.y + sprite.height / 2.0);
                self.out.queue(style::SetForegroundColor(color))?;
                self.out.queue(cursor::MoveTo(col, row))?;
                self.out.queue(Print(glyph))?;
            }
        }
        Ok(())
    }

    // ── Approach: the boss grows out of the background ────────────────────────

    fn draw_approach(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        let size = 0.1 + frame.phase_progress * 2.9;
        let half = 16.0 * size;
        let cx = frame.world_width / 2.0;
        let cy = frame.world_height / 2.0 + 20.0;

        let left = self.col(frame, cx - half);
        let right = self.col(frame, cx + half);
        let top = self.row(frame, cy - half);
        let bottom = self.row(frame, cy + half);
        self.out.queue(style::SetForegroundColor(C_BOSS))?;
        for row in top..=bottom {
            self.out.queue(cursor::MoveTo(left, row))?;
            self.out.queue(Print("▓".repeat((right - left + 1) as usize)))?;
        }
        Ok(())
    }

    // ── Phase overlays ────────────────────────────────────────────────────────

    fn draw_overlay(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        let lines: Vec<(String, Color)> = match frame.phase {
            GamePhase::Approach => {
                if frame.frame % 30 < 15 && frame.phase_progress > 0.15 {
                    vec![("DANGER!".to_string(), Color::Red)]
                } else {
                    Vec::new()
                }
            }
            GamePhase::Intro => vec![
                (frame.title.to_string(), Color::White),
                ("A challenger appears!".to_string(), Color::Yellow),
            ],
            GamePhase::Battle => Vec::new(),
            GamePhase::Victory => vec![
                ("╔══════════════════╗".to_string(), Color::Yellow),
                ("║     VICTORY!     ║".to_string(), Color::Yellow),
                ("╚══════════════════╝".to_string(), Color::Yellow),
            ],
            GamePhase::Defeat => vec![
                ("╔══════════════════╗".to_string(), Color::Red),
                ("║    GAME  OVER    ║".to_string(), Color::Red),
                ("╚══════════════════╝".to_string(), Color::Red),
            ],
        };

        let cx = self.cols / 2;
        let start_row = (self.rows / 3).saturating_sub(lines.len() as u16 / 2);

        for (i, (msg, color)) in lines.iter().enumerate() {
            let row = start_row + i as u16;
            let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, row))?;
            self.out.queue(style::SetForegroundColor(*color))?;
            self.out.queue(Print(msg))?;
        }

        Ok(())
    }

    // ── Controls hint (last row) ──────────────────────────────────────────────

    fn draw_controls_hint(&mut self) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(1, self.rows.saturating_sub(1)))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print("← → / A D : Move   SPACE : Jump   E / Z : Attack   Q : Quit"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boss_arena::compute::init_state;
    use boss_arena::config::Encounter;
    use boss_arena::render::build_render_frame;

    #[test]
    fn resize_rescales_the_world_onto_the_new_grid() {
        let enc = Encounter::castle();
        let frame = build_render_frame(&init_state(&enc).unwrap(), &enc);
        let mut sink = TerminalSink::with_size(Vec::new(), 80, 24);

        sink.present(&frame).unwrap();
        assert_eq!(sink.col(&frame, 255.0), 78);
        assert_eq!(sink.row(&frame, 239.0), 21);

        sink.resize(40, 12);
        sink.get_mut().clear();
        sink.present(&frame).unwrap();
        assert_eq!(sink.col(&frame, 255.0), 38);
        assert_eq!(sink.row(&frame, 239.0), 9);
        assert!(!sink.get_mut().is_empty());
    }
}
