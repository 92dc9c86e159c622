/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// world.  No game logic is performed; this module only translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use spaceship::entities::World;
use spaceship::geometry::{distance, Point};
use spaceship::viewport::Viewport;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::Black;
const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_SHIP: Color = Color::White;
const C_ENEMY: Color = Color::Red;
const C_BOMB: Color = Color::Rgb { r: 255, g: 165, b: 0 };
const C_HINT: Color = Color::DarkGrey;

const C_BLAST: Color = Color::Yellow;

/// Glyphs for discs that fit inside one cell.  Larger discs are filled
/// with `DISC_FILL` over every cell whose centre they cover.
const ENEMY_GLYPH: &str = "●";
const BOMB_GLYPH: &str = "◉";
const DISC_FILL: &str = "█";
const BLAST_GLYPH: &str = "·";
const BLAST_RING_SAMPLES: usize = 64;

/// Ship sprite, centred on the ship's cell.
const SHIP_SPRITE: [&str; 2] = [" ▲ ", "◄█►"];

/// A short-lived ring drawn where a bomb went off.
#[derive(Clone, Copy, Debug)]
pub struct Blast {
    pub at: Point,
    /// Remaining frames to display.
    pub frames: u32,
}

impl Blast {
    pub fn new(at: Point, frames: u32) -> Self {
        Self { at, frames }
    }

    /// One frame older, or gone.
    pub fn fade(self) -> Option<Self> {
        (self.frames > 1).then(|| Self {
            frames: self.frames - 1,
            ..self
        })
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    world: &World,
    viewport: &Viewport,
    blast: Option<&Blast>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_background(out, viewport)?;
    draw_border(out, viewport)?;
    draw_hud(out, world, viewport)?;

    if let Some(blast) = blast {
        draw_blast(out, world, viewport, blast)?;
    }
    let c = &world.config;
    if let Some(bomb) = world.bomb {
        draw_disc(out, viewport, bomb, c.bomb_radius, BOMB_GLYPH, C_BOMB)?;
    }
    for &enemy in &world.enemies {
        draw_disc(out, viewport, enemy, c.enemy_radius, ENEMY_GLYPH, C_ENEMY)?;
    }

    draw_ship(out, world, viewport)?;
    draw_controls_hint(out, viewport)?;

    if world.is_over() {
        draw_game_over(out, world, viewport)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen_rows(viewport).saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn screen_cols(viewport: &Viewport) -> u16 {
    viewport.cells.x as u16 + 2
}

fn screen_rows(viewport: &Viewport) -> u16 {
    viewport.cells.y as u16 + 4
}

/// Inclusive cell range of the play area.
#[derive(Clone, Copy, Debug)]
struct PlayBounds {
    first_col: i32,
    last_col: i32,
    first_row: i32,
    last_row: i32,
}

impl PlayBounds {
    fn of(viewport: &Viewport) -> Self {
        let first_col = viewport.origin.x as i32;
        let first_row = viewport.origin.y as i32;
        Self {
            first_col,
            last_col: first_col + viewport.cells.x as i32 - 1,
            first_row,
            last_row: first_row + viewport.cells.y as i32 - 1,
        }
    }

    fn contains(&self, col: i32, row: i32) -> bool {
        (self.first_col..=self.last_col).contains(&col)
            && (self.first_row..=self.last_row).contains(&row)
    }
}

// ── Background and border ─────────────────────────────────────────────────────

fn draw_background<W: Write>(out: &mut W, viewport: &Viewport) -> std::io::Result<()> {
    let blank = " ".repeat(viewport.cells.x as usize);
    out.queue(style::SetBackgroundColor(C_BACKGROUND))?;
    for row in 0..viewport.cells.y as u16 {
        out.queue(cursor::MoveTo(viewport.origin.x as u16, viewport.origin.y as u16 + row))?;
        out.queue(Print(&blank))?;
    }
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, viewport: &Viewport) -> std::io::Result<()> {
    let w = screen_cols(viewport);
    let h = screen_rows(viewport);

    let span = "─".repeat(w.saturating_sub(2) as usize);

    out.queue(style::SetForegroundColor(C_BORDER))?;
    for (row, left, right) in [(1, '┌', '┐'), (h.saturating_sub(2), '└', '┘')] {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print(format!("{left}{span}{right}")))?;
    }

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(w.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, world: &World, viewport: &Viewport) -> std::io::Result<()> {
    out.queue(style::SetBackgroundColor(Color::Reset))?;
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("Time: {:>6.1}s", world.elapsed_secs())))?;

    let counts = format!(
        "Enemies: {:>3}   Cleared: {:>4}   Bombs: {:>3}",
        world.enemies.len(),
        world.enemies_cleared,
        world.detonations
    );
    let x = screen_cols(viewport).saturating_sub(counts.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(x, 0))?;
    out.queue(Print(&counts))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_glyph<W: Write>(
    out: &mut W,
    viewport: &Viewport,
    at: Point,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    let (col, row) = viewport.to_cell(at);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetBackgroundColor(C_BACKGROUND))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Cells covered by a disc of `radius` world units centred on `at`.
///
/// A disc too small to cover any cell centre still occupies its own cell.
fn disc_cells(viewport: &Viewport, at: Point, radius: f64) -> Vec<(u16, u16)> {
    let bounds = PlayBounds::of(viewport);
    let (col, row) = viewport.to_cell(at);
    let cell = viewport.cell_size();
    let reach_x = (radius / cell.x).ceil() as i32 + 1;
    let reach_y = (radius / cell.y).ceil() as i32 + 1;

    let mut cells = Vec::new();
    for y in row as i32 - reach_y..=row as i32 + reach_y {
        for x in col as i32 - reach_x..=col as i32 + reach_x {
            if !bounds.contains(x, y) {
                continue;
            }
            let centre = viewport.to_play_area(Viewport::cell_centre(x as u16, y as u16));
            if distance(centre, at) <= radius {
                cells.push((x as u16, y as u16));
            }
        }
    }
    if cells.is_empty() {
        cells.push((col, row));
    }
    cells
}

fn draw_disc<W: Write>(
    out: &mut W,
    viewport: &Viewport,
    at: Point,
    radius: f64,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    let cells = disc_cells(viewport, at, radius);
    let glyph = if cells.len() == 1 { glyph } else { DISC_FILL };

    out.queue(style::SetBackgroundColor(C_BACKGROUND))?;
    out.queue(style::SetForegroundColor(color))?;
    for (col, row) in cells {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_blast<W: Write>(
    out: &mut W,
    world: &World,
    viewport: &Viewport,
    blast: &Blast,
) -> std::io::Result<()> {
    let c = &world.config;
    for i in 0..BLAST_RING_SAMPLES {
        let angle = i as f64 / BLAST_RING_SAMPLES as f64 * std::f64::consts::TAU;
        let p = blast.at + Point::new(angle.cos(), angle.sin()) * c.bombing_radius;
        if p.x < 0.0 || p.x > c.width || p.y < 0.0 || p.y > c.height {
            continue;
        }
        draw_glyph(out, viewport, p, BLAST_GLYPH, C_BLAST)?;
    }
    Ok(())
}

fn draw_ship<W: Write>(out: &mut W, world: &World, viewport: &Viewport) -> std::io::Result<()> {
    let (col, row) = viewport.to_cell(world.ship);
    let bounds = PlayBounds::of(viewport);

    out.queue(style::SetBackgroundColor(C_BACKGROUND))?;
    out.queue(style::SetForegroundColor(C_SHIP))?;

    let half_h = SHIP_SPRITE.len() as i32 / 2;
    for (dy, line) in SHIP_SPRITE.iter().enumerate() {
        let y = row as i32 + dy as i32 - half_h;
        let half_w = line.chars().count() as i32 / 2;
        for (dx, ch) in line.chars().enumerate() {
            let x = col as i32 + dx as i32 - half_w;
            if ch == ' ' || !bounds.contains(x, y) {
                continue;
            }
            out.queue(cursor::MoveTo(x as u16, y as u16))?;
            out.queue(Print(ch))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, viewport: &Viewport) -> std::io::Result<()> {
    out.queue(style::SetBackgroundColor(Color::Reset))?;
    out.queue(cursor::MoveTo(1, screen_rows(viewport).saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Mouse / ← ↑ → ↓ / WASD : Steer   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

/// Frame `lines` in a double-line box just wide enough for the longest one.
fn boxed(lines: &[&str]) -> Vec<String> {
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
    let mut framed = Vec::with_capacity(lines.len() + 2);
    framed.push(format!("╔{}╗", "═".repeat(inner)));
    for line in lines {
        let len = line.chars().count();
        let left = (inner - len) / 2;
        framed.push(format!(
            "║{}{}{}║",
            " ".repeat(left),
            line,
            " ".repeat(inner - len - left)
        ));
    }
    framed.push(format!("╚{}╝", "═".repeat(inner)));
    framed
}

fn draw_game_over<W: Write>(out: &mut W, world: &World, viewport: &Viewport) -> std::io::Result<()> {
    let summary = format!(
        "Survived {:.1}s, cleared {} enemies",
        world.elapsed_secs(),
        world.enemies_cleared
    );
    let framed = boxed(&["GAME OVER", "", &summary, "R - Play Again  Q - Quit"]);
    let colors = [Color::Red, Color::Red, Color::Red, Color::Yellow, Color::White, Color::Red];

    let cx = screen_cols(viewport) / 2;
    let start_row = (screen_rows(viewport) / 2).saturating_sub(framed.len() as u16 / 2);

    out.queue(style::SetBackgroundColor(C_BACKGROUND))?;
    for (i, (line, color)) in framed.iter().zip(colors).enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(line))?;
    }

    Ok(())
}
