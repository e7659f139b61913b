/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. `draw_world` rasterizes the scene into the `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen pixels map to cells at `px_per_col × px_per_row`; the map area
/// starts below the HUD row.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::GameConfig;
use crate::domain::entity::Facing;
use crate::domain::geom::Rect;
use crate::sim::world::WorldState;
use super::canvas::{Canvas, Fill, Sprite};
use super::scene::draw_world;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Black;

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg));
        }
    }
}

// ── Pixel → cell mapping ──

/// Inclusive-exclusive cell span covered by a pixel rectangle, clipped to
/// the visible screen `[0, screen_w) × [0, screen_h)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct CellSpan {
    col0: usize,
    col1: usize,
    row0: usize,
    row1: usize,
}

#[derive(Clone, Copy, Debug)]
struct Raster {
    px_per_col: f32,
    px_per_row: f32,
    screen_w: f32,
    screen_h: f32,
}

impl Raster {
    fn span(&self, r: Rect) -> Option<CellSpan> {
        let left = r.left().max(0.0);
        let right = r.right().min(self.screen_w);
        let top = r.top().max(0.0);
        let bottom = r.bottom().min(self.screen_h);
        if left >= right || top >= bottom {
            return None;
        }
        Some(CellSpan {
            col0: (left / self.px_per_col).floor() as usize,
            col1: (right / self.px_per_col).ceil() as usize,
            row0: (top / self.px_per_row).floor() as usize,
            row1: (bottom / self.px_per_row).ceil() as usize,
        })
    }

    fn cell_at(&self, x: f32, y: f32) -> (i32, i32) {
        ((x / self.px_per_col).floor() as i32, (y / self.px_per_row).floor() as i32)
    }

    fn cols(&self) -> usize { (self.screen_w / self.px_per_col).ceil() as usize }
    fn rows(&self) -> usize { (self.screen_h / self.px_per_row).ceil() as usize }
}

const KNIGHT_RIGHT: [&str; 2] = ["  O> ", " /|\\ "];
const KNIGHT_LEFT: [&str; 2] = [" <O  ", " /|\\ "];

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 1;

pub struct TerminalRenderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    raster: Raster,
    enhanced_keys: bool,
}

impl TerminalRenderer {
    pub fn new(config: &GameConfig) -> Self {
        TerminalRenderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            raster: Raster {
                px_per_col: config.terminal.px_per_col as f32,
                px_per_row: config.terminal.px_per_row as f32,
                screen_w: config.screen.width as f32,
                screen_h: config.screen.height as f32,
            },
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen. Returns true when the
    /// terminal reports key releases, so held keys can be tracked exactly.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }
        tracing::info!(enhanced_keys = self.enhanced_keys, "terminal initialized");

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        draw_world(world, self);
        self.compose_hud(world);

        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose ──

    fn compose_hud(&mut self, w: &WorldState) {
        let a = &w.actor;
        let hud = format!(
            " x:{:>7.1} y:{:>6.1} vx:{:>6.1} vy:{:>7.1} {} scroll:{:>6}  │ ←/→ move  Space jump  R restart  Q quit",
            a.x, a.y, a.vx, a.vy,
            if a.grounded { "GROUND" } else { "  AIR " },
            w.camera.offset(),
        );
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::Grey);

        // Screen floor marker, when the terminal has room for it
        let floor_row = MAP_ROW + self.raster.rows();
        for x in 0..self.raster.cols().min(self.front.width) {
            self.front.set(x, floor_row, Cell::new('▔', Color::DarkGrey));
        }
        // Scroll band edges
        let (left, right) = w.camera.boundaries();
        for edge in [left, right - 1.0] {
            let (col, _) = self.raster.cell_at(edge, 0.0);
            if col >= 0 {
                self.front.set(col as usize, floor_row, Cell::new('╨', Color::DarkYellow));
            }
        }
    }
}

impl Canvas for TerminalRenderer {
    fn draw_rect(&mut self, bounds: Rect, color: Color, fill: Fill) {
        let span = match self.raster.span(bounds) {
            Some(s) => s,
            None => return,
        };
        for row in span.row0..span.row1 {
            for col in span.col0..span.col1 {
                let edge = row == span.row0 || row + 1 == span.row1
                    || col == span.col0 || col + 1 == span.col1;
                let ch = match fill {
                    Fill::Solid => '█',
                    Fill::Outline if edge => '░',
                    Fill::Outline => continue,
                };
                self.front.set(col, MAP_ROW + row, Cell::new(ch, color));
            }
        }
    }

    fn draw_sprite(&mut self, sprite: Sprite, center: (f32, f32), facing: Facing) {
        let art = match (sprite, facing) {
            (Sprite::Knight, Facing::Right) => &KNIGHT_RIGHT,
            (Sprite::Knight, Facing::Left) => &KNIGHT_LEFT,
        };
        // art rows cover the image height, top-aligned with the image
        let (ccol, top) = self.raster.cell_at(center.0, center.1 - sprite.height() / 2.0);
        let (max_col, max_row) = (self.raster.cols() as i32, self.raster.rows() as i32);

        for (dy, line) in art.iter().enumerate() {
            let row = top + dy as i32;
            let left = ccol - line.chars().count() as i32 / 2;
            for (dx, ch) in line.chars().enumerate() {
                let col = left + dx as i32;
                // spaces are transparent
                if ch == ' ' || col < 0 || row < 0 || col >= max_col || row >= max_row {
                    continue;
                }
                self.front.set(col as usize, MAP_ROW + row as usize, Cell::new(ch, Color::White));
            }
        }
    }
}
