//! Layout and drawing: garden grid, sidebar (status, seeds, power-ups, leaderboard),
//! quit menu, game over with name entry, and the harvest flash.
//!
//! Everything is drawn from a `Snapshot`; nothing here touches `GameState`.

use crate::app::{NamePrompt, QuitOption, Screen, Tool};
use crate::clock::REFILL_INTERVAL_MS;
use crate::game::Snapshot;
use crate::garden::Cell;
use crate::plants::PlantKind;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Terminal columns and rows per garden cell: `[` glyph `]` over a status row.
const CELL_W: u16 = 4;
const CELL_H: u16 = 2;

const SIDEBAR_WIDTH: u16 = 36;
const SIDEBAR_HEIGHT: u16 = 27;

/// Rows shown from the leaderboard.
const LEADERBOARD_ROWS: usize = 5;

/// Duration of the harvest flash in ms.
const FLASH_MS: u32 = 450;

/// Frontend state the renderer needs besides the snapshot.
#[derive(Debug, Clone)]
pub struct View {
    pub screen: Screen,
    pub quit_selected: QuitOption,
    pub cursor: (usize, usize),
    pub tool: Tool,
    pub plant: PlantKind,
    pub prompt: NamePrompt,
}

/// Cells that were just harvested, fading from the tint back to the garden.
pub struct HarvestFlash {
    cells: Vec<(usize, usize)>,
    tint: ratatui::style::Color,
    effect: Option<Effect>,
    last: Option<Instant>,
}

impl HarvestFlash {
    pub fn new(cells: Vec<(usize, usize)>, tint: ratatui::style::Color) -> Self {
        Self {
            cells,
            tint,
            effect: None,
            last: None,
        }
    }

    pub fn done(&self) -> bool {
        self.effect.as_ref().is_some_and(Effect::done)
    }
}

/// Garden block (with border) and sidebar, centred in `area`.
fn layout(area: Rect, size: usize) -> (Rect, Rect) {
    let grid = size as u16;
    let garden_w = grid * CELL_W + 2;
    let garden_h = grid * CELL_H + 2;
    let total_w = garden_w + SIDEBAR_WIDTH;
    let total_h = garden_h.max(SIDEBAR_HEIGHT);

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_h),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(garden_w), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    let garden = Rect {
        height: garden_h.min(cols[0].height),
        ..cols[0]
    };
    (garden, cols[1])
}

/// Inner rect of the garden block: where cells are drawn.
fn board_rect(area: Rect, size: usize) -> Rect {
    let (garden, _) = layout(area, size);
    Rect {
        x: garden.x + 1,
        y: garden.y + 1,
        width: garden.width.saturating_sub(2),
        height: garden.height.saturating_sub(2),
    }
}

/// Top-left terminal position of a garden cell.
pub fn cell_origin(area: Rect, size: usize, row: usize, col: usize) -> (u16, u16) {
    let board = board_rect(area, size);
    (board.x + col as u16 * CELL_W, board.y + row as u16 * CELL_H)
}

/// Garden cell under a terminal position, if any.
pub fn cell_at(area: Rect, size: usize, x: u16, y: u16) -> Option<(usize, usize)> {
    let board = board_rect(area, size);
    if !board.contains(Position { x, y }) {
        return None;
    }
    let col = ((x - board.x) / CELL_W) as usize;
    let row = ((y - board.y) / CELL_H) as usize;
    (row < size && col < size).then_some((row, col))
}

/// `$1,234,567`
fn dollars(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `mm:ss`, rounding up so the display reads 00:00 only once time is out.
fn clock_label(ms: u64) -> String {
    let secs = ms.div_ceil(1_000);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn draw(
    frame: &mut Frame,
    snap: &Snapshot,
    view: &View,
    theme: &Theme,
    flash: &mut Option<HarvestFlash>,
    now: Instant,
) {
    let area = frame.area();
    draw_game(frame, snap, view, theme, area);
    match view.screen {
        Screen::Playing => {
            if let Some(flash) = flash {
                apply_harvest_flash(frame, flash, area, snap.grid.len(), now);
            }
        }
        Screen::QuitMenu => draw_quit_menu(frame, theme, view.quit_selected),
        Screen::GameOver => draw_game_over(frame, snap, &view.prompt, theme),
    }
}

fn draw_game(frame: &mut Frame, snap: &Snapshot, view: &View, theme: &Theme, area: Rect) {
    let (garden_area, sidebar_area) = layout(area, snap.grid.len());
    draw_garden(frame, snap, view, theme, garden_area);
    draw_sidebar(frame, snap, view, theme, sidebar_area);
}

fn draw_garden(frame: &mut Frame, snap: &Snapshot, view: &View, theme: &Theme, area: Rect) {
    let title = match snap.active_power_up {
        Some((kind, left)) => Line::from(vec![
            Span::styled(" Garden ", Style::default().fg(theme.title)),
            Span::styled(
                format!(" {kind} {:.1}s ", left as f64 / 1_000.0),
                Style::default()
                    .fg(theme.bg)
                    .bg(theme.power_up_color(kind))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(Span::styled(" Garden ", Style::default().fg(theme.title))),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(title);
    let board = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    for (r, row) in snap.grid.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let x = board.x + c as u16 * CELL_W;
            let y = board.y + r as u16 * CELL_H;
            let rect = Rect::new(x, y, CELL_W, CELL_H).intersection(board);
            if rect.is_empty() {
                continue;
            }
            let planting = cell.planting();
            let soil = if planting.is_some_and(|p| p.watered) {
                theme.wet_soil
            } else {
                theme.soil
            };
            buf.set_style(rect, Style::default().bg(soil).fg(theme.main_fg));

            let (glyph, status, status_style) = match cell {
                Cell::Empty => ("··", "", Style::default()),
                Cell::Planted(p) if p.is_mature() => (
                    p.kind.glyph(p.stage),
                    " $$",
                    Style::default().fg(theme.mature).add_modifier(Modifier::BOLD),
                ),
                Cell::Planted(p) => (
                    p.kind.glyph(p.stage),
                    if p.stage == 0 { " . " } else { " : " },
                    Style::default().fg(theme.main_fg),
                ),
            };
            let glyph_style = if cell.is_empty() {
                Style::default().fg(theme.inactive_fg)
            } else {
                Style::default()
            };
            // Clipped cells on a small terminal show only their soil.
            if rect.width == CELL_W {
                buf.set_stringn(x + 1, y, glyph, 2, glyph_style);
                if rect.height == CELL_H {
                    buf.set_stringn(x, y + 1, status, CELL_W as usize, status_style);
                }
            }
            if (r, c) == view.cursor {
                let cursor = Style::default().fg(theme.cursor).add_modifier(Modifier::BOLD);
                buf.set_string(x, y, "[", cursor);
                if rect.width == CELL_W {
                    buf.set_string(x + CELL_W - 1, y, "]", cursor);
                }
            }
        }
    }
}

fn sidebar_block(theme: &Theme, title: impl Into<String>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title.into(), Style::default().fg(theme.title)))
}

fn draw_sidebar(frame: &mut Frame, snap: &Snapshot, view: &View, theme: &Theme, area: Rect) {
    let label = Style::default().fg(theme.title);
    let fg = Style::default().fg(theme.main_fg);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Status (money, time, tool, keys + gauge)
            Constraint::Length(8), // Seeds
            Constraint::Length(5), // Power-ups
            Constraint::Length(7), // Top 5
        ])
        .split(area);

    // --- Status ---
    let block = sidebar_block(theme, " Gardentui ");
    let inner = block.inner(chunks[0]);
    block.render(chunks[0], frame.buffer_mut());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(1)])
        .split(inner);
    let tool = match view.tool {
        Tool::Plant => format!("{} ({})", view.tool.label(), view.plant),
        other => other.label().to_string(),
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Money  ", label),
            Span::styled(
                dollars(snap.money),
                Style::default().fg(theme.money).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Time   ", label),
            Span::styled(clock_label(snap.remaining_ms), fg),
        ]),
        Line::from(vec![Span::styled("Tool   ", label), Span::styled(tool, fg)]),
        Line::from(Span::styled(
            "p/w/x tool  a harvest all",
            Style::default().fg(theme.inactive_fg),
        )),
    ];
    Paragraph::new(Text::from(lines)).render(rows[0], frame.buffer_mut());
    let ratio = if snap.duration_ms > 0 {
        (snap.remaining_ms as f64 / snap.duration_ms as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let bar = if ratio < 0.2 { theme.warning } else { theme.money };
    Gauge::default()
        .ratio(ratio)
        .label("")
        .gauge_style(Style::default().fg(bar).bg(theme.bg))
        .render(rows[1], frame.buffer_mut());

    // --- Seeds ---
    let restock_in = REFILL_INTERVAL_MS - snap.elapsed_ms % REFILL_INTERVAL_MS;
    let block = sidebar_block(
        theme,
        format!(" Seeds · restock {}s ", restock_in.div_ceil(1_000)),
    );
    let inner = block.inner(chunks[1]);
    block.render(chunks[1], frame.buffer_mut());
    let lines: Vec<Line> = snap
        .stock
        .iter()
        .enumerate()
        .map(|(i, &(kind, stock))| {
            let spec = kind.spec();
            let style = if kind == view.plant && view.tool == Tool::Plant {
                Style::default()
                    .fg(theme.bg)
                    .bg(theme.title)
                    .add_modifier(Modifier::BOLD)
            } else if stock == 0 || spec.cost > snap.money {
                Style::default().fg(theme.inactive_fg)
            } else {
                fg
            };
            Line::from(Span::styled(
                format!(
                    "{} {} {:<14}{:>9} x{:<2}",
                    i + 1,
                    kind.glyph(crate::plants::MATURE_STAGE),
                    spec.name,
                    dollars(spec.cost),
                    stock
                ),
                style,
            ))
        })
        .collect();
    Paragraph::new(Text::from(lines)).render(inner, frame.buffer_mut());

    // --- Power-ups ---
    let block = sidebar_block(theme, " Power-ups ");
    let inner = block.inner(chunks[2]);
    block.render(chunks[2], frame.buffer_mut());
    let mut lines: Vec<Line> = snap
        .power_up_uses
        .iter()
        .map(|&(kind, uses)| {
            let key = kind.to_string().to_lowercase().chars().next().unwrap_or(' ');
            let style = if uses == 0 {
                Style::default().fg(theme.inactive_fg)
            } else {
                Style::default().fg(theme.power_up_color(kind))
            };
            Line::from(Span::styled(
                format!("{key} {kind:<10} x{} value  left {uses}", kind.multiplier()),
                style,
            ))
        })
        .collect();
    if let Some((kind, left)) = snap.active_power_up {
        lines.push(Line::from(Span::styled(
            format!("{kind} active, {}s left", left.div_ceil(1_000)),
            Style::default()
                .fg(theme.power_up_color(kind))
                .add_modifier(Modifier::BOLD),
        )));
    }
    Paragraph::new(Text::from(lines)).render(inner, frame.buffer_mut());

    // --- Leaderboard ---
    let block = sidebar_block(theme, " Top 5 ");
    let inner = block.inner(chunks[3]);
    block.render(chunks[3], frame.buffer_mut());
    let lines: Vec<Line> = if snap.leaderboard.is_empty() {
        vec![Line::from(Span::styled(
            "No scores yet",
            Style::default().fg(theme.inactive_fg),
        ))]
    } else {
        snap.leaderboard
            .iter()
            .take(LEADERBOARD_ROWS)
            .enumerate()
            .map(|(i, e)| {
                Line::from(vec![
                    Span::styled(format!("{}. {:<20}", i + 1, e.name), fg),
                    Span::styled(
                        format!("{:>11}", dollars(e.score)),
                        Style::default().fg(theme.money),
                    ),
                ])
            })
            .collect()
    };
    Paragraph::new(Text::from(lines)).render(inner, frame.buffer_mut());
}

fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption) {
    let rect = popup_rect(frame.area(), 24, 9);
    Clear.render(rect, frame.buffer_mut());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title).bg(theme.bg))
        .style(Style::default().bg(theme.bg))
        .title(" Paused ");
    let inner = block.inner(rect);
    block.render(rect, frame.buffer_mut());

    for (i, opt) in QuitOption::ALL.iter().enumerate() {
        let label = match opt {
            QuitOption::Resume => " Resume ",
            QuitOption::NewRound => " New round ",
            QuitOption::Exit => " Exit ",
        };
        let style = if *opt == selected {
            Style::default()
                .fg(theme.bg)
                .bg(theme.title)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.title)
        };
        let rx = inner.x + inner.width.saturating_sub(label.len() as u16) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        if ry < inner.y + inner.height {
            frame.buffer_mut().set_string(rx, ry, label, style);
        }
    }
}

fn draw_game_over(frame: &mut Frame, snap: &Snapshot, prompt: &NamePrompt, theme: &Theme) {
    let rect = popup_rect(frame.area(), 40, 12);
    Clear.render(rect, frame.buffer_mut());
    let fg = Style::default().fg(theme.main_fg);
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Time's up! ",
            Style::default()
                .fg(theme.bg)
                .bg(theme.warning)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Final money: ", fg),
            Span::styled(
                dollars(snap.money),
                Style::default().fg(theme.money).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];
    if prompt.open {
        lines.push(Line::from(vec![
            Span::styled("Name: ", Style::default().fg(theme.title)),
            Span::styled(format!("{}_", prompt.name), fg),
        ]));
    }
    if let Some((text, is_error)) = &prompt.message {
        let color = if *is_error { theme.warning } else { theme.money };
        lines.push(Line::from(Span::styled(text.clone(), Style::default().fg(color))));
    }
    lines.push(Line::from(""));
    let hint = if prompt.open {
        " Enter — Save    Esc — Skip "
    } else if snap.score_submitted {
        " R — New round    Q — Quit "
    } else {
        " N — Name    R — New round    Q — Quit "
    };
    lines.push(Line::from(Span::styled(hint, fg)));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .style(Style::default().bg(theme.bg))
                .title(Span::styled(" Round over ", Style::default().fg(theme.title))),
        )
        .render(rect, frame.buffer_mut());
}

/// Buffer positions covered by the given garden cells.
fn flash_positions(board: Rect, cells: &[(usize, usize)]) -> HashSet<(u16, u16)> {
    let mut set = HashSet::new();
    for &(r, c) in cells {
        let x0 = board.x + c as u16 * CELL_W;
        let y0 = board.y + r as u16 * CELL_H;
        for x in x0..(x0 + CELL_W).min(board.x + board.width) {
            for y in y0..(y0 + CELL_H).min(board.y + board.height) {
                set.insert((x, y));
            }
        }
    }
    set
}

/// Create the flash effect on first use and advance it by the time since the last frame.
fn apply_harvest_flash(
    frame: &mut Frame,
    flash: &mut HarvestFlash,
    area: Rect,
    size: usize,
    now: Instant,
) {
    let board = board_rect(area, size);
    let delta_ms = flash
        .last
        .map(|t| now.saturating_duration_since(t).as_millis().min(u32::MAX as u128) as u32)
        .unwrap_or(0);
    flash.last = Some(now);

    if flash.effect.is_none() {
        let cells = flash_positions(board, &flash.cells);
        let filter =
            CellFilter::PositionFn(ref_count(move |pos: Position| cells.contains(&(pos.x, pos.y))));
        let effect = fx::fade_from(flash.tint, flash.tint, (FLASH_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board);
        flash.effect = Some(effect);
    }
    if let Some(effect) = flash.effect.as_mut() {
        frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::game::GameState;
    use crate::rng::ScriptedSource;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 120,
        height: 40,
    };

    fn view() -> View {
        View {
            screen: Screen::Playing,
            quit_selected: QuitOption::Resume,
            cursor: (0, 0),
            tool: Tool::Plant,
            plant: PlantKind::Carrot,
            prompt: NamePrompt::default(),
        }
    }

    fn rendered(snap: &Snapshot, view: &View) -> String {
        let mut terminal = Terminal::new(TestBackend::new(AREA.width, AREA.height)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| draw(f, snap, view, &theme, &mut None, Instant::now()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn dollars_groups_thousands() {
        assert_eq!(dollars(0), "$0");
        assert_eq!(dollars(100), "$100");
        assert_eq!(dollars(1_234), "$1,234");
        assert_eq!(dollars(1_234_567), "$1,234,567");
    }

    #[test]
    fn clock_rounds_up() {
        assert_eq!(clock_label(180_000), "03:00");
        assert_eq!(clock_label(179_001), "03:00");
        assert_eq!(clock_label(179_000), "02:59");
        assert_eq!(clock_label(0), "00:00");
    }

    #[test]
    fn mouse_mapping_matches_drawn_cells() {
        let (x, y) = cell_origin(AREA, 8, 3, 5);
        assert_eq!(cell_at(AREA, 8, x, y), Some((3, 5)));
        assert_eq!(cell_at(AREA, 8, x + CELL_W - 1, y + CELL_H - 1), Some((3, 5)));
        assert_eq!(cell_at(AREA, 8, x + CELL_W, y), Some((3, 6)));
        let board = board_rect(AREA, 8);
        assert_eq!(cell_at(AREA, 8, board.x - 1, board.y), None);
        assert_eq!(cell_at(AREA, 8, board.x, board.y + board.height), None);
        assert_eq!(cell_at(AREA, 8, 0, 0), None);
    }

    #[test]
    fn renders_sidebar_and_game_over() {
        let mut game = GameState::new(&GameConfig::default(), Box::new(ScriptedSource::new([])));
        game.plant(0, 0, PlantKind::Carrot);
        let text = rendered(&game.snapshot(), &view());
        assert!(text.contains("Seeds"));
        assert!(text.contains("Carrot"));
        assert!(text.contains("$25"));
        assert!(text.contains("03:00"));
        assert!(text.contains("No scores yet"));

        game.tick(180_000);
        let mut v = view();
        v.screen = Screen::GameOver;
        v.prompt.open = true;
        v.prompt.name = "Ada".into();
        let text = rendered(&game.snapshot(), &v);
        assert!(text.contains("Time's up!"));
        assert!(text.contains("Ada_"));

        v.prompt.open = false;
        let text = rendered(&game.snapshot(), &v);
        assert!(text.contains("N — Name"));
        game.submit_score("Ada").unwrap();
        let text = rendered(&game.snapshot(), &v);
        assert!(!text.contains("N — Name"));
        assert!(text.contains("R — New round"));
    }
}
