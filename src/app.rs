//! App: terminal init, main loop, fixed-cadence ticks, key and mouse handling.

use crate::game::GameState;
use crate::input::{Action, key_to_action};
use crate::plants::PlantKind;
use crate::rng::SeededSource;
use crate::scoreboard::MAX_NAME_LEN;
use crate::theme::Theme;
use crate::ui::{self, HarvestFlash, View};
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    NewRound,
    Exit,
}

impl QuitOption {
    pub const ALL: [Self; 3] = [Self::Resume, Self::NewRound, Self::Exit];

    fn next(self) -> Self {
        match self {
            Self::Resume => Self::NewRound,
            Self::NewRound => Self::Exit,
            Self::Exit => Self::Resume,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Resume => Self::Exit,
            Self::NewRound => Self::Resume,
            Self::Exit => Self::NewRound,
        }
    }
}

/// What a click or Space does to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Plant,
    Water,
    Harvest,
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Self::Plant => "Plant",
            Self::Water => "Water",
            Self::Harvest => "Harvest",
        }
    }

    /// Whether dragging across cells repeats the tool.
    fn paints(self) -> bool {
        matches!(self, Self::Plant | Self::Water)
    }
}

/// Name entry shown when a round ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePrompt {
    pub name: String,
    /// Closed after a successful submission or when skipped.
    pub open: bool,
    /// Feedback line: text and whether it is an error.
    pub message: Option<(String, bool)>,
}

pub struct App {
    tick_ms: u64,
    no_animation: bool,
    theme: Theme,
    state: GameState,
    screen: Screen,
    quit_selected: QuitOption,
    cursor: (usize, usize),
    tool: Tool,
    plant_index: usize,
    prompt: NamePrompt,
    /// Last cell a drag touched; `None` when no button is held.
    dragging: Option<(usize, usize)>,
    /// Frame area from the last draw, for mapping mouse positions.
    area: Rect,
    flash: Option<HarvestFlash>,
    should_quit: bool,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Self {
        let rng = Box::new(SeededSource::new(args.seed));
        Self {
            tick_ms: args.tick_ms.max(1),
            no_animation: args.no_animation,
            theme,
            state: GameState::new(&config, rng),
            screen: Screen::Playing,
            quit_selected: QuitOption::Resume,
            cursor: (0, 0),
            tool: Tool::default(),
            plant_index: 0,
            prompt: NamePrompt::default(),
            dragging: None,
            area: Rect::default(),
            flash: None,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        terminal.show_cursor()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick = Duration::from_millis(self.tick_ms);
        let mut last = Instant::now();
        let mut pending = Duration::ZERO;
        loop {
            let now = Instant::now();
            let snapshot = self.state.snapshot();
            let view = self.view();
            terminal.draw(|f| {
                self.area = f.area();
                ui::draw(f, &snapshot, &view, &self.theme, &mut self.flash, now);
            })?;
            if self.flash.as_ref().is_some_and(HarvestFlash::done) {
                self.flash = None;
            }

            let timeout = tick.saturating_sub(pending).min(Duration::from_millis(16));
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let ev = event::read()?;
                    self.handle_event(ev);
                }
            }
            if self.should_quit {
                return Ok(());
            }

            // Game time only moves while playing; the quit menu pauses it.
            let now = Instant::now();
            pending += now.saturating_duration_since(last);
            last = now;
            while pending >= tick {
                pending -= tick;
                if self.screen == Screen::Playing {
                    self.tick();
                }
            }
        }
    }

    fn view(&self) -> View {
        View {
            screen: self.screen,
            quit_selected: self.quit_selected,
            cursor: self.cursor,
            tool: self.tool,
            plant: self.selected_plant(),
            prompt: self.prompt.clone(),
        }
    }

    fn selected_plant(&self) -> PlantKind {
        PlantKind::from_index(self.plant_index).unwrap_or(PlantKind::Carrot)
    }

    fn tick(&mut self) {
        let outcome = self.state.tick(self.tick_ms);
        if outcome.round_ended {
            self.screen = Screen::GameOver;
            self.dragging = None;
            self.prompt = NamePrompt {
                open: true,
                ..NamePrompt::default()
            };
        }
    }

    fn new_round(&mut self) {
        self.state.reset();
        self.screen = Screen::Playing;
        self.prompt = NamePrompt::default();
        self.flash = None;
        self.dragging = None;
    }

    fn handle_event(&mut self, ev: Event) {
        match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.screen == Screen::GameOver && self.prompt.open {
            self.handle_name_key(key);
            return;
        }
        let action = key_to_action(key);
        match self.screen {
            Screen::Playing => self.apply_action(action),
            Screen::QuitMenu => match action {
                Action::CursorDown | Action::CursorRight => {
                    self.quit_selected = self.quit_selected.next();
                }
                Action::CursorUp | Action::CursorLeft => {
                    self.quit_selected = self.quit_selected.prev();
                }
                Action::UseTool => match self.quit_selected {
                    QuitOption::Resume => self.screen = Screen::Playing,
                    QuitOption::NewRound => self.new_round(),
                    QuitOption::Exit => self.should_quit = true,
                },
                Action::Quit => self.screen = Screen::Playing,
                _ => {}
            },
            Screen::GameOver if key.code == KeyCode::Char('n') => {
                // Reopen a skipped prompt.
                if !self.state.score_submitted() {
                    self.prompt.open = true;
                    self.prompt.message = None;
                }
            }
            Screen::GameOver => match action {
                Action::Quit => self.should_quit = true,
                Action::NewRound | Action::UseTool => self.new_round(),
                _ => {}
            },
        }
    }

    fn handle_name_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('c') {
                self.should_quit = true;
            }
            return;
        }
        match key.code {
            KeyCode::Enter => self.submit_name(),
            KeyCode::Backspace => {
                self.prompt.name.pop();
            }
            KeyCode::Esc => {
                self.prompt.open = false;
                self.prompt.message = None;
            }
            KeyCode::Char(c) if !c.is_control() => {
                if self.prompt.name.chars().count() < MAX_NAME_LEN {
                    self.prompt.name.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_name(&mut self) {
        match self.state.submit_score(&self.prompt.name) {
            Ok(rank) => {
                let text = match rank {
                    Some(r) => format!("Saved at #{r}"),
                    None => "Saved, but not in the top 10".to_string(),
                };
                self.prompt.open = false;
                self.prompt.message = Some((text, false));
            }
            Err(e) => {
                debug!(error = %e, "score not submitted");
                self.prompt.message = Some((e.to_string(), true));
            }
        }
    }

    fn apply_action(&mut self, action: Action) {
        let max = self.state.garden().size.saturating_sub(1);
        let (row, col) = self.cursor;
        match action {
            Action::CursorUp => self.cursor.0 = row.saturating_sub(1),
            Action::CursorDown => self.cursor.0 = (row + 1).min(max),
            Action::CursorLeft => self.cursor.1 = col.saturating_sub(1),
            Action::CursorRight => self.cursor.1 = (col + 1).min(max),
            Action::UseTool => self.use_tool(row, col),
            Action::SelectTool(tool) => self.tool = tool,
            Action::SelectPlant(i) => {
                if i < PlantKind::ALL.len() {
                    self.plant_index = i;
                    self.tool = Tool::Plant;
                }
            }
            Action::NextPlant => {
                self.plant_index = (self.plant_index + 1) % PlantKind::ALL.len();
                self.tool = Tool::Plant;
            }
            Action::HarvestAll => {
                let summary = self.state.harvest_all();
                if summary.count() > 0 {
                    self.start_flash(summary.cells);
                }
            }
            Action::PowerUp(kind) => {
                self.state.activate_power_up(kind);
            }
            Action::NewRound => {
                info!("new round requested");
                self.new_round();
            }
            Action::Quit => {
                self.screen = Screen::QuitMenu;
                self.quit_selected = QuitOption::Resume;
                self.dragging = None;
            }
            Action::None => {}
        }
    }

    fn use_tool(&mut self, row: usize, col: usize) {
        match self.tool {
            Tool::Plant => {
                self.state.plant(row, col, self.selected_plant());
            }
            Tool::Water => {
                self.state.water(row, col);
            }
            Tool::Harvest => {
                if self.state.harvest(row, col).is_some() {
                    self.start_flash(vec![(row, col)]);
                }
            }
        }
    }

    fn start_flash(&mut self, cells: Vec<(usize, usize)>) {
        if self.no_animation {
            return;
        }
        let tint = self
            .state
            .power_ups()
            .active()
            .map_or(self.theme.mature, |a| self.theme.power_up_color(a.kind));
        self.flash = Some(HarvestFlash::new(cells, tint));
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.screen != Screen::Playing {
            return;
        }
        let size = self.state.garden().size;
        let cell = ui::cell_at(self.area, size, mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some((row, col)) = cell else {
                    return;
                };
                self.cursor = (row, col);
                self.use_tool(row, col);
                self.dragging = self.tool.paints().then_some((row, col));
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (Some(last), Some(pos)) = (self.dragging, cell) else {
                    return;
                };
                if pos != last {
                    self.cursor = pos;
                    self.use_tool(pos.0, pos.1);
                    self.dragging = Some(pos);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = None,
            _ => {}
        }
    }
}
