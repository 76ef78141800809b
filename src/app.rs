use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{DisableBlinking, EnableBlinking, Hide, MoveTo, Show},
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};

use crate::{
    cell::Cell,
    config::Settings,
    grid::{Coord, Grid, Probability, COLS, ROWS},
    sim::{Delay, Simulation},
};

/// How long to block on input while the simulation is stopped.
const IDLE_POLL: Duration = Duration::from_millis(250);
const SLIDER_WIDTH: usize = 25;

pub trait Component {
    type State;
    type Error;

    fn display(&self, output: &mut impl Write) -> Result<(), Self::Error>;
    fn update(self, message: Option<Event>, now: Instant) -> Result<Self::State, Self::Error>;
}

pub struct App<'a, T> {
    options: Options<'a, T>,
    widget: Widget,
}

pub struct Options<'a, T> {
    pub output: &'a mut T,
    pub settings: Settings,
}

/// What a single input asks the widget to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleRunning,
    Reset,
    Randomize,
    ToggleCell(Coord),
    ToggleCursor,
    MoveCursor(isize, isize),
    Faster,
    Slower,
    Redraw,
}

impl Action {
    pub fn from_event(event: &Event) -> Option<Action> {
        match event {
            Event::Key(press) => Self::from_key(press),
            Event::Mouse(mouse) => Self::from_mouse(mouse),
            Event::Resize(..) => Some(Action::Redraw),
        }
    }

    fn from_key(press: &KeyEvent) -> Option<Action> {
        if press.modifiers.contains(KeyModifiers::CONTROL) && press.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let action = match press.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char(' ') => Action::ToggleRunning,
            KeyCode::Char('r') => Action::Reset,
            KeyCode::Char('n') => Action::Randomize,
            KeyCode::Char('x') | KeyCode::Enter => Action::ToggleCursor,
            KeyCode::Char('+') | KeyCode::Char('=') => Action::Slower,
            KeyCode::Char('-') | KeyCode::Char('_') => Action::Faster,
            KeyCode::Up => Action::MoveCursor(-1, 0),
            KeyCode::Down => Action::MoveCursor(1, 0),
            KeyCode::Left => Action::MoveCursor(0, -1),
            KeyCode::Right => Action::MoveCursor(0, 1),
            _ => return None,
        };

        Some(action)
    }

    // The grid is drawn one character per cell from the top-left corner, so terminal
    // positions map straight onto grid coordinates.
    fn from_mouse(mouse: &MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let coord = Coord::new(mouse.row as usize, mouse.column as usize);
                coord.in_bounds().then_some(Action::ToggleCell(coord))
            }
            _ => None,
        }
    }
}

/// The interactive board: the simulation, a cursor for keyboard editing, and the randomizer.
pub struct Widget {
    sim: Simulation,
    cursor: Coord,
    probability: Probability,
    rng: ChaCha8Rng,
    needs_clear: bool,
}

impl Widget {
    pub fn new(settings: &Settings) -> Self {
        let mut rng = settings.rng();
        let grid = settings.initial_grid(&mut rng);

        Widget {
            sim: Simulation::new(grid, settings.delay),
            cursor: Coord::new(0, 0),
            probability: settings.probability,
            rng,
            needs_clear: true,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// Applies one action. Returns `false` when the widget should close.
    pub fn apply(&mut self, action: Action, now: Instant) -> bool {
        match action {
            Action::Quit => return false,
            Action::ToggleRunning => self.sim.toggle_running(now),
            Action::Reset => self.sim.reset(),
            Action::Randomize => self.sim.randomize(&mut self.rng, self.probability),
            Action::ToggleCell(coord) => {
                self.sim.toggle_cell(coord);
            }
            Action::ToggleCursor => {
                self.sim.toggle_cell(self.cursor);
            }
            Action::MoveCursor(d_row, d_col) => {
                let row = (self.cursor.row as isize + d_row).clamp(0, ROWS as isize - 1);
                let col = (self.cursor.col as isize + d_col).clamp(0, COLS as isize - 1);
                self.cursor = Coord::new(row as usize, col as usize);
            }
            Action::Faster => self.sim.set_delay(self.sim.delay().faster()),
            Action::Slower => self.sim.set_delay(self.sim.delay().slower()),
            Action::Redraw => self.needs_clear = true,
        }

        true
    }

    fn display_grid(&self, output: &mut impl Write, grid: &Grid) -> Result<()> {
        let mut line = String::with_capacity(COLS);
        for row in 0..ROWS {
            line.clear();
            line.extend((0..COLS).map(|col| grid[(row, col)].block()));
            queue!(output, MoveTo(0, row as u16), Print(&line))?;
        }

        let under_cursor = match grid[self.cursor] {
            Cell::Alive => "o".green(),
            Cell::Dead => "o".red(),
        };
        queue!(
            output,
            MoveTo(self.cursor.col as u16, self.cursor.row as u16),
            PrintStyledContent(under_cursor)
        )?;

        Ok(())
    }
}

fn slider(delay: Delay) -> String {
    let span = (Delay::MAX.as_millis() - Delay::MIN.as_millis()) as usize;
    let filled = (delay.as_millis() - Delay::MIN.as_millis()) as usize * (SLIDER_WIDTH - 1) / span;

    (0..SLIDER_WIDTH)
        .map(|i| if i == filled { '|' } else { '-' })
        .collect()
}

impl Component for Widget {
    // `None` means the user asked to quit.
    type State = Option<Widget>;
    type Error = anyhow::Error;

    fn display(&self, output: &mut impl Write) -> Result<()> {
        if self.needs_clear {
            queue!(output, Clear(ClearType::All))?;
        }

        self.display_grid(output, self.sim.grid())?;

        let status = if self.sim.running() {
            "Running".bold().green()
        } else {
            "Stopped".bold().red()
        };
        queue!(
            output,
            MoveTo(0, (ROWS + 1) as u16),
            Clear(ClearType::FromCursorDown)
        )?;

        write!(
            output,
            "{} | generation #{} | population {}\r\n",
            status,
            self.sim.generation().to_string().bold(),
            self.sim.grid().population().to_string().bold(),
        )?;
        write!(
            output,
            "Simulation speed (ms): {} [{}]\r\n",
            self.sim.delay().as_millis().to_string().bold(),
            slider(self.sim.delay()),
        )?;
        write!(
            output,
            "{}: Start/Stop  {}: Reset  {}: Randomize  {}: Speed\r\n",
            "Space".blue().bold(),
            "r".blue().bold(),
            "n".blue().bold(),
            "-/+".blue().bold(),
        )?;
        write!(
            output,
            "{}: Move cursor  {}/{}: Flip cell  {}: Quit\r\n",
            "↑↓←→".blue().bold(),
            "x".blue().bold(),
            "Click".blue().bold(),
            "q".blue().bold(),
        )?;

        output.flush()?;

        Ok(())
    }

    fn update(mut self, message: Option<Event>, now: Instant) -> Result<Option<Widget>> {
        self.needs_clear = false;

        if let Some(action) = message.as_ref().and_then(Action::from_event) {
            if !self.apply(action, now) {
                return Ok(None);
            }
        }

        self.sim.poll(now);

        Ok(Some(self))
    }
}

impl<'a, T> App<'a, T>
where
    T: Write,
{
    pub fn new(options: Options<'a, T>) -> Self {
        let widget = Widget::new(&options.settings);
        App { options, widget }
    }

    pub fn run(self) -> Result<()> {
        let App { options, widget } = self;

        let terminal = TerminalGuard::enter(options.output)?;
        info!("widget opened");

        let result = event_loop(&mut *terminal.output, widget);

        drop(terminal);
        info!("widget closed");

        result
    }
}

/// Holds the terminal in raw mode with the alternate screen up. Dropping it puts the
/// terminal back, on early returns and panics as well.
struct TerminalGuard<'a, W: Write> {
    output: &'a mut W,
}

impl<'a, W: Write> TerminalGuard<'a, W> {
    fn enter(output: &'a mut W) -> Result<Self> {
        crossterm::terminal::enable_raw_mode().context("failed to enable raw mode")?;
        TerminalGuard { output }.prepare()
    }

    fn prepare(self) -> Result<Self> {
        execute!(
            self.output,
            EnterAlternateScreen,
            EnableMouseCapture,
            DisableBlinking,
            Hide
        )
        .context("failed to prepare terminal")?;

        Ok(self)
    }
}

impl<W: Write> Drop for TerminalGuard<'_, W> {
    fn drop(&mut self) {
        if let Err(err) = execute!(
            self.output,
            DisableMouseCapture,
            LeaveAlternateScreen,
            EnableBlinking,
            Show
        ) {
            error!(?err, "failed to restore terminal");
        }
        if let Err(err) = crossterm::terminal::disable_raw_mode() {
            error!(?err, "failed to disable raw mode");
        }
    }
}

fn event_loop(output: &mut impl Write, mut widget: Widget) -> Result<()> {
    loop {
        widget.display(output)?;

        let timeout = widget
            .simulation()
            .time_until_tick(Instant::now())
            .unwrap_or(IDLE_POLL);
        let event = if crossterm::event::poll(timeout)? {
            Some(crossterm::event::read()?)
        } else {
            None
        };

        match widget.update(event, Instant::now())? {
            Some(next) => widget = next,
            None => return Ok(()),
        }
    }
}
