use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use super::app::App;

/// Runs `restore` when dropped unless it already ran through
/// [`TerminalGuard::restore`]. Covers early returns and unwinding panics.
struct TerminalGuard<F: FnMut() -> Result<()>> {
    restore: F,
    armed: bool,
}

impl<F: FnMut() -> Result<()>> TerminalGuard<F> {
    fn new(restore: F) -> Self {
        Self {
            restore,
            armed: true,
        }
    }

    /// Restore now and surface the error instead of swallowing it.
    fn restore(mut self) -> Result<()> {
        self.armed = false;
        (self.restore)()
    }
}

impl<F: FnMut() -> Result<()>> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        if self.armed {
            let _ = (self.restore)();
        }
    }
}

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user quits.
pub fn run_app(app: &mut App) -> Result<()> {
    install_panic_hook();
    enable_raw_mode().context("failed to enable raw mode")?;
    let guard = TerminalGuard::new(restore_terminal);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;

    let result = event_loop(&mut terminal, app);

    guard.restore()?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")?;
    info!("terminal restored");
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if !event::poll(Duration::from_millis(250)).context("event polling failed")? {
            continue;
        }
        let Event::Key(key_event) = event::read().context("failed to read event")? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            match key_event.code {
                KeyCode::Char('c') => return Ok(()),
                KeyCode::Char('s') => {
                    app.handle_ctrl_s()?;
                    continue;
                }
                _ => {}
            }
        }

        if app.handle_key(key_event.code)? {
            return Ok(());
        }
    }
}

/// Leave raw mode and the alternate screen before the default hook prints the
/// panic message, so it lands on the normal screen.
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("failed to leave alternate screen")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn counting_guard(count: &Rc<Cell<u32>>) -> TerminalGuard<impl FnMut() -> Result<()>> {
        let count = Rc::clone(count);
        TerminalGuard::new(move || {
            count.set(count.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn guard_restores_on_early_return() {
        let count = Rc::new(Cell::new(0));
        let setup = || -> Result<()> {
            let _guard = counting_guard(&count);
            anyhow::bail!("failed to create terminal backend");
        };
        assert!(setup().is_err());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn guard_restores_when_the_loop_panics() {
        let count = Rc::new(Cell::new(0));
        let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            let _guard = counting_guard(&count);
            panic!("draw failed");
        }));
        assert!(outcome.is_err());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn explicit_restore_runs_once() {
        let count = Rc::new(Cell::new(0));
        let guard = counting_guard(&count);
        guard.restore().unwrap();
        assert_eq!(count.get(), 1);
    }
}
