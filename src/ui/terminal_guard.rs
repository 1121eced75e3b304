use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

pub type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Puts the terminal back into cooked mode when dropped or when the
/// process panics. Restoring happens at most once.
pub struct TerminalGuard {
    restored: Arc<AtomicBool>,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore(&self.restored);
    }
}

fn restore(restored: &AtomicBool) {
    if restored.swap(true, Ordering::SeqCst) {
        return;
    }
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Enters raw mode on the alternate screen. Keep the guard alive for as long
/// as the dashboard runs.
pub fn setup_terminal() -> io::Result<(DashboardTerminal, TerminalGuard)> {
    enable_raw_mode()?;
    let restored = Arc::new(AtomicBool::new(false));
    let guard = TerminalGuard {
        restored: Arc::clone(&restored),
    };
    execute!(io::stdout(), EnterAlternateScreen, Clear(ClearType::All), Hide)?;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore(&restored);
        default_hook(info);
    }));

    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    Ok((terminal, guard))
}
