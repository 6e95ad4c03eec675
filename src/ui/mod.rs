//! The terminal dashboard: owns the terminal, renders a [`view::MachineSnapshot`]
//! every tick, and maps keystrokes onto [`crate::cpu::Cpu`] commands.
//!
//! Grounded on `ui/ui.go`'s `termui`-based render loop — poll for input,
//! re-render, repeat — translated onto `ratatui` + `crossterm`'s raw-mode /
//! alternate-screen idiom.

pub mod view;

use crate::cpu::Cpu;
use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, ExecutableCommand as _};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use view::MachineSnapshot;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the dashboard until the user quits. Returns the CPU's last fault, if
/// the machine halted on one while the UI was up.
pub fn run(cpu: Arc<Cpu>) -> io::Result<Option<crate::error::VmError>> {
    let status = Arc::new(Mutex::new("initialized".to_string()));
    let last_exec = Arc::new(Mutex::new(String::new()));

    {
        let status = Arc::clone(&status);
        cpu.subscribe_start(move || *status.lock().unwrap() = "started".to_string());
    }
    {
        let status = Arc::clone(&status);
        cpu.subscribe_stop(move || *status.lock().unwrap() = "stopped".to_string());
    }
    {
        let last_exec = Arc::clone(&last_exec);
        cpu.subscribe_exec(move |mnemonic| *last_exec.lock().unwrap() = mnemonic.to_string());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &cpu, &status, &last_exec);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cpu: &Arc<Cpu>,
    status: &Arc<Mutex<String>>,
    last_exec: &Arc<Mutex<String>>,
) -> io::Result<Option<crate::error::VmError>> {
    loop {
        let snapshot = MachineSnapshot {
            ram: cpu.memory_snapshot(),
            registers: cpu.registers(),
            status: status.lock().unwrap().clone(),
            last_exec: last_exec.lock().unwrap().clone(),
        };
        terminal.draw(|frame| view::draw(frame, &snapshot))?;

        if let Some(fault) = cpu.take_fault() {
            return Ok(Some(fault));
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('s') => {
                        if let Err(fault) = cpu.step() {
                            return Ok(Some(fault));
                        }
                    }
                    KeyCode::Char('p') => cpu.stop(),
                    KeyCode::Char('o') => cpu.start(),
                    KeyCode::Char('q') => return Ok(None),
                    _ => {}
                }
            }
        }
    }
}
