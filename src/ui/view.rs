//! The `MachineSnapshot` value type and its ratatui rendering. The UI never
//! touches [`crate::cpu::Cpu`] directly — it only ever sees one of these,
//! per `spec.md` §4.6's "plain value snapshots" contract.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

/// Everything one frame of the dashboard needs to draw.
#[derive(Debug, Clone)]
pub struct MachineSnapshot {
    pub ram: Vec<u8>,
    pub registers: Vec<String>,
    pub status: String,
    pub last_exec: String,
}

/// 16 bytes per row, `%06x:` address prefix, matching `ui/ui.go`'s memory
/// panel formatting.
fn format_ram(ram: &[u8]) -> Vec<String> {
    ram.chunks(16)
        .enumerate()
        .map(|(row, chunk)| {
            let bytes: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
            format!("{:06x}: {}", row * 16, bytes.join(" "))
        })
        .collect()
}

pub fn draw(frame: &mut Frame, snapshot: &MachineSnapshot) {
    let area = frame.area();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    draw_left_column(frame, columns[0], snapshot);
    draw_ram(frame, columns[1], snapshot);
}

fn draw_left_column(frame: &mut Frame, area: Rect, snapshot: &MachineSnapshot) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(11),
        ])
        .split(area);

    let instructions = List::new(vec![
        ListItem::new("[s] Step"),
        ListItem::new("[p] Pause"),
        ListItem::new("[o] Continue"),
        ListItem::new("[q] Quit"),
    ])
    .block(Block::default().title("Instructions").borders(Borders::ALL));
    frame.render_widget(instructions, rows[0]);

    let status = Paragraph::new(Line::from(snapshot.status.clone()))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().title("Status").borders(Borders::ALL));
    frame.render_widget(status, rows[1]);

    let last_exec = Paragraph::new(Line::from(snapshot.last_exec.clone()))
        .block(Block::default().title("Last executed").borders(Borders::ALL));
    frame.render_widget(last_exec, rows[2]);

    let registers: Vec<ListItem> = snapshot
        .registers
        .iter()
        .map(|line| ListItem::new(line.clone()))
        .collect();
    let registers = List::new(registers)
        .block(Block::default().title("Registers").borders(Borders::ALL));
    frame.render_widget(registers, rows[3]);
}

fn draw_ram(frame: &mut Frame, area: Rect, snapshot: &MachineSnapshot) {
    let lines: Vec<ListItem> = format_ram(&snapshot.ram)
        .into_iter()
        .map(ListItem::new)
        .collect();
    let ram = List::new(lines).block(Block::default().title("RAM").borders(Borders::ALL));
    frame.render_widget(ram, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_ram_rows_are_sixteen_bytes_wide() {
        let ram = vec![0u8; 32];
        let rows = format_ram(&ram);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("000000:"));
        assert!(rows[1].starts_with("000010:"));
    }
}
