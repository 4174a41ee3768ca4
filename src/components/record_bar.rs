use crate::stats::TeamRecord;
use crate::ui::theme::Palette;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::widgets::Widget;

/// Horizontal win/draw/loss bar. Segment widths are proportional to the
/// tallies; every non-zero tally gets at least one cell so rare outcomes
/// stay visible.
pub struct RecordBar<'a> {
    pub record: &'a TeamRecord,
    pub palette: Palette,
}

impl RecordBar<'_> {
    /// Distribute `width` cells across the three tallies. Largest-remainder
    /// rounding keeps the total exactly at `width`.
    fn segments(&self, width: u16) -> [u16; 3] {
        let tallies = [self.record.wins, self.record.draws, self.record.losses];
        let total: u32 = tallies.iter().sum();
        if total == 0 || width == 0 {
            return [0, 0, 0];
        }

        let mut out = [0u16; 3];
        let mut assigned = 0u16;
        for (i, &tally) in tallies.iter().enumerate() {
            let exact = u64::from(tally) * u64::from(width) / u64::from(total);
            let mut cells = exact as u16;
            if tally > 0 && cells == 0 {
                cells = 1;
            }
            out[i] = cells;
            assigned = assigned.saturating_add(cells);
        }

        // Rounding drift: give or take cells from the largest segment.
        let largest = (0..3).max_by_key(|&i| out[i]).unwrap_or(0);
        if assigned < width {
            out[largest] += width - assigned;
        } else if assigned > width {
            out[largest] = out[largest].saturating_sub(assigned - width);
        }
        out
    }
}

impl Widget for RecordBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let [wins, draws, losses] = self.segments(area.width);
        let colors = [self.palette.win, self.palette.draw, self.palette.loss];

        let mut x = area.x;
        for (cells, color) in [wins, draws, losses].into_iter().zip(colors) {
            for _ in 0..cells {
                if x >= area.x + area.width {
                    return;
                }
                if let Some(cell) = buf.cell_mut((x, area.y)) {
                    cell.set_symbol("█").set_style(Style::default().fg(color));
                }
                x += 1;
            }
        }
    }
}
