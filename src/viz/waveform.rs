//! Waveform widget for ratatui

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
};

const PLACEHOLDER: &str = "Play notes to see waveform";

/// A widget that displays a 16-bit preview slice, one sample per column
///
/// The slice is treated as periodic; `offset` scrolls it sideways.
pub struct Waveform<'a> {
    samples: &'a [i16],
    offset: usize,
    style: Style,
    block: Option<Block<'a>>,
}

impl<'a> Waveform<'a> {
    pub fn new(samples: &'a [i16]) -> Self {
        Self {
            samples,
            offset: 0,
            style: Style::default(),
            block: None,
        }
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Normalized value shown in column `x`
    fn value_at(&self, x: usize) -> f32 {
        let idx = (x + self.offset) % self.samples.len();
        self.samples[idx] as f32 / i16::MAX as f32
    }

    /// Render the waveform in the given area
    fn render_waveform(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.samples.is_empty() {
            let x = area.x + area.width.saturating_sub(PLACEHOLDER.len() as u16) / 2;
            let y = area.y + area.height / 2;
            buf.set_stringn(x, y, PLACEHOLDER, area.width as usize, Style::default());
            return;
        }

        let width = area.width as usize;
        let height = area.height as usize;
        let center_y = area.y + (height / 2) as u16;
        let half_height = (height / 2) as f32;

        for x in 0..width {
            let value = self.value_at(x);
            let y_offset = (value * half_height).clamp(-half_height, half_height) as i16;
            let screen_x = area.x + x as u16;

            // Vertical bar from the center line to the sample
            for dy in 0..=y_offset.unsigned_abs() {
                let y = if y_offset >= 0 {
                    center_y.checked_sub(dy)
                } else {
                    Some(center_y + dy)
                };
                if let Some(y) = y.filter(|&y| y >= area.y && y < area.y + area.height) {
                    buf.set_string(screen_x, y, "│", self.style);
                }
            }
        }
    }
}

impl Widget for Waveform<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        self.render_waveform(inner_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_waveform_empty_shows_placeholder() {
        let waveform = Waveform::new(&[]);
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        waveform.render(area, &mut buf);
        assert!(row(&buf, 2).contains("Play notes"));
    }

    #[test]
    fn test_waveform_bars() {
        let samples = [i16::MAX, 0, -i16::MAX];
        let waveform = Waveform::new(&samples);
        let area = Rect::new(0, 0, 3, 5);
        let mut buf = Buffer::empty(area);
        waveform.render(area, &mut buf);

        // Column 0 reaches the top, column 2 the bottom
        assert_eq!(buf[(0, 0)].symbol(), "│");
        assert_eq!(buf[(0, 4)].symbol(), " ");
        assert_eq!(buf[(2, 4)].symbol(), "│");
        assert_eq!(buf[(2, 0)].symbol(), " ");
        assert_eq!(buf[(1, 2)].symbol(), "│");
    }

    #[test]
    fn test_waveform_offset_wraps() {
        let samples = [1, 2, 3];
        let waveform = Waveform::new(&samples).offset(4);
        assert_eq!(waveform.value_at(0), 2.0 / i16::MAX as f32);
        assert_eq!(waveform.value_at(2), 1.0 / i16::MAX as f32);
    }

    #[test]
    fn test_waveform_with_block() {
        let samples = vec![16000; 10];
        let waveform = Waveform::new(&samples)
            .block(ratatui::widgets::Block::default().title("Test"));
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        waveform.render(area, &mut buf);
        assert!(row(&buf, 0).starts_with("Test"));
    }

    #[test]
    fn test_waveform_style() {
        use ratatui::style::Color;
        let samples = vec![100; 5];
        let waveform = Waveform::new(&samples).style(Style::default().fg(Color::Red));
        assert_eq!(waveform.style.fg, Some(Color::Red));
    }
}
