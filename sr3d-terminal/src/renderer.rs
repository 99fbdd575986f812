/// Terminal presentation of RGBA frames using half-block cells
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use sr3d_core::Present;

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '▀';

/// Writes each frame as 24-bit colored cells, two pixel rows per terminal row
pub struct TerminalPresenter<W: Write> {
    out: W,
    top_row: u16,
}

impl<W: Write> TerminalPresenter<W> {
    /// `top_row` is the first terminal row used for the image
    pub fn new(out: W, top_row: u16) -> Self {
        Self { out, top_row }
    }

    /// Terminal rows needed for a canvas of `height` pixels
    pub fn rows_for(height: usize) -> usize {
        height.div_ceil(2)
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Present for TerminalPresenter<W> {
    type Error = anyhow::Error;

    fn present(&mut self, pixels: &[u8], width: usize, height: usize) -> anyhow::Result<()> {
        for (row, y) in (0..height).step_by(2).enumerate() {
            self.out
                .queue(cursor::MoveTo(0, self.top_row.saturating_add(row as u16)))?;

            let mut current = None;
            for x in 0..width {
                let top = pixel_color(pixels, width, x, y);
                let bottom = if y + 1 < height {
                    pixel_color(pixels, width, x, y + 1)
                } else {
                    Color::Reset
                };

                // Only emit color changes
                if current != Some((top, bottom)) {
                    self.out
                        .queue(SetForegroundColor(top))?
                        .queue(SetBackgroundColor(bottom))?;
                    current = Some((top, bottom));
                }
                self.out.queue(Print(HALF_BLOCK))?;
            }
        }
        self.out.queue(ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}

fn pixel_color(pixels: &[u8], width: usize, x: usize, y: usize) -> Color {
    let offset = (y * width + x) * 4;
    match pixels.get(offset..offset + 3) {
        Some(&[r, g, b]) => Color::Rgb { r, g, b },
        _ => Color::Reset,
    }
}
