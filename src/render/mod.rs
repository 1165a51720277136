pub mod menus;
pub mod renderer;

pub use renderer::Renderer;

use ratatui::layout::Rect;

/// Largest area used when fullscreen is off
pub const WINDOW_WIDTH: u16 = 96;
pub const WINDOW_HEIGHT: u16 = 40;

/// A `width` x `height` rectangle centered in `area`, clipped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Whole terminal in fullscreen mode, otherwise a centered window
pub fn app_area(area: Rect, fullscreen: bool) -> Rect {
    if fullscreen {
        area
    } else {
        centered_rect(WINDOW_WIDTH, WINDOW_HEIGHT, area)
    }
}
