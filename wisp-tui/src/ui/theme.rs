use ratatui::style::Color;

pub struct ThemeColors {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub text: Color,
    pub text_dim: Color,
    pub background: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub highlight_bg: Color,
}

/// The WISP palette: calm, warm, low-contrast where possible.
pub fn theme() -> ThemeColors {
    ThemeColors {
        primary: Color::Rgb(150, 180, 255),   // Soft periwinkle
        secondary: Color::Rgb(120, 200, 190), // Sea green
        accent: Color::Rgb(255, 180, 140),    // Warm peach
        text: Color::Rgb(225, 225, 220),      // Warm white
        text_dim: Color::Rgb(130, 130, 125),  // Dim gray
        background: Color::Rgb(24, 24, 30),   // Deep blue-gray
        border: Color::Rgb(70, 70, 85),       // Muted border
        success: Color::Rgb(140, 220, 160),   // Soft green
        warning: Color::Rgb(240, 200, 120),   // Soft amber
        error: Color::Rgb(240, 130, 130),     // Soft red
        highlight_bg: Color::Rgb(45, 45, 60), // Slightly lighter than bg
    }
}
