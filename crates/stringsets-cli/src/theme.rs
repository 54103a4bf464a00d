use crossterm::style::Color;

/// Colors for command output
#[derive(Debug, Clone)]
pub struct Theme {
    /// Set ids
    pub id: Color,
    /// String values
    pub value: Color,
    /// Link arrows and separators
    pub border: Color,
    /// Marker where a chain switches sets
    pub switch: Color,
    /// Error messages
    pub error: Color,
    /// Warnings (incomplete searches)
    pub warning: Color,
    /// Summary and info text
    pub info: Color,
    /// Command names in help output
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark terminal theme (default)
    pub fn dark() -> Self {
        Self {
            id: Color::Rgb { r: 255, g: 210, b: 100 },
            value: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 130, g: 140, b: 170 },
            switch: Color::Rgb { r: 80, g: 180, b: 255 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            warning: Color::Rgb { r: 255, g: 170, b: 60 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 90, g: 255, b: 130 },
        }
    }
}
