//! Badge colours for record categories.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

pub const GREEN: Color = Color::rgba(0, 128, 0, 0.3);
pub const BLUE: Color = Color::rgba(0, 123, 255, 0.3);
pub const RED: Color = Color::rgba(255, 0, 0, 0.3);
pub const AMBER: Color = Color::rgba(255, 193, 7, 0.3);
pub const GREY: Color = Color::rgba(128, 128, 128, 0.3);

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Color { r, g, b, alpha }
    }

    /// CSS form, as the web dashboard styled its badges
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
    }

    /// White text on a 24-bit ANSI background
    pub fn badge(&self, text: &str) -> String {
        format!(
            "\x1b[97;48;2;{};{};{}m {} \x1b[0m",
            self.r, self.g, self.b, text
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    TransactionType,
    TransactionStatus,
    BotStatus,
}

/// Colour for a category value; matching ignores case, unknown values are grey
pub fn color_for(category: Category, value: &str) -> Color {
    let value = value.trim().to_lowercase();
    match (category, value.as_str()) {
        (Category::TransactionType, "deposit") => GREEN,
        (Category::TransactionType, "investment") => BLUE,
        (Category::TransactionType, "withdrawal") => RED,
        (Category::TransactionStatus, "pending") => AMBER,
        (Category::TransactionStatus, "in progress") => BLUE,
        (Category::TransactionStatus, "approved") => GREEN,
        (Category::TransactionStatus, "declined" | "rejected") => RED,
        (Category::BotStatus, "active") => GREEN,
        (Category::BotStatus, "inactive") => RED,
        _ => GREY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lookup() {
        assert_eq!(color_for(Category::TransactionType, "Deposit"), GREEN);
        assert_eq!(color_for(Category::TransactionStatus, "in progress"), BLUE);
        assert_eq!(color_for(Category::TransactionStatus, "rejected"), RED);
        assert_eq!(color_for(Category::TransactionStatus, "declined"), RED);
        assert_eq!(color_for(Category::BotStatus, "inactive"), RED);
        assert_eq!(color_for(Category::BotStatus, "paused"), GREY);
        assert_eq!(color_for(Category::TransactionType, "active"), GREY);
    }

    #[test]
    fn test_css_and_badge() {
        assert_eq!(AMBER.css(), "rgba(255, 193, 7, 0.3)");
        assert_eq!(GREEN.badge("ok"), "\x1b[97;48;2;0;128;0m ok \x1b[0m");
    }
}
