pub mod detail_overlay;
pub mod dex_list;
pub mod search_bar;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use detail_overlay::{DetailOverlay, DetailOverlayProps};
pub use dex_list::{DexList, DexListProps};
pub use search_bar::{SearchBar, SearchBarProps};

use ratatui::style::Color;

pub const BG_BASE: Color = Color::Rgb(14, 18, 30);
pub const BG_PANEL: Color = Color::Rgb(24, 30, 46);
pub const TEXT_MAIN: Color = Color::Rgb(232, 238, 244);
pub const TEXT_DIM: Color = Color::Rgb(150, 162, 180);
pub const ACCENT: Color = Color::Rgb(236, 92, 92);

/// Accent color per creature type, mirroring the classic type chart.
pub fn type_color(type_name: &str) -> Color {
    match type_name {
        "normal" => Color::Rgb(168, 168, 120),
        "fire" => Color::Rgb(240, 128, 48),
        "water" => Color::Rgb(104, 144, 240),
        "electric" => Color::Rgb(248, 208, 48),
        "grass" => Color::Rgb(120, 200, 80),
        "ice" => Color::Rgb(152, 216, 216),
        "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "ground" => Color::Rgb(224, 192, 104),
        "flying" => Color::Rgb(168, 144, 240),
        "psychic" => Color::Rgb(248, 88, 136),
        "bug" => Color::Rgb(168, 184, 32),
        "rock" => Color::Rgb(184, 160, 56),
        "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "dark" => Color::Rgb(112, 88, 72),
        "steel" => Color::Rgb(184, 184, 208),
        "fairy" => Color::Rgb(238, 153, 172),
        _ => TEXT_DIM,
    }
}

/// "mime-jr" -> "Mime Jr"
pub fn format_name(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    let rest = chars.as_str();
                    format!("{}{}", first.to_ascii_uppercase(), rest)
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        assert_eq!(format_name("turtwig"), "Turtwig");
        assert_eq!(format_name("mime-jr"), "Mime Jr");
        assert_eq!(format_name(""), "");
    }
}
