//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::Palette;
use crate::powerup::PowerUpKind;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Garden and UI colours. Defaults are One Dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Empty or dry cell background.
    pub soil: Color,
    /// Background of watered cells.
    pub wet_soil: Color,
    /// Harvestable cells.
    pub mature: Color,
    pub cursor: Color,
    pub money: Color,
    pub sunlight: Color,
    pub frozen: Color,
    /// Low time, rejected input.
    pub warning: Color,
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    pub main_fg: Color,
    pub title: Color,
    /// Out of stock, unaffordable, used up.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    pub fn onedark_default() -> Self {
        Self {
            soil: Color::Rgb(0x4B, 0x3F, 0x35),
            wet_soil: Color::Rgb(0x2F, 0x4A, 0x66),
            mature: Color::Rgb(0x98, 0xC3, 0x79),
            cursor: Color::Rgb(0xC6, 0x78, 0xDD),
            money: Color::Rgb(0x98, 0xC3, 0x79),
            sunlight: Color::Rgb(0xE5, 0xC0, 0x7B),
            frozen: Color::Rgb(0x56, 0xB6, 0xC2),
            warning: Color::Rgb(0xE0, 0x6C, 0x75),
            bg: Color::Rgb(0x31, 0x35, 0x3F),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
            inactive_fg: Color::Rgb(0x5C, 0x63, 0x70),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark if path is None or the file is missing.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override the garden colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                self.soil = Color::Rgb(0x55, 0x33, 0x00);
                self.wet_soil = Color::Rgb(0x00, 0x44, 0xCC);
                self.mature = Color::Rgb(0x00, 0xFF, 0x00);
                self.cursor = Color::Rgb(0xFF, 0x00, 0xFF);
                self.money = Color::Rgb(0x00, 0xFF, 0x00);
                self.sunlight = Color::Rgb(0xFF, 0xFF, 0x00);
                self.frozen = Color::Rgb(0x00, 0xFF, 0xFF);
                self.warning = Color::Rgb(0xFF, 0x00, 0x00);
            }
            Palette::Colorblind => {
                // Blue/orange pairs; never red against green.
                self.soil = Color::Rgb(0x55, 0x44, 0x33);
                self.wet_soil = Color::Rgb(0x00, 0x77, 0xBB);
                self.mature = Color::Rgb(0xEE, 0x77, 0x33);
                self.cursor = Color::Rgb(0xEE, 0x33, 0x77);
                self.money = Color::Rgb(0x00, 0x99, 0x88);
                self.sunlight = Color::Rgb(0xBB, 0xBB, 0x00);
                self.frozen = Color::Rgb(0x33, 0xBB, 0xEE);
                self.warning = Color::Rgb(0xCC, 0x33, 0x11);
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let d = Self::onedark_default();
        Self {
            soil: get("selected_bg").unwrap_or(d.soil),
            wet_soil: get("cpu_box").unwrap_or(d.wet_soil),
            mature: get("mem_box").or_else(|| get("cpu_start")).unwrap_or(d.mature),
            cursor: get("net_box").unwrap_or(d.cursor),
            money: get("cpu_start").or_else(|| get("mem_box")).unwrap_or(d.money),
            sunlight: get("cpu_mid").or_else(|| get("title")).unwrap_or(d.sunlight),
            frozen: get("hi_fg").or_else(|| get("proc_misc")).unwrap_or(d.frozen),
            warning: get("cpu_end").or_else(|| get("temp_end")).unwrap_or(d.warning),
            bg: get("meter_bg").unwrap_or(d.bg),
            div_line: get("div_line").unwrap_or(d.div_line),
            main_fg: get("main_fg").unwrap_or(d.main_fg),
            title: get("title").unwrap_or(d.title),
            inactive_fg: get("inactive_fg").unwrap_or(d.inactive_fg),
        }
    }

    /// Tint for an active power-up.
    pub fn power_up_color(&self, kind: PowerUpKind) -> Color {
        match kind {
            PowerUpKind::Sunlight => self.sunlight,
            PowerUpKind::Frozen => self.frozen,
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GG0000").is_err());
        assert!(parse_hex("#ééé").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[meter_bg]="#31353F""##);
        assert_eq!(map.get("meter_bg"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_from_map_falls_back_per_key() {
        let map = parse_theme_file(
            "# comment\ntheme[cpu_box]='#0000FF'\ntheme[hi_fg]=\"#00FFFF\"\ntheme[title]=\"nope\"\n",
        );
        let t = Theme::from_map(&map);
        assert_eq!(t.wet_soil, Color::Rgb(0, 0, 255));
        assert_eq!(t.frozen, Color::Rgb(0, 255, 255));
        assert_eq!(t.title, Theme::onedark_default().title);
        assert_eq!(t.soil, Theme::onedark_default().soil);
    }

    #[test]
    fn test_palettes_change_garden_colours_only() {
        let base = Theme::onedark_default();
        for palette in [Palette::HighContrast, Palette::Colorblind] {
            let mut t = base.clone();
            t.apply_palette(palette);
            assert_ne!(t.mature, base.mature);
            assert_ne!(t.power_up_color(PowerUpKind::Frozen), base.frozen);
            assert_eq!(t.bg, base.bg);
            assert_eq!(t.main_fg, base.main_fg);
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let t = Theme::load(Some(Path::new("/nonexistent/garden.theme")), Palette::Normal).unwrap();
        assert_eq!(t, Theme::default());
    }
}
