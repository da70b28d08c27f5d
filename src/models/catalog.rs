//! Icon and color catalogs and the default message set.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::models::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconOption {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorOption {
    pub hex: &'static str,
    pub name: &'static str,
}

const fn entry(name: &'static str, label: &'static str, category: &'static str) -> IconOption {
    IconOption { name, label, category }
}

const fn swatch(hex: &'static str, name: &'static str) -> ColorOption {
    ColorOption { hex, name }
}

pub const ICON_CATEGORIES: [&str; 7] = [
    "Alerts",
    "Movement",
    "Vehicle",
    "Stops",
    "Communication",
    "Weather",
    "Actions",
];

pub const ICONS: &[IconOption] = &[
    entry("alert", "Alert", "Alerts"),
    entry("alert-circle", "Alert Circle", "Alerts"),
    entry("alert-octagon", "Alert Octagon", "Alerts"),
    entry("alert-rhombus", "Alert Diamond", "Alerts"),
    entry("car-brake-alert", "Brake Alert", "Alerts"),
    entry("map-marker-alert", "Location Alert", "Alerts"),
    entry("bell-alert", "Bell Alert", "Alerts"),
    entry("hazard-lights", "Hazard", "Alerts"),
    entry("speedometer", "Speedometer", "Movement"),
    entry("speedometer-slow", "Slow Down", "Movement"),
    entry("speedometer-medium", "Medium Speed", "Movement"),
    entry("navigation", "Navigate", "Movement"),
    entry("compass", "Compass", "Movement"),
    entry("map-marker", "Location", "Movement"),
    entry("map-marker-check", "Destination", "Movement"),
    entry("arrow-up-bold", "Go Ahead", "Movement"),
    entry("arrow-left-bold", "Turn Left", "Movement"),
    entry("arrow-right-bold", "Turn Right", "Movement"),
    entry("u-turn-left", "U-Turn", "Movement"),
    entry("sign-direction", "Direction", "Movement"),
    entry("gas-station", "Gas Station", "Vehicle"),
    entry("motorbike", "Motorbike", "Vehicle"),
    entry("bike", "Bicycle", "Vehicle"),
    entry("car", "Car", "Vehicle"),
    entry("car-brake-parking", "Parking", "Vehicle"),
    entry("engine", "Engine", "Vehicle"),
    entry("oil", "Oil", "Vehicle"),
    entry("tire", "Tire", "Vehicle"),
    entry("wrench", "Repair", "Vehicle"),
    entry("coffee", "Coffee", "Stops"),
    entry("food", "Food", "Stops"),
    entry("food-fork-drink", "Restaurant", "Stops"),
    entry("bed", "Rest", "Stops"),
    entry("hospital-box", "Hospital", "Stops"),
    entry("water", "Water", "Stops"),
    entry("toilet", "Restroom", "Stops"),
    entry("store", "Store", "Stops"),
    entry("hand-back-left", "Stop/Wait", "Communication"),
    entry("hand-wave", "Wave", "Communication"),
    entry("thumb-up", "Thumbs Up", "Communication"),
    entry("thumb-down", "Thumbs Down", "Communication"),
    entry("check-circle", "OK", "Communication"),
    entry("close-circle", "No", "Communication"),
    entry("phone", "Call", "Communication"),
    entry("message-text", "Message", "Communication"),
    entry("bullhorn", "Announce", "Communication"),
    entry("eye", "Watch Out", "Communication"),
    entry("weather-rainy", "Rain", "Weather"),
    entry("weather-sunny", "Sunny", "Weather"),
    entry("weather-fog", "Fog", "Weather"),
    entry("road-variant", "Road", "Weather"),
    entry("image-filter-hdr", "Mountain", "Weather"),
    entry("camera", "Photo Stop", "Actions"),
    entry("map", "Check Map", "Actions"),
    entry("clock-fast", "Hurry", "Actions"),
    entry("pause-circle", "Pause", "Actions"),
    entry("play-circle", "Go", "Actions"),
    entry("stop-circle", "Stop", "Actions"),
    entry("home", "Head Home", "Actions"),
    entry("flag-checkered", "Finish", "Actions"),
    entry("star", "Important", "Actions"),
    entry("heart", "Love It", "Actions"),
];

pub const COLORS: &[ColorOption] = &[
    swatch("#E74C3C", "Red"),
    swatch("#C0392B", "Dark Red"),
    swatch("#FF6B6B", "Coral"),
    swatch("#E67E22", "Orange"),
    swatch("#F39C12", "Amber"),
    swatch("#FF9F43", "Light Orange"),
    swatch("#F1C40F", "Yellow"),
    swatch("#FECA57", "Sunflower"),
    swatch("#2ECC71", "Green"),
    swatch("#27AE60", "Dark Green"),
    swatch("#1ABC9C", "Turquoise"),
    swatch("#00B894", "Mint"),
    swatch("#3498DB", "Blue"),
    swatch("#2980B9", "Dark Blue"),
    swatch("#74B9FF", "Light Blue"),
    swatch("#0984E3", "Royal Blue"),
    swatch("#9B59B6", "Purple"),
    swatch("#8E44AD", "Dark Purple"),
    swatch("#A29BFE", "Lavender"),
    swatch("#6C5CE7", "Indigo"),
    swatch("#FD79A8", "Pink"),
    swatch("#E84393", "Hot Pink"),
    swatch("#FF6F91", "Salmon"),
    swatch("#636E72", "Gray"),
    swatch("#2D3436", "Charcoal"),
    swatch("#B2BEC3", "Silver"),
];

static DEFAULT_MESSAGES: Lazy<Vec<Message>> = Lazy::new(|| {
    [
        ("Gas stop", "gas-station", "#F39C12"),
        ("Slow down", "speedometer-slow", "#E74C3C"),
        ("Food break", "food", "#2ECC71"),
        ("Need a rest", "bed", "#9B59B6"),
        ("Danger ahead", "alert-octagon", "#C0392B"),
        ("All good", "thumb-up", "#3498DB"),
    ]
    .into_iter()
    .enumerate()
    .map(|(idx, (text, icon, color))| Message {
        id: format!("default-{}", idx + 1),
        text: text.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        order: idx as u32,
        last_sent_at: None,
        send_count: 0,
    })
    .collect()
});

pub fn default_messages() -> Vec<Message> {
    DEFAULT_MESSAGES.clone()
}

pub fn icon(name: &str) -> Option<&'static IconOption> {
    ICONS.iter().find(|i| i.name == name)
}

pub fn icons_in_category(category: &str) -> impl Iterator<Item = &'static IconOption> + '_ {
    ICONS.iter().filter(move |i| i.category == category)
}

pub fn palette_color(hex: &str) -> Option<&'static ColorOption> {
    COLORS.iter().find(|c| c.hex.eq_ignore_ascii_case(hex))
}

/// Parses `#RRGGBB` into its channels.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let num = u32::from_str_radix(digits, 16).ok()?;
    Some(((num >> 16) as u8, (num >> 8) as u8, num as u8))
}

fn shift(hex: &str, percent: f64, lighten: bool) -> Option<String> {
    let (r, g, b) = parse_hex(hex)?;
    let amt = (2.55 * percent).round() as i32;
    let adjust = |c: u8| {
        let v = if lighten { c as i32 + amt } else { c as i32 - amt };
        v.clamp(0, 255) as u8
    };
    Some(format!("#{:02x}{:02x}{:02x}", adjust(r), adjust(g), adjust(b)))
}

pub fn lighten_color(hex: &str, percent: f64) -> Option<String> {
    shift(hex, percent, true)
}

pub fn darken_color(hex: &str, percent: f64) -> Option<String> {
    shift(hex, percent, false)
}

/// Black or white, whichever reads better on `hex`.
pub fn contrast_color(hex: &str) -> Option<&'static str> {
    let (r, g, b) = parse_hex(hex)?;
    let luminance = (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0;
    Some(if luminance > 0.5 { "#000000" } else { "#FFFFFF" })
}
