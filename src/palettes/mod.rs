//! Built-in palette definitions.
//!
//! Provides a few theme palettes that can be referenced by name using the
//! `@name` syntax on the command line. All of them share the key set
//! `dark`, `grey`, `light`, `primary`, `secondary` with two variants per key,
//! so a pattern decoded with one can be replayed with any other.

use crate::palette::PaletteConfig;

/// List of all available built-in palette names.
const BUILTIN_NAMES: &[&str] = &["default", "dracula", "nord", "gruvbox"];

/// Returns a list of all available built-in palette names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// Returns a built-in palette config by name, or None if not found.
pub fn get_builtin(name: &str) -> Option<PaletteConfig> {
    match name {
        "default" => Some(default_theme()),
        "dracula" => Some(dracula()),
        "nord" => Some(nord()),
        "gruvbox" => Some(gruvbox()),
        _ => None,
    }
}

/// Neutral greys with identical variants. Images drawn with these colors
/// decode cleanly, which makes this the usual source palette.
fn default_theme() -> PaletteConfig {
    PaletteConfig::new()
        .with("dark", &["#333333", "#333333"])
        .with("grey", &["#444444", "#444444"])
        .with("light", &["#555555", "#555555"])
        .with("primary", &["#000000", "#000000"])
        .with("secondary", &["#ffffff", "#ffffff"])
}

/// Reference: https://draculatheme.com/contribute
fn dracula() -> PaletteConfig {
    PaletteConfig::new()
        .with("dark", &["#282a36", "#21222c"])
        .with("grey", &["#44475a", "#6272a4"])
        .with("light", &["#f8f8f2", "#e9e9f4"])
        .with("primary", &["#bd93f9", "#9580ff"])
        .with("secondary", &["#ff79c6", "#ff92df"])
}

/// Reference: https://www.nordtheme.com/docs/colors-and-palettes
fn nord() -> PaletteConfig {
    PaletteConfig::new()
        .with("dark", &["#3b4252", "#2e3440"])
        .with("grey", &["#4c566a", "#434c5e"])
        .with("light", &["#eceff4", "#d8dee9"])
        .with("primary", &["#88c0d0", "#5e81ac"])
        .with("secondary", &["#a3be8c", "#b48ead"])
}

/// Reference: https://github.com/morhetz/gruvbox
fn gruvbox() -> PaletteConfig {
    PaletteConfig::new()
        .with("dark", &["#3c3836", "#282828"])
        .with("grey", &["#665c54", "#504945"])
        .with("light", &["#fbf1c7", "#ebdbb2"])
        .with("primary", &["#fe8019", "#d65d0e"])
        .with("secondary", &["#b8bb26", "#98971a"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;

    #[test]
    fn test_all_builtins_build() {
        for name in list_builtins() {
            let config = get_builtin(name).unwrap_or_else(|| panic!("missing builtin {}", name));
            let palette = Palette::build(name, &config).unwrap();
            assert_eq!(palette.len(), 5, "{} should have five keys", name);
        }
    }

    #[test]
    fn test_builtins_share_structure() {
        let reference = Palette::build("default", &default_theme()).unwrap();
        for name in list_builtins() {
            let palette = Palette::build(name, &get_builtin(name).unwrap()).unwrap();
            for (key, variants) in reference.iter() {
                assert_eq!(
                    palette.variants(key).map(|v| v.len()),
                    Some(variants.len()),
                    "{} key {}",
                    name,
                    key
                );
            }
        }
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(get_builtin("solarized").is_none());
    }
}
