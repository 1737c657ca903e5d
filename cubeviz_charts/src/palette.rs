// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A default categorical palette.
//!
//! Series builders never pick colors; chart compilers take a color function from the caller and
//! fall back to this palette when none is given.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::HashMap;
use peniko::Color;
use peniko::color::palette::css;

/// Maps a segment or category name to a color string.
pub type SharedColorFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

const PALETTE: [Color; 8] = [
    css::CORNFLOWER_BLUE,
    css::ORANGE,
    css::MEDIUM_SEA_GREEN,
    css::CRIMSON,
    css::GOLDENROD,
    css::SLATE_BLUE,
    css::DARK_CYAN,
    css::HOT_PINK,
];

/// Formats a color as `#rrggbb`, ignoring alpha.
pub fn color_hex(color: Color) -> String {
    let c = color.to_rgba8();
    alloc::format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// The `index`-th palette color; colors repeat after the palette is exhausted.
pub fn palette_color(index: usize) -> String {
    color_hex(PALETTE[index % PALETTE.len()])
}

/// A color function assigning palette colors to `keys` by position.
///
/// Keys outside `keys` get the first palette color.
pub fn categorical_colors<S: AsRef<str>>(keys: &[S]) -> SharedColorFn {
    let by_key: HashMap<String, String> = keys
        .iter()
        .enumerate()
        .map(|(i, k)| (String::from(k.as_ref()), palette_color(i)))
        .collect();
    Arc::new(move |key| by_key.get(key).cloned().unwrap_or_else(|| palette_color(0)))
}

/// The first `count` palette colors.
pub fn palette_colors(count: usize) -> Vec<String> {
    (0..count).map(palette_color).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_colors_render_as_hex() {
        assert_eq!(color_hex(css::CRIMSON), "#dc143c");
        assert_eq!(palette_color(0), "#6495ed");
        assert_eq!(palette_color(8), palette_color(0));
    }

    #[test]
    fn categorical_colors_follow_key_order() {
        let colors = categorical_colors(&["b", "a"]);
        assert_eq!(colors("b"), palette_color(0));
        assert_eq!(colors("a"), palette_color(1));
        assert_eq!(colors("zzz"), palette_color(0));
        assert_eq!(palette_colors(3).len(), 3);
    }
}
