//! Small value types shared by the graph, the renderer, and the views.

/// An RGB triple as written in sequence description files (`[r, g, b]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Accept a YAML sequence of exactly three integers in `0..=255`.
    ///
    /// Anything else (wrong length, floats, strings) yields `None` so a badly
    /// written color only loses the color, not the whole sequence record.
    pub fn from_yaml(value: &serde_yaml::Value) -> Option<Self> {
        let items = value.as_sequence()?;
        if items.len() != 3 {
            return None;
        }
        let mut rgb = [0u8; 3];
        for (slot, item) in rgb.iter_mut().zip(items) {
            *slot = u8::try_from(item.as_u64()?).ok()?;
        }
        Some(Self(rgb))
    }

    pub fn to_css(self) -> String {
        let [r, g, b] = self.0;
        format!("rgb({r}, {g}, {b})")
    }
}

/// Light/dark accent pair used to tint a sequence's boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accent {
    pub light: Rgb,
    pub dark: Rgb,
}

impl Accent {
    /// CSS rules giving `.class` the light color and the dark-theme variant
    /// the dark color.
    pub fn css_rules(&self, class: &str) -> String {
        format!(
            ".{class} {{ background-color: {light}; }}\n[data-theme=\"dark\"] .{class} {{ background-color: {dark}; }}",
            light = self.light.to_css(),
            dark = self.dark.to_css(),
        )
    }
}
