use std::fmt;

use crate::{
    animation::keyframes::Lerp,
    foundation::core::{Percent, Px, fmt_num},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Display {
    #[default]
    Flex,
    None,
}

impl Display {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Flex => "flex",
            Self::None => "none",
        }
    }

    pub fn is_visible(self) -> bool {
        self == Self::Flex
    }
}

/// `clip-path: inset(top right bottom left round radius)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipInset {
    pub top: Percent,
    pub right: Percent,
    pub bottom: Percent,
    pub left: Percent,
    pub radius: Px,
}

impl ClipInset {
    /// Covers the full bounds with square corners.
    pub const FULL: Self = Self {
        top: Percent(0.0),
        right: Percent(0.0),
        bottom: Percent(0.0),
        left: Percent(0.0),
        radius: Px(0.0),
    };

    pub fn new(vertical: f64, horizontal: f64, radius_px: f64) -> Self {
        Self {
            top: Percent(vertical),
            right: Percent(horizontal),
            bottom: Percent(vertical),
            left: Percent(horizontal),
            radius: Px(radius_px),
        }
    }

    pub fn is_full(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|p| p.0.abs() < 1e-9)
    }

    /// Fraction of the bounds area left visible (corner rounding ignored).
    pub fn visible_fraction(&self) -> f64 {
        let w = (100.0 - self.left.0 - self.right.0).max(0.0) / 100.0;
        let h = (100.0 - self.top.0 - self.bottom.0).max(0.0) / 100.0;
        w * h
    }
}

impl Lerp for ClipInset {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            top: Percent::lerp(&a.top, &b.top, t),
            right: Percent::lerp(&a.right, &b.right, t),
            bottom: Percent::lerp(&a.bottom, &b.bottom, t),
            left: Percent::lerp(&a.left, &b.left, t),
            radius: Px::lerp(&a.radius, &b.radius, t),
        }
    }
}

impl fmt::Display for ClipInset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inset({} {} {} {} round {})",
            self.top, self.right, self.bottom, self.left, self.radius
        )
    }
}

/// Composed `transform` in the order the presentational layer applies it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub translate_y: Px,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate_y: Px(0.0),
            scale: 1.0,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translateY({}) scale({})",
            self.translate_y,
            fmt_num(self.scale)
        )
    }
}

/// `filter` functions used by the choreography. Identity components are omitted.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Filter {
    pub blur: Px,
    pub grayscale: Percent,
    pub brightness: f64,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            blur: Px(0.0),
            grayscale: Percent(0.0),
            brightness: 1.0,
        }
    }
}

impl Filter {
    pub fn blur(radius_px: f64) -> Self {
        Self {
            blur: Px(radius_px),
            ..Self::default()
        }
    }

    pub fn is_identity(&self) -> bool {
        self.blur.0 == 0.0 && self.grayscale.0 == 0.0 && self.brightness == 1.0
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return f.write_str("none");
        }
        let mut parts = Vec::new();
        if self.blur.0 != 0.0 {
            parts.push(format!("blur({})", self.blur));
        }
        if self.grayscale.0 != 0.0 {
            parts.push(format!("grayscale({})", self.grayscale));
        }
        if self.brightness != 1.0 {
            parts.push(format!("brightness({})", fmt_num(self.brightness)));
        }
        f.write_str(&parts.join(" "))
    }
}

/// Anything the render boundary can paint as inline style.
pub trait ToCss {
    fn declarations(&self) -> Vec<(&'static str, String)>;

    fn to_inline_style(&self) -> String {
        self.declarations()
            .into_iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/css.rs"]
mod tests;
