use std::fmt;

use crate::{
    foundation::core::{Progress, Rect, Viewport},
    foundation::error::{StageError, StageResult},
};

/// A position along an element or the viewport, measured from its top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Start,
    Center,
    End,
    /// Fraction of the length (`0.25`, or `25%` when parsed).
    Fraction(f64),
    Px(f64),
}

impl Edge {
    pub fn parse(s: &str) -> StageResult<Self> {
        let s = s.trim();
        let edge = match s {
            "start" | "top" => Self::Start,
            "center" => Self::Center,
            "end" | "bottom" => Self::End,
            _ => {
                let bad = || StageError::config(format!("invalid offset edge '{s}'"));
                if let Some(px) = s.strip_suffix("px") {
                    Self::Px(px.trim().parse().map_err(|_| bad())?)
                } else if let Some(pct) = s.strip_suffix('%') {
                    let v: f64 = pct.trim().parse().map_err(|_| bad())?;
                    Self::Fraction(v / 100.0)
                } else {
                    Self::Fraction(s.parse().map_err(|_| bad())?)
                }
            }
        };
        match edge {
            Self::Fraction(v) | Self::Px(v) if !v.is_finite() => Err(StageError::config(format!(
                "offset edge '{s}' must be finite"
            ))),
            _ => Ok(edge),
        }
    }

    /// Distance from the top of a box of `length` pixels.
    pub fn resolve(self, length: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => length / 2.0,
            Self::End => length,
            Self::Fraction(f) => length * f,
            Self::Px(px) => px,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Center => f.write_str("center"),
            Self::End => f.write_str("end"),
            Self::Fraction(v) => write!(f, "{v}"),
            Self::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// `"<element edge> <viewport edge>"`: the scroll position where the two edges meet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetPair {
    pub target: Edge,
    pub container: Edge,
}

impl OffsetPair {
    pub fn parse(s: &str) -> StageResult<Self> {
        let mut parts = s.split_whitespace();
        let (Some(target), Some(container), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(StageError::config(format!(
                "offset '{s}' must name exactly two edges"
            )));
        };
        Ok(Self {
            target: Edge::parse(target)?,
            container: Edge::parse(container)?,
        })
    }

    /// Scroll offset at which the element edge aligns with the viewport edge.
    pub fn scroll_position(&self, element: Rect, viewport_height: f64) -> f64 {
        element.y0 + self.target.resolve(element.height()) - self.container.resolve(viewport_height)
    }
}

impl fmt::Display for OffsetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target, self.container)
    }
}

/// Which element/viewport intersections map to progress 0 and 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "[String; 2]", into = "[String; 2]")]
pub struct ScrollOffset {
    pub start: OffsetPair,
    pub end: OffsetPair,
}

impl Default for ScrollOffset {
    /// `["start start", "end end"]`: the element's top reaching the viewport top is 0, its bottom
    /// reaching the viewport bottom is 1.
    fn default() -> Self {
        Self {
            start: OffsetPair {
                target: Edge::Start,
                container: Edge::Start,
            },
            end: OffsetPair {
                target: Edge::End,
                container: Edge::End,
            },
        }
    }
}

impl TryFrom<[String; 2]> for ScrollOffset {
    type Error = StageError;

    fn try_from([start, end]: [String; 2]) -> StageResult<Self> {
        Self::parse(&start, &end)
    }
}

impl From<ScrollOffset> for [String; 2] {
    fn from(o: ScrollOffset) -> Self {
        [o.start.to_string(), o.end.to_string()]
    }
}

impl ScrollOffset {
    pub fn parse(start: &str, end: &str) -> StageResult<Self> {
        Ok(Self {
            start: OffsetPair::parse(start)?,
            end: OffsetPair::parse(end)?,
        })
    }

    /// `["start center", "end center"]`: tracks the element crossing the middle of the viewport.
    pub fn through_center() -> Self {
        Self {
            start: OffsetPair {
                target: Edge::Start,
                container: Edge::Center,
            },
            end: OffsetPair {
                target: Edge::End,
                container: Edge::Center,
            },
        }
    }

    /// `["start end", "end start"]`: from the element's top entering at the bottom of the viewport
    /// until its bottom leaves at the top.
    pub fn crossing() -> Self {
        Self {
            start: OffsetPair {
                target: Edge::Start,
                container: Edge::End,
            },
            end: OffsetPair {
                target: Edge::End,
                container: Edge::Start,
            },
        }
    }

    /// Scroll offsets mapped to progress 0 and 1.
    pub fn scroll_range(&self, element: Rect, viewport: Viewport) -> (f64, f64) {
        (
            self.start.scroll_position(element, viewport.height),
            self.end.scroll_position(element, viewport.height),
        )
    }

    pub fn progress(&self, scroll_y: f64, element: Rect, viewport: Viewport) -> Progress {
        let (s0, s1) = self.scroll_range(element, viewport);
        Progress::from_ratio(scroll_y - s0, s1 - s0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/offset.rs"]
mod tests;
