use crate::foundation::error::{StageError, StageResult};

/// Easing curves. `PowerN` names from timeline notation map onto the polynomial family:
/// `power1 = quad`, `power2 = cubic`, `power3 = quart`.
///
/// Page documents spell eases in that notation (`"power2.out"`, `"back.out(1.4)"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    /// Overshoots past 1 before settling; `overshoot` is the back amount (1.70158 by default).
    BackOut { overshoot: f64 },
    /// CSS `cubic-bezier(x1, y1, x2, y2)` with endpoints at `(0,0)` and `(1,1)`.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::BackOut { overshoot } => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u.powi(3) + overshoot * u.powi(2)
            }
            Self::CubicBezier { x1, y1, x2, y2 } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                bezier_axis(y1, y2, solve_bezier_x(x1, x2, t))
            }
        }
    }

    /// Parse timeline ease notation: `"none"`, `"linear"`, `"power2.out"`, `"power3.inOut"`,
    /// `"back.out"`, `"back.out(1.4)"`, `"cubic-bezier(0.22, 1, 0.36, 1)"`.
    pub fn parse(s: &str) -> StageResult<Self> {
        let s = s.trim();
        let (name, args) = match s.split_once('(') {
            Some((name, rest)) => {
                let inner = rest
                    .strip_suffix(')')
                    .ok_or_else(|| StageError::animation(format!("unclosed ease argument in '{s}'")))?;
                let args = inner
                    .split(',')
                    .map(|a| {
                        a.trim().parse::<f64>().map_err(|_| {
                            StageError::animation(format!("invalid ease argument in '{s}'"))
                        })
                    })
                    .collect::<StageResult<Vec<_>>>()?;
                (name.trim(), args)
            }
            None => (s, Vec::new()),
        };

        let ease = match (name, args.as_slice()) {
            ("back.out" | "back", [overshoot]) => Self::BackOut {
                overshoot: *overshoot,
            },
            ("back.out" | "back", []) => Self::BackOut {
                overshoot: 1.70158,
            },
            ("cubic-bezier", [x1, y1, x2, y2]) => {
                if !(0.0..=1.0).contains(x1) || !(0.0..=1.0).contains(x2) {
                    return Err(StageError::animation(format!(
                        "cubic-bezier x values must be within [0, 1] in '{s}'"
                    )));
                }
                Self::CubicBezier {
                    x1: *x1,
                    y1: *y1,
                    x2: *x2,
                    y2: *y2,
                }
            }
            (name, []) => match name {
                "none" | "linear" => Self::Linear,
                "power1.in" | "quad.in" => Self::InQuad,
                "power1.out" | "quad.out" | "power1" => Self::OutQuad,
                "power1.inOut" | "quad.inOut" => Self::InOutQuad,
                "power2.in" | "cubic.in" => Self::InCubic,
                "power2.out" | "cubic.out" | "power2" => Self::OutCubic,
                "power2.inOut" | "cubic.inOut" => Self::InOutCubic,
                "power3.in" | "quart.in" => Self::InQuart,
                "power3.out" | "quart.out" | "power3" => Self::OutQuart,
                "power3.inOut" | "quart.inOut" => Self::InOutQuart,
                "cubic-bezier" => {
                    return Err(StageError::animation("cubic-bezier takes four arguments"));
                }
                other => return Err(StageError::animation(format!("unknown ease '{other}'"))),
            },
            (name, _) => {
                return Err(StageError::animation(format!(
                    "ease '{name}' does not take {} argument(s)",
                    args.len()
                )));
            }
        };
        Ok(ease)
    }

    /// Whether the curve stays within `[0, 1]` for inputs in `[0, 1]`.
    pub fn is_bounded(self) -> bool {
        match self {
            Self::BackOut { overshoot } => overshoot <= 0.0,
            Self::CubicBezier { y1, y2, .. } => {
                (0.0..=1.0).contains(&y1) && (0.0..=1.0).contains(&y2)
            }
            _ => true,
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = StageError;

    fn try_from(s: String) -> StageResult<Self> {
        Self::parse(&s)
    }
}

impl From<Ease> for String {
    fn from(ease: Ease) -> Self {
        ease.to_string()
    }
}

impl std::fmt::Display for Ease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match *self {
            Self::Linear => "linear",
            Self::InQuad => "power1.in",
            Self::OutQuad => "power1.out",
            Self::InOutQuad => "power1.inOut",
            Self::InCubic => "power2.in",
            Self::OutCubic => "power2.out",
            Self::InOutCubic => "power2.inOut",
            Self::InQuart => "power3.in",
            Self::OutQuart => "power3.out",
            Self::InOutQuart => "power3.inOut",
            Self::BackOut { overshoot } => return write!(f, "back.out({overshoot})"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                return write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})");
            }
        };
        f.write_str(name)
    }
}

fn bezier_axis(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

fn bezier_axis_slope(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Curve parameter whose x coordinate is `x`. Newton first, bisection when the slope flattens.
fn solve_bezier_x(x1: f64, x2: f64, x: f64) -> f64 {
    let mut t = x;
    for _ in 0..8 {
        let err = bezier_axis(x1, x2, t) - x;
        if err.abs() < 1e-7 {
            return t;
        }
        let slope = bezier_axis_slope(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= err / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    t = x;
    for _ in 0..64 {
        let v = bezier_axis(x1, x2, t);
        if (v - x).abs() < 1e-7 {
            break;
        }
        if v < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    t
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
