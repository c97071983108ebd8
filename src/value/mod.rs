use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod coerce;
mod display;
mod looped;

pub use coerce::{coerce, to_bool, to_json, to_number, to_position, to_pulse, to_size, to_text};
pub use display::display;
pub use looped::{lengthened_loops, longest_loop_length, ValueLoop};

/// Identity of an interactive layer in the prototype preview. Layers
/// themselves live outside the engine; interaction node kinds reference
/// them by id.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(pub Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque handle to an imported media asset. The engine never touches the
/// bytes; the host resolves the key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaRef {
    pub key: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Point4d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// RGBA color, each channel in 0..=1.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Default for Rgba {
    fn default() -> Self {
        // opaque black
        Self {
            red: 0.0,
            green: 0.0,
            blue: 0.0,
            alpha: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ScrollMode {
    #[default]
    Free,
    Paging,
    Disabled,
}

pub use crate::animation::AnimationCurve;

/// Runtime value flowing through ports. Closed union: every consumption
/// site matches exhaustively, and every kind has a default so coercion is
/// total.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
    Position(Position),
    Point3d(Point3d),
    Point4d(Point4d),
    Size(Size),
    Color(Rgba),
    /// "Fired at time T". Equality with the current graph time is the
    /// trigger condition; see [`crate::graph::step::should_pulse`].
    Pulse(f64),
    /// Structured document. Compared by parsed structure, so two
    /// cosmetically different empty documents are equal.
    Json(serde_json::Value),
    Curve(AnimationCurve),
    Method(HttpMethod),
    Scroll(ScrollMode),
    Layer(Option<LayerId>),
    Media(Option<MediaRef>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Number(0.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Number,
    Bool,
    Text,
    Position,
    Point3d,
    Point4d,
    Size,
    Color,
    Pulse,
    Json,
    Curve,
    Method,
    Scroll,
    Layer,
    Media,
}

impl ValueKind {
    pub fn default_value(self) -> Value {
        match self {
            ValueKind::Number => Value::Number(0.0),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Text => Value::Text(String::new()),
            ValueKind::Position => Value::Position(Position::ZERO),
            ValueKind::Point3d => Value::Point3d(Point3d::default()),
            ValueKind::Point4d => Value::Point4d(Point4d::default()),
            ValueKind::Size => Value::Size(Size::ZERO),
            ValueKind::Color => Value::Color(Rgba::default()),
            ValueKind::Pulse => Value::Pulse(0.0),
            ValueKind::Json => Value::Json(serde_json::json!({})),
            ValueKind::Curve => Value::Curve(AnimationCurve::Linear),
            ValueKind::Method => Value::Method(HttpMethod::Get),
            ValueKind::Scroll => Value::Scroll(ScrollMode::Free),
            ValueKind::Layer => Value::Layer(None),
            ValueKind::Media => Value::Media(None),
        }
    }

    /// Kinds the per-field animation machinery can interpolate.
    pub fn is_animatable(self) -> bool {
        matches!(
            self,
            ValueKind::Number
                | ValueKind::Position
                | ValueKind::Size
                | ValueKind::Point3d
                | ValueKind::Point4d
                | ValueKind::Color
        )
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
            Value::Position(_) => ValueKind::Position,
            Value::Point3d(_) => ValueKind::Point3d,
            Value::Point4d(_) => ValueKind::Point4d,
            Value::Size(_) => ValueKind::Size,
            Value::Color(_) => ValueKind::Color,
            Value::Pulse(_) => ValueKind::Pulse,
            Value::Json(_) => ValueKind::Json,
            Value::Curve(_) => ValueKind::Curve,
            Value::Method(_) => ValueKind::Method,
            Value::Scroll(_) => ValueKind::Scroll,
            Value::Layer(_) => ValueKind::Layer,
            Value::Media(_) => ValueKind::Media,
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn bool_value(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Value::Position(p) => Some(*p),
            _ => None,
        }
    }

    pub fn size(&self) -> Option<Size> {
        match self {
            Value::Size(s) => Some(*s),
            _ => None,
        }
    }

    pub fn pulse(&self) -> Option<f64> {
        match self {
            Value::Pulse(t) => Some(*t),
            _ => None,
        }
    }

    pub fn json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Json(j) => Some(j),
            _ => None,
        }
    }

    pub fn curve(&self) -> Option<AnimationCurve> {
        match self {
            Value::Curve(c) => Some(*c),
            _ => None,
        }
    }

    pub fn method(&self) -> Option<HttpMethod> {
        match self {
            Value::Method(m) => Some(*m),
            _ => None,
        }
    }

    pub fn scroll_mode(&self) -> Option<ScrollMode> {
        match self {
            Value::Scroll(m) => Some(*m),
            _ => None,
        }
    }

    pub fn layer(&self) -> Option<LayerId> {
        match self {
            Value::Layer(id) => *id,
            _ => None,
        }
    }

    /// Decompose an animatable value into its scalar fields
    /// (number=1, position/size=2, point3d=3, point4d/color=4).
    pub fn fields(&self) -> Option<Vec<f64>> {
        match self {
            Value::Number(n) => Some(vec![*n]),
            Value::Position(p) => Some(vec![p.x, p.y]),
            Value::Size(s) => Some(vec![s.width, s.height]),
            Value::Point3d(p) => Some(vec![p.x, p.y, p.z]),
            Value::Point4d(p) => Some(vec![p.x, p.y, p.z, p.w]),
            Value::Color(c) => Some(vec![c.red, c.green, c.blue, c.alpha]),
            _ => None,
        }
    }

    /// Recompose an animatable value from scalar fields. Inverse of
    /// [`Value::fields`]; missing fields read as zero.
    pub fn from_fields(kind: ValueKind, fields: &[f64]) -> Value {
        let f = |i: usize| fields.get(i).copied().unwrap_or(0.0);
        match kind {
            ValueKind::Number => Value::Number(f(0)),
            ValueKind::Position => Value::Position(Position::new(f(0), f(1))),
            ValueKind::Size => Value::Size(Size::new(f(0), f(1))),
            ValueKind::Point3d => Value::Point3d(Point3d {
                x: f(0),
                y: f(1),
                z: f(2),
            }),
            ValueKind::Point4d => Value::Point4d(Point4d {
                x: f(0),
                y: f(1),
                z: f(2),
                w: f(3),
            }),
            ValueKind::Color => Value::Color(Rgba {
                red: f(0).clamp(0.0, 1.0),
                green: f(1).clamp(0.0, 1.0),
                blue: f(2).clamp(0.0, 1.0),
                alpha: f(3).clamp(0.0, 1.0),
            }),
            other => other.default_value(),
        }
    }
}
