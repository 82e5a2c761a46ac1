use serde::{Deserialize, Serialize};

/// Logical coordinate on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Logical size of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FigureId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Oval,
    Rectangle,
    Square,
    Triangle,
    Hexagon,
    Trapezoid,
    Star,
    Heart,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Circle,
        ShapeKind::Oval,
        ShapeKind::Rectangle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Hexagon,
        ShapeKind::Trapezoid,
        ShapeKind::Star,
        ShapeKind::Heart,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Oval => "oval",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Trapezoid => "trapezoid",
            ShapeKind::Star => "star",
            ShapeKind::Heart => "heart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl NamedColor {
    pub const ALL: [NamedColor; 7] = [
        NamedColor::Red,
        NamedColor::Orange,
        NamedColor::Yellow,
        NamedColor::Green,
        NamedColor::Blue,
        NamedColor::Purple,
        NamedColor::Pink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NamedColor::Red => "red",
            NamedColor::Orange => "orange",
            NamedColor::Yellow => "yellow",
            NamedColor::Green => "green",
            NamedColor::Blue => "blue",
            NamedColor::Purple => "purple",
            NamedColor::Pink => "pink",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            NamedColor::Red => [235, 64, 52],
            NamedColor::Orange => [245, 152, 39],
            NamedColor::Yellow => [250, 215, 45],
            NamedColor::Green => [76, 187, 90],
            NamedColor::Blue => [52, 120, 235],
            NamedColor::Purple => [146, 84, 222],
            NamedColor::Pink => [242, 121, 186],
        }
    }
}

/// Entry animation the presentation layer plays for a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStyle {
    Jiggle,
    Throb,
    Spin,
    Bounce,
    Zoom,
}

impl AnimationStyle {
    pub const ALL: [AnimationStyle; 5] = [
        AnimationStyle::Jiggle,
        AnimationStyle::Throb,
        AnimationStyle::Spin,
        AnimationStyle::Bounce,
        AnimationStyle::Zoom,
    ];
}

/// What a figure displays. Exactly one of a shape or a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    Shape(ShapeKind),
    Character(char),
}

impl FigureKind {
    pub fn shape(self) -> Option<ShapeKind> {
        match self {
            FigureKind::Shape(shape) => Some(shape),
            FigureKind::Character(_) => None,
        }
    }

    pub fn character(self) -> Option<char> {
        match self {
            FigureKind::Character(ch) => Some(ch),
            FigureKind::Shape(_) => None,
        }
    }
}

/// Visual attributes chosen when a figure is spawned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureStyle {
    pub color: NamedColor,
    pub size: f64,
    pub animation: AnimationStyle,
    pub font: String,
    pub show_face: bool,
}

/// A single glyph or shape living on one surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub id: FigureId,
    pub kind: FigureKind,
    pub style: FigureStyle,
    pub surface: usize,
    pub position: Point,
    /// Session time in seconds.
    pub created_at: f64,
    pub scale: f64,
    pub rotation: f64,
    opacity: f64,
}

impl Figure {
    pub fn new(
        id: FigureId,
        kind: FigureKind,
        mut style: FigureStyle,
        surface: usize,
        position: Point,
        created_at: f64,
    ) -> Self {
        // Faces only make sense on shapes.
        if matches!(kind, FigureKind::Character(_)) {
            style.show_face = false;
        }

        Self {
            id,
            kind,
            style,
            surface,
            position,
            created_at,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn age(&self, now: f64) -> f64 {
        (now - self.created_at).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> FigureStyle {
        FigureStyle {
            color: NamedColor::Blue,
            size: 200.0,
            animation: AnimationStyle::Jiggle,
            font: "Arial Rounded MT Bold".to_string(),
            show_face: true,
        }
    }

    #[test]
    fn character_figures_never_show_faces() {
        let figure = Figure::new(
            FigureId(1),
            FigureKind::Character('A'),
            style(),
            0,
            Point::default(),
            0.0,
        );

        assert!(!figure.style.show_face);
        assert_eq!(figure.kind.character(), Some('A'));
        assert_eq!(figure.kind.shape(), None);
    }

    #[test]
    fn opacity_is_clamped() {
        let mut figure = Figure::new(
            FigureId(1),
            FigureKind::Shape(ShapeKind::Star),
            style(),
            0,
            Point::default(),
            0.0,
        );

        figure.set_opacity(1.7);
        assert_eq!(figure.opacity(), 1.0);
        figure.set_opacity(-0.2);
        assert_eq!(figure.opacity(), 0.0);
        assert!(figure.style.show_face);
    }
}
