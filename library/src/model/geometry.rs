use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle, stored as top-left corner plus size.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        min: Vec2::ZERO,
        size: Vec2::ZERO,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.min.x
    }

    pub fn min_y(&self) -> f32 {
        self.min.y
    }

    pub fn max_x(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn max_y(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.min_x() <= other.min_x()
            && self.min_y() <= other.min_y()
            && self.max_x() >= other.max_x()
            && self.max_y() >= other.max_y()
    }
}

/// Uniform scale about the surface center plus a translation of that center,
/// which is how the pinch and pan gestures move the video surface.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct VideoTransform {
    pub scale: f32,
    pub translation: Vec2,
}

impl VideoTransform {
    pub const IDENTITY: VideoTransform = VideoTransform {
        scale: 1.0,
        translation: Vec2::ZERO,
    };

    /// The frame the base surface occupies once this transform is applied.
    pub fn applied_to(self, base: Rect) -> Rect {
        Rect::from_center_size(base.center() + self.translation, base.size * self.scale)
    }

    pub fn lerp(self, other: VideoTransform, t: f32) -> VideoTransform {
        VideoTransform {
            scale: self.scale + (other.scale - self.scale) * t,
            translation: Vec2::new(
                self.translation.x + (other.translation.x - self.translation.x) * t,
                self.translation.y + (other.translation.y - self.translation.y) * t,
            ),
        }
    }
}

impl Default for VideoTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
