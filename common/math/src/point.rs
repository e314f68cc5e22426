use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Sub, SubAssign};

pub const ZERO: Point = Point::new(0.0, 0.0);

/// A 2D value used both for x,y (top/left) corners and for width,height sizes.
///
/// Grid coordinates are composed with [`Point::offset`] and converted to drawing coordinates with
/// [`Point::scale`]; both are pure.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
        }
    }

    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    #[must_use]
    pub fn offset(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Returns true if `self` lies within the box at `origin` with `size`.
    ///
    /// Top/left edges are inclusive, bottom/right edges are exclusive so adjacent boxes never both
    /// claim a point on their shared edge.
    pub fn is_within(self, origin: Point, size: Point) -> bool {
        self.x >= origin.x && self.y >= origin.y && self.x < origin.x + size.x && self.y < origin.y + size.y
    }

    /// height / width, `f64::INFINITY` for zero-width sizes.
    pub fn aspect_ratio(self) -> f64 {
        if self.x == 0.0 {
            return f64::INFINITY;
        }
        self.y / self.x
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.offset(rhs)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
