use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::FixedNum;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedVec2 {
    pub x: FixedNum,
    pub y: FixedNum,
}

impl FixedVec2 {
    pub const ZERO: Self = Self { x: FixedNum::ZERO, y: FixedNum::ZERO };

    pub fn new(x: FixedNum, y: FixedNum) -> Self {
        Self { x, y }
    }

    pub fn from_f32(x: f32, y: f32) -> Self {
        Self {
            x: FixedNum::from_num(x),
            y: FixedNum::from_num(y),
        }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x.to_num(), self.y.to_num())
    }

    pub fn length(self) -> FixedNum {
        let len_sq = self.length_squared();
        if len_sq == FixedNum::ZERO {
            return FixedNum::ZERO;
        }
        len_sq.sqrt()
    }

    pub fn length_squared(self) -> FixedNum {
        self.x * self.x + self.y * self.y
    }

    /// Largest per-axis distance. Matches axis-independent grid motion.
    pub fn max_axis_abs(self) -> FixedNum {
        self.x.abs().max(self.y.abs())
    }
}

impl std::ops::Add for FixedVec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::AddAssign for FixedVec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for FixedVec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<FixedNum> for FixedVec2 {
    type Output = Self;
    fn mul(self, rhs: FixedNum) -> Self::Output {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Neg for FixedVec2 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self { x: -self.x, y: -self.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_of_axis_vector() {
        let v = FixedVec2::from_f32(0.0, 3.0);
        assert_eq!(v.length(), FixedNum::from_num(3));
        assert_eq!(FixedVec2::ZERO.length(), FixedNum::ZERO);
    }

    #[test]
    fn test_max_axis_abs_uses_larger_component() {
        let v = FixedVec2::from_f32(-5.0, 2.0);
        assert_eq!(v.max_axis_abs(), FixedNum::from_num(5));
    }
}
