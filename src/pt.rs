use std::fmt::Display;

/// A window-space coordinate in pixels.
///
/// Non-finite inputs are replaced with `0.0` on construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pt(pub(crate) f32);

impl Display for Pt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for Pt {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Pt {}

impl Pt {
    pub fn as_f32(self) -> f32 {
        self.0
    }

    pub fn as_i32(self) -> i32 {
        let v = if self.0.is_finite() { self.0 } else { 0.0 };
        v.round() as i32
    }

    pub fn abs(self) -> Pt {
        Pt(self.0.abs())
    }
}

impl From<u32> for Pt {
    fn from(value: u32) -> Self {
        Pt(value as f32)
    }
}

impl From<i32> for Pt {
    fn from(value: i32) -> Self {
        Pt(value as f32)
    }
}

impl From<f32> for Pt {
    fn from(value: f32) -> Self {
        let v = if value.is_finite() { value } else { 0.0 };
        Pt(v)
    }
}

impl From<f64> for Pt {
    fn from(value: f64) -> Self {
        let v = if value.is_finite() { value } else { 0.0 };
        Pt(v as f32)
    }
}

impl std::ops::Sub for Pt {
    type Output = Pt;
    fn sub(self, rhs: Pt) -> Pt {
        Pt(self.0 - rhs.0)
    }
}

impl std::ops::Div<f32> for Pt {
    type Output = Pt;
    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_becomes_zero() {
        assert_eq!(Pt::from(f32::NAN), Pt(0.0));
        assert_eq!(Pt::from(f64::INFINITY), Pt(0.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Pt::from(100.0f32);
        let b = Pt::from(120.0f32);
        assert_eq!((a - b).abs(), Pt::from(20.0f32));
        assert_eq!(b / 2.0, Pt::from(60i32));
        assert_eq!(Pt::from(2.5f32).as_i32(), 3);
    }
}
