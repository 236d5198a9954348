use derive_more::{Add, AddAssign, Display, From, Into, Sub, SubAssign, Sum};

/// A quantity in raster pixels. All canvas coordinates, widths, and text
/// metrics in this crate are expressed in [Px] to keep them from mixing
/// with bare scalars such as glyph counts or font design units.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    From,
    Into,
    Display,
)]
pub struct Px(pub f32);

impl Px {
    /// Round up to a whole pixel
    pub fn ceil(self) -> Px {
        Px(self.0.ceil())
    }

    /// Round to the nearest whole pixel
    pub fn round(self) -> Px {
        Px(self.0.round())
    }
}

impl std::ops::Mul<f32> for Px {
    type Output = Px;

    fn mul(self, rhs: f32) -> Px {
        Px(self.0 * rhs)
    }
}

impl std::ops::Mul<Px> for f32 {
    type Output = Px;

    fn mul(self, rhs: Px) -> Px {
        Px(self * rhs.0)
    }
}

impl std::ops::Div<f32> for Px {
    type Output = Px;

    fn div(self, rhs: f32) -> Px {
        Px(self.0 / rhs)
    }
}
