pub mod units {
    use paste::paste;

    macro_rules! euclid_units {
        ($($unit:ident => $default:ty),+) => {
            paste! {
                $(
                    pub struct [<$unit Unit>];

                    pub mod [<$unit:snake>] {
                        pub type Point2D<T = $default> = euclid::Point2D<T, super::[<$unit Unit>]>;
                        pub type Vector2D<T = $default> = euclid::Vector2D<T, super::[<$unit Unit>]>;
                        pub type Box2D<T = $default> = euclid::Box2D<T, super::[<$unit Unit>]>;
                        pub type Size2D<T = $default> = euclid::Size2D<T, super::[<$unit Unit>]>;
                        pub type Rect<T = $default> = euclid::Rect<T, super::[<$unit Unit>]>;
                    }

                )+
            }
        };
    }

    euclid_units!(World => f32, Screen => f32, Tile => i32);
}

/// Chainable vector helpers on top of euclid.
///
/// euclid already provides `round`, `floor` and `ceil`. Its `round` is
/// `(x + 0.5).floor()`, so halves always go up: `-1.5` rounds to `-1`. Tick
/// positions are snapped with it. Use `f32::round` per component where halves
/// must move away from zero.
///
/// Everything here takes `self` by value and returns a new value, so there is
/// no way to mutate a vector someone else is still holding on to.
pub trait VectorExt<U>: Sized {
    /// Adds `offset` component-wise.
    fn translate(self, offset: euclid::Vector2D<f32, U>) -> Self;
    /// Multiplies component-wise.
    fn scale(self, factor: euclid::Vector2D<f32, U>) -> Self;
    /// Negates both components.
    fn flip(self) -> Self;
    fn halve(self) -> Self;
}

impl<U> VectorExt<U> for euclid::Vector2D<f32, U> {
    fn translate(self, offset: euclid::Vector2D<f32, U>) -> Self {
        self + offset
    }

    fn scale(self, factor: euclid::Vector2D<f32, U>) -> Self {
        self.component_mul(factor)
    }

    fn flip(self) -> Self {
        -self
    }

    fn halve(self) -> Self {
        self * 0.5
    }
}

impl<U> VectorExt<U> for euclid::Point2D<f32, U> {
    fn translate(self, offset: euclid::Vector2D<f32, U>) -> Self {
        self + offset
    }

    fn scale(self, factor: euclid::Vector2D<f32, U>) -> Self {
        euclid::Point2D::new(self.x * factor.x, self.y * factor.y)
    }

    fn flip(self) -> Self {
        euclid::Point2D::new(-self.x, -self.y)
    }

    fn halve(self) -> Self {
        euclid::Point2D::new(self.x * 0.5, self.y * 0.5)
    }
}

/// Whole-number cell of a point, saturating at the ends of the `i32` range.
///
/// euclid's `to_i32` panics on values it cannot represent, this never does.
pub fn saturating_i32<U>(point: euclid::Point2D<f32, U>) -> euclid::Point2D<i32, U> {
    euclid::Point2D::new(point.x as i32, point.y as i32)
}
