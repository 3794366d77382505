#![allow(missing_docs)]

//! This module defines the unit types used for energy accounting.
use serde::{Deserialize, Serialize};

/// Represents a dimensionless quantity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
pub struct Dimensionless(pub f64);

impl Dimensionless {
    pub fn value(self) -> f64 {
        self.0
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Display,
            Serialize,
            Deserialize,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }
        }

        impl std::ops::Neg for $name {
            type Output = $name;
            fn neg(self) -> $name {
                $name(-self.0)
            }
        }

        impl std::ops::AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl std::ops::SubAssign for $name {
            fn sub_assign(&mut self, rhs: $name) {
                self.0 -= rhs.0;
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = $name>>(iter: I) -> $name {
                $name(iter.map(|x| x.0).sum())
            }
        }

        impl std::ops::Div<$name> for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }
    };
}

// Energy (or power over one hourly step, which is numerically the same thing here)
unit_struct!(Energy);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_arithmetic() {
        let mut e = Energy(10.0) + Energy(5.0) - Energy(3.0);
        e -= Energy(2.0);
        e += Energy(1.0);
        assert_eq!(e, Energy(11.0));
        assert_eq!(-e, Energy(-11.0));
        assert_eq!(Energy(3.0) / Energy(4.0), Dimensionless(0.75));
    }

    #[test]
    fn test_energy_sum() {
        let total: Energy = [Energy(1.0), Energy(2.5), Energy(-0.5)].into_iter().sum();
        assert_eq!(total, Energy(3.0));
    }
}
