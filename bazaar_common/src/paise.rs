use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const INR_CURRENCY_CODE: &str = "INR";
pub const INR_CURRENCY_CODE_LOWER: &str = "inr";

//--------------------------------------       Paise        ----------------------------------------------------------
/// An amount of Indian rupees, stored as a signed count of paise (the gateway's minor currency unit).
///
/// All money in the engine is kept in minor units so that the value handed to the payment gateway is
/// exactly the stored integer. Rupee floats only appear at the HTTP boundary.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Paise(i64);

op!(binary Paise, Add, add);
op!(binary Paise, Sub, sub);
op!(inplace Paise, SubAssign, sub_assign);
op!(unary Paise, Neg, neg);

impl Mul<i64> for Paise {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Paise {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in paise: {0}")]
pub struct PaiseConversionError(String);

impl From<i64> for Paise {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Paise {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Paise {}

impl TryFrom<u64> for Paise {
    type Error = PaiseConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(PaiseConversionError(format!("Value {} is too large to convert to Paise", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Paise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rupees = self.0 as f64 / 100.0;
        write!(f, "₹{rupees:0.2}")
    }
}

impl Paise {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Converts a rupee amount to whole paise. Rounds to the nearest paisa so that inputs like
    /// `2499.99`, which have no exact float representation, still land on the intended amount.
    pub fn from_rupees(rupees: f64) -> Self {
        Self((rupees * 100.0).round() as i64)
    }

    pub fn as_rupees(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

#[cfg(test)]
mod test {
    use super::Paise;

    #[test]
    fn rupee_conversions_land_on_whole_paise() {
        assert_eq!(Paise::from_rupees(100.0).value(), 10_000);
        assert_eq!(Paise::from_rupees(2499.99).value(), 249_999);
        assert_eq!(Paise::from_rupees(45.5).value(), 4_550);
        assert_eq!(Paise::from_rupees(0.004).value(), 0);
    }

    #[test]
    fn arithmetic() {
        let a = Paise::from(250);
        let b = Paise::from(750);
        assert_eq!((a + b).value(), 1000);
        assert_eq!((b - a).value(), 500);
        assert_eq!((a * 3).value(), 750);
        let total: Paise = vec![a, b, a].into_iter().sum();
        assert_eq!(total.value(), 1250);
    }

    #[test]
    fn display_formats_rupees() {
        assert_eq!(Paise::from(30_000).to_string(), "₹300.00");
        assert_eq!(Paise::from(99).to_string(), "₹0.99");
    }
}
