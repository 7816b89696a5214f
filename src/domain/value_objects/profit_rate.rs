use crate::domain::value_objects::price::Price;

/// Percentage change from purchase price to current market price.
///
/// Unlike most value objects this one is not guarded: a zero purchase price
/// produces an infinite or NaN rate, and that value is displayed as-is.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ProfitRate(f64);

/// Display tone of a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateTone {
    Positive,
    Negative,
    Neutral,
}

impl ProfitRate {
    /// `(current - purchase) / purchase * 100`
    pub fn compute(current: Price, purchase: Price) -> Self {
        let purchase = purchase.value();
        ProfitRate((current.value() - purchase) / purchase * 100.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// False when the purchase price was zero or either price was unparseable.
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    pub fn tone(&self) -> RateTone {
        if self.0 > 0.0 {
            RateTone::Positive
        } else if self.0 < 0.0 {
            RateTone::Negative
        } else {
            RateTone::Neutral
        }
    }
}
