use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use std::ops::Add;
use tracing::warn;
use utoipa::ToSchema;

/// Monetary breakdown of a payment, in whole won.
///
/// `total` is expected to equal the sum of the other components. Provider
/// data is allowed to break that rule; it is logged and kept as reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Amount {
    pub total: i64,
    #[serde(default)]
    pub tax_free: i64,
    #[serde(default)]
    pub vat: i64,
    #[serde(default)]
    pub point: i64,
    #[serde(default)]
    pub discount: i64,
    #[serde(default)]
    pub green_deposit: i64,
}

impl Amount {
    pub const ZERO: Self = Self {
        total: 0,
        tax_free: 0,
        vat: 0,
        point: 0,
        discount: 0,
        green_deposit: 0,
    };

    pub fn new(
        total: i64,
        tax_free: i64,
        vat: i64,
        point: i64,
        discount: i64,
        green_deposit: i64,
    ) -> Result<Self, ServiceError> {
        let amount = Self {
            total,
            tax_free,
            vat,
            point,
            discount,
            green_deposit,
        };
        amount.validated()
    }

    /// Rejects negative components and warns about an unbalanced breakdown.
    pub fn validated(self) -> Result<Self, ServiceError> {
        let negative: Vec<String> = self
            .fields()
            .iter()
            .filter(|(_, value)| *value < 0)
            .map(|(name, value)| format!("{name}: must not be negative (got {value})"))
            .collect();

        if !negative.is_empty() {
            return Err(ServiceError::Validation(negative));
        }

        if !self.is_balanced() {
            warn!(
                "⚠️ Unbalanced amount breakdown: total={} components={}",
                self.total,
                self.component_sum()
            );
        }

        Ok(self)
    }

    pub fn total_only(total: i64) -> Self {
        Self {
            total,
            ..Self::ZERO
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total == 0
    }

    pub fn is_balanced(&self) -> bool {
        self.total == self.component_sum()
    }

    /// Subtracts `other`, failing when the total would go negative.
    /// Individual components floor at zero.
    pub fn subtract(&self, other: &Amount) -> Option<Amount> {
        if other.total > self.total {
            return None;
        }

        Some(Self {
            total: self.total - other.total,
            tax_free: (self.tax_free - other.tax_free).max(0),
            vat: (self.vat - other.vat).max(0),
            point: (self.point - other.point).max(0),
            discount: (self.discount - other.discount).max(0),
            green_deposit: (self.green_deposit - other.green_deposit).max(0),
        })
    }

    fn component_sum(&self) -> i64 {
        self.tax_free + self.vat + self.point + self.discount + self.green_deposit
    }

    fn fields(&self) -> [(&'static str, i64); 6] {
        [
            ("total", self.total),
            ("tax_free", self.tax_free),
            ("vat", self.vat),
            ("point", self.point),
            ("discount", self.discount),
            ("green_deposit", self.green_deposit),
        ]
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            total: self.total + rhs.total,
            tax_free: self.tax_free + rhs.tax_free,
            vat: self.vat + rhs.vat,
            point: self.point + rhs.point,
            discount: self.discount + rhs.discount,
            green_deposit: self.green_deposit + rhs.green_deposit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_components() {
        let result = Amount::new(10000, 0, -1, 0, 0, 0);
        assert!(matches!(result, Err(ServiceError::Validation(ref errs)) if errs.len() == 1));
    }

    #[test]
    fn keeps_unbalanced_provider_breakdown() {
        let amount = Amount::new(22000, 0, 2000, 0, 0, 0).unwrap();
        assert!(!amount.is_balanced());
        assert_eq!(amount.total, 22000);
    }

    #[test]
    fn subtract_fails_past_zero() {
        let remaining = Amount::new(20000, 0, 1818, 0, 0, 18182).unwrap();
        assert!(remaining.subtract(&Amount::total_only(20001)).is_none());

        let left = remaining.subtract(&Amount::total_only(10000)).unwrap();
        assert_eq!(left.total, 10000);
        assert_eq!(left.vat, 1818);
    }

    #[test]
    fn addition_is_componentwise() {
        let a = Amount::new(10000, 0, 909, 0, 0, 9091).unwrap();
        let sum = a + a;
        assert_eq!(sum.total, 20000);
        assert_eq!(sum.vat, 1818);
        assert_eq!(sum.green_deposit, 18182);
    }
}
