use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of roster move recorded for a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Add,
    Drop,
    Trade,
    Waiver,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Add => "add",
            TransactionType::Drop => "drop",
            TransactionType::Trade => "trade",
            TransactionType::Waiver => "waiver",
        }
    }

    /// Adds and waiver claims both bring a player onto the roster.
    pub fn is_pickup(&self) -> bool {
        matches!(self, TransactionType::Add | TransactionType::Waiver)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(TransactionType::Add),
            "drop" => Ok(TransactionType::Drop),
            "trade" => Ok(TransactionType::Trade),
            "waiver" => Ok(TransactionType::Waiver),
            other => Err(CoreError::InvalidInput(
                "transaction type".to_string(),
                other.to_string(),
            )),
        }
    }
}

/// Letter grade for a draft pick, derived from how far its performance rank
/// moved away from its draft slot. Orders best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// All grades, best first.
    pub const ALL: [Grade; 6] = [Grade::APlus, Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Maps `draft_rank - performance_rank` to a letter.
    pub fn from_differential(diff: i64) -> Self {
        if diff >= 50 {
            Grade::APlus
        } else if diff >= 30 {
            Grade::A
        } else if diff >= 10 {
            Grade::B
        } else if diff >= -10 {
            Grade::C
        } else if diff >= -30 {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// Grade points used when averaging grades.
    pub fn value(&self) -> Decimal {
        match self {
            Grade::APlus => dec!(4.3),
            Grade::A => dec!(4.0),
            Grade::B => dec!(3.0),
            Grade::C => dec!(2.0),
            Grade::D => dec!(1.0),
            Grade::F => dec!(0.0),
        }
    }

    /// Converts an average of grade points back into a letter.
    pub fn from_average(avg: Decimal) -> Self {
        if avg >= dec!(4.3) {
            Grade::APlus
        } else if avg >= dec!(3.5) {
            Grade::A
        } else if avg >= dec!(2.5) {
            Grade::B
        } else if avg >= dec!(1.5) {
            Grade::C
        } else if avg >= dec!(0.5) {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn is_steal(&self) -> bool {
        matches!(self, Grade::APlus | Grade::A)
    }

    pub fn is_bust(&self) -> bool {
        matches!(self, Grade::D | Grade::F)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucketed label for a member's luck factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LuckRating {
    #[serde(rename = "Very Lucky")]
    VeryLucky,
    Lucky,
    Neutral,
    Unlucky,
    #[serde(rename = "Very Unlucky")]
    VeryUnlucky,
}

impl LuckRating {
    /// Thresholds are exclusive: a factor of exactly 5 is `Lucky`, exactly 2 is
    /// `Neutral`, exactly -2 is `Unlucky` and exactly -5 is `VeryUnlucky`.
    pub fn from_factor(luck_factor: Decimal) -> Self {
        if luck_factor > dec!(5) {
            LuckRating::VeryLucky
        } else if luck_factor > dec!(2) {
            LuckRating::Lucky
        } else if luck_factor > dec!(-2) {
            LuckRating::Neutral
        } else if luck_factor > dec!(-5) {
            LuckRating::Unlucky
        } else {
            LuckRating::VeryUnlucky
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_cutoffs_are_inclusive() {
        assert_eq!(Grade::from_differential(50), Grade::APlus);
        assert_eq!(Grade::from_differential(49), Grade::A);
        assert_eq!(Grade::from_differential(30), Grade::A);
        assert_eq!(Grade::from_differential(10), Grade::B);
        assert_eq!(Grade::from_differential(9), Grade::C);
        assert_eq!(Grade::from_differential(-10), Grade::C);
        assert_eq!(Grade::from_differential(-11), Grade::D);
        assert_eq!(Grade::from_differential(-30), Grade::D);
        assert_eq!(Grade::from_differential(-31), Grade::F);
    }

    #[test]
    fn average_maps_back_to_letter() {
        assert_eq!(Grade::from_average(dec!(4.3)), Grade::APlus);
        assert_eq!(Grade::from_average(dec!(3.6)), Grade::A);
        assert_eq!(Grade::from_average(dec!(2.5)), Grade::B);
        assert_eq!(Grade::from_average(dec!(1.49)), Grade::D);
        assert_eq!(Grade::from_average(dec!(0.2)), Grade::F);
    }

    #[test]
    fn luck_rating_boundaries() {
        assert_eq!(LuckRating::from_factor(dec!(5.01)), LuckRating::VeryLucky);
        assert_eq!(LuckRating::from_factor(dec!(5)), LuckRating::Lucky);
        assert_eq!(LuckRating::from_factor(dec!(2)), LuckRating::Neutral);
        assert_eq!(LuckRating::from_factor(dec!(0)), LuckRating::Neutral);
        assert_eq!(LuckRating::from_factor(dec!(-2)), LuckRating::Unlucky);
        assert_eq!(LuckRating::from_factor(dec!(-5)), LuckRating::VeryUnlucky);
    }

    #[test]
    fn transaction_type_parses_case_insensitively() {
        assert_eq!("Waiver".parse::<TransactionType>().unwrap(), TransactionType::Waiver);
        assert!("claim".parse::<TransactionType>().is_err());
        assert!(TransactionType::Add.is_pickup());
        assert!(!TransactionType::Drop.is_pickup());
    }

    #[test]
    fn labels_serialize_with_display_names() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        assert_eq!(
            serde_json::to_string(&LuckRating::VeryUnlucky).unwrap(),
            "\"Very Unlucky\""
        );
    }
}
