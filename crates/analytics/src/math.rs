use core_types::Grade;
use rust_decimal::Decimal;

/// `part / whole * 100`, or zero when `whole` is zero.
pub(crate) fn percentage(part: i64, whole: i64) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole)
}

/// `num / den`, or zero when `den` is zero.
pub(crate) fn ratio(num: Decimal, den: Decimal) -> Decimal {
    num.checked_div(den).unwrap_or(Decimal::ZERO)
}

/// Mean grade-point value (two decimals) and its letter, `None` without grades.
pub(crate) fn average_grade(grades: impl IntoIterator<Item = Grade>) -> Option<(Decimal, Grade)> {
    let (total, count) = grades
        .into_iter()
        .fold((Decimal::ZERO, 0i64), |(total, count), g| (total + g.value(), count + 1));
    if count == 0 {
        return None;
    }
    let avg = total / Decimal::from(count);
    Some((avg.round_dp(2), Grade::from_average(avg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_denominators_yield_zero() {
        assert_eq!(percentage(3, 0), Decimal::ZERO);
        assert_eq!(ratio(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage(1, 4), dec!(25));
    }

    #[test]
    fn average_grade_uses_grade_points() {
        assert_eq!(average_grade(Vec::new()), None);
        let (avg, letter) = average_grade([Grade::APlus, Grade::A, Grade::C]).unwrap();
        assert_eq!(avg, dec!(3.43));
        assert_eq!(letter, Grade::B);
    }
}
