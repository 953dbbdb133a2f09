use crate::history::LeagueHistory;
use crate::members::Career;
use crate::math::ratio;
use configuration::PowerWeights;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Points per game at which the scoring component saturates.
const PPG_CEILING: Decimal = dec!(150);
/// Seasons played at which the longevity component saturates.
const SEASONS_CEILING: Decimal = dec!(10);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerRanking {
    pub rank: usize,
    pub member_id: i64,
    pub member: String,
    /// Composite score in [0, 100], one decimal.
    pub power_score: Decimal,
    pub seasons: i64,
    pub championships: i64,
    pub win_percentage: Decimal,
    pub playoff_percentage: Decimal,
    pub ppg: Decimal,
}

/// The five score components, each scaled to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerComponents {
    pub win_pct: Decimal,
    pub championship_rate: Decimal,
    pub playoff_rate: Decimal,
    pub points_per_game: Decimal,
    pub longevity: Decimal,
}

impl PowerComponents {
    pub fn from_career(career: &Career) -> Self {
        let seasons = Decimal::from(career.seasons);
        Self {
            win_pct: career.win_ratio() * Decimal::ONE_HUNDRED,
            championship_rate: ratio(Decimal::from(career.championships), seasons) * Decimal::ONE_HUNDRED,
            playoff_rate: ratio(Decimal::from(career.playoff_appearances), seasons) * Decimal::ONE_HUNDRED,
            points_per_game: (career.points_per_game() / PPG_CEILING).min(Decimal::ONE) * Decimal::ONE_HUNDRED,
            longevity: (seasons / SEASONS_CEILING).min(Decimal::ONE) * Decimal::ONE_HUNDRED,
        }
    }

    /// Weighted sum; stays within [0, 100] for weights that sum to one.
    pub fn score(&self, weights: &PowerWeights) -> Decimal {
        weights.win_pct * self.win_pct
            + weights.championship_rate * self.championship_rate
            + weights.playoff_rate * self.playoff_rate
            + weights.points_per_game * self.points_per_game
            + weights.longevity * self.longevity
    }
}

struct Candidate {
    member_id: i64,
    member: String,
    score: Decimal,
    win_ratio: Decimal,
    career: Career,
}

/// Ranks every member with at least one season.
///
/// Order: reported (one decimal) power score desc, then win% desc, then
/// championships desc, then member name asc.
pub fn power_rankings(history: &LeagueHistory, weights: &PowerWeights) -> Vec<PowerRanking> {
    let mut candidates: Vec<Candidate> = history
        .members()
        .iter()
        .filter_map(|member| {
            let career = Career::of(history, member.id);
            if career.seasons == 0 {
                return None;
            }
            let score = PowerComponents::from_career(&career).score(weights).round_dp(1);
            Some(Candidate {
                member_id: member.id,
                member: member.name.clone(),
                score,
                win_ratio: career.win_ratio(),
                career,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.win_ratio.cmp(&a.win_ratio))
            .then_with(|| b.career.championships.cmp(&a.career.championships))
            .then_with(|| a.member.cmp(&b.member))
            .then_with(|| a.member_id.cmp(&b.member_id))
    });

    candidates
        .into_iter()
        .enumerate()
        .map(|(idx, c)| {
            let seasons = Decimal::from(c.career.seasons);
            PowerRanking {
                rank: idx + 1,
                member_id: c.member_id,
                member: c.member,
                power_score: c.score,
                seasons: c.career.seasons,
                championships: c.career.championships,
                win_percentage: (c.win_ratio * Decimal::ONE_HUNDRED).round_dp(1),
                playoff_percentage: (ratio(Decimal::from(c.career.playoff_appearances), seasons)
                    * Decimal::ONE_HUNDRED)
                    .round_dp(1),
                ppg: c.career.points_per_game().round_dp(2),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn perfect_career() -> Career {
        Career {
            seasons: 12,
            championships: 12,
            playoff_appearances: 12,
            wins: 168,
            losses: 0,
            ties: 0,
            points_for: dec!(40000),
        }
    }

    #[test]
    fn score_is_bounded_by_zero_and_one_hundred() {
        let weights = PowerWeights::default();
        let best = PowerComponents::from_career(&perfect_career()).score(&weights);
        assert_eq!(best, dec!(100));

        let worst = Career {
            seasons: 1,
            losses: 14,
            ..Career::default()
        };
        let score = PowerComponents::from_career(&worst).score(&weights);
        assert!(score >= Decimal::ZERO && score <= dec!(100));
        assert_eq!(score, dec!(1)); // only longevity: 0.10 * 10
    }

    #[test]
    fn components_use_documented_weights() {
        let career = Career {
            seasons: 5,
            championships: 1,
            playoff_appearances: 3,
            wins: 42,
            losses: 28,
            ties: 0,
            points_for: dec!(8400),
        };
        let parts = PowerComponents::from_career(&career);
        assert_eq!(parts.win_pct, dec!(60));
        assert_eq!(parts.championship_rate, dec!(20));
        assert_eq!(parts.playoff_rate, dec!(60));
        assert_eq!(parts.points_per_game, dec!(80));
        assert_eq!(parts.longevity, dec!(50));
        // 21 + 5 + 12 + 8 + 5
        assert_eq!(parts.score(&PowerWeights::default()), dec!(51));
    }

    #[test]
    fn identical_careers_order_by_name() {
        let mut fx = Fixture::new();
        let season = fx.season(2020);
        let zed = fx.member("Zed");
        let amy = fx.member("Amy");
        fx.member("Rookie");
        // Identical careers: only the name separates them.
        fx.team(season, zed, "Z", 7, 7, dec!(1400));
        fx.team(season, amy, "A", 7, 7, dec!(1400));
        let history = fx.build();

        let rankings = power_rankings(&history, &PowerWeights::default());
        assert_eq!(rankings.len(), 2, "members without seasons are skipped");
        assert_eq!(rankings[0].member, "Amy");
        assert_eq!(rankings[1].member, "Zed");
        assert_eq!(rankings[0].power_score, rankings[1].power_score);
        assert_eq!(rankings[1].rank, 2);
    }

    #[test]
    fn titles_and_playoffs_lift_the_score() {
        let mut fx = Fixture::new();
        let season = fx.season(2020);
        let champ = fx.member("Champ");
        let other = fx.member("Other");
        let ct = fx.team(season, champ, "C", 8, 6, dec!(1400));
        fx.team_mut(ct).is_champion = true;
        fx.team_mut(ct).made_playoffs = true;
        fx.team(season, other, "O", 10, 4, dec!(1400));
        let history = fx.build();

        let rankings = power_rankings(&history, &PowerWeights::default());
        // Champ: 0.35*57.14 + 25 + 20 + 0.1*66.67 + 1 = 72.7
        // Other: 0.35*71.43 + 0 + 0 + 6.67 + 1 = 32.7
        assert_eq!(rankings[0].member, "Champ");
        assert_eq!(rankings[0].power_score, dec!(72.7));
        assert_eq!(rankings[0].playoff_percentage, dec!(100));
        assert_eq!(rankings[1].power_score, dec!(32.7));
    }
}
