//! Bankroll replay of the historical pick sequence under different
//! money-management strategies.
//!
//! Every strategy starts from the same bankroll and sees the same decided
//! picks in the same order. A strategy owns a `BetSizingPolicy` (how much to
//! stake, plus any memory it keeps between bets) and a running equity curve.

use serde::Serialize;
use tracing::{info, warn};

use super::odds::{kelly_fraction, AmericanLine, LineCategory};
use super::resolver::PickIndex;
use crate::error::Result;
use crate::models::{Pick, PickResult};

/// Stake of the flat strategy
pub const FLAT_BET: f64 = 100.0;
/// Opening (and reset) stake of the martingale family
pub const BASE_BET: f64 = 100.0;

/// Everything a policy may look at when sizing one bet.
#[derive(Debug, Clone, Copy)]
pub struct BetContext {
    /// Bankroll before this bet, always > 0
    pub bankroll: f64,
    pub starting_bankroll: f64,
    pub decimal_odds: f64,
    pub category: LineCategory,
    /// Share of decided picks that won, 0.0–1.0
    pub historical_win_rate: f64,
}

/// A bet-sizing rule.
///
/// `bet_size` may return any amount; the simulator clamps it to
/// `[0, bankroll]` before settling.
pub trait BetSizingPolicy: Send + Sync {
    /// Stable identifier used in reports.
    fn key(&self) -> &'static str;

    /// Human-readable name for display.
    fn name(&self) -> &'static str;

    fn bet_size(&self, ctx: &BetContext) -> f64;

    /// Called after each settled bet with the bankroll as it was before it.
    fn settle(&mut self, _won: bool, _bankroll_before: f64) {}
}

// ── Policies ──────────────────────────────────────────────────────────────────

pub struct FlatBetting;

impl BetSizingPolicy for FlatBetting {
    fn key(&self) -> &'static str {
        "flat_betting"
    }
    fn name(&self) -> &'static str {
        "Flat Betting ($100)"
    }
    fn bet_size(&self, ctx: &BetContext) -> f64 {
        FLAT_BET.min(ctx.bankroll)
    }
}

/// Stake a constant fraction of the current bankroll.
pub struct PercentOfBankroll {
    key: &'static str,
    name: &'static str,
    fraction: f64,
}

impl PercentOfBankroll {
    pub fn fixed() -> Self {
        PercentOfBankroll {
            key: "fixed_percentage",
            name: "Fixed 5% of Bankroll",
            fraction: 0.05,
        }
    }

    pub fn conservative() -> Self {
        PercentOfBankroll {
            key: "conservative_percentage",
            name: "Conservative 1% of Bankroll",
            fraction: 0.01,
        }
    }
}

impl BetSizingPolicy for PercentOfBankroll {
    fn key(&self) -> &'static str {
        self.key
    }
    fn name(&self) -> &'static str {
        self.name
    }
    fn bet_size(&self, ctx: &BetContext) -> f64 {
        ctx.bankroll * self.fraction
    }
}

/// Half-Kelly on the historical win rate, capped at 25% of bankroll.
pub struct HalfKelly;

impl HalfKelly {
    const MULTIPLIER: f64 = 0.5;
    const MAX_FRACTION: f64 = 0.25;
}

impl BetSizingPolicy for HalfKelly {
    fn key(&self) -> &'static str {
        "kelly_criterion"
    }
    fn name(&self) -> &'static str {
        "Kelly Criterion"
    }
    fn bet_size(&self, ctx: &BetContext) -> f64 {
        let f = kelly_fraction(ctx.historical_win_rate, ctx.decimal_odds) * Self::MULTIPLIER;
        ctx.bankroll * f.min(Self::MAX_FRACTION).max(0.0)
    }
}

/// Double the stake after a loss, back to the base stake after a win.
pub struct Martingale {
    current_bet: f64,
}

impl Martingale {
    pub fn new() -> Self {
        Martingale {
            current_bet: BASE_BET,
        }
    }

    pub fn current_bet(&self) -> f64 {
        self.current_bet
    }
}

impl Default for Martingale {
    fn default() -> Self {
        Self::new()
    }
}

impl BetSizingPolicy for Martingale {
    fn key(&self) -> &'static str {
        "martingale"
    }
    fn name(&self) -> &'static str {
        "Martingale (Double on Loss)"
    }
    fn bet_size(&self, ctx: &BetContext) -> f64 {
        self.current_bet.min(ctx.bankroll)
    }
    fn settle(&mut self, won: bool, bankroll_before: f64) {
        self.current_bet = if won {
            BASE_BET
        } else {
            (self.current_bet * 2.0).min(bankroll_before)
        };
    }
}

/// Double the stake after a win (capped at a quarter of the bankroll), back
/// to the base stake after a loss.
pub struct AntiMartingale {
    current_bet: f64,
}

impl AntiMartingale {
    const MAX_FRACTION: f64 = 0.25;

    pub fn new() -> Self {
        AntiMartingale {
            current_bet: BASE_BET,
        }
    }

    pub fn current_bet(&self) -> f64 {
        self.current_bet
    }
}

impl Default for AntiMartingale {
    fn default() -> Self {
        Self::new()
    }
}

impl BetSizingPolicy for AntiMartingale {
    fn key(&self) -> &'static str {
        "anti_martingale"
    }
    fn name(&self) -> &'static str {
        "Anti-Martingale (Double on Win)"
    }
    fn bet_size(&self, ctx: &BetContext) -> f64 {
        self.current_bet.min(ctx.bankroll)
    }
    fn settle(&mut self, won: bool, bankroll_before: f64) {
        self.current_bet = if won {
            (self.current_bet * 2.0).min(bankroll_before * Self::MAX_FRACTION)
        } else {
            BASE_BET
        };
    }
}

/// Units of 1% of the starting bankroll, scaled by line range.
pub struct UnitBased;

impl UnitBased {
    const UNIT_FRACTION: f64 = 0.01;

    pub fn units(category: LineCategory) -> f64 {
        match category {
            LineCategory::HeavyFavorite => 0.5,
            LineCategory::Favorite => 1.0,
            LineCategory::SlightUnderdog => 1.5,
            LineCategory::BigUnderdog => 0.5,
        }
    }
}

impl BetSizingPolicy for UnitBased {
    fn key(&self) -> &'static str {
        "unit_based"
    }
    fn name(&self) -> &'static str {
        "Unit-Based on Line"
    }
    fn bet_size(&self, ctx: &BetContext) -> f64 {
        ctx.starting_bankroll * Self::UNIT_FRACTION * Self::units(ctx.category)
    }
}

/// 2% of bankroll, scaled by a fixed reference ROI per line range.
pub struct ConfidenceBased;

impl ConfidenceBased {
    const BASE_FRACTION: f64 = 0.02;

    /// Reference ROI (%) per line range; fixed, not derived from the picks.
    pub fn reference_roi(category: LineCategory) -> f64 {
        match category {
            LineCategory::HeavyFavorite => -5.0,
            LineCategory::Favorite => 12.3,
            LineCategory::SlightUnderdog => 18.9,
            LineCategory::BigUnderdog => 0.0,
        }
    }

    pub fn multiplier(roi: f64) -> f64 {
        if roi > 15.0 {
            2.0
        } else if roi > 5.0 {
            1.5
        } else if roi > 0.0 {
            1.0
        } else if roi > -5.0 {
            0.5
        } else {
            0.25
        }
    }
}

impl BetSizingPolicy for ConfidenceBased {
    fn key(&self) -> &'static str {
        "confidence_based"
    }
    fn name(&self) -> &'static str {
        "Confidence-Based (ROI Weighted)"
    }
    fn bet_size(&self, ctx: &BetContext) -> f64 {
        ctx.bankroll * Self::BASE_FRACTION * Self::multiplier(Self::reference_roi(ctx.category))
    }
}

/// The eight strategies, in report order.
pub fn default_policies() -> Vec<Box<dyn BetSizingPolicy>> {
    vec![
        Box::new(FlatBetting),
        Box::new(PercentOfBankroll::fixed()),
        Box::new(PercentOfBankroll::conservative()),
        Box::new(HalfKelly),
        Box::new(Martingale::new()),
        Box::new(AntiMartingale::new()),
        Box::new(UnitBased),
        Box::new(ConfidenceBased),
    ]
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// One decided pick as the simulator sees it.
#[derive(Debug, Clone, Copy)]
struct Tick {
    decimal_odds: f64,
    category: LineCategory,
    won: bool,
}

impl Tick {
    fn new(line: AmericanLine, won: bool) -> Self {
        Tick {
            decimal_odds: line.decimal_odds(),
            category: line.category(),
            won,
        }
    }
}

/// Final figures of one strategy run (unrounded).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyOutcome {
    pub name: String,
    pub strategy_key: String,
    pub starting_bankroll: f64,
    pub ending_bankroll: f64,
    pub profit: f64,
    pub roi: f64,
    pub peak_bankroll: f64,
    pub lowest_point: f64,
    pub max_drawdown: f64,
    /// Bankroll after each decided pick, starting with the opening bankroll
    pub history: Vec<f64>,
}

struct StrategyState {
    policy: Box<dyn BetSizingPolicy>,
    starting_bankroll: f64,
    bankroll: f64,
    peak: f64,
    trough: f64,
    max_drawdown: f64,
    history: Vec<f64>,
}

impl StrategyState {
    fn new(policy: Box<dyn BetSizingPolicy>, starting_bankroll: f64, ticks: usize) -> Self {
        let mut history = Vec::with_capacity(ticks + 1);
        history.push(starting_bankroll);
        StrategyState {
            policy,
            starting_bankroll,
            bankroll: starting_bankroll,
            peak: starting_bankroll,
            trough: starting_bankroll,
            max_drawdown: 0.0,
            history,
        }
    }

    fn apply(&mut self, tick: &Tick, historical_win_rate: f64) {
        // Busted: keep recording zeros for the remaining picks
        if self.bankroll <= 0.0 {
            self.history.push(0.0);
            return;
        }

        let bankroll_before = self.bankroll;
        let ctx = BetContext {
            bankroll: bankroll_before,
            starting_bankroll: self.starting_bankroll,
            decimal_odds: tick.decimal_odds,
            category: tick.category,
            historical_win_rate,
        };
        let bet = self.policy.bet_size(&ctx).min(bankroll_before).max(0.0);

        let profit = if tick.won {
            bet * (tick.decimal_odds - 1.0)
        } else {
            -bet
        };
        self.bankroll += profit;
        self.history.push(self.bankroll);

        self.policy.settle(tick.won, bankroll_before);

        self.peak = self.peak.max(self.bankroll);
        self.trough = self.trough.min(self.bankroll);
        self.max_drawdown = self.max_drawdown.max(self.peak - self.bankroll);
    }

    fn finish(self) -> StrategyOutcome {
        let profit = self.bankroll - self.starting_bankroll;
        StrategyOutcome {
            name: self.policy.name().to_string(),
            strategy_key: self.policy.key().to_string(),
            starting_bankroll: self.starting_bankroll,
            ending_bankroll: self.bankroll,
            profit,
            roi: profit / self.starting_bankroll * 100.0,
            peak_bankroll: self.peak,
            lowest_point: self.trough,
            max_drawdown: self.max_drawdown,
            history: self.history,
        }
    }
}

/// Replay the decided picks through the eight default strategies.
pub fn simulate(
    picks: &[Pick],
    index: &PickIndex<'_>,
    starting_bankroll: f64,
) -> Result<Vec<StrategyOutcome>> {
    simulate_with(default_policies(), picks, index, starting_bankroll)
}

/// Replay the decided picks through the given policies, in order.
///
/// Undecided and unresolvable picks are skipped entirely and add no history
/// entry. With no decided picks every strategy ends where it started.
pub fn simulate_with(
    policies: Vec<Box<dyn BetSizingPolicy>>,
    picks: &[Pick],
    index: &PickIndex<'_>,
    starting_bankroll: f64,
) -> Result<Vec<StrategyOutcome>> {
    let mut ticks = Vec::with_capacity(picks.len());
    for pick in picks.iter().filter(|p| p.result.is_decided()) {
        if let Some(resolved) = index.resolve(pick)? {
            ticks.push(Tick::new(resolved.line, pick.result == PickResult::Correct));
        }
    }

    let historical_win_rate = if ticks.is_empty() {
        warn!("No completed picks found for bankroll simulation");
        0.0
    } else {
        info!(
            "Simulating {} bankroll strategies for {} completed picks",
            policies.len(),
            ticks.len()
        );
        ticks.iter().filter(|t| t.won).count() as f64 / ticks.len() as f64
    };

    let mut states: Vec<StrategyState> = policies
        .into_iter()
        .map(|p| StrategyState::new(p, starting_bankroll, ticks.len()))
        .collect();

    for tick in &ticks {
        for state in &mut states {
            state.apply(tick, historical_win_rate);
        }
    }

    Ok(states.into_iter().map(StrategyState::finish).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::resolver::fixtures::*;
    use crate::models::PickResult::{Correct, Incorrect, Undecided};
    use crate::models::WeekDataset;
    use approx::assert_relative_eq;

    /// Stakes the whole bankroll every time.
    struct AllIn;

    impl BetSizingPolicy for AllIn {
        fn key(&self) -> &'static str {
            "all_in"
        }
        fn name(&self) -> &'static str {
            "All In"
        }
        fn bet_size(&self, ctx: &BetContext) -> f64 {
            ctx.bankroll * 10.0
        }
    }

    fn ctx(bankroll: f64, category: LineCategory) -> BetContext {
        BetContext {
            bankroll,
            starting_bankroll: 1000.0,
            decimal_odds: 2.0,
            category,
            historical_win_rate: 0.5,
        }
    }

    /// Even-money (+100) propositions p0..pn in a single week.
    fn even_money(n: usize) -> WeekDataset {
        dataset(vec![(
            1,
            (0..n).map(|i| proposition(&format!("p{}", i), 100, -120)).collect(),
        )])
    }

    fn by_key<'a>(outcomes: &'a [StrategyOutcome], key: &str) -> &'a StrategyOutcome {
        outcomes.iter().find(|o| o.strategy_key == key).unwrap()
    }

    #[test]
    fn test_default_policies_are_eight_distinct_strategies() {
        let policies = default_policies();
        let keys: Vec<_> = policies.iter().map(|p| p.key()).collect();
        assert_eq!(
            keys,
            vec![
                "flat_betting",
                "fixed_percentage",
                "conservative_percentage",
                "kelly_criterion",
                "martingale",
                "anti_martingale",
                "unit_based",
                "confidence_based",
            ]
        );
    }

    #[test]
    fn test_no_decided_picks_keeps_starting_bankroll() {
        let weeks = even_money(2);
        let index = PickIndex::new(&weeks);
        let picks = [pick("p0", Undecided), pick("ghost", Correct)];
        let outcomes = simulate(&picks, &index, 1000.0).unwrap();
        assert_eq!(outcomes.len(), 8);
        for o in &outcomes {
            assert_eq!(o.history, vec![1000.0]);
            assert_eq!(o.ending_bankroll, 1000.0);
            assert_eq!(o.profit, 0.0);
            assert_eq!(o.max_drawdown, 0.0);
        }
    }

    #[test]
    fn test_history_has_one_entry_per_decided_pick() {
        let weeks = even_money(4);
        let index = PickIndex::new(&weeks);
        let picks = [
            pick("p0", Correct),
            pick("p1", Undecided),
            pick("p2", Incorrect),
            pick("missing", Incorrect),
            pick("p3", Correct),
        ];
        let outcomes = simulate(&picks, &index, 1000.0).unwrap();
        for o in &outcomes {
            assert_eq!(o.history.len(), 4, "{}", o.strategy_key);
            assert!(o.max_drawdown >= 0.0);
            assert!(o.peak_bankroll >= o.starting_bankroll);
            assert!(o.lowest_point <= o.starting_bankroll);
        }
    }

    #[test]
    fn test_flat_betting_steps_bounded_by_stake() {
        let weeks = dataset(vec![(
            1,
            vec![
                proposition("a", -150, 130),
                proposition("b", 120, -140),
                proposition("c", -300, 250),
            ],
        )]);
        let index = PickIndex::new(&weeks);
        let picks = [pick("a", Correct), pick("b", Incorrect), pick("c", Correct)];
        let outcomes = simulate(&picks, &index, 1000.0).unwrap();
        let flat = by_key(&outcomes, "flat_betting");

        let steps: Vec<f64> = flat.history.windows(2).map(|w| w[1] - w[0]).collect();
        assert_relative_eq!(steps[0], 66.666_666, epsilon = 1e-4);
        assert_relative_eq!(steps[1], -100.0, epsilon = 1e-9);
        assert_relative_eq!(steps[2], 33.333_333, epsilon = 1e-4);
        assert!(steps.iter().all(|s| s.abs() <= FLAT_BET));
        assert_relative_eq!(flat.max_drawdown, 100.0, epsilon = 1e-9);
        assert_relative_eq!(flat.peak_bankroll, 1066.666_666, epsilon = 1e-4);
    }

    #[test]
    fn test_martingale_loss_loss_win() {
        let weeks = even_money(3);
        let index = PickIndex::new(&weeks);
        let picks = [pick("p0", Incorrect), pick("p1", Incorrect), pick("p2", Correct)];
        let outcomes = simulate(&picks, &index, 1000.0).unwrap();
        let m = by_key(&outcomes, "martingale");
        // Bets of 100, 200, then 400 at even money
        assert_eq!(m.history, vec![1000.0, 900.0, 700.0, 1100.0]);
        assert_relative_eq!(m.max_drawdown, 300.0, epsilon = 1e-9);
        assert_relative_eq!(m.lowest_point, 700.0, epsilon = 1e-9);
        assert_relative_eq!(m.roi, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_martingale_resets_after_win() {
        let mut m = Martingale::new();
        m.settle(false, 1000.0);
        assert_eq!(m.current_bet(), 200.0);
        m.settle(false, 900.0);
        assert_eq!(m.current_bet(), 400.0);
        m.settle(true, 700.0);
        assert_eq!(m.current_bet(), BASE_BET);
    }

    #[test]
    fn test_martingale_doubling_capped_by_bankroll() {
        let mut m = Martingale::new();
        m.settle(false, 150.0);
        assert_eq!(m.current_bet(), 150.0);
        assert_eq!(m.bet_size(&ctx(50.0, LineCategory::Favorite)), 50.0);
    }

    #[test]
    fn test_anti_martingale_caps_at_quarter_bankroll() {
        let mut a = AntiMartingale::new();
        a.settle(true, 1000.0);
        assert_eq!(a.current_bet(), 200.0);
        a.settle(true, 1200.0);
        // 400 capped at 25% of 1200
        assert_eq!(a.current_bet(), 300.0);
        a.settle(false, 1500.0);
        assert_eq!(a.current_bet(), BASE_BET);
    }

    #[test]
    fn test_half_kelly_sizing() {
        // b = 1, p = 0.6 → full Kelly 0.2, half 0.1
        let mut c = ctx(1000.0, LineCategory::BigUnderdog);
        c.historical_win_rate = 0.6;
        assert_relative_eq!(HalfKelly.bet_size(&c), 100.0, epsilon = 1e-9);
        // No edge → no bet
        c.historical_win_rate = 0.4;
        assert_eq!(HalfKelly.bet_size(&c), 0.0);
        // Huge edge → capped at 25%
        c.historical_win_rate = 0.99;
        c.decimal_odds = 5.0;
        assert_relative_eq!(HalfKelly.bet_size(&c), 250.0, epsilon = 1e-9);
    }

    #[test]
    fn test_kelly_without_edge_never_bets() {
        // Half the even-money picks win → p = 0.5, b = 1 → f = 0
        let weeks = even_money(4);
        let index = PickIndex::new(&weeks);
        let picks = [
            pick("p0", Correct),
            pick("p1", Incorrect),
            pick("p2", Incorrect),
            pick("p3", Correct),
        ];
        let outcomes = simulate(&picks, &index, 1000.0).unwrap();
        let kelly = by_key(&outcomes, "kelly_criterion");
        assert!(kelly.history.iter().all(|&b| b == 1000.0));
    }

    #[test]
    fn test_unit_based_sizing() {
        assert_relative_eq!(
            UnitBased.bet_size(&ctx(500.0, LineCategory::SlightUnderdog)),
            15.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            UnitBased.bet_size(&ctx(500.0, LineCategory::HeavyFavorite)),
            5.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            UnitBased.bet_size(&ctx(500.0, LineCategory::Favorite)),
            10.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_confidence_multiplier_table() {
        assert_eq!(ConfidenceBased::multiplier(18.9), 2.0);
        assert_eq!(ConfidenceBased::multiplier(12.3), 1.5);
        assert_eq!(ConfidenceBased::multiplier(0.1), 1.0);
        assert_eq!(ConfidenceBased::multiplier(0.0), 0.5);
        assert_eq!(ConfidenceBased::multiplier(-5.0), 0.25);
        assert_relative_eq!(
            ConfidenceBased.bet_size(&ctx(1000.0, LineCategory::SlightUnderdog)),
            40.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            ConfidenceBased.bet_size(&ctx(1000.0, LineCategory::HeavyFavorite)),
            5.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_busted_strategy_records_zeros() {
        let weeks = even_money(3);
        let index = PickIndex::new(&weeks);
        let picks = [pick("p0", Incorrect), pick("p1", Correct), pick("p2", Correct)];
        let outcomes = simulate_with(vec![Box::new(AllIn)], &picks, &index, 1000.0).unwrap();
        let all_in = &outcomes[0];
        assert_eq!(all_in.history, vec![1000.0, 0.0, 0.0, 0.0]);
        assert_eq!(all_in.ending_bankroll, 0.0);
        assert_eq!(all_in.lowest_point, 0.0);
        assert_relative_eq!(all_in.max_drawdown, 1000.0, epsilon = 1e-9);
        assert_relative_eq!(all_in.roi, -100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_percentage_strategies_compound() {
        let weeks = even_money(2);
        let index = PickIndex::new(&weeks);
        let picks = [pick("p0", Correct), pick("p1", Incorrect)];
        let outcomes = simulate(&picks, &index, 1000.0).unwrap();
        let fixed = by_key(&outcomes, "fixed_percentage");
        // +50 then -5% of 1050
        assert_relative_eq!(fixed.history[1], 1050.0, epsilon = 1e-9);
        assert_relative_eq!(fixed.history[2], 997.5, epsilon = 1e-9);
        let conservative = by_key(&outcomes, "conservative_percentage");
        assert_relative_eq!(conservative.history[2], 999.9, epsilon = 1e-9);
    }
}
