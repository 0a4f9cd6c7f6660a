//! Cross-method checks: the finite-difference, quadrature, free-boundary and
//! closed-form prices must agree where their problems overlap.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use nf_methods::{
    black_scholes, merton_jump_diffusion, BermudanSettings, ConvergenceTable, ExerciseStyle,
    FdSettings, FreeBoundarySolver, ImplicitExplicitStepper, JumpParams, MarketParams,
    OptionType, QuadPricer, ShootingSettings, VanillaPayoff,
};

// ─── QUAD ─────────────────────────────────────────────────────────────────────

#[test]
fn quad_atm_call_converges_at_fourth_order() {
    let market = MarketParams::new(0.06, 0.0, 0.2);
    let pricer = QuadPricer::new(&market, 1.0).unwrap();
    let payoff = VanillaPayoff::call(100.0);
    let table =
        ConvergenceTable::sweep(16, 6, |n| pricer.price_vanilla(&payoff, 100.0, n)).unwrap();

    let ratio = table.last_ratio().unwrap();
    assert!(ratio > 15.0 && ratio < 17.0, "ratio {ratio}\n{table}");
    assert_abs_diff_eq!(table.observed_order().unwrap(), 4.0, epsilon = 0.1);

    let bs = black_scholes(OptionType::Call, 100.0, 100.0, &market, 1.0);
    assert_abs_diff_eq!(table.last_value().unwrap(), bs, epsilon = 1e-6);
    assert_abs_diff_eq!(table.extrapolated(4.0).unwrap(), bs, epsilon = 1e-7);
}

#[test]
fn quad_and_finite_differences_agree_on_european_put() {
    let market = MarketParams::new(0.05, 0.0, 0.15);
    let payoff = VanillaPayoff::put(100.0);
    let quad = QuadPricer::new(&market, 0.25)
        .unwrap()
        .price_vanilla(&payoff, 100.0, 128)
        .unwrap();
    let fd = ImplicitExplicitStepper::new(
        market,
        JumpParams::none(),
        FdSettings::new(200.0, 400, 100, 0.25),
    )
    .unwrap()
    .price(&payoff, 100.0)
    .unwrap();
    assert_abs_diff_eq!(fd, quad, epsilon = 0.05);
}

// ─── Finite differences ───────────────────────────────────────────────────────

#[test]
fn finite_difference_put_across_spots() {
    let market = MarketParams::new(0.05, 0.0, 0.15);
    let payoff = VanillaPayoff::put(100.0);
    let solution = ImplicitExplicitStepper::new(
        market,
        JumpParams::none(),
        FdSettings::new(200.0, 400, 100, 0.25),
    )
    .unwrap()
    .solve(&payoff)
    .unwrap();
    for spot in [85.0, 95.0, 100.0, 105.0, 115.0] {
        let bs = black_scholes(OptionType::Put, spot, 100.0, &market, 0.25);
        let fd = solution.value_at(spot).unwrap();
        assert_abs_diff_eq!(fd, bs, epsilon = 0.05);
    }
}

#[test]
fn jump_diffusion_matches_merton_series() {
    let market = MarketParams::new(0.05, 0.0, 0.15);
    let jumps = JumpParams::new(0.5, -0.1, 0.3);
    let payoff = VanillaPayoff::put(100.0);
    let stepper =
        ImplicitExplicitStepper::new(market, jumps, FdSettings::new(300.0, 300, 50, 0.25))
            .unwrap();
    let fd = stepper.price(&payoff, 100.0).unwrap();
    let series = merton_jump_diffusion(OptionType::Put, 100.0, 100.0, &market, &jumps, 0.25).unwrap();
    let bs = black_scholes(OptionType::Put, 100.0, 100.0, &market, 0.25);
    assert_abs_diff_eq!(fd, series, epsilon = 0.05);
    assert!(fd > bs + 1.0);
}

#[test]
fn american_premium_is_positive_and_bounded() {
    let market = MarketParams::new(0.05, 0.0, 0.15);
    let payoff = VanillaPayoff::put(100.0);
    let settings = FdSettings::new(200.0, 400, 100, 0.25);
    let european = ImplicitExplicitStepper::new(market, JumpParams::none(), settings).unwrap();
    let american = european.clone().with_exercise(ExerciseStyle::American);
    let eu = european.price(&payoff, 100.0).unwrap();
    let am = american.price(&payoff, 100.0).unwrap();
    assert!(am > eu);
    assert!(am - eu < 0.5, "premium {}", am - eu);
}

// ─── Free boundaries ──────────────────────────────────────────────────────────

#[test]
fn perpetual_put_reference_case() {
    let solver = FreeBoundarySolver::new(MarketParams::new(0.04, 0.04, 0.2)).unwrap();
    let payoff = VanillaPayoff::put(1.0);
    let sol = solver.perpetual(&payoff).unwrap();
    let sf = sol.boundary;
    assert!(sf > 0.0 && sf < 1.0);
    assert_abs_diff_eq!(sol.value(sf), 1.0 - sf, epsilon = 1e-12);
    // continuity of the analytic branch at S_f
    let just_above = sf * (1.0 + 1e-9);
    assert_abs_diff_eq!(sol.value(just_above), 1.0 - sf, epsilon = 1e-6);

    let shot = solver.shoot(&payoff, &ShootingSettings::default()).unwrap();
    assert_relative_eq!(shot, sf, max_relative = 1e-4);
}

#[test]
fn bermudan_put_is_worth_less_than_american() {
    let solver = FreeBoundarySolver::new(MarketParams::new(0.1, 0.0, 0.2)).unwrap();
    let payoff = VanillaPayoff::put(1.0);
    let american = solver.perpetual(&payoff).unwrap();
    let bermudan = solver.bermudan(&payoff, &BermudanSettings::new(0.25)).unwrap();

    assert!(bermudan.boundary() > american.boundary);
    assert!(bermudan.boundary() < 1.0);
    for spot in [0.85, 0.9, 1.0, 1.2, 1.5] {
        let b = bermudan.value_at(spot).unwrap();
        let a = american.value(spot);
        assert!(b <= a + 1e-6, "spot {spot}: bermudan {b} > american {a}");
        assert!(b >= (1.0 - spot).max(0.0));
    }
}

// ─── Determinism ──────────────────────────────────────────────────────────────

#[test]
fn repeated_calls_are_bit_identical() {
    let market = MarketParams::new(0.06, 0.0, 0.2);
    let quad = QuadPricer::new(&market, 1.0).unwrap();
    let call = VanillaPayoff::call(100.0);
    let first = quad.price_vanilla(&call, 100.0, 64).unwrap();
    let second = quad.price_vanilla(&call, 100.0, 64).unwrap();
    assert_eq!(first.to_bits(), second.to_bits());

    let solver = FreeBoundarySolver::new(MarketParams::new(0.1, 0.0, 0.2)).unwrap();
    let settings = BermudanSettings {
        points_per_std: 2.0,
        quad_intervals: 16,
        ..BermudanSettings::new(0.5)
    };
    let put = VanillaPayoff::put(1.0);
    let a = solver.bermudan(&put, &settings).unwrap();
    let b = solver.bermudan(&put, &settings).unwrap();
    assert_eq!(a, b);
}
