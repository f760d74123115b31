use emi_core::amortization::{compute_schedule, summarize, Installment};
use emi_core::EmiError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

/// (principal, term_months, annual rate %) spanning the product range:
/// smallest and largest loans, 1 month to 30 years, 0% to 30%.
fn loan_grid() -> Vec<(Decimal, u32, Decimal)> {
    vec![
        (dec!(1000), 12, dec!(0)),
        (dec!(1000), 1, dec!(12)),
        (dec!(5000), 36, dec!(7.25)),
        (dec!(100000), 12, dec!(10)),
        (dec!(250000), 240, dec!(8.5)),
        (dec!(2_500_000), 360, dec!(30)),
        (dec!(10_000_000), 360, dec!(0.01)),
        (dec!(1234.56), 7, dec!(19.99)),
    ]
}

fn assert_schedule_invariants(schedule: &[Installment], principal: Decimal, term_months: u32) {
    assert_eq!(schedule.len(), term_months as usize);

    let mut previous_remaining = principal;
    for (idx, inst) in schedule.iter().enumerate() {
        assert_eq!(inst.installment as usize, idx + 1);
        assert_eq!(inst.payment, inst.interest + inst.principal);
        assert!(inst.payment >= Decimal::ZERO);
        assert!(inst.interest >= Decimal::ZERO);
        assert!(inst.principal >= Decimal::ZERO);
        assert!(inst.remaining >= Decimal::ZERO);
        assert!(
            inst.remaining <= previous_remaining,
            "remaining rose at period {}: {} > {}",
            inst.installment,
            inst.remaining,
            previous_remaining
        );
        previous_remaining = inst.remaining;
    }

    assert_eq!(schedule.last().map(|i| i.remaining), Some(dec!(0.00)));

    let total_principal: Decimal = schedule.iter().map(|i| i.principal).sum();
    let tolerance = dec!(0.01) * Decimal::from(term_months);
    assert!((total_principal - principal).abs() <= tolerance);
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_invariants_hold_across_product_range() {
    for (principal, months, rate) in loan_grid() {
        let schedule = compute_schedule(principal, months, rate)
            .unwrap_or_else(|e| panic!("{principal}/{months}/{rate}: {e}"));
        assert_schedule_invariants(&schedule, principal, months);
    }
}

#[test]
fn test_balance_strictly_decreases_with_interest() {
    let schedule = compute_schedule(dec!(250000), 240, dec!(8.5)).unwrap();
    for pair in schedule.windows(2) {
        assert!(pair[1].remaining < pair[0].remaining);
    }
}

#[test]
fn test_zero_rate_is_straight_line() {
    let schedule = compute_schedule(dec!(100000), 12, dec!(0)).unwrap();
    let straight = dec!(100000) / dec!(12);

    for inst in &schedule {
        assert_eq!(inst.interest, Decimal::ZERO);
        assert!((inst.payment - straight).abs() <= dec!(0.01) * dec!(12));
    }
    assert_eq!(schedule[0].payment, dec!(8333.33));
    assert_eq!(schedule[11].payment, dec!(8333.37));
    assert_eq!(schedule[10].remaining, dec!(8333.37));
}

#[test]
fn test_idempotent() {
    let a = compute_schedule(dec!(5000), 36, dec!(7.25)).unwrap();
    let b = compute_schedule(dec!(5000), 36, dec!(7.25)).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// Regression fixtures
// ===========================================================================

#[test]
fn test_one_year_ten_percent_fixture() {
    let schedule = compute_schedule(dec!(100000), 12, dec!(10)).unwrap();

    let expected_remaining = [
        dec!(92041.74),
        dec!(84017.16),
        dec!(75925.71),
        dec!(67766.83),
        dec!(59539.96),
        dec!(51244.54),
        dec!(42879.99),
        dec!(34445.73),
        dec!(25941.19),
        dec!(17365.78),
        dec!(8718.90),
        dec!(0.00),
    ];
    let remaining: Vec<Decimal> = schedule.iter().map(|i| i.remaining).collect();
    assert_eq!(remaining, expected_remaining.to_vec());

    assert!(schedule[..11].iter().all(|i| i.payment == dec!(8791.59)));
    assert_eq!(schedule[11].payment, dec!(8791.56));

    let summary = summarize(&schedule);
    assert_eq!(summary.total_interest, dec!(5499.05));
    assert_eq!(summary.total_principal, dec!(100000));
}

#[test]
fn test_twenty_year_mortgage_fixture() {
    let schedule = compute_schedule(dec!(250000), 240, dec!(8.5)).unwrap();
    assert_eq!(schedule[0].payment, dec!(2169.56));
    assert_eq!(schedule[0].interest, dec!(1770.83));
    assert_eq!(schedule[239].payment, dec!(2168.30));
    assert_eq!(schedule[239].principal, dec!(2153.05));
    assert_eq!(summarize(&schedule).total_interest, dec!(270693.14));
}

#[test]
fn test_three_year_fixture() {
    let schedule = compute_schedule(dec!(5000), 36, dec!(7.25)).unwrap();
    assert_eq!(schedule[0].payment, dec!(154.96));
    assert_eq!(schedule[35].payment, dec!(154.89));
    assert_eq!(summarize(&schedule).total_interest, dec!(578.49));
}

// ===========================================================================
// Errors
// ===========================================================================

fn assert_validation_error(result: Result<Vec<Installment>, EmiError>, field: &str) {
    match result {
        Err(EmiError::InvalidInput { field: f, .. }) => assert_eq!(f, field),
        Err(other) => panic!("expected InvalidInput on {field}, got {other:?}"),
        Ok(s) => panic!("expected InvalidInput on {field}, got {} records", s.len()),
    }
}

#[test]
fn test_invalid_inputs_rejected() {
    assert_validation_error(compute_schedule(dec!(0), 12, dec!(10)), "principal");
    assert_validation_error(compute_schedule(dec!(-100), 12, dec!(10)), "principal");
    assert_validation_error(compute_schedule(dec!(100000), 0, dec!(10)), "term_months");
    assert_validation_error(compute_schedule(dec!(100000), 12, dec!(-1)), "annual_rate_percent");
    assert_validation_error(compute_schedule(dec!(100000), 12, dec!(-0.001)), "annual_rate_percent");
}

#[test]
fn test_overflowing_rate_is_computation_error() {
    // 100000% a year compounds past the 96-bit mantissa over 30 years.
    let err = compute_schedule(dec!(100000), 360, dec!(100000)).unwrap_err();
    assert!(err.is_computation(), "got {err:?}");
    assert!(!err.is_validation());
}

#[test]
fn test_unbounded_term_is_rejected_not_allocated() {
    assert_validation_error(compute_schedule(dec!(1000), u32::MAX, dec!(0)), "term_months");
    assert_validation_error(compute_schedule(dec!(1000), 1201, dec!(10)), "term_months");
}
