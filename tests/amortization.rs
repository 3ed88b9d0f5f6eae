use cuota_fija::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn mxn_session() -> LoanSession<LocaleFormatter> {
    LoanSession::new(LoanConfig::reference(), LocaleFormatter).unwrap()
}

#[test]
fn test_end_to_end_twelve_periods() {
    let config = LoanConfig::reference();
    let request = LoanRequest::new(dec!(12000), 12, "MXN").unwrap();
    let result = compute_schedule(&request, &config.rates).unwrap();

    assert_eq!(result.summary.periodic_payment, dec!(1761.16));
    assert_eq!(result.schedule.len(), 13);
    assert_eq!(result.schedule.records()[12].period, 12);
    assert_eq!(result.schedule.records()[12].closing_balance, dec!(0));
    assert_eq!(
        result.summary.total_repaid,
        result.summary.principal + result.summary.total_interest
    );
    assert_eq!(result.summary.total_repaid, dec!(21133.95));
}

#[rstest]
#[case("1000", 6)]
#[case("12.000", 12)]
#[case("1,000,000.00", 18)]
#[case("987.654,32", 18)]
#[case("33333.33", 6)]
fn test_principal_is_fully_retired(#[case] raw: &str, #[case] term: u32) {
    let mut session = mxn_session();
    let result = session.calculate(raw, term).unwrap();

    let retired: Decimal = result.schedule.installments().iter().map(|r| r.principal).sum();
    assert_eq!(retired, result.summary.principal);
    assert_eq!(result.schedule.last().unwrap().closing_balance, Decimal::ZERO);
    assert!(
        result.schedule.installments()[..term as usize - 1]
            .iter()
            .all(|r| r.payment == result.summary.periodic_payment)
    );
}

#[rstest]
#[case("500", "The minimum amount is $1,000.00.")]
#[case("2,000,000", "The maximum amount is $1,000,000.00.")]
#[case("-5", "The amount must be greater than 0.")]
#[case("abc", "Enter a valid amount.")]
fn test_mxn_validation_messages(#[case] raw: &str, #[case] message: &str) {
    let config = LoanConfig::reference();
    let profile = config.profile("MXN").unwrap();
    let err = validate_amount_for(raw, &config.limits, profile, &LocaleFormatter).unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test]
fn test_mxn_accepts_fifty_thousand() {
    let config = LoanConfig::reference();
    let profile = config.profile("MXN").unwrap();
    assert_eq!(
        validate_amount_for("50000", &config.limits, profile, &LocaleFormatter),
        Ok(dec!(50000))
    );
}

#[test]
fn test_zero_rate_term() {
    let yaml = r#"
rates:
  4: 0
  6: 0.05
limits:
  MXN: { min: 1000, max: 1000000 }
currencies:
  - { locale: es-MX, currency: MXN }
"#;
    let config = LoanConfig::from_yaml_str(yaml).unwrap();
    let request = LoanRequest::new(dec!(1000), 4, "MXN").unwrap();
    let result = compute_schedule(&request, &config.rates).unwrap();

    assert_eq!(result.summary.periodic_payment, dec!(250));
    assert_eq!(result.summary.total_interest, dec!(0));
    assert!(result.schedule.iter().all(|r| r.interest.is_zero()));
    assert!(!result.summary.final_payment_differs());
}

#[test]
fn test_recalculation_is_idempotent() {
    let mut session = mxn_session();
    let first = session.calculate("75.000,00", 18).unwrap().clone();
    let first_csv = {
        let mut out = Vec::new();
        session.export_csv(&mut out).unwrap();
        out
    };

    let second = session.calculate("75.000,00", 18).unwrap().clone();
    let mut second_csv = Vec::new();
    session.export_csv(&mut second_csv).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_csv, second_csv);
}

#[test]
fn test_currency_change_clears_schedule() {
    let mut session = mxn_session();
    session.calculate("50000", 12).unwrap();
    assert_eq!(session.bounds().min, dec!(1000));

    session.select_currency("EUR").unwrap();
    assert!(session.result().is_none());
    assert_eq!(session.bounds(), Bounds { min: dec!(55), max: dec!(55000) });
    assert!(!session.export_csv(Vec::new()).unwrap());

    let result = session.calculate("500", 6).unwrap();
    assert_eq!(result.currency, "EUR");
}

#[test]
fn test_csv_export_matches_schedule() {
    let mut session = mxn_session();
    let result = session.calculate("12000", 12).unwrap().clone();
    let csv = to_csv_string(&result.schedule).unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], CSV_HEADER.join(","));
    assert_eq!(lines[1], "0,12000.00,0.00,0.00,0.00,12000.00");
    assert_eq!(lines[2], "1,12000.00,1761.16,1200.00,561.16,11438.84");
    assert_eq!(lines[13], "12,1601.08,1761.19,160.11,1601.08,0.00");
    assert_eq!(lines.len(), 14);
}

#[test]
fn test_example_config_matches_reference() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/loan.example.yaml");
    let config = LoanConfig::from_yaml_file(path).unwrap();
    assert_eq!(config, LoanConfig::reference());
}

#[test]
fn test_extreme_configured_rate_is_an_error() {
    let yaml = r#"
rates:
  14: 100
limits:
  USD: { min: 60, max: 1000000 }
currencies:
  - { locale: en-US, currency: USD }
"#;
    let config = LoanConfig::from_yaml_str(yaml).unwrap();
    let mut session = LoanSession::new(config, LocaleFormatter).unwrap();

    assert!(matches!(
        session.calculate("1,000,000", 14),
        Err(LoanError::InvalidInput { .. })
    ));
    assert!(session.result().is_none());
}
