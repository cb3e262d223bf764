use chrono::NaiveDate;

use ledger::{
    Currency, Dimension, GroupBy, Granularity, Ledger, LedgerError, Money, Movement,
    OperationType, Product, ProductId, ReportSettings,
};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn inflow(id: u64, date: NaiveDate, cents: i64, currency: Currency) -> Movement {
    Movement::new(id, date, OperationType::Inflow, Money::new(cents), currency).unwrap()
}

fn outflow(id: u64, date: NaiveDate, cents: i64, currency: Currency) -> Movement {
    Movement::new(id, date, OperationType::Outflow, Money::new(cents), currency).unwrap()
}

fn products() -> Vec<Product> {
    vec![
        Product::new(ProductId(1), "Depósito a Plazo").unwrap(),
        Product::new(ProductId(2), "Overnight").unwrap(),
        Product::new(ProductId(4), "Repo").unwrap(),
    ]
}

/// A small book: two currencies interleaved over two weeks and two months.
fn movements() -> Vec<Movement> {
    vec![
        inflow(1, date(1, 29), 1_000_000, Currency::Pen)
            .with_product(ProductId(2))
            .with_counterparty("BCP"),
        outflow(2, date(1, 29), 250_000, Currency::Usd)
            .with_product(ProductId(4))
            .with_counterparty("Citibank"),
        outflow(3, date(1, 30), 434_843_577, Currency::Pen)
            .with_product(ProductId(2))
            .with_counterparty("BCRP"),
        inflow(4, date(1, 30), 90_000, Currency::Usd)
            .with_product(ProductId(1))
            .with_counterparty("Citibank"),
        inflow(5, date(1, 31), 500_000, Currency::Pen)
            .with_product(ProductId(9))
            .with_counterparty("Cliente A"),
        outflow(6, date(1, 31), 500_000, Currency::Pen).with_counterparty("Cliente A"),
        inflow(7, date(2, 5), 300_000, Currency::Pen)
            .with_product(ProductId(1))
            .with_counterparty("BBVA"),
        outflow(8, date(2, 6), 120_000, Currency::Usd).with_product(ProductId(4)),
    ]
}

fn ledger() -> Ledger {
    Ledger::builder()
        .products(products())
        .movements(movements())
        .build()
        .unwrap()
}

#[test]
fn conservation_per_currency() {
    let ledger = ledger();
    for currency in Currency::ALL {
        let expected: Money = ledger
            .movements()
            .iter()
            .filter(|m| m.currency == currency)
            .map(Movement::signed_amount)
            .sum();
        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            let buckets = ledger.aggregate(granularity, GroupBy::CURRENCY);
            let total: Money = buckets
                .iter()
                .filter(|b| b.currency == currency)
                .map(|b| {
                    assert_eq!(b.net_flow(), b.inflow_total - b.outflow_total);
                    b.net_flow()
                })
                .sum();
            assert_eq!(total, expected, "{currency} {granularity:?}");
        }
    }
}

#[test]
fn running_position_matches_prefix_sum() {
    let positions = ledger().running_position();
    let pen: Vec<(NaiveDate, i64, i64)> = positions
        .iter()
        .filter(|p| p.currency == Currency::Pen)
        .map(|p| (p.period, p.net_flow.cents(), p.cumulative_balance.cents()))
        .collect();
    assert_eq!(
        pen,
        vec![
            (date(1, 29), 1_000_000, 1_000_000),
            (date(1, 30), -434_843_577, -433_843_577),
            (date(1, 31), 0, -433_843_577),
            (date(2, 5), 300_000, -433_543_577),
        ]
    );
}

#[test]
fn partition_isolation() {
    let mixed = ledger().running_position();
    let pen_alone = Ledger::builder()
        .products(products())
        .movements(movements().into_iter().filter(|m| m.currency == Currency::Pen))
        .build()
        .unwrap()
        .running_position();

    let pen_mixed: Vec<_> = mixed
        .into_iter()
        .filter(|p| p.currency == Currency::Pen)
        .collect();
    assert_eq!(pen_mixed, pen_alone);
}

#[test]
fn alert_is_strictly_negative() {
    let alerts = ledger().alerts(Currency::Pen, Money::ZERO);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].period, date(1, 30));
    assert_eq!(alerts[0].net_flow.to_string(), "-4348435.77");
    // 2024-01-31 nets to exactly zero and must not alert.
    assert!(alerts.iter().all(|a| a.period != date(1, 31)));
}

#[test]
fn product_rollup_excludes_unknown_products() {
    let ledger = ledger();
    let by_product = ledger.rollup(Dimension::Product);
    let pen_product_inflow: Money = by_product
        .iter()
        .filter(|r| r.currency == Currency::Pen)
        .map(|r| r.inflow_total)
        .sum();
    assert_eq!(pen_product_inflow, Money::new(1_300_000));

    let pen_daily_inflow: Money = ledger
        .daily_flow()
        .iter()
        .filter(|b| b.currency == Currency::Pen)
        .map(|b| b.inflow_total)
        .sum();
    assert_eq!(pen_daily_inflow, Money::new(1_800_000));
}

#[test]
fn top_counterparties_volume_ignores_direction() {
    let top = ledger().top_counterparties(2, None);
    let names: Vec<_> = top.iter().map(|r| r.counterparty.as_str()).collect();
    assert_eq!(names, vec!["BCRP", "BCP"]);
    assert_eq!(top[0].volume_total, Money::new(434_843_577));
}

#[test]
fn report_is_idempotent() {
    let ledger = ledger();
    let settings = ReportSettings::default();
    assert_eq!(ledger.report(&settings), ledger.report(&settings));
}

#[test]
fn report_has_every_table() {
    let ledger = ledger();
    let report = ledger.report(&ReportSettings::default());
    assert_eq!(report.daily_flow.len(), 7);
    assert_eq!(report.cumulative_position.len(), 7);
    assert_eq!(report.monthly_summary.len(), 4);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.top_counterparties.len(), 5);
    assert!(!report.product_rollup.is_empty());
    assert_eq!(report.movements.len(), ledger.movements().len());
    assert!(report.movements.is_sorted_by_key(|m| m.date));

    let summary = report.summary();
    assert_eq!(summary.first_date, Some(date(1, 29)));
    assert_eq!(summary.last_date, Some(date(2, 6)));
    assert_eq!(summary.operations, 8);
    assert_eq!(summary.operating_days, 5);
    assert_eq!(summary.alerts, 1);
    let usd = summary.totals(Currency::Usd).unwrap();
    assert_eq!(usd.inflow_total, Money::new(90_000));
    assert_eq!(usd.outflow_total, Money::new(370_000));
    assert_eq!(usd.net_flow, Money::new(-280_000));
}

#[test]
fn empty_ledger_gives_empty_tables() {
    let ledger = Ledger::builder().products(products()).build().unwrap();
    let report = ledger.report(&ReportSettings::default());
    assert!(report.daily_flow.is_empty());
    assert!(report.cumulative_position.is_empty());
    assert!(report.product_rollup.is_empty());
    assert!(report.top_counterparties.is_empty());
    assert!(report.monthly_summary.is_empty());
    assert!(report.alerts.is_empty());
    assert!(report.movements.is_empty());

    let summary = report.summary();
    assert_eq!(summary.first_date, None);
    assert_eq!(summary.operations, 0);
    assert!(summary.currencies.iter().all(|t| t.net_flow.is_zero()));
}

#[test]
fn duplicate_ids_fail_fast() {
    let err = Ledger::builder()
        .movements([
            inflow(1, date(1, 2), 1, Currency::Pen),
            outflow(1, date(1, 3), 1, Currency::Pen),
        ])
        .build()
        .unwrap_err();
    assert!(matches!(err, LedgerError::ExistingKey(_)));
}
