mod common;

use anyhow::Result;
use common::{parse_date, spend, spend_in, test_service};
use spendlog::application::ExpenseFilter;
use spendlog::domain::{CategoryFilter, DateRange, totals_by_category};

#[test]
fn test_spending_report() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    spend(&mut service, "2024-01-05", "grocery", 1000)?;
    spend(&mut service, "2024-01-12", "restaurant", 550)?;
    spend(&mut service, "2024-01-20", "taxi", 325)?;

    let report = service
        .spending_report(&ExpenseFilter::default())
        .unwrap();

    assert_eq!(report.total, 1875);
    assert_eq!(report.from_date, parse_date("2024-01-05"));
    assert_eq!(report.to_date, parse_date("2024-01-20"));
    assert_eq!(report.categories.len(), 2);

    let food = &report.categories[0];
    assert_eq!(food.category, "Food");
    assert_eq!(food.total, 1550);
    assert_eq!(food.count, 2);
    assert_eq!(food.average, 775);

    let transport = &report.categories[1];
    assert_eq!(transport.category, "Transport");
    assert_eq!(transport.total, 325);

    let percent_sum: f64 = report.categories.iter().map(|c| c.percentage).sum();
    assert!((percent_sum - 100.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_spending_report_for_date_range() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    spend(&mut service, "2024-01-05", "grocery", 1000)?;
    spend(&mut service, "2024-02-12", "concert", 8000)?;
    spend(&mut service, "2024-02-20", "electric bill", 6000)?;

    let february = service
        .spending_report(&ExpenseFilter {
            from_date: Some(parse_date("2024-02-01")),
            to_date: Some(parse_date("2024-02-29")),
            category: None,
        })
        .unwrap();

    assert_eq!(february.total, 14000);
    let names: Vec<&str> = february
        .categories
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(names, vec!["Entertainment", "Bills"]);

    Ok(())
}

#[test]
fn test_spending_report_empty_ledger() -> Result<()> {
    let (service, _temp) = test_service()?;

    assert!(service.spending_report(&ExpenseFilter::default()).is_none());
    assert_eq!(service.ledger().date_bounds(), None);

    Ok(())
}

#[test]
fn test_totals_by_category_over_ledger() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    spend_in(&mut service, "2024-01-01", "weekly shop", "Food", 1000)?;
    spend_in(&mut service, "2024-01-02", "bakery", "Food", 550)?;
    spend_in(&mut service, "2024-01-03", "bus ticket", "Transport", 325)?;

    let ledger = service.ledger();
    let range = ledger.date_bounds().unwrap();
    let all = ledger.filter(range, &CategoryFilter::from_name(Some("All")));
    let totals = totals_by_category(all);

    assert_eq!(totals.get("Food"), Some(&1550));
    assert_eq!(totals.get("Transport"), Some(&325));

    let outside = ledger.filter(
        DateRange::new(parse_date("2023-01-01"), parse_date("2023-12-31")),
        &CategoryFilter::All,
    );
    assert!(totals_by_category(outside).is_empty());

    Ok(())
}
