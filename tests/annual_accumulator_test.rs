// Year-long accumulation and both summary policies

mod common;

use chrono::NaiveDate;
use common::{assert_close, month_samples, series_for_months};
use station_qa_rates::qa::{
    accumulate, slice_months, AccumulationState, SeriesKey, StateCode, SummaryPolicy,
};
use station_qa_rates::rate_error::RateError;

const ID: &str = "O3NIC_ARSON";

fn key() -> SeriesKey {
    SeriesKey::new("NIC_ARSON", ID)
}

#[test]
fn test_full_year_means_monthly_rates() {
    let samples = series_for_months(2022, 1..=12, ID, &[(StateCode::A, 90), (StateCode::D, 10)]);
    let slices = slice_months(&samples, 2022, SummaryPolicy::FullYear.months());
    let report = accumulate(&key(), &slices, SummaryPolicy::FullYear).unwrap();

    assert_eq!(report.months.len(), 12);
    assert_close(report.annual_operational_rate, 0.9);
    assert_close(report.annual_disponibility_rate, 0.9);
    assert_eq!(
        report.final_state(),
        Some(AccumulationState::new(2 + 12 * 99, 120, 120))
    );
    assert_close(report.months[11].overall_lost_rate, 120.0 / 8760.0);
    assert_close(report.months[11].overall_indisponibility_lost_rate, 120.0 / 3504.0);
}

#[test]
fn test_accumulated_losses_never_decrease() {
    let mut samples = Vec::new();
    for month in 1..=12 {
        // Loss pattern varies, including loss-free months
        let lost = (month as usize * 7) % 5;
        samples.extend(month_samples(
            2022,
            month,
            ID,
            &[(StateCode::A, 50), (StateCode::N, lost), (StateCode::Z, lost / 2)],
            20.0,
        ));
    }
    let slices = slice_months(&samples, 2022, 1..=12);
    let report = accumulate(&key(), &slices, SummaryPolicy::FullYear).unwrap();

    for pair in report.months.windows(2) {
        assert!(pair[1].state.accumulated_lost_count >= pair[0].state.accumulated_lost_count);
        assert!(
            pair[1].state.accumulated_indisponibility_lost_count
                >= pair[0].state.accumulated_indisponibility_lost_count
        );
        assert!(pair[1].overall_lost_rate >= pair[0].overall_lost_rate);
    }
}

#[test]
fn test_year_to_date_annualizes_over_elapsed_days() {
    let policy = SummaryPolicy::for_year(2023, NaiveDate::from_ymd_opt(2023, 4, 17).unwrap()).unwrap();
    assert_eq!(
        policy,
        SummaryPolicy::YearToDate {
            last_month: 3,
            days_elapsed: 90
        }
    );

    let samples = series_for_months(2023, 1..=6, ID, &[(StateCode::A, 50), (StateCode::C, 25), (StateCode::I, 5)]);
    let slices = slice_months(&samples, 2023, policy.months());
    assert_eq!(slices.len(), 3);

    let report = accumulate(&key(), &slices, policy).unwrap();
    let expected = 90.0 * 96.0;
    assert_close(report.annual_operational_rate, 150.0 / expected);
    assert_close(report.annual_disponibility_rate, 225.0 / expected);
    assert_eq!(report.last_month().map(|m| m.month), Some(3));
}

#[test]
fn test_missing_month_aborts_series() {
    let mut samples = series_for_months(2022, 1..=4, ID, &[(StateCode::A, 10)]);
    samples.extend(series_for_months(2022, 6..=12, ID, &[(StateCode::A, 10)]));
    let slices = slice_months(&samples, 2022, 1..=12);

    let err = accumulate(&key(), &slices, SummaryPolicy::FullYear).unwrap_err();
    assert_eq!(
        err,
        RateError::CorruptSource {
            site: "NIC_ARSON".to_string(),
            measurement_id: ID.to_string(),
            month: 5,
        }
    );
}

#[test]
fn test_other_years_are_ignored() {
    let mut samples = series_for_months(2022, 1..=12, ID, &[(StateCode::A, 10)]);
    samples.extend(month_samples(2021, 12, ID, &[(StateCode::D, 500)], 1.0));
    samples.extend(month_samples(2023, 1, ID, &[(StateCode::D, 500)], 1.0));

    let slices = slice_months(&samples, 2022, 1..=12);
    let report = accumulate(&key(), &slices, SummaryPolicy::FullYear).unwrap();
    assert_eq!(report.final_state().map(|s| s.accumulated_lost_count), Some(0));
}

#[test]
fn test_january_of_current_year_has_nothing_to_process() {
    let policy = SummaryPolicy::for_year(2024, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()).unwrap();
    let slices = slice_months(&[], 2024, policy.months());
    assert!(slices.is_empty());
    assert!(matches!(
        accumulate(&key(), &slices, policy),
        Err(RateError::EmptyWindow { .. })
    ));
}

#[test]
fn test_future_year_has_no_policy() {
    assert_eq!(
        SummaryPolicy::for_year(2031, NaiveDate::from_ymd_opt(2030, 12, 31).unwrap()),
        None
    );
}
