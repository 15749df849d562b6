use super::rate_calculator::MonthlyRateResult;

/// The per-month metrics published by the rate report, one output table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateMetric {
    OperationalRate,
    DisponibilityRate,
    LostRate,
    IndisponibilityLostRate,
    MonthlyMax,
}

impl RateMetric {
    pub const ALL: [RateMetric; 5] = [
        RateMetric::OperationalRate,
        RateMetric::DisponibilityRate,
        RateMetric::LostRate,
        RateMetric::IndisponibilityLostRate,
        RateMetric::MonthlyMax,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RateMetric::OperationalRate => "month_operational_rate",
            RateMetric::DisponibilityRate => "month_disponibility_rate",
            RateMetric::LostRate => "overall_lost_rate",
            RateMetric::IndisponibilityLostRate => "overall_indisponibility_lost_rate",
            RateMetric::MonthlyMax => "month_max",
        }
    }

    /// Output table file name, kept identical to the historical report files.
    pub fn file_name(self) -> &'static str {
        match self {
            RateMetric::OperationalRate => "tauxfo.csv",
            RateMetric::DisponibilityRate => "dispo.csv",
            RateMetric::LostRate => "pert.csv",
            RateMetric::IndisponibilityLostRate => "pert_indi.csv",
            RateMetric::MonthlyMax => "monthly_max.csv",
        }
    }

    /// The metric's value for one month; `None` only for an undefined maximum.
    pub fn value(self, result: &MonthlyRateResult) -> Option<f64> {
        match self {
            RateMetric::OperationalRate => Some(result.month_operational_rate),
            RateMetric::DisponibilityRate => Some(result.month_disponibility_rate),
            RateMetric::LostRate => Some(result.overall_lost_rate),
            RateMetric::IndisponibilityLostRate => Some(result.overall_indisponibility_lost_rate),
            RateMetric::MonthlyMax => result.month_max,
        }
    }

    /// Only the monthly rates get an annual summary column.
    pub fn has_annual_summary(self) -> bool {
        matches!(
            self,
            RateMetric::OperationalRate | RateMetric::DisponibilityRate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_file_names_are_distinct() {
        let names: HashSet<_> = RateMetric::ALL.iter().map(|m| m.file_name()).collect();
        assert_eq!(names.len(), RateMetric::ALL.len());
    }

    #[test]
    fn test_annual_summary_only_for_monthly_rates() {
        let with_summary: Vec<_> = RateMetric::ALL
            .iter()
            .filter(|m| m.has_annual_summary())
            .collect();
        assert_eq!(
            with_summary,
            vec![&RateMetric::OperationalRate, &RateMetric::DisponibilityRate]
        );
    }
}
