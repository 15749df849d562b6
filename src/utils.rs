/// Shared helpers for measurement identifiers and calendar labels
///
/// Extract the pollutant code from a measurement id
///
/// Measurement ids are the pollutant code immediately followed by the site
/// id, e.g. `NO2MAR_LONGCHAMP` for NO2 measured at `MAR_LONGCHAMP`. The id is
/// cut at the first occurrence of the first three characters of the site
/// id. When the site prefix does not occur (or the site id is empty), the
/// whole measurement id is returned.
///
/// # Examples
///
/// ```
/// use station_qa_rates::utils::pollutant_from_measurement_id;
///
/// assert_eq!(pollutant_from_measurement_id("NO2MAR_LONGCHAMP", "MAR_LONGCHAMP"), "NO2");
/// assert_eq!(pollutant_from_measurement_id("PM10NIC_ARSON", "NIC_ARSON"), "PM10");
/// assert_eq!(pollutant_from_measurement_id("O3_TOULON", "MAR_LONGCHAMP"), "O3_TOULON");
/// ```
pub fn pollutant_from_measurement_id(measurement_id: &str, site: &str) -> String {
    let prefix: String = site.chars().take(3).collect();
    if prefix.is_empty() {
        return measurement_id.to_string();
    }

    match measurement_id.find(&prefix) {
        Some(idx) => measurement_id[..idx].to_string(),
        None => measurement_id.to_string(),
    }
}

/// English month name used as the column header of the rate tables
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Split a comma separated CLI/env list, dropping blanks
pub fn list_of_strings(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pollutant_with_site_suffix() {
        assert_eq!(
            pollutant_from_measurement_id("NO2MAR_LONGCHAMP", "MAR_LONGCHAMP"),
            "NO2"
        );
    }

    #[test]
    fn test_pollutant_cut_at_first_occurrence() {
        // The prefix occurs twice, only the part before the first counts
        assert_eq!(pollutant_from_measurement_id("SO2NICNIC_01", "NIC_01"), "SO2");
    }

    #[test]
    fn test_pollutant_prefix_missing() {
        assert_eq!(pollutant_from_measurement_id("CO_TOULON", "NIC_01"), "CO_TOULON");
    }

    #[test]
    fn test_pollutant_empty_site() {
        assert_eq!(pollutant_from_measurement_id("NO2X", ""), "NO2X");
    }

    #[test]
    fn test_pollutant_short_site() {
        assert_eq!(pollutant_from_measurement_id("PM25AB", "AB"), "PM25");
    }

    #[test]
    fn test_id_starting_with_site_gives_empty_pollutant() {
        assert_eq!(pollutant_from_measurement_id("NIC_01NO2", "NIC_01"), "");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }

    #[test]
    fn test_list_of_strings() {
        assert_eq!(list_of_strings("DIDON, V_NICE,,V_MARS "), vec!["DIDON", "V_NICE", "V_MARS"]);
        assert!(list_of_strings("").is_empty());
    }
}
