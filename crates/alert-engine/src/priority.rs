//! Priority ordering applied wherever a bounded list gets trimmed.

use std::cmp::Ordering;

use alert_core::Alert;

/// Stable priority sort: severity rank descending, then absolute magnitude
/// descending. Equal keys keep their relative input order.
pub fn sort_by_priority(alerts: &mut [Alert]) {
    alerts.sort_by(compare_priority);
}

pub fn compare_priority(a: &Alert, b: &Alert) -> Ordering {
    b.severity
        .rank()
        .cmp(&a.severity.rank())
        .then_with(|| cmp_magnitude_desc(a.value.abs(), b.value.abs()))
}

/// Descending magnitude. A NaN magnitude loses every comparison, so
/// NaN-valued alerts land after finite ones of the same severity.
fn cmp_magnitude_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_core::{AlertCategory, Severity};

    fn alert(id: &str, severity: Severity, value: f64) -> Alert {
        Alert {
            id: id.to_string(),
            ticker: id.to_string(),
            severity,
            message: String::new(),
            category: AlertCategory::Gap,
            value,
        }
    }

    #[test]
    fn severity_outranks_magnitude() {
        let mut alerts = vec![
            alert("a", Severity::Info, 99.0),
            alert("b", Severity::Success, 0.1),
            alert("c", Severity::Danger, 0.2),
            alert("d", Severity::Warning, 50.0),
        ];
        sort_by_priority(&mut alerts);

        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "b", "a"]);
    }

    #[test]
    fn ties_break_on_absolute_magnitude() {
        let mut alerts = vec![
            alert("small", Severity::Danger, 1.0),
            alert("negative", Severity::Danger, -8.0),
            alert("large", Severity::Danger, 5.0),
        ];
        sort_by_priority(&mut alerts);

        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["negative", "large", "small"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut alerts = vec![
            alert("first", Severity::Warning, 3.0),
            alert("second", Severity::Warning, -3.0),
            alert("third", Severity::Warning, 3.0),
        ];
        sort_by_priority(&mut alerts);

        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn nan_magnitude_sorts_last_within_severity() {
        let mut alerts = vec![
            alert("nan", Severity::Danger, f64::NAN),
            alert("tiny", Severity::Danger, 0.001),
            alert("warn", Severity::Warning, 10.0),
        ];
        sort_by_priority(&mut alerts);

        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        // NaN loses the tie-break but severity still leads.
        assert_eq!(ids, vec!["tiny", "nan", "warn"]);
    }
}
