use crate::types::daily::MentorAlert;
use crate::types::scoring::HealthCategory;

pub fn mentor_alerts(alerts: &[MentorAlert], weight: f64) -> HealthCategory {
    let issues = alerts
        .iter()
        .filter(|alert| !alert.status.is_addressed())
        .map(|alert| match (&alert.message, &alert.id) {
            (Some(message), _) => format!("unresolved mentor alert: {message}"),
            (None, Some(id)) => format!("unresolved mentor alert {id}"),
            (None, None) => "unresolved mentor alert".to_string(),
        })
        .collect::<Vec<_>>();
    let addressed = alerts.len() - issues.len();
    HealthCategory::from_ratio(addressed, alerts.len(), weight, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::daily::AlertStatus;

    fn alert(status: AlertStatus) -> MentorAlert {
        MentorAlert {
            id: Some("a1".to_string()),
            status,
            message: None,
        }
    }

    #[test]
    fn acknowledged_overridden_and_resolved_count_as_addressed() {
        let alerts = vec![
            alert(AlertStatus::Acknowledged),
            alert(AlertStatus::Overridden),
            alert(AlertStatus::Resolved),
            alert(AlertStatus::Active),
        ];
        let category = mentor_alerts(&alerts, 10.0);
        assert_eq!(category.score, 75.0);
        assert_eq!(category.issues, vec!["unresolved mentor alert a1".to_string()]);
    }

    #[test]
    fn no_alerts_is_perfect() {
        assert_eq!(mentor_alerts(&[], 10.0).score, 100.0);
    }
}
