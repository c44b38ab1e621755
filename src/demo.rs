//! Sample records for trying out the charts and analytics.

use axum::{extract::State, response::Response};
use time::{Date, Duration, OffsetDateTime};

use crate::{
    Error,
    alert::Alert,
    app_state::BudgetState,
    budget::Budget,
    events::{BudgetEvent, budget_changed_response},
    record::NewRecord,
};

/// Build a budget with a few income and expense records dated over the three
/// days ending on the date of `now`.
pub fn demo_budget(now: OffsetDateTime) -> Result<Budget, Error> {
    let today = now.date();
    let days_ago = |days: i64| -> Date { today - Duration::days(days) };

    let records = [
        NewRecord::income("Salary", 2500.0, days_ago(2)).category("Work"),
        NewRecord::income("Book sale", 150.0, days_ago(0)).category("Sales"),
        NewRecord::expense("Rent", 800.0, days_ago(2)).category("Housing"),
        NewRecord::expense("Groceries", 120.0, days_ago(1)).category("Food"),
        NewRecord::expense("Transport", 100.0, days_ago(0)).category("Transport"),
    ];

    let mut budget = Budget::new();
    for new_record in records {
        budget.add(new_record, now)?;
    }

    Ok(budget)
}

/// A route handler that replaces every record with the demo records.
pub async fn load_demo_endpoint(State(state): State<BudgetState>) -> Response {
    let now = match state.local_now() {
        Ok(now) => now,
        Err(error) => return error.into_alert_response(),
    };

    let commit = state.commit(
        now,
        |budget| {
            let demo = demo_budget(now)?;
            Ok(budget.replace(demo))
        },
        |_| BudgetEvent::DemoLoaded,
    );

    match commit {
        Ok(commit) => {
            tracing::info!(
                "Loaded demo data, replaced {} records",
                commit.value.len()
            );

            budget_changed_response(
                Alert::success(
                    "Demo data loaded",
                    "Your records were replaced with sample income and expenses.",
                ),
                commit.save_error,
            )
        }
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};
    use time::{
        Duration,
        macros::{date, datetime},
    };

    use crate::{
        events::BudgetEvent,
        record::NewRecord,
        test_utils::{add_record, assert_hx_trigger, get_test_budget_state},
    };

    use super::{demo_budget, load_demo_endpoint};

    #[test]
    fn demo_covers_three_days_ending_today() {
        let now = datetime!(2025-10-05 12:00:00 UTC);

        let budget = demo_budget(now).unwrap();
        let totals = budget.totals();

        assert_eq!(budget.len(), 5);
        assert_eq!(totals.income, 2650.0);
        assert_eq!(totals.expenses, 1020.0);

        let dates: Vec<_> = budget.all_records().map(|record| record.local_date()).collect();
        assert!(dates.iter().all(|&date| date <= now.date()));
        assert!(dates.iter().all(|&date| date >= now.date() - Duration::days(2)));
        assert!(dates.contains(&now.date()));
    }

    #[tokio::test]
    async fn replaces_records_with_demo() {
        let state = get_test_budget_state();
        add_record(&state, NewRecord::expense("Old", 1.0, date!(2025 - 01 - 01)));
        let mut events = state.events.subscribe();

        let response = load_demo_endpoint(State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_hx_trigger(&response, "budget-changed");
        assert_eq!(events.try_recv(), Ok(BudgetEvent::DemoLoaded));
        assert_eq!(state.lock().unwrap().len(), 5);
    }
}
