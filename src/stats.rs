use crate::journal::{HealthLogDraft, latest};
use crate::models::{Account, DashboardResponse, StatCard, TrendPoint};

const STEP_TARGET: f64 = 10_000.0;
const WATER_TARGET_ML: f64 = 2_500.0;
const SLEEP_TARGET_HOURS: f64 = 8.0;
const HEART_RATE_TARGET: f64 = 60.0;

pub fn build_dashboard(account: &Account) -> DashboardResponse {
    let current = latest(&account.logs);
    let (steps, water, sleep, heart_rate) = current.map_or((0.0, 0.0, 0.0, 0.0), |entry| {
        (
            f64::from(entry.steps),
            f64::from(entry.water_intake),
            entry.sleep_hours,
            f64::from(entry.heart_rate),
        )
    });

    let cards = vec![
        card("Steps", steps, "", STEP_TARGET),
        card("Hydration", water, "ml", WATER_TARGET_ML),
        card("Sleep", sleep, "h", SLEEP_TARGET_HOURS),
        card("Heart Rate", heart_rate, "bpm", HEART_RATE_TARGET),
    ];

    let trends = account
        .logs
        .iter()
        .map(|entry| TrendPoint {
            date: entry.date,
            steps: entry.steps,
            water_intake: entry.water_intake,
            weight: entry.weight,
        })
        .collect();

    DashboardResponse {
        name: account.name.clone(),
        cards,
        trends,
        target_weight: account.target_weight,
        weight_gap: current.map(|entry| entry.weight - account.target_weight),
        draft: HealthLogDraft::prefilled(&account.logs),
    }
}

fn card(label: &'static str, value: f64, unit: &'static str, target: f64) -> StatCard {
    StatCard {
        label,
        value,
        unit,
        target,
        progress: progress(value, target),
    }
}

fn progress(value: f64, target: f64) -> f64 {
    (value / target * 100.0).min(100.0)
}
