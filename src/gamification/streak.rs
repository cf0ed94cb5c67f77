use chrono::NaiveDate;
use serde::Serialize;

/// The one stateful piece of the gamification layer. The state is loaded
/// from and written back to storage per instructor; the transition itself
/// is a pure function so it can be tested without a database.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_active_day: Option<NaiveDate>,
}

/// Transition rule for a qualifying activity on `day`: a repeat of the last
/// active day is a no-op, the immediately following day extends the streak,
/// anything else starts over at one.
pub fn record_activity(state: &StreakState, day: NaiveDate) -> StreakState {
    match state.last_active_day {
        Some(last) if last == day => state.clone(),
        Some(last) if last.succ_opt() == Some(day) => {
            let current = state.current_streak + 1;
            StreakState {
                current_streak: current,
                longest_streak: state.longest_streak.max(current),
                last_active_day: Some(day),
            }
        }
        _ => StreakState {
            current_streak: 1,
            longest_streak: state.longest_streak.max(1),
            last_active_day: Some(day),
        },
    }
}
