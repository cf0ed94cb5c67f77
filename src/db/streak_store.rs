use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::gamification::streak::{self, StreakState};

const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, sqlx::FromRow)]
struct StreakRow {
    current_streak: i64,
    longest_streak: i64,
    last_active_day: Option<String>,
}

impl StreakRow {
    fn into_state(self) -> StreakState {
        StreakState {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            last_active_day: self
                .last_active_day
                .and_then(|d| NaiveDate::parse_from_str(&d, DAY_FORMAT).ok()),
        }
    }
}

/// Applies the streak transition for a qualifying activity on `day` and
/// persists the result. The read-modify-write runs inside one sqlite write
/// transaction, which serializes concurrent updates for the same instructor.
pub async fn record_daily_activity(
    db: &SqlitePool,
    instructor_id: &str,
    day: NaiveDate,
) -> Result<StreakState, sqlx::Error> {
    let mut tx = db.begin().await?;

    let row: Option<StreakRow> = sqlx::query_as(
        "SELECT current_streak, longest_streak, last_active_day FROM instructor_streaks WHERE instructor_id = ?",
    )
    .bind(instructor_id)
    .fetch_optional(&mut *tx)
    .await?;

    let current = row.map(StreakRow::into_state).unwrap_or_default();
    let next = streak::record_activity(&current, day);

    sqlx::query(
        r#"
        INSERT INTO instructor_streaks (instructor_id, current_streak, longest_streak, last_active_day)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(instructor_id) DO UPDATE SET
            current_streak = excluded.current_streak,
            longest_streak = excluded.longest_streak,
            last_active_day = excluded.last_active_day
        "#,
    )
    .bind(instructor_id)
    .bind(next.current_streak)
    .bind(next.longest_streak)
    .bind(next.last_active_day.map(|d| d.format(DAY_FORMAT).to_string()))
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(next)
}
