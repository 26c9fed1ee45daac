use crate::backend::{Backend, BackendError};
use crate::models::{DayBucket, StatsResponse, VisitRecord};
use chrono::{DateTime, Local, Utc};

/// The chart shows at most the seven most recent distinct days.
pub const MAX_DAYS: usize = 7;

/// Calendar day of a visit, formatted day-first in server-local time.
pub fn visit_day(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d/%m/%Y").to_string()
}

/// Folds visit records into per-day buckets for chart display.
///
/// The input is newest-first, so first-seen order is newest-first; every
/// record is counted into its day before the sequence is capped at
/// [`MAX_DAYS`] and reversed to oldest-first.
pub fn day_buckets(visits: &[VisitRecord]) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = Vec::new();
    for visit in visits {
        let date = visit_day(visit.created_at);
        match buckets.iter_mut().find(|bucket| bucket.date == date) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(DayBucket { date, count: 1 }),
        }
    }
    buckets.truncate(MAX_DAYS);
    buckets.reverse();
    buckets
}

/// Loads the statistics the dashboard displays.
///
/// Total visits is the sum over the kept buckets only, matching what the
/// chart shows.
pub async fn load(backend: &dyn Backend) -> Result<StatsResponse, BackendError> {
    let visits = backend.visits().await?;
    let visits_by_day = day_buckets(&visits);
    let total_visits = visits_by_day.iter().map(|bucket| bucket.count).sum();
    let search_count = backend.search_count().await?;

    Ok(StatsResponse {
        visits_by_day,
        total_visits,
        search_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::models::{SeedData, SeedUser};
    use chrono::{Duration, TimeZone, Utc};

    fn visit(at: DateTime<Utc>) -> VisitRecord {
        VisitRecord {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: at,
        }
    }

    #[test]
    fn buckets_group_by_day_oldest_first() {
        let newer = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2026, 1, 4, 12, 0, 0).unwrap();
        let visits = vec![visit(newer), visit(newer), visit(older)];

        let buckets = day_buckets(&visits);
        assert_eq!(
            buckets,
            vec![
                DayBucket {
                    date: visit_day(older),
                    count: 1,
                },
                DayBucket {
                    date: visit_day(newer),
                    count: 2,
                },
            ]
        );
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 3);
    }

    #[test]
    fn buckets_cap_at_the_seven_most_recent_days() {
        let newest = Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0).unwrap();
        let mut visits = Vec::new();
        for day in 0..10 {
            let at = newest - Duration::days(day);
            visits.push(visit(at));
            visits.push(visit(at));
        }

        let buckets = day_buckets(&visits);
        assert_eq!(buckets.len(), MAX_DAYS);
        // Oldest-first, ending on the newest day.
        assert_eq!(buckets.last().unwrap().date, visit_day(newest));
        assert_eq!(
            buckets.first().unwrap().date,
            visit_day(newest - Duration::days(6))
        );
        assert!(buckets.iter().all(|bucket| bucket.count == 2));
    }

    #[test]
    fn no_visits_means_no_buckets() {
        assert!(day_buckets(&[]).is_empty());
    }

    #[tokio::test]
    async fn load_reports_kept_totals_and_search_count() {
        let newest = Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0).unwrap();
        let seed = SeedData {
            users: vec![SeedUser {
                email: "admin@example.com".to_string(),
                password: "s3cret".to_string(),
                role: Some("admin".to_string()),
            }],
            visits: (0..9).map(|day| newest - Duration::days(day)).collect(),
            searches: 42,
        };
        let backend = MemoryBackend::from_seed(seed);

        let stats = load(&backend).await.unwrap();
        assert_eq!(stats.visits_by_day.len(), MAX_DAYS);
        // Two of the nine single-visit days fall off the chart.
        assert_eq!(stats.total_visits, 7);
        assert_eq!(stats.search_count, 42);
    }
}
