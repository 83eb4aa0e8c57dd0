use chrono::{DateTime, Days, NaiveDate, Utc};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Trailing window of UTC calendar days ending on the day of `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueWindow {
    dates: Vec<NaiveDate>,
    cutoff: i64,
}

impl RevenueWindow {
    pub fn ending_at(now: DateTime<Utc>, days: u32) -> Self {
        let today = now.date_naive();
        let dates = (0..days)
            .rev()
            .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
            .collect();

        Self {
            dates,
            cutoff: now.timestamp() - i64::from(days) * SECONDS_PER_DAY,
        }
    }

    /// Oldest to newest.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Unix timestamp passed to Stripe as `created[gte]`.
    pub fn cutoff(&self) -> i64 {
        self.cutoff
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// UTC calendar day of a unix timestamp.
pub fn charge_date(created: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(created, 0).map(|at| at.date_naive())
}

/// Cents to whole currency units, rounding half up.
pub fn cents_to_units(cents: i64) -> i64 {
    (cents + 50).div_euclid(100)
}

/// `YYYY-MM-DD`
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
