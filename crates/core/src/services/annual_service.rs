use crate::errors::CoreError;
use crate::models::annual::AnnualTrend;

/// Reads and writes absolute monthly snapshots.
///
/// Independent of the delta ledger: nothing here looks at trend deltas.
pub struct AnnualService;

impl AnnualService {
    pub fn new() -> Self {
        Self
    }

    pub fn set_snapshot(
        &self,
        annual: &mut AnnualTrend,
        year: i32,
        month: u32,
        value: u64,
    ) -> Result<(), CoreError> {
        Self::check_month(year, month)?;
        annual.insert(year, month, value);
        Ok(())
    }

    pub fn remove_snapshot(
        &self,
        annual: &mut AnnualTrend,
        year: i32,
        month: u32,
    ) -> Result<Option<u64>, CoreError> {
        Self::check_month(year, month)?;
        Ok(annual.remove(year, month))
    }

    /// Snapshots for January..December of `year`; `None` where not recorded.
    pub fn year_row(&self, annual: &AnnualTrend, year: i32) -> Vec<Option<u64>> {
        (1..=12).map(|m| annual.get(year, m)).collect()
    }

    /// Difference to the previous month's snapshot within the same year.
    /// `None` when either side is missing or `month` is January.
    pub fn change_from_previous(&self, annual: &AnnualTrend, year: i32, month: u32) -> Option<i64> {
        if month <= 1 {
            return None;
        }
        let current = i64::try_from(annual.get(year, month)?).unwrap_or(i64::MAX);
        let previous = i64::try_from(annual.get(year, month - 1)?).unwrap_or(i64::MAX);
        Some(current.saturating_sub(previous))
    }

    /// Years that have at least one snapshot, ascending.
    pub fn years(&self, annual: &AnnualTrend) -> Vec<i32> {
        let mut years: Vec<i32> = annual.years.keys().filter_map(|y| y.parse().ok()).collect();
        years.sort_unstable();
        years
    }

    fn check_month(year: i32, month: u32) -> Result<(), CoreError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(CoreError::ValidationError(format!(
                "Snapshot month out of range: {year}-{month:02}"
            )));
        }
        Ok(())
    }
}

impl Default for AnnualService {
    fn default() -> Self {
        Self::new()
    }
}
