use serde::{Deserialize, Serialize};

use super::net_minor;

/// Running totals for a simulation.
///
/// `net_minor` and `roi_percent` are derived from `paid_minor` and
/// `spent_minor` on every update; paid includes jackpot payouts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunStats {
    pub tickets_processed: u64,
    pub days_elapsed: u64,
    pub jackpots_hit: u64,
    pub spent_minor: u64,
    pub paid_minor: u64,
    pub net_minor: i64,
    pub roi_percent: f64,
    pub rate_tickets_per_sec: f64,
    pub elapsed_seconds: f64,
}

impl RunStats {
    /// Account for one processed ticket.
    pub fn record(&mut self, cost_minor: u64, prize_minor: u64, jackpot: bool) {
        self.tickets_processed += 1;
        self.spent_minor = self.spent_minor.saturating_add(cost_minor);
        self.paid_minor = self.paid_minor.saturating_add(prize_minor);
        if jackpot {
            self.jackpots_hit += 1;
        }
        self.refresh();
    }

    /// Recompute the derived fields.
    pub fn refresh(&mut self) {
        self.net_minor = net_minor(self.paid_minor, self.spent_minor);
        self.roi_percent = if self.spent_minor > 0 {
            self.net_minor as f64 / self.spent_minor as f64 * 100.0
        } else {
            0.0
        };
    }
}
