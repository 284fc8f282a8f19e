//! Hours-of-Service duty-state ledger
//!
//! FMCSA limits for property-carrying drivers on the 70-hour/8-day cycle:
//! - 11-hour driving limit after 10 consecutive hours off duty
//! - 14-hour on-duty window after which driving is prohibited
//! - 30-minute break required after 8 cumulative driving hours
//! - no driving after 70 on-duty hours in 8 days; a 34-hour restart
//!   zeros the cycle
//!
//! The ledger is a plain value type threaded mutably through the planners.
//! It never reads the clock; the planners own time.

/// Maximum driving hours since the last full rest
pub const MAX_DRIVING_HOURS: f64 = 11.0;
/// The 14-hour on-duty window
pub const MAX_WINDOW_HOURS: f64 = 14.0;
/// Driving hours after which a 30-minute break is required
pub const BREAK_AFTER_HOURS: f64 = 8.0;
pub const BREAK_DURATION_HOURS: f64 = 0.5;
pub const REST_DURATION_HOURS: f64 = 10.0;
/// 34-hour restart resets the 70-hour cycle
pub const CYCLE_RESTART_HOURS: f64 = 34.0;
pub const MAX_CYCLE_HOURS: f64 = 70.0;
/// Fixed planning speed for converting distance to wheel time
pub const AVG_SPEED_MPH: f64 = 55.0;
pub const FUEL_INTERVAL_MILES: f64 = 1000.0;
pub const FUEL_STOP_DURATION_HOURS: f64 = 0.5;
pub const PICKUP_DURATION_HOURS: f64 = 1.0;
pub const DROPOFF_DURATION_HOURS: f64 = 1.0;

/// The four HOS accumulators for a single driver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HosState {
    /// Driving hours since the last 10-hour rest
    pub driving_hours: f64,
    /// On-duty hours since the last 10-hour rest (14-hour window)
    pub window_hours: f64,
    /// Driving hours since the last 30-minute (or longer) off-duty interval
    pub hours_since_break: f64,
    /// On-duty hours in the trailing 8-day cycle
    pub cycle_hours: f64,
    pub on_duty: bool,
}

impl HosState {
    /// Ledger at trip start, seeded with cycle hours already consumed
    pub fn with_cycle_used(cycle_hours: f64) -> Self {
        Self {
            cycle_hours,
            ..Default::default()
        }
    }

    /// Hours of driving possible before any limit is hit
    pub fn remaining_driving_now(&self) -> f64 {
        let by_driving = MAX_DRIVING_HOURS - self.driving_hours;
        let by_window = MAX_WINDOW_HOURS - self.window_hours;
        let by_break = BREAK_AFTER_HOURS - self.hours_since_break;
        let by_cycle = MAX_CYCLE_HOURS - self.cycle_hours;
        by_driving.min(by_window).min(by_break).min(by_cycle).max(0.0)
    }

    pub fn remaining_driving(&self) -> f64 {
        (MAX_DRIVING_HOURS - self.driving_hours).max(0.0)
    }

    pub fn remaining_window(&self) -> f64 {
        (MAX_WINDOW_HOURS - self.window_hours).max(0.0)
    }

    pub fn remaining_before_break(&self) -> f64 {
        (BREAK_AFTER_HOURS - self.hours_since_break).max(0.0)
    }

    pub fn remaining_cycle(&self) -> f64 {
        (MAX_CYCLE_HOURS - self.cycle_hours).max(0.0)
    }

    pub fn needs_break(&self) -> bool {
        self.hours_since_break >= BREAK_AFTER_HOURS
    }

    pub fn needs_rest(&self) -> bool {
        self.driving_hours >= MAX_DRIVING_HOURS || self.window_hours >= MAX_WINDOW_HOURS
    }

    pub fn needs_cycle_reset(&self) -> bool {
        self.cycle_hours >= MAX_CYCLE_HOURS
    }

    pub fn add_driving(&mut self, hours: f64) {
        self.driving_hours += hours;
        self.window_hours += hours;
        self.hours_since_break += hours;
        self.cycle_hours += hours;
        self.on_duty = true;
    }

    /// On-duty work that is not driving (dock work, fueling).
    /// Does not touch the driving or break counters.
    pub fn add_on_duty(&mut self, hours: f64) {
        self.window_hours += hours;
        self.cycle_hours += hours;
        self.on_duty = true;
    }

    /// Any off-duty interval of at least 30 minutes
    pub fn take_break(&mut self) {
        self.hours_since_break = 0.0;
    }

    /// A 10-hour off-duty interval
    pub fn take_rest(&mut self) {
        self.driving_hours = 0.0;
        self.window_hours = 0.0;
        self.hours_since_break = 0.0;
        self.on_duty = false;
    }

    /// A 34-hour off-duty interval: a rest that also zeros the cycle
    pub fn take_cycle_restart(&mut self) {
        self.take_rest();
        self.cycle_hours = 0.0;
    }
}
