//! HOS-compliant trip planning.
//!
//! Walks the ordered route legs and emits a contiguous timeline of duty
//! segments: driving stretches interleaved with the interruptions the
//! ledger demands (30-minute breaks, 10-hour rests, 34-hour restarts) plus
//! fuel stops on a fixed mileage cadence, then the on-duty dock work at the
//! end of each leg.
//!
//! Distance is converted to wheel time at a fixed planning speed rather
//! than the routing provider's estimate: HOS arithmetic is hour-based and
//! must stay reproducible across providers.

use chrono::{DateTime, Duration, Timelike, Utc};
use thiserror::Error;
use tracing::debug;

use crate::services::geo::interpolate;
use crate::services::hos::{
    HosState, AVG_SPEED_MPH, BREAK_DURATION_HOURS, CYCLE_RESTART_HOURS, DROPOFF_DURATION_HOURS,
    FUEL_INTERVAL_MILES, FUEL_STOP_DURATION_HOURS, MAX_CYCLE_HOURS, PICKUP_DURATION_HOURS,
    REST_DURATION_HOURS,
};
use crate::types::{DutyStatus, LegType, Location, RouteLeg, Segment, SegmentKind};

/// Window around a due fuel stop within which a required break is merged
/// into a single combined stop
const COMBINED_FUEL_BREAK_WINDOW_MILES: f64 = 100.0;

/// Leg remainders below this are treated as arrival
const ARRIVAL_EPSILON_MILES: f64 = 0.1;

/// Input problems the planner rejects before any scheduling
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("current_cycle_used must be within 0..=70 hours, got {0}")]
    CycleOutOfRange(f64),
    #[error("leg distance must be non-negative, got {0}")]
    NegativeLegDistance(f64),
}

/// Plan a full trip over the given legs.
///
/// The returned segments form one contiguous timeline starting at
/// `start_time` (default: now, truncated to the minute). Each leg ends with
/// its dock work (pickup or dropoff), preceded by a rest when the ledger
/// forbids further on-duty work.
pub fn plan_trip(
    legs: &[RouteLeg],
    current_cycle_used: f64,
    start_time: Option<DateTime<Utc>>,
) -> Result<Vec<Segment>, PlanError> {
    if !current_cycle_used.is_finite()
        || !(0.0..=MAX_CYCLE_HOURS).contains(&current_cycle_used)
    {
        return Err(PlanError::CycleOutOfRange(current_cycle_used));
    }
    if let Some(leg) = legs.iter().find(|l| l.distance_miles < 0.0) {
        return Err(PlanError::NegativeLegDistance(leg.distance_miles));
    }

    let mut t = start_time.unwrap_or_else(|| {
        let now = Utc::now();
        now.with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now)
    });

    let mut state = HosState::with_cycle_used(current_cycle_used);
    let mut segments: Vec<Segment> = Vec::new();

    for leg in legs {
        plan_driving_leg(
            &mut state,
            &mut segments,
            t,
            &leg.start,
            &leg.end,
            leg.distance_miles,
        );
        if let Some(last) = segments.last() {
            t = last.end;
        }

        // Dock work may need a rest first; it never needs a 30-minute break.
        if let Some(rest) = rest_before_dock(&mut state, t, &leg.end) {
            t = rest.end;
            segments.push(rest);
        }

        let (kind, duration, reason) = match leg.leg_type {
            LegType::DriveToPickup => {
                (SegmentKind::Pickup, PICKUP_DURATION_HOURS, "Pickup - Loading")
            }
            LegType::DriveToDropoff => (
                SegmentKind::Dropoff,
                DROPOFF_DURATION_HOURS,
                "Dropoff - Unloading",
            ),
        };
        let dock = stationary(kind, DutyStatus::OnDutyNotDriving, t, duration, &leg.end, reason);
        state.add_on_duty(duration);
        t = dock.end;
        segments.push(dock);
    }

    debug!(
        segments = segments.len(),
        cycle_hours = state.cycle_hours,
        "trip planned"
    );

    Ok(segments)
}

/// Rest required before on-duty dock work, if any.
///
/// The 34-hour restart supersedes the 10-hour rest when the cycle is also
/// exhausted; a plain rest would leave the driver unable to work.
fn rest_before_dock(
    state: &mut HosState,
    t: DateTime<Utc>,
    location: &Location,
) -> Option<Segment> {
    if state.needs_cycle_reset() {
        let rest = stationary(
            SegmentKind::Rest,
            DutyStatus::OffDuty,
            t,
            CYCLE_RESTART_HOURS,
            location,
            "Required 34-hour restart (70hr cycle limit)",
        );
        state.take_cycle_restart();
        Some(rest)
    } else if state.needs_rest() {
        let rest = stationary(
            SegmentKind::Rest,
            DutyStatus::OffDuty,
            t,
            REST_DURATION_HOURS,
            location,
            "Required 10-hour rest",
        );
        state.take_rest();
        Some(rest)
    } else {
        None
    }
}

/// Plan the driving portion of one leg, inserting breaks, rests, restarts
/// and fuel stops so that no ledger limit is ever exceeded.
fn plan_driving_leg(
    state: &mut HosState,
    segments: &mut Vec<Segment>,
    start_time: DateTime<Utc>,
    leg_start: &Location,
    leg_end: &Location,
    total_miles: f64,
) {
    let mut miles_remaining = total_miles;
    let mut miles_since_fuel = 0.0;
    let mut t = start_time;

    while miles_remaining > ARRIVAL_EPSILON_MILES {
        if state.remaining_driving_now() <= 0.0 {
            let here = point_along(leg_start, leg_end, total_miles, miles_remaining);
            let stop = if state.needs_cycle_reset() {
                let stop = stationary(
                    SegmentKind::Rest,
                    DutyStatus::OffDuty,
                    t,
                    CYCLE_RESTART_HOURS,
                    &here,
                    "Required 34-hour restart (70hr cycle limit)",
                );
                state.take_cycle_restart();
                stop
            } else if state.needs_break() && !state.needs_rest() {
                let stop = stationary(
                    SegmentKind::Break,
                    DutyStatus::OffDuty,
                    t,
                    BREAK_DURATION_HOURS,
                    &here,
                    "Required 30-minute break (8hr driving limit)",
                );
                state.take_break();
                stop
            } else {
                let stop = stationary(
                    SegmentKind::Rest,
                    DutyStatus::OffDuty,
                    t,
                    REST_DURATION_HOURS,
                    &here,
                    "Required 10-hour rest (driving/window limit)",
                );
                state.take_rest();
                stop
            };
            t = stop.end;
            segments.push(stop);
            continue;
        }

        let miles_can_drive = state.remaining_driving_now() * AVG_SPEED_MPH;
        let mut miles_this = miles_remaining.min(miles_can_drive);

        // Fuel planning: clamp the stretch at the next due fuel stop,
        // unless the leg ends before we would reach it.
        let mut miles_to_fuel = FUEL_INTERVAL_MILES - miles_since_fuel;
        if miles_to_fuel <= 0.0 {
            miles_to_fuel = FUEL_INTERVAL_MILES;
        }
        let need_fuel = miles_this >= miles_to_fuel && miles_remaining > miles_to_fuel;
        if need_fuel {
            miles_this = miles_to_fuel;
        }

        let hours_this = miles_this / AVG_SPEED_MPH;

        // A 30-minute break may come due partway through this stretch.
        let hours_to_break = state.remaining_before_break();
        if hours_to_break > 0.0 && hours_this > hours_to_break {
            let miles_before_break = hours_to_break * AVG_SPEED_MPH;
            if miles_before_break > ARRIVAL_EPSILON_MILES {
                let drive = drive_segment(
                    leg_start,
                    leg_end,
                    total_miles,
                    miles_remaining,
                    miles_before_break,
                    t,
                );
                state.add_driving(hours_to_break);
                miles_remaining -= miles_before_break;
                miles_since_fuel += miles_before_break;
                t = drive.end;
                segments.push(drive);
            }

            let here = point_along(leg_start, leg_end, total_miles, miles_remaining);
            let stop = if need_fuel
                && (miles_since_fuel - FUEL_INTERVAL_MILES).abs()
                    < COMBINED_FUEL_BREAK_WINDOW_MILES
            {
                // Break falls at the fuel stop, so one stop covers both.
                miles_since_fuel = 0.0;
                stationary(
                    SegmentKind::Fuel,
                    DutyStatus::OffDuty,
                    t,
                    BREAK_DURATION_HOURS,
                    &here,
                    "Fuel stop + 30-minute break",
                )
            } else {
                stationary(
                    SegmentKind::Break,
                    DutyStatus::OffDuty,
                    t,
                    BREAK_DURATION_HOURS,
                    &here,
                    "Required 30-minute break (8hr driving limit)",
                )
            };
            state.take_break();
            t = stop.end;
            segments.push(stop);
            continue;
        }

        // Drive this stretch.
        let drive = drive_segment(
            leg_start,
            leg_end,
            total_miles,
            miles_remaining,
            miles_this,
            t,
        );
        let end_location = drive.end_location.clone();
        state.add_driving(hours_this);
        miles_remaining -= miles_this;
        miles_since_fuel += miles_this;
        t = drive.end;
        segments.push(drive);

        // Fuel once the tank interval is used up, unless this was arrival.
        if need_fuel && miles_remaining > ARRIVAL_EPSILON_MILES {
            let fuel = stationary(
                SegmentKind::Fuel,
                DutyStatus::OnDutyNotDriving,
                t,
                FUEL_STOP_DURATION_HOURS,
                &end_location,
                "Fuel stop",
            );
            state.add_on_duty(FUEL_STOP_DURATION_HOURS);
            miles_since_fuel = 0.0;
            t = fuel.end;
            segments.push(fuel);
        }
    }
}

/// Geometric point reached after covering all but `miles_remaining` of the leg
fn point_along(
    leg_start: &Location,
    leg_end: &Location,
    total_miles: f64,
    miles_remaining: f64,
) -> Location {
    let fraction = if total_miles > 0.0 {
        1.0 - miles_remaining / total_miles
    } else {
        0.0
    };
    interpolate(leg_start, leg_end, fraction.clamp(0.0, 1.0))
}

fn drive_segment(
    leg_start: &Location,
    leg_end: &Location,
    total_miles: f64,
    miles_remaining: f64,
    miles: f64,
    start: DateTime<Utc>,
) -> Segment {
    let fraction_start = if total_miles > 0.0 {
        1.0 - miles_remaining / total_miles
    } else {
        0.0
    };
    let fraction_end = if total_miles > 0.0 {
        1.0 - (miles_remaining - miles) / total_miles
    } else {
        1.0
    };

    Segment {
        kind: SegmentKind::Drive,
        duty_status: DutyStatus::Driving,
        start,
        end: start + hours(miles / AVG_SPEED_MPH),
        start_location: interpolate(leg_start, leg_end, fraction_start.clamp(0.0, 1.0)),
        end_location: interpolate(leg_start, leg_end, fraction_end.clamp(0.0, 1.0)),
        distance_miles: miles,
        reason: "Driving".to_string(),
    }
}

fn stationary(
    kind: SegmentKind,
    duty_status: DutyStatus,
    start: DateTime<Utc>,
    duration_hours: f64,
    location: &Location,
    reason: &str,
) -> Segment {
    Segment {
        kind,
        duty_status,
        start,
        end: start + hours(duration_hours),
        start_location: location.clone(),
        end_location: location.clone(),
        distance_miles: 0.0,
        reason: reason.to_string(),
    }
}

fn hours(h: f64) -> Duration {
    Duration::seconds((h * 3600.0).round() as i64)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::hos::{BREAK_AFTER_HOURS, MAX_DRIVING_HOURS};
    use chrono::TimeZone;

    fn chicago() -> Location {
        Location::new(41.8781, -87.6298, "Chicago, IL")
    }

    fn st_louis() -> Location {
        Location::new(38.6270, -90.1994, "St. Louis, MO")
    }

    fn dallas() -> Location {
        Location::new(32.7767, -96.7970, "Dallas, TX")
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap()
    }

    fn pickup_leg(distance: f64) -> RouteLeg {
        RouteLeg {
            start: chicago(),
            end: st_louis(),
            distance_miles: distance,
            leg_type: LegType::DriveToPickup,
        }
    }

    fn dropoff_leg(distance: f64) -> RouteLeg {
        RouteLeg {
            start: st_louis(),
            end: dallas(),
            distance_miles: distance,
            leg_type: LegType::DriveToDropoff,
        }
    }

    fn drive_miles(segments: &[Segment]) -> f64 {
        segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Drive)
            .map(|s| s.distance_miles)
            .sum()
    }

    fn assert_contiguous(segments: &[Segment]) {
        for pair in segments.windows(2) {
            assert_eq!(
                pair[0].end, pair[1].start,
                "timeline gap between {:?} and {:?}",
                pair[0].kind, pair[1].kind
            );
        }
        for s in segments {
            assert!(s.start < s.end, "empty or inverted segment {:?}", s.kind);
        }
    }

    /// Timestamps are whole seconds, so the replay allows a couple of
    /// seconds of rounding slack.
    const REPLAY_EPSILON: f64 = 2.0 / 3600.0;

    /// Replay the emitted timeline and check the HOS limits were honored
    /// after every drive segment.
    fn assert_hos_compliant(segments: &[Segment]) {
        let mut driving_since_rest = 0.0;
        let mut driving_since_break = 0.0;
        let mut window = 0.0;
        for s in segments {
            let d = s.duration_hours();
            match s.duty_status {
                DutyStatus::Driving => {
                    driving_since_rest += d;
                    driving_since_break += d;
                    window += d;
                    assert!(
                        driving_since_rest <= MAX_DRIVING_HOURS + REPLAY_EPSILON,
                        "driving limit exceeded: {driving_since_rest}"
                    );
                    assert!(
                        driving_since_break <= BREAK_AFTER_HOURS + REPLAY_EPSILON,
                        "break limit exceeded: {driving_since_break}"
                    );
                    assert!(window <= 14.0 + REPLAY_EPSILON, "window exceeded: {window}");
                }
                DutyStatus::OnDutyNotDriving => {
                    window += d;
                }
                DutyStatus::OffDuty | DutyStatus::SleeperBerth => {
                    if d >= REST_DURATION_HOURS - 1e-6 {
                        driving_since_rest = 0.0;
                        driving_since_break = 0.0;
                        window = 0.0;
                    } else if d >= BREAK_DURATION_HOURS - 1e-6 {
                        driving_since_break = 0.0;
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // 1. Short in-window trip: no interruptions at all
    // -----------------------------------------------------------------------
    #[test]
    fn short_trip_has_no_interruptions() {
        let legs = vec![pickup_leg(200.0), dropoff_leg(200.0)];
        let segments = plan_trip(&legs, 0.0, Some(t0())).unwrap();

        let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Drive,
                SegmentKind::Pickup,
                SegmentKind::Drive,
                SegmentKind::Dropoff
            ]
        );

        // 200 mi at 55 mph ≈ 3.64 h per drive
        assert!((segments[0].duration_hours() - 200.0 / 55.0).abs() < 0.01);
        assert_eq!(segments[1].reason, "Pickup - Loading");
        assert_eq!(segments[3].reason, "Dropoff - Unloading");
        assert_eq!(segments[1].duty_status, DutyStatus::OnDutyNotDriving);

        assert_contiguous(&segments);
        assert_hos_compliant(&segments);
    }

    // -----------------------------------------------------------------------
    // 2. Break trigger: 30-minute break after exactly 8 hours of driving
    // -----------------------------------------------------------------------
    #[test]
    fn break_inserted_after_eight_driving_hours() {
        let segments = plan_trip(&[pickup_leg(500.0)], 0.0, Some(t0())).unwrap();

        let break_idx = segments
            .iter()
            .position(|s| s.kind == SegmentKind::Break)
            .expect("break expected on a 500 mi leg");
        assert!(segments[break_idx].reason.contains("30-minute break"));
        assert_eq!(segments[break_idx].duty_status, DutyStatus::OffDuty);
        assert!((segments[break_idx].duration_hours() - 0.5).abs() < 1e-6);

        // The break comes after 8 driving hours, 440 miles from the start.
        let miles_before: f64 = segments[..break_idx]
            .iter()
            .filter(|s| s.kind == SegmentKind::Drive)
            .map(|s| s.distance_miles)
            .sum();
        assert!((miles_before - 440.0).abs() < 1.0);
        assert_eq!(
            segments[break_idx].start,
            t0() + Duration::hours(8),
        );

        assert!((drive_miles(&segments) - 500.0).abs() < 0.5);
        assert_contiguous(&segments);
        assert_hos_compliant(&segments);
    }

    // -----------------------------------------------------------------------
    // 3. Rest trigger: 10-hour rest once 11 driving hours are used up
    // -----------------------------------------------------------------------
    #[test]
    fn rest_inserted_after_eleven_driving_hours() {
        let segments = plan_trip(&[pickup_leg(700.0)], 0.0, Some(t0())).unwrap();

        let rest_idx = segments
            .iter()
            .position(|s| s.kind == SegmentKind::Rest)
            .expect("rest expected on a 700 mi leg");
        let rest = &segments[rest_idx];
        assert_eq!(rest.reason, "Required 10-hour rest (driving/window limit)");
        assert!((rest.duration_hours() - 10.0).abs() < 1e-6);

        // 11 driving hours at 55 mph = 605 miles before the rest.
        let miles_before: f64 = segments[..rest_idx]
            .iter()
            .filter(|s| s.kind == SegmentKind::Drive)
            .map(|s| s.distance_miles)
            .sum();
        assert!((miles_before - 605.0).abs() < 1.0);

        // A break must already have occurred earlier.
        let break_idx = segments
            .iter()
            .position(|s| s.kind == SegmentKind::Break)
            .expect("break expected before the rest");
        assert!(break_idx < rest_idx);

        assert!((drive_miles(&segments) - 700.0).abs() < 0.5);
        assert_contiguous(&segments);
        assert_hos_compliant(&segments);
    }

    // -----------------------------------------------------------------------
    // 4. Fuel cadence: stops about every 1000 miles
    // -----------------------------------------------------------------------
    #[test]
    fn fuel_stops_every_thousand_miles() {
        let segments = plan_trip(&[pickup_leg(2300.0)], 0.0, Some(t0())).unwrap();

        let mut fuel_at: Vec<f64> = Vec::new();
        let mut miles = 0.0;
        for s in &segments {
            if s.kind == SegmentKind::Drive {
                miles += s.distance_miles;
            }
            if s.kind == SegmentKind::Fuel {
                fuel_at.push(miles);
            }
        }

        assert!(fuel_at.len() >= 2, "expected at least two fuel stops, got {fuel_at:?}");
        assert!((fuel_at[0] - 1000.0).abs() <= 100.0, "first fuel at {} mi", fuel_at[0]);
        assert!((fuel_at[1] - 2000.0).abs() <= 100.0, "second fuel at {} mi", fuel_at[1]);

        // No drive chain runs more than the interval plus the merge window
        // without refueling.
        let mut since_fuel = 0.0;
        for s in &segments {
            match s.kind {
                SegmentKind::Drive => {
                    since_fuel += s.distance_miles;
                    assert!(since_fuel <= 1100.0, "drove {since_fuel} mi without fuel");
                }
                SegmentKind::Fuel => since_fuel = 0.0,
                _ => {}
            }
        }

        assert!((drive_miles(&segments) - 2300.0).abs() < 0.5);
        assert_contiguous(&segments);
        assert_hos_compliant(&segments);
    }

    // -----------------------------------------------------------------------
    // 5. Cycle exhaustion: 34-hour restart supersedes the 10-hour rest
    // -----------------------------------------------------------------------
    #[test]
    fn cycle_exhaustion_forces_34_hour_restart() {
        let segments = plan_trip(&[pickup_leg(200.0)], 69.0, Some(t0())).unwrap();

        let restart = segments
            .iter()
            .find(|s| s.kind == SegmentKind::Rest)
            .expect("restart expected with 69 cycle hours used");
        assert!(restart.reason.contains("70hr cycle"));
        assert!((restart.duration_hours() - 34.0).abs() < 1e-6);
        assert_eq!(restart.duty_status, DutyStatus::OffDuty);

        // One driving hour fits before the restart, the rest comes after.
        let (before, after): (Vec<_>, Vec<_>) = segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Drive)
            .partition(|s| s.start < restart.start);
        assert!(!before.is_empty());
        assert!(!after.is_empty());
        let miles_before: f64 = before.iter().map(|s| s.distance_miles).sum();
        assert!((miles_before - 55.0).abs() < 1.0);

        assert!((drive_miles(&segments) - 200.0).abs() < 0.5);
        assert_contiguous(&segments);
    }

    // -----------------------------------------------------------------------
    // 6. Arrival exactly at the driving limit: plain 10-hour rest before dock
    // -----------------------------------------------------------------------
    #[test]
    fn rest_before_dock_work_when_arriving_spent() {
        // 605 mi = exactly 11 driving hours; the dock rest uses the
        // pre-dock reason, not the mid-drive one.
        let segments = plan_trip(&[pickup_leg(605.0)], 0.0, Some(t0())).unwrap();

        let rest = segments
            .iter()
            .find(|s| s.kind == SegmentKind::Rest)
            .expect("rest expected before pickup");
        assert_eq!(rest.reason, "Required 10-hour rest");

        let pickup = segments
            .iter()
            .find(|s| s.kind == SegmentKind::Pickup)
            .expect("pickup expected");
        assert!(rest.end <= pickup.start);
        assert_contiguous(&segments);
    }

    // -----------------------------------------------------------------------
    // 7. Degenerate inputs
    // -----------------------------------------------------------------------
    #[test]
    fn zero_distance_leg_emits_only_dock_work() {
        let mut leg = pickup_leg(0.0);
        leg.end = leg.start.clone();
        let segments = plan_trip(&[leg], 0.0, Some(t0())).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Pickup);
        assert_eq!(segments[0].start, t0());
    }

    #[test]
    fn negative_distance_is_rejected() {
        let err = plan_trip(&[pickup_leg(-10.0)], 0.0, Some(t0())).unwrap_err();
        assert_eq!(err, PlanError::NegativeLegDistance(-10.0));
    }

    #[test]
    fn cycle_used_out_of_range_is_rejected() {
        assert_eq!(
            plan_trip(&[pickup_leg(100.0)], 70.5, Some(t0())).unwrap_err(),
            PlanError::CycleOutOfRange(70.5)
        );
        assert_eq!(
            plan_trip(&[pickup_leg(100.0)], -1.0, Some(t0())).unwrap_err(),
            PlanError::CycleOutOfRange(-1.0)
        );
        assert!(matches!(
            plan_trip(&[pickup_leg(100.0)], f64::NAN, Some(t0())),
            Err(PlanError::CycleOutOfRange(_))
        ));
    }

    #[test]
    fn empty_leg_list_yields_empty_plan() {
        let segments = plan_trip(&[], 0.0, Some(t0())).unwrap();
        assert!(segments.is_empty());
    }

    // -----------------------------------------------------------------------
    // 8. Default start time is truncated to the minute
    // -----------------------------------------------------------------------
    #[test]
    fn default_start_time_is_minute_aligned() {
        let segments = plan_trip(&[pickup_leg(50.0)], 0.0, None).unwrap();
        let start = segments[0].start;
        assert_eq!(start.second(), 0);
        assert_eq!(start.nanosecond(), 0);
        assert!((Utc::now() - start).num_seconds() < 120);
    }

    // -----------------------------------------------------------------------
    // 9. Universal invariants on a long multi-leg trip
    // -----------------------------------------------------------------------
    #[test]
    fn long_multi_leg_trip_holds_invariants() {
        let legs = vec![pickup_leg(1100.0), dropoff_leg(1700.0)];
        let segments = plan_trip(&legs, 12.0, Some(t0())).unwrap();

        assert_contiguous(&segments);
        assert_hos_compliant(&segments);
        assert!((drive_miles(&segments) - 2800.0).abs() < 1.0);

        // Per-leg distance conservation: drive miles before the pickup
        // match leg 1, the rest match leg 2.
        let pickup_start = segments
            .iter()
            .find(|s| s.kind == SegmentKind::Pickup)
            .map(|s| s.start)
            .expect("pickup expected");
        let leg1: f64 = segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Drive && s.start < pickup_start)
            .map(|s| s.distance_miles)
            .sum();
        assert!((leg1 - 1100.0).abs() < 0.5);

        // All non-drive segments are stationary and carry no distance.
        for s in &segments {
            if s.kind != SegmentKind::Drive {
                assert_eq!(s.distance_miles, 0.0);
                assert_eq!(s.start_location, s.end_location);
            }
        }
    }

    // -----------------------------------------------------------------------
    // 10. Interruption placement along the leg geometry
    // -----------------------------------------------------------------------
    #[test]
    fn interruptions_sit_between_leg_endpoints() {
        let segments = plan_trip(&[pickup_leg(700.0)], 0.0, Some(t0())).unwrap();
        let a = chicago();
        let b = st_louis();
        let (lat_min, lat_max) = (a.lat.min(b.lat), a.lat.max(b.lat));
        let (lng_min, lng_max) = (a.lng.min(b.lng), a.lng.max(b.lng));

        for s in segments.iter().filter(|s| s.kind != SegmentKind::Pickup) {
            assert!(
                (lat_min..=lat_max).contains(&s.start_location.lat),
                "{:?} off the leg: {}",
                s.kind,
                s.start_location.lat
            );
            assert!((lng_min..=lng_max).contains(&s.start_location.lng));
        }
    }
}
