// Market Phase Gate
// Maps an instant to the exchange-local trading phase and its thresholds

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::America::New_York;
use chrono_tz::Tz;
use common::{MarketPhase, ThresholdSet};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Resolves the trading phase from wall-clock time in the exchange's
/// timezone
///
/// The timezone is pinned to the exchange, never the caller's locale; a
/// scanner in Taipei and one in New York must agree on the phase.
#[derive(Debug, Clone)]
pub struct PhaseClock {
    tz: Tz,
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self { tz: New_York }
    }
}

impl PhaseClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase and threshold snapshot for the given instant
    ///
    /// Total over all timestamps; interval bounds are half-open, so
    /// 09:29:59 is still pre-market and 09:30:00 is the opening drive.
    pub fn current_phase(&self, now: DateTime<Utc>) -> (MarketPhase, ThresholdSet) {
        let local = now.with_timezone(&self.tz).time();
        let phase = resolve_phase(local);
        (phase, thresholds_for(phase))
    }
}

fn resolve_phase(local: NaiveTime) -> MarketPhase {
    let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    if local >= at(4, 0) && local < at(9, 30) {
        MarketPhase::PreMarket
    } else if local >= at(9, 30) && local < at(10, 0) {
        MarketPhase::OpeningDrive
    } else if local >= at(10, 0) && local < at(15, 30) {
        MarketPhase::MidDay
    } else if local >= at(15, 30) && local < at(20, 0) {
        MarketPhase::PostMarket
    } else {
        MarketPhase::Closed
    }
}

/// Threshold set active during a phase
///
/// Post-market shares the closed-session values: a zero spread limit
/// rejects every quote, so classification fails outside the live session.
pub fn thresholds_for(phase: MarketPhase) -> ThresholdSet {
    match phase {
        MarketPhase::PreMarket => ThresholdSet {
            stock_move_threshold: 0.005,
            spread_limit: dec!(0.05),
            strict: true,
        },
        MarketPhase::OpeningDrive => ThresholdSet {
            stock_move_threshold: 0.003,
            spread_limit: dec!(0.08),
            strict: true,
        },
        MarketPhase::MidDay => ThresholdSet {
            stock_move_threshold: 0.002,
            spread_limit: dec!(0.10),
            strict: false,
        },
        MarketPhase::PostMarket | MarketPhase::Closed => ThresholdSet {
            stock_move_threshold: 9.999,
            spread_limit: Decimal::ZERO,
            strict: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ny_instant(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        // A regular summer trading day
        New_York
            .with_ymd_and_hms(2026, 8, 5, h, m, s)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn boundaries_are_half_open() {
        let clock = PhaseClock::new();
        assert_eq!(clock.current_phase(ny_instant(9, 29, 59)).0, MarketPhase::PreMarket);
        assert_eq!(clock.current_phase(ny_instant(9, 30, 0)).0, MarketPhase::OpeningDrive);
        assert_eq!(clock.current_phase(ny_instant(10, 0, 0)).0, MarketPhase::MidDay);
        assert_eq!(clock.current_phase(ny_instant(15, 30, 0)).0, MarketPhase::PostMarket);
        assert_eq!(clock.current_phase(ny_instant(20, 0, 0)).0, MarketPhase::Closed);
        assert_eq!(clock.current_phase(ny_instant(3, 59, 59)).0, MarketPhase::Closed);
        assert_eq!(clock.current_phase(ny_instant(4, 0, 0)).0, MarketPhase::PreMarket);
    }

    #[test]
    fn every_instant_resolves_to_exactly_one_phase() {
        let clock = PhaseClock::new();
        for hour in 0..24 {
            for minute in [0, 29, 30, 59] {
                let (_, thresholds) = clock.current_phase(ny_instant(hour, minute, 0));
                assert!(thresholds.spread_limit >= Decimal::ZERO);
            }
        }
    }

    #[test]
    fn phase_is_judged_in_exchange_time_not_utc() {
        // 13:00 UTC on a summer day is 09:00 in New York: pre-market, even
        // though a naive UTC reading would say mid-day
        let clock = PhaseClock::new();
        let utc_instant = Utc.with_ymd_and_hms(2026, 8, 5, 13, 0, 0).unwrap();
        assert_eq!(clock.current_phase(utc_instant).0, MarketPhase::PreMarket);
    }

    #[test]
    fn off_session_thresholds_fail_closed() {
        assert_eq!(thresholds_for(MarketPhase::Closed).spread_limit, Decimal::ZERO);
        assert_eq!(thresholds_for(MarketPhase::PostMarket).spread_limit, Decimal::ZERO);
        assert!(thresholds_for(MarketPhase::MidDay).spread_limit > Decimal::ZERO);
    }
}
