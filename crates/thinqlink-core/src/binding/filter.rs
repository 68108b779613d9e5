// Filter wear
//
// Derived from the two filter counters the refresh cycle merges into the
// snapshot: remaining life as a percentage, and a change indicator once
// life drops below the threshold. Both are read-only derivations over the
// same pair of fields, so they share one small decode helper instead of
// the single-field base binding.

use tracing::debug;

use crate::hub::{Capability, HubPort, HubValue};
use crate::snapshot::{DeviceSnapshot, fields};

use super::{CapabilityBinding, SetDisposition};

/// Remaining life (percent) below which a filter change is indicated.
const FILTER_CHANGE_THRESHOLD_PCT: i64 = 10;

/// Hub code for "filter OK".
const FILTER_OK: i64 = 0;
/// Hub code for "change filter".
const CHANGE_FILTER: i64 = 1;

/// Remaining filter life in percent, or `None` when the counters are
/// absent or unusable (zero rated life).
fn remaining_life_pct(snapshot: &DeviceSnapshot) -> Option<i64> {
    let use_time = snapshot.number(fields::FILTER_USE_TIME)?;
    let max_time = snapshot.number(fields::FILTER_MAX_TIME)?;
    if max_time <= 0.0 {
        return None;
    }
    let pct = (100.0 - use_time / max_time * 100.0).clamp(0.0, 100.0);
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    let pct = pct.round() as i64;
    Some(pct)
}

/// Remaining filter life as 0–100 percent.
pub struct FilterLife {
    cached: Option<i64>,
}

/// Filter change indication: 0 = ok, 1 = change.
pub struct FilterChange {
    cached: Option<i64>,
}

pub fn filter_life() -> FilterLife {
    FilterLife { cached: None }
}

pub fn filter_change() -> FilterChange {
    FilterChange { cached: None }
}

impl CapabilityBinding for FilterLife {
    fn capability(&self) -> Capability {
        Capability::FilterLife
    }

    fn current(&self) -> Option<HubValue> {
        self.cached.map(HubValue::Int)
    }

    fn apply_snapshot(&mut self, snapshot: &DeviceSnapshot, hub: &mut HubPort) {
        let Some(pct) = remaining_life_pct(snapshot) else {
            debug!("filter counters absent; keeping previous filter life");
            return;
        };
        self.cached = Some(pct);
        hub.push(Capability::FilterLife, HubValue::Int(pct));
    }

    fn prepare_set(&mut self, _value: HubValue, _hub: &mut HubPort) -> SetDisposition {
        SetDisposition::ReadOnly
    }

    fn commit_set(&mut self, _value: HubValue) {}
}

impl CapabilityBinding for FilterChange {
    fn capability(&self) -> Capability {
        Capability::FilterChange
    }

    fn current(&self) -> Option<HubValue> {
        self.cached.map(HubValue::Int)
    }

    fn apply_snapshot(&mut self, snapshot: &DeviceSnapshot, hub: &mut HubPort) {
        let Some(pct) = remaining_life_pct(snapshot) else {
            debug!("filter counters absent; keeping previous change indication");
            return;
        };
        let indication = if pct < FILTER_CHANGE_THRESHOLD_PCT {
            CHANGE_FILTER
        } else {
            FILTER_OK
        };
        self.cached = Some(indication);
        hub.push(Capability::FilterChange, HubValue::Int(indication));
    }

    fn prepare_set(&mut self, _value: HubValue, _hub: &mut HubPort) -> SetDisposition {
        SetDisposition::ReadOnly
    }

    fn commit_set(&mut self, _value: HubValue) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;
    use crate::device::DeviceId;

    fn port() -> (HubPort, mpsc::UnboundedReceiver<crate::hub::HubUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (HubPort::new(DeviceId::from("dev-1"), tx), rx)
    }

    fn snapshot(use_time: f64, max_time: f64) -> DeviceSnapshot {
        DeviceSnapshot::new(
            [
                (fields::FILTER_USE_TIME.to_owned(), json!(use_time)),
                (fields::FILTER_MAX_TIME.to_owned(), json!(max_time)),
            ]
            .into_iter()
            .collect(),
        )
    }

    #[test]
    fn life_is_remaining_percentage() {
        let mut b = filter_life();
        let (mut hub, _rx) = port();

        b.apply_snapshot(&snapshot(10.0, 200.0), &mut hub);

        assert_eq!(b.current(), Some(HubValue::Int(95)));
    }

    #[test]
    fn life_clamps_overrun_counters_to_zero() {
        let mut b = filter_life();
        let (mut hub, _rx) = port();

        b.apply_snapshot(&snapshot(250.0, 200.0), &mut hub);

        assert_eq!(b.current(), Some(HubValue::Int(0)));
    }

    #[test]
    fn zero_rated_life_is_ignored() {
        let mut b = filter_life();
        let (mut hub, _rx) = port();

        b.apply_snapshot(&snapshot(10.0, 0.0), &mut hub);

        assert_eq!(b.current(), None);
    }

    #[test]
    fn change_indicated_below_threshold() {
        let mut b = filter_change();
        let (mut hub, _rx) = port();

        b.apply_snapshot(&snapshot(10.0, 200.0), &mut hub);
        assert_eq!(b.current(), Some(HubValue::Int(FILTER_OK)));

        b.apply_snapshot(&snapshot(195.0, 200.0), &mut hub);
        assert_eq!(b.current(), Some(HubValue::Int(CHANGE_FILTER)));
    }

    #[test]
    fn filter_capabilities_are_read_only() {
        let mut b = filter_life();
        let (mut hub, _rx) = port();
        assert!(matches!(
            b.prepare_set(HubValue::Int(50), &mut hub),
            SetDisposition::ReadOnly
        ));
    }
}
