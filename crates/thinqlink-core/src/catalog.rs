// Capability catalog
//
// Assembles the ordered set of active bindings for a device model. The
// order only affects log readability; every binding dispatches
// independently and coupled bindings read committed hub-visible state,
// never their dispatch position.

use tracing::debug;

use crate::binding::{
    self, CapabilityBinding,
};

/// Coarse model classification driving capability selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProfile {
    /// Reversible (heat-pump) units: full capability set.
    HeatPump,
    /// Window and portable units: cooling only, no heating threshold.
    CoolingOnly,
}

impl ModelProfile {
    /// Classify a vendor model name.
    ///
    /// Window (`LW`) and portable (`LP`) model families never heat.
    /// Unknown models get the full set -- a missing capability is a worse
    /// failure than an inert one.
    pub fn for_model(model: Option<&str>) -> Self {
        match model {
            Some(m) if m.starts_with("LW") || m.starts_with("LP") => Self::CoolingOnly,
            _ => Self::HeatPump,
        }
    }
}

/// Build the ordered binding set for a device model.
pub fn bindings_for_model(model: Option<&str>) -> Vec<Box<dyn CapabilityBinding>> {
    let profile = ModelProfile::for_model(model);
    debug!(?model, ?profile, "selecting capability set");

    let mut bindings: Vec<Box<dyn CapabilityBinding>> = vec![
        Box::new(binding::active()),
        Box::new(binding::rotation_speed()),
        Box::new(binding::cooling_threshold()),
    ];
    if profile == ModelProfile::HeatPump {
        bindings.push(Box::new(binding::heating_threshold()));
    }
    bindings.extend([
        Box::new(binding::target_state()) as Box<dyn CapabilityBinding>,
        Box::new(binding::current_state()),
        Box::new(binding::current_temperature()),
        Box::new(binding::filter_life()),
        Box::new(binding::filter_change()),
        Box::new(binding::energy_saver_switch()),
        Box::new(binding::jet_mode_switch()),
    ]);
    bindings
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::hub::Capability;

    fn capabilities(model: Option<&str>) -> Vec<Capability> {
        bindings_for_model(model)
            .iter()
            .map(|b| b.capability())
            .collect()
    }

    #[test]
    fn heat_pump_models_get_the_full_set() {
        let caps = capabilities(Some("RAC_056905_WW"));
        assert_eq!(caps.len(), 11);
        assert!(caps.contains(&Capability::HeatingThreshold));
        assert!(caps.contains(&Capability::JetMode));
    }

    #[test]
    fn window_units_skip_the_heating_threshold() {
        let caps = capabilities(Some("LW8017ERSM"));
        assert!(!caps.contains(&Capability::HeatingThreshold));
        assert!(caps.contains(&Capability::CoolingThreshold));
    }

    #[test]
    fn unknown_models_default_to_the_full_set() {
        assert_eq!(ModelProfile::for_model(None), ModelProfile::HeatPump);
        assert_eq!(
            ModelProfile::for_model(Some("FUTURE_MODEL_X")),
            ModelProfile::HeatPump
        );
    }

    #[test]
    fn no_capability_appears_twice() {
        let caps = capabilities(None);
        let mut deduped = caps.clone();
        deduped.sort_by_key(|c| format!("{c}"));
        deduped.dedup();
        assert_eq!(caps.len(), deduped.len());
    }
}
