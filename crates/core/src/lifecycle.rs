//! Asset lifecycle state machine.
//!
//! Assets cycle `AVAILABLE -> IN_MAINTENANCE -> READY_FOR_PICKUP ->
//! AVAILABLE`. A maintenance event closed with the final flag takes the
//! one-way edge into `DEACTIVATED`, which has no outgoing transitions.
//! This module lives in `core` (zero internal deps) so both the repository
//! layer and any future CLI tooling validate against the same table.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// State string constants (stored in `assets.state`)
// ---------------------------------------------------------------------------

/// Asset is in service and may enter maintenance.
pub const STATE_AVAILABLE: &str = "available";
/// Asset has an open maintenance event.
pub const STATE_IN_MAINTENANCE: &str = "in_maintenance";
/// Maintenance closed, awaiting pickup confirmation.
pub const STATE_READY_FOR_PICKUP: &str = "ready_for_pickup";
/// Permanently retired. Terminal.
pub const STATE_DEACTIVATED: &str = "deactivated";

/// All valid state strings.
pub const VALID_STATES: &[&str] = &[
    STATE_AVAILABLE,
    STATE_IN_MAINTENANCE,
    STATE_READY_FOR_PICKUP,
    STATE_DEACTIVATED,
];

// ---------------------------------------------------------------------------
// State enum
// ---------------------------------------------------------------------------

/// Closed set of asset lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetState {
    Available,
    InMaintenance,
    ReadyForPickup,
    Deactivated,
}

impl AssetState {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => STATE_AVAILABLE,
            Self::InMaintenance => STATE_IN_MAINTENANCE,
            Self::ReadyForPickup => STATE_READY_FOR_PICKUP,
            Self::Deactivated => STATE_DEACTIVATED,
        }
    }

    /// Parse from a database string, rejecting unknown values.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STATE_AVAILABLE => Ok(Self::Available),
            STATE_IN_MAINTENANCE => Ok(Self::InMaintenance),
            STATE_READY_FOR_PICKUP => Ok(Self::ReadyForPickup),
            STATE_DEACTIVATED => Ok(Self::Deactivated),
            other => Err(CoreError::Validation(format!(
                "Unknown asset state: '{other}'. Valid states: {}",
                VALID_STATES.join(", ")
            ))),
        }
    }

    /// Whether this state is terminal (no outgoing transitions).
    pub fn is_terminal(&self) -> bool {
        valid_transitions(*self).is_empty()
    }
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// Returns the set of valid target states reachable from `from`.
///
/// `Deactivated` returns an empty slice; reactivation is an administrative
/// override outside the automatic flow, not a transition of this machine.
pub fn valid_transitions(from: AssetState) -> &'static [AssetState] {
    match from {
        AssetState::Available => &[AssetState::InMaintenance],
        AssetState::InMaintenance => {
            &[AssetState::ReadyForPickup, AssetState::Deactivated]
        }
        AssetState::ReadyForPickup => {
            &[AssetState::Available, AssetState::Deactivated]
        }
        AssetState::Deactivated => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: AssetState, to: AssetState) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a state transition, returning a `Conflict` for invalid ones.
pub fn validate_transition(from: AssetState, to: AssetState) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Invalid transition: {} -> {}",
            from.as_str(),
            to.as_str()
        )))
    }
}

/// Target state when a maintenance event is closed.
///
/// A final close deactivates the asset directly; it never passes through
/// `ReadyForPickup` on the way out.
pub fn close_target(is_final: bool) -> AssetState {
    if is_final {
        AssetState::Deactivated
    } else {
        AssetState::ReadyForPickup
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
