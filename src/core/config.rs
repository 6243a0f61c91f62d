/*!
 * Core Configuration
 * Per-instance tuning for the dispatcher core and bridge
 */

use crate::core::limits::{
    ALWAYS_DRIVEN_DEFAULT, DEFAULT_BRIDGE_CAPACITY, DEFAULT_CELLINFO_REPORT_PERIOD_SECS,
    DEFAULT_QUALITY_REPORT_PERIOD_SECS, NCBTABLES, REDIRECT_PASS_LIMIT,
};
use crate::core::types::CommandId;
use serde::{Deserialize, Serialize};

/// Configuration for one [`DispatcherCore`](crate::DispatcherCore) instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Callback registry rows
    pub registry_capacity: usize,

    /// Bounded capacity of the event notification channel
    pub bridge_capacity: usize,

    /// Redirect reprocessing bound per dispatched bitmap
    pub redirect_pass_limit: usize,

    /// Identifiers driven even without a registered callback.
    /// The default set preserves observed modem behavior; extend it when a
    /// new report type carries core-side side effects.
    pub always_driven: Vec<CommandId>,

    /// Signal quality report period, seconds
    pub quality_report_period_secs: u32,

    /// Cell information report period, seconds
    pub cellinfo_report_period_secs: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            registry_capacity: NCBTABLES,
            bridge_capacity: DEFAULT_BRIDGE_CAPACITY,
            redirect_pass_limit: REDIRECT_PASS_LIMIT,
            always_driven: ALWAYS_DRIVEN_DEFAULT.to_vec(),
            quality_report_period_secs: DEFAULT_QUALITY_REPORT_PERIOD_SECS,
            cellinfo_report_period_secs: DEFAULT_CELLINFO_REPORT_PERIOD_SECS,
        }
    }
}

impl CoreConfig {
    /// Add an identifier to the always-driven set
    pub fn drive_always(mut self, id: CommandId) -> Self {
        if !self.always_driven.contains(&id) {
            self.always_driven.push(id);
        }
        self
    }
}
