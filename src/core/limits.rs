/*!
 * Limits and Constants
 *
 * Centralized location for table capacities, channel bounds and dispatch
 * limits. Values are grouped by domain.
 */

use crate::core::types::CommandId;

// =============================================================================
// CALLBACK REGISTRY
// =============================================================================

/// Maximum number of simultaneous event registrations
pub const MAX_EVENT_CALLBACKS: usize = 8;

/// Per-socket registration allowance (socket-bound completions share the
/// same registry as command completions)
pub const MAX_SOCKET_CALLBACKS: usize = 8;

/// Total callback registry rows
pub const NCBTABLES: usize = MAX_EVENT_CALLBACKS + MAX_SOCKET_CALLBACKS;

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Upper bound on redirect reprocessing passes per dispatched bitmap.
/// Aliasing redirects (eDRX/PSM static-dynamic pairs) are depth-1 in
/// practice; the bound guards against a ping-pong between inconsistent
/// sibling flags.
pub const REDIRECT_PASS_LIMIT: usize = 4;

/// Identifiers the dispatcher drives even without a registered callback,
/// because their adapters have side effects (DNS refresh, sibling redirect
/// resolution) independent of user interest. Kept configurable on
/// [`CoreConfig`](crate::CoreConfig); this is the default set.
pub const ALWAYS_DRIVEN_DEFAULT: &[CommandId] = &[
    CommandId::GetEdrx,
    CommandId::GetPsm,
    CommandId::ReportNetInfo,
    CommandId::ReportSimState,
    CommandId::ReportLocalTime,
];

// =============================================================================
// EVENT DELIVERY BRIDGE
// =============================================================================

/// Bounded capacity of the event notification channel.
/// Event bitmaps coalesce on the peer side, so a short queue suffices.
pub const DEFAULT_BRIDGE_CAPACITY: usize = 16;

/// Thread name for the spawned bridge consumer
pub const BRIDGE_THREAD_NAME: &str = "modem-evt";

// =============================================================================
// REPORT PERIODS
// =============================================================================

/// Default signal quality report period, seconds
pub const DEFAULT_QUALITY_REPORT_PERIOD_SECS: u32 = 1;

/// Default cell information report period, seconds
pub const DEFAULT_CELLINFO_REPORT_PERIOD_SECS: u32 = 1;
