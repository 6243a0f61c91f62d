/*!
 * Input Validation
 * Range checks applied before a request crosses the boundary
 */

use crate::core::data::{EdrxActType, EdrxSettings, PsmSettings, PsmTimer, PsmTimerUnit};
use crate::core::errors::{ApiError, ApiResult};

// eDRX cycle length codes (3GPP TS 24.008 table index)
pub const EDRX_CYCLE_WBS1_MIN: u32 = 2; // 5.12 s
pub const EDRX_CYCLE_WBS1_MAX: u32 = 11; // 2621.44 s
pub const EDRX_CYCLE_NBS1_MIN: u32 = 5; // 20.48 s
pub const EDRX_CYCLE_NBS1_MAX: u32 = 13; // 10485.76 s

// Paging time window codes
pub const EDRX_PTW_WBS1_MAX: u32 = 15; // 20.48 s
pub const EDRX_PTW_NBS1_MAX: u32 = 15; // 40.96 s

/// PSM timers carry a 5-bit multiplier
pub const PSM_TIMER_VALUE_MAX: u8 = 31;

/// T3324 (active time) accepts a subset of the timer units
const T3324_UNITS: &[PsmTimerUnit] = &[
    PsmTimerUnit::Sec2,
    PsmTimerUnit::Min1,
    PsmTimerUnit::Min6,
    PsmTimerUnit::Deactivated,
];

/// T3412 (periodic TAU) accepts every unit except the T3324-only ones
const T3412_UNITS: &[PsmTimerUnit] = &[
    PsmTimerUnit::Sec2,
    PsmTimerUnit::Sec30,
    PsmTimerUnit::Min1,
    PsmTimerUnit::Min10,
    PsmTimerUnit::Hour1,
    PsmTimerUnit::Hour10,
    PsmTimerUnit::Hour320,
    PsmTimerUnit::Deactivated,
];

/// Check eDRX settings before issuing a set request.
pub fn validate_edrx(settings: &EdrxSettings) -> ApiResult<()> {
    match settings.act_type {
        EdrxActType::NotUse | EdrxActType::Wbs1 | EdrxActType::Nbs1 => {}
        other => {
            return Err(ApiError::InvalidArgument(format!(
                "act_type {:?} is not supported by this modem",
                other
            )));
        }
    }

    if !settings.enable {
        return Ok(());
    }

    match settings.act_type {
        EdrxActType::Wbs1 => {
            if !(EDRX_CYCLE_WBS1_MIN..=EDRX_CYCLE_WBS1_MAX).contains(&settings.cycle) {
                return Err(ApiError::InvalidArgument(format!(
                    "eDRX cycle code {} out of WB-S1 range",
                    settings.cycle
                )));
            }
            if settings.ptw > EDRX_PTW_WBS1_MAX {
                return Err(ApiError::InvalidArgument(format!(
                    "eDRX PTW code {} out of WB-S1 range",
                    settings.ptw
                )));
            }
        }
        EdrxActType::Nbs1 => {
            if !(EDRX_CYCLE_NBS1_MIN..=EDRX_CYCLE_NBS1_MAX).contains(&settings.cycle) {
                return Err(ApiError::InvalidArgument(format!(
                    "eDRX cycle code {} out of NB-S1 range",
                    settings.cycle
                )));
            }
            if settings.ptw > EDRX_PTW_NBS1_MAX {
                return Err(ApiError::InvalidArgument(format!(
                    "eDRX PTW code {} out of NB-S1 range",
                    settings.ptw
                )));
            }
        }
        _ => {}
    }

    Ok(())
}

fn validate_psm_timer(timer: &PsmTimer, allowed: &[PsmTimerUnit], name: &str) -> ApiResult<()> {
    if !allowed.contains(&timer.unit) {
        return Err(ApiError::InvalidArgument(format!(
            "{} unit {:?} is invalid",
            name, timer.unit
        )));
    }
    if timer.value > PSM_TIMER_VALUE_MAX {
        return Err(ApiError::InvalidArgument(format!(
            "{} value {} exceeds {}",
            name, timer.value, PSM_TIMER_VALUE_MAX
        )));
    }
    Ok(())
}

/// Check PSM settings before issuing a set request.
pub fn validate_psm(settings: &PsmSettings) -> ApiResult<()> {
    if !settings.enable {
        return Ok(());
    }
    validate_psm_timer(&settings.active_time, T3324_UNITS, "active time (T3324)")?;
    validate_psm_timer(&settings.tau_time, T3412_UNITS, "TAU time (T3412)")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edrx_disabled_skips_range_checks() {
        let settings = EdrxSettings {
            enable: false,
            act_type: EdrxActType::Wbs1,
            cycle: 999,
            ptw: 999,
        };
        assert!(validate_edrx(&settings).is_ok());
    }

    #[test]
    fn test_edrx_rejects_unsupported_act_type() {
        let settings = EdrxSettings {
            enable: false,
            act_type: EdrxActType::Gsm,
            cycle: 0,
            ptw: 0,
        };
        assert!(validate_edrx(&settings).is_err());
    }

    #[test]
    fn test_edrx_cycle_ranges() {
        let mut settings = EdrxSettings {
            enable: true,
            act_type: EdrxActType::Wbs1,
            cycle: EDRX_CYCLE_WBS1_MIN,
            ptw: 0,
        };
        assert!(validate_edrx(&settings).is_ok());

        settings.cycle = EDRX_CYCLE_WBS1_MAX + 1;
        assert!(validate_edrx(&settings).is_err());

        settings.act_type = EdrxActType::Nbs1;
        settings.cycle = EDRX_CYCLE_NBS1_MIN;
        assert!(validate_edrx(&settings).is_ok());

        settings.cycle = EDRX_CYCLE_NBS1_MIN - 1;
        assert!(validate_edrx(&settings).is_err());
    }

    #[test]
    fn test_psm_timer_units() {
        let mut settings = PsmSettings {
            enable: true,
            active_time: PsmTimer {
                unit: PsmTimerUnit::Min1,
                value: 5,
            },
            tau_time: PsmTimer {
                unit: PsmTimerUnit::Hour1,
                value: 2,
            },
        };
        assert!(validate_psm(&settings).is_ok());

        // T3324 does not accept hour-scale units
        settings.active_time.unit = PsmTimerUnit::Hour10;
        assert!(validate_psm(&settings).is_err());

        settings.active_time.unit = PsmTimerUnit::Sec2;
        settings.tau_time.value = PSM_TIMER_VALUE_MAX + 1;
        assert!(validate_psm(&settings).is_err());
    }
}
