//! OTA boot-health handling.
//!
//! The firmware itself is flashed out-of-band; all this module does is
//! cancel the ESP-IDF rollback watchdog once a new image has reached the
//! command pipeline alive. Call [`check_rollback`] early in startup.

use log::info;

/// Check OTA image state on startup and mark this firmware as valid.
///
/// Without this, the rollback watchdog reverts to the previous firmware
/// after three consecutive failed boots.
#[cfg(target_os = "espidf")]
pub fn check_rollback() {
    match esp_ota::mark_app_valid() {
        Ok(()) => info!("OTA: firmware marked valid (rollback cancelled)"),
        Err(e) => log::warn!("OTA: mark_app_valid failed: {:?}", e),
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn check_rollback() {
    info!("OTA rollback check (simulation): skipped");
}
