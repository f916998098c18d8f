//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`] — the boundary for network
//! connectivity. The MQTT bridge only starts once this adapter reports
//! itself connected; the radio pipeline runs regardless.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via
//!   `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Reconnection policy
//!
//! On disconnect the adapter waits an exponential backoff (2 s → 4 s →
//! 8 s … capped at 60 s) before retrying, counted in `poll()` calls from
//! the main idle loop (one per second).

use core::fmt;
use log::{info, warn};

use crate::config::WIFI_SSID;
#[cfg(target_os = "espidf")]
use crate::config::WIFI_PASSWORD;

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    /// No station credentials were baked into this build.
    NoCredentials,
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
        }
    }
}

pub trait ConnectivityPort {
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    /// Drive reconnection; call roughly once per second.
    fn poll(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
    Reconnecting { attempt: u32, wait_secs: u32 },
}

const INITIAL_BACKOFF_SECS: u32 = 2;
const MAX_BACKOFF_SECS: u32 = 60;

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    backoff_secs: u32,
    #[cfg(target_os = "espidf")]
    driver: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
}

impl WifiAdapter {
    /// Construct over the modem peripheral. Does not associate yet —
    /// call [`ConnectivityPort::connect`].
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: esp_idf_hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: esp_idf_svc::nvs::EspDefaultNvsPartition,
    ) -> anyhow::Result<Self> {
        use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

        let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs))?;
        let driver = BlockingWifi::wrap(esp_wifi, sysloop)?;
        Ok(Self {
            state: WifiState::Disconnected,
            backoff_secs: INITIAL_BACKOFF_SECS,
            driver,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            backoff_secs: INITIAL_BACKOFF_SECS,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let (Some(ssid), password) = (WIFI_SSID, WIFI_PASSWORD.unwrap_or("")) else {
            return Err(ConnectivityError::NoCredentials);
        };

        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        self.driver
            .set_configuration(&Configuration::Client(ClientConfiguration {
                ssid: ssid.try_into().map_err(|_| ConnectivityError::ConnectionFailed)?,
                password: password
                    .try_into()
                    .map_err(|_| ConnectivityError::ConnectionFailed)?,
                auth_method,
                ..Default::default()
            }))
            .map_err(|_| ConnectivityError::ConnectionFailed)?;

        self.driver
            .start()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        self.driver
            .connect()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        self.driver
            .wait_netif_up()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        if WIFI_SSID.is_none() {
            return Err(ConnectivityError::NoCredentials);
        }
        info!("WiFi(sim): connected to '{}'", WIFI_SSID.unwrap_or("?"));
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        let _ = self.driver.disconnect();
        let _ = self.driver.stop();
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        info!("WiFi(sim): disconnected");
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.driver.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }

        match self.platform_connect() {
            Ok(()) => {
                self.state = WifiState::Connected;
                self.backoff_secs = INITIAL_BACKOFF_SECS;
                info!("WiFi: connected");
                Ok(())
            }
            Err(ConnectivityError::NoCredentials) => {
                // Radio-only build; stay quietly disconnected.
                self.state = WifiState::Disconnected;
                Err(ConnectivityError::NoCredentials)
            }
            Err(e) => {
                warn!("WiFi: connection failed — {}", e);
                self.state = WifiState::Reconnecting {
                    attempt: 0,
                    wait_secs: self.backoff_secs,
                };
                Err(e)
            }
        }
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        info!("WiFi: disconnected");
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn poll(&mut self) {
        match self.state {
            WifiState::Reconnecting { attempt, wait_secs } => {
                if wait_secs > 1 {
                    self.state = WifiState::Reconnecting {
                        attempt,
                        wait_secs: wait_secs - 1,
                    };
                    return;
                }
                info!("WiFi: reconnect attempt {} (backoff {}s)", attempt + 1, self.backoff_secs);
                match self.platform_connect() {
                    Ok(()) => {
                        self.state = WifiState::Connected;
                        self.backoff_secs = INITIAL_BACKOFF_SECS;
                        info!("WiFi: reconnected");
                    }
                    Err(_) => {
                        self.backoff_secs = (self.backoff_secs * 2).min(MAX_BACKOFF_SECS);
                        self.state = WifiState::Reconnecting {
                            attempt: attempt + 1,
                            wait_secs: self.backoff_secs,
                        };
                    }
                }
            }
            WifiState::Connected => {
                if !self.platform_is_connected() {
                    warn!("WiFi: connection lost, entering reconnect");
                    self.state = WifiState::Reconnecting {
                        attempt: 0,
                        wait_secs: self.backoff_secs,
                    };
                }
            }
            WifiState::Disconnected => {}
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
