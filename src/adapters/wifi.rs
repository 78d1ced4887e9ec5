//! WiFi station-mode adapter.
//!
//! Joins the access point named at build time so the query server is
//! reachable on the LAN. There is no reconnection policy: the command
//! link is the serial port, and the query surface is best-effort.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: only credential validation is compiled.

use crate::error::{Error, Result};

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

impl WifiCredentials {
    /// SSID must be 1-32 printable ASCII bytes. Password must be empty
    /// (open network) or 8-64 bytes (WPA2).
    pub fn new(ssid: &str, password: &str) -> Result<Self> {
        if ssid.is_empty() || !is_printable_ascii(ssid) {
            return Err(Error::Config("wifi ssid invalid"));
        }
        if !password.is_empty() && password.len() < 8 {
            return Err(Error::Config("wifi password too short"));
        }
        let ssid = heapless::String::try_from(ssid)
            .map_err(|_| Error::Config("wifi ssid too long"))?;
        let password = heapless::String::try_from(password)
            .map_err(|_| Error::Config("wifi password too long"))?;
        Ok(Self { ssid, password })
    }

    /// Credentials baked in from `WIFI_SSID` / `WIFI_PASS` at build time.
    /// `None` when no SSID was provided.
    pub fn from_build_env() -> Option<Result<Self>> {
        let ssid = option_env!("WIFI_SSID")?;
        Some(Self::new(ssid, option_env!("WIFI_PASS").unwrap_or("")))
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// Station join (ESP-IDF)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn join(
    modem: esp_idf_hal::modem::Modem,
    sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
    nvs: esp_idf_svc::nvs::EspDefaultNvsPartition,
    creds: &WifiCredentials,
) -> Result<esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>> {
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{error, info, warn};

    use crate::error::CommsError;

    let fail = |e: esp_idf_sys::EspError| {
        error!("WiFi: {}", e);
        Error::Comms(CommsError::WifiConnectFailed)
    };

    let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs)).map_err(fail)?;
    let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop).map_err(fail)?;

    let config = ClientConfiguration {
        ssid: creds
            .ssid
            .as_str()
            .try_into()
            .map_err(|_| Error::Config("wifi ssid too long"))?,
        password: creds
            .password
            .as_str()
            .try_into()
            .map_err(|_| Error::Config("wifi password too long"))?,
        auth_method: if creds.is_open() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        },
        ..Default::default()
    };
    wifi.set_configuration(&Configuration::Client(config))
        .map_err(fail)?;

    wifi.start().map_err(fail)?;

    // Survey only; a failed scan does not block the join.
    match wifi.scan() {
        Ok(aps) => {
            info!("WiFi: {} access point(s) in range", aps.len());
            for ap in &aps {
                info!("WiFi:   '{}' ({} dBm)", ap.ssid, ap.signal_strength);
            }
        }
        Err(e) => warn!("WiFi: scan failed: {}", e),
    }

    info!("WiFi: connecting to '{}'", creds.ssid());
    wifi.connect().map_err(fail)?;
    wifi.wait_netif_up().map_err(fail)?;

    let ip = wifi.wifi().sta_netif().get_ip_info().map_err(fail)?;
    info!("WiFi: connected, IP {}", ip.ip);
    Ok(wifi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_ssid() {
        assert!(WifiCredentials::new("", "password123").is_err());
    }

    #[test]
    fn rejects_short_password() {
        assert!(WifiCredentials::new("lab", "short").is_err());
    }

    #[test]
    fn rejects_long_ssid() {
        assert!(WifiCredentials::new(&"x".repeat(33), "").is_err());
    }

    #[test]
    fn accepts_open_network() {
        let creds = WifiCredentials::new("lab", "").unwrap();
        assert!(creds.is_open());
        assert_eq!(creds.ssid(), "lab");
    }

    #[test]
    fn accepts_valid_wpa2() {
        let creds = WifiCredentials::new("lab", "password123").unwrap();
        assert!(!creds.is_open());
    }
}
