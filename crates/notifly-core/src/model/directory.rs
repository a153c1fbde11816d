// ── MAC-to-name directories ──

use notifly_api::{LegacyDeviceBasic, LegacyUser};

/// Hardware address → friendly name, in the order the controller listed
/// them. Entries with an empty address or name are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    entries: Vec<(String, String)>,
}

impl Directory {
    pub fn new<I, M, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (M, N)>,
        M: Into<String>,
        N: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(mac, name)| (mac.into(), name.into()))
            .filter(|(mac, name)| !mac.is_empty() && !name.is_empty())
            .collect();
        Self { entries }
    }

    /// Devices keyed by MAC, named by their configured device name.
    pub fn from_devices(devices: &[LegacyDeviceBasic]) -> Self {
        Self::new(devices.iter().map(|d| {
            (
                d.mac.as_str(),
                d.name.as_deref().unwrap_or_default(),
            )
        }))
    }

    /// Known clients keyed by MAC, named by their hostname.
    pub fn from_users(users: &[LegacyUser]) -> Self {
        Self::new(users.iter().map(|u| {
            (
                u.mac.as_str(),
                u.hostname.as_deref().unwrap_or_default(),
            )
        }))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, n)| (m.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Device and user directories for one site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directories {
    pub devices: Directory,
    pub users: Directory,
}
