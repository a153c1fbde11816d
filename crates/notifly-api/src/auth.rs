use secrecy::SecretString;
use strum::{Display, EnumString};

/// Username/password pair for the controller's session login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// The platform type of the UniFi controller.
///
/// Determines URL prefixes, the login path, and the session cookie name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ControllerPlatform {
    /// UniFi OS device (UDM, UCG, etc.) -- port 443, `/proxy/network/` prefix.
    UnifiOs,
    /// Standalone Network Application (Java) -- port 8443, no prefix.
    #[default]
    #[strum(serialize = "classic")]
    ClassicController,
}

impl ControllerPlatform {
    /// The path prefix for legacy API endpoints.
    pub fn legacy_prefix(&self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/network",
            Self::ClassicController => "",
        }
    }

    /// The login endpoint path.
    pub fn login_path(&self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/login",
            Self::ClassicController => "/api/login",
        }
    }

    /// Name of the cookie carrying the session token.
    pub fn session_cookie(&self) -> &'static str {
        match self {
            Self::UnifiOs => "TOKEN",
            Self::ClassicController => "unifises",
        }
    }
}
