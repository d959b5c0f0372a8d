//! Request context collaborator.

use songprint_config::ContextConfig;

use crate::signature::Geolocation;

/// Location and timezone attached to a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Request location.
    pub geolocation: Geolocation,
    /// IANA timezone name.
    pub timezone: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            geolocation: Geolocation::default(),
            timezone: "Europe/Paris".to_string(),
        }
    }
}

impl From<&ContextConfig> for RequestContext {
    fn from(config: &ContextConfig) -> Self {
        Self {
            geolocation: Geolocation {
                altitude: config.altitude,
                latitude: config.latitude,
                longitude: config.longitude,
            },
            timezone: config.timezone.clone(),
        }
    }
}

/// Supplies the context for each new signature. The engine passes it through
/// untouched.
pub trait ContextProvider: Send + Sync {
    /// Context for the signature being generated now.
    fn context(&self) -> RequestContext;
}

/// Returns the same context every time.
#[derive(Debug, Clone, Default)]
pub struct StaticContext(pub RequestContext);

impl ContextProvider for StaticContext {
    fn context(&self) -> RequestContext {
        self.0.clone()
    }
}
