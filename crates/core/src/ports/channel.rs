//! Outbound communication channel port.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Communication medium through which a message is dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
    Whatsapp,
}

impl Channel {
    /// Wire representation of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A personalised message ready for dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Subject line; only meaningful for channels that carry one.
    pub subject: Option<String>,
    pub body: String,
}

/// Outcome reported by a channel adapter for one delivery attempt.
///
/// Ordinary delivery failures (provider rejections, network errors) are
/// reported through `success = false`; adapters must not panic for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    /// A successful delivery.
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failed delivery with a descriptive error.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// One concrete transport (an SMS gateway, an email provider, and so on).
pub trait ChannelAdapter: Send + Sync {
    /// Delivers `message` to `recipient_contact`.
    ///
    /// Implementations report ordinary delivery failures via the outcome
    /// and reserve panics for programmer errors such as missing credentials
    /// at construction time.
    fn send(&self, recipient_contact: &str, message: &OutboundMessage) -> DeliveryOutcome;
}

/// Injected set of channel adapters, keyed by channel.
///
/// A channel without a registered adapter is treated as a per-recipient
/// dispatch failure rather than a panic, so a clinic running email-only
/// outreach does not need SMS credentials configured.
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    adapters: HashMap<Channel, Arc<dyn ChannelAdapter>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the adapter serving `channel`, replacing any previous one.
    pub fn register(mut self, channel: Channel, adapter: Arc<dyn ChannelAdapter>) -> Self {
        self.adapters.insert(channel, adapter);
        self
    }

    /// Adapter serving `channel`, if one is registered.
    pub fn adapter_for(&self, channel: Channel) -> Option<&dyn ChannelAdapter> {
        self.adapters.get(&channel).map(Arc::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopAdapter;

    impl ChannelAdapter for NoopAdapter {
        fn send(&self, _recipient_contact: &str, _message: &OutboundMessage) -> DeliveryOutcome {
            DeliveryOutcome::delivered()
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ChannelRegistry::new().register(Channel::Email, Arc::new(NoopAdapter));
        assert!(registry.adapter_for(Channel::Email).is_some());
        assert!(registry.adapter_for(Channel::Sms).is_none());
    }

    #[test]
    fn test_channel_serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Channel::Whatsapp).unwrap(), "\"whatsapp\"");
        let back: Channel = serde_json::from_str("\"sms\"").unwrap();
        assert_eq!(back, Channel::Sms);
    }

    #[test]
    fn test_delivery_outcome_constructors() {
        assert!(DeliveryOutcome::delivered().success);
        let failed = DeliveryOutcome::failed("gateway timeout");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("gateway timeout"));
    }
}
