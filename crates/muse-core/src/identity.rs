use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Authenticated caller identity, resolved upstream of the core
///
/// The route layer authenticates the request and passes the user id and
/// current subscription tier in; the core never touches sessions or tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User identifier
    pub user_id: String,
    /// Subscription tier at the time of the call
    pub tier: SubscriptionTier,
}

impl Identity {
    /// Convenience constructor
    pub fn new(user_id: impl Into<String>, tier: SubscriptionTier) -> Self {
        Self {
            user_id: user_id.into(),
            tier,
        }
    }
}

/// Subscription tiers recognized by the quota ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionTier {
    /// Default tier for new accounts
    Free,
    /// Paid individual tier
    Pro,
    /// Creator tier (unlimited AI generations)
    Creator,
    /// Enterprise tier (unlimited everything)
    Enterprise,
}
