//! Domain records mirrored from the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id!(
    /// Backend-assigned message id.
    MessageId
);
string_id!(
    /// Backend-assigned id of a sending service.
    ServiceId
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub subject: String,
    pub markdown: String,
}

/// A message with its content, as returned by the message detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_service_id: ServiceId,
    /// Creation time, seconds since the Unix epoch.
    pub created_at: u64,
    pub content: MessageContent,
}

/// Sender of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: ServiceId,
    pub service_name: String,
    pub organization_name: String,
}

/// Keyed entity stored in an `EntityStore`.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + std::hash::Hash + Ord + fmt::Display + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;
}

impl Entity for Message {
    type Id = MessageId;

    fn id(&self) -> &MessageId {
        &self.id
    }
}

impl Entity for Service {
    type Id = ServiceId;

    fn id(&self) -> &ServiceId {
        &self.service_id
    }
}
