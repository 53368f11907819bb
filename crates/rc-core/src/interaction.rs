//! # Interactions
//!
//! Social gestures as data, so a host can queue them and apply them in the
//! order they were dispatched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{CommentId, VehicleId, ViewerId};

/// Where a vehicle was shared to. Metadata only: every channel counts once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareChannel {
    Whatsapp,
    Facebook,
    Twitter,
    Email,
    Sms,
    CopyLink,
    #[default]
    #[serde(other)]
    Other,
}

impl fmt::Display for ShareChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Whatsapp => "whatsapp",
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Email => "email",
            Self::Sms => "sms",
            Self::CopyLink => "copy_link",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A single user gesture against one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Interaction {
    Like {
        vehicle_id: VehicleId,
        viewer_id: ViewerId,
    },
    Comment {
        vehicle_id: VehicleId,
        author_id: ViewerId,
        text: String,
    },
    Reply {
        vehicle_id: VehicleId,
        parent_id: CommentId,
        author_id: ViewerId,
        text: String,
    },
    Share {
        vehicle_id: VehicleId,
        #[serde(default)]
        channel: ShareChannel,
    },
}

impl Interaction {
    pub fn vehicle_id(&self) -> VehicleId {
        match self {
            Self::Like { vehicle_id, .. }
            | Self::Comment { vehicle_id, .. }
            | Self::Reply { vehicle_id, .. }
            | Self::Share { vehicle_id, .. } => *vehicle_id,
        }
    }
}
