/// Inbound envelope field names (magic strings layer)
pub mod envelope_fields {
    pub const CONNECTION_ID: &str = "connection_id";
    pub const ME: &str = "me";
    pub const TYPE: &str = "type";
}

/// Chat event type strings
pub mod chat_events {
    pub const HEALTH_CHECK: &str = "health.check";
    pub const MESSAGE_NEW: &str = "message.new";
    pub const MESSAGE_UPDATED: &str = "message.updated";
    pub const MESSAGE_DELETED: &str = "message.deleted";
    pub const MESSAGE_READ: &str = "message.read";
    pub const REACTION_NEW: &str = "reaction.new";
    pub const REACTION_DELETED: &str = "reaction.deleted";
    pub const TYPING_START: &str = "typing.start";
    pub const TYPING_STOP: &str = "typing.stop";
    pub const USER_PRESENCE_CHANGED: &str = "user.presence.changed";
    pub const USER_UPDATED: &str = "user.updated";
    pub const MEMBER_ADDED: &str = "member.added";
    pub const MEMBER_REMOVED: &str = "member.removed";
    pub const CHANNEL_UPDATED: &str = "channel.updated";
    pub const NOTIFICATION_MESSAGE_NEW: &str = "notification.message_new";
    pub const CONNECTION_CHANGED: &str = "connection.changed";
    pub const CONNECTION_RECOVERED: &str = "connection.recovered";
}

/// Default health check interval (milliseconds)
pub const HEALTH_CHECK_INTERVAL: u64 = 30000;

/// The health check runs this many times faster while the network is down
pub const RECONNECT_INTERVAL_DIVISOR: u32 = 4;

/// Reserved error code reported when the network is unavailable
pub const NO_INTERNET_ERROR_CODE: i32 = -1;

/// Message reported alongside [`NO_INTERNET_ERROR_CODE`]
pub const NO_INTERNET_MESSAGE: &str = "No internet connection";

/// Message reported when the transport fails without a diagnostic
pub const UNKNOWN_FAILURE_MESSAGE: &str = "Unknown";
