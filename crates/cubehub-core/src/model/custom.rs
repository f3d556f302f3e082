use std::collections::HashMap;

use uuid::Uuid;

/// Prefix of every locally generated card id; catalog ids never carry it.
pub const CUSTOM_ID_PREFIX: &str = "custom:";

/// Image reference → card id, as loaded once per build run
pub type CustomCardMappings = HashMap<String, String>;

/// Generate a fresh id for a custom card (UUIDv7 behind the custom prefix)
pub fn new_custom_card_id() -> String {
    format!("{}{}", CUSTOM_ID_PREFIX, Uuid::now_v7())
}
