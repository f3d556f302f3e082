pub mod card;
pub mod cube;
pub mod custom;
pub mod deck;

pub use card::{Card, Color};
pub use cube::Cube;
pub use custom::{CustomCardMappings};
pub use deck::{Deck, Player};
