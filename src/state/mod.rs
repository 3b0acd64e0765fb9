pub mod messages;
pub mod refresher;
