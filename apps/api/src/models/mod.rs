pub mod chat;
pub mod contribution;
pub mod portfolio;
