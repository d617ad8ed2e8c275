pub mod entities;
pub mod order;
pub mod profile;
pub mod user;
