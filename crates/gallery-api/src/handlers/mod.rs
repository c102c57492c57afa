pub mod comments;
pub mod folders;
pub mod gallery;
pub mod health;
pub mod items;
pub mod photos;
pub mod uploads;
