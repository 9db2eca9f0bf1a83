pub mod conversation;
pub mod request;
pub mod sentiment;
