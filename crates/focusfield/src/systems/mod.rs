pub mod history;
pub mod layout;
pub mod stability;
