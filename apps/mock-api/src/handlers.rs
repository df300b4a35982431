pub mod form_definitions;
pub mod health;
pub mod submissions;
