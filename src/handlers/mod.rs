pub mod actions;
pub mod async_actions;
