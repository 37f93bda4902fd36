pub mod api;
pub mod attendance;
pub mod config;
pub mod date_utils;
pub mod employees;
pub mod filters;
pub mod notifications;

#[cfg(test)]
pub mod test_utils;
