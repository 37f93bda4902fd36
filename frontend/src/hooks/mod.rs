pub mod use_attendance;
pub mod use_collection;
pub mod use_dashboard;
pub mod use_employees;
pub mod use_form;
