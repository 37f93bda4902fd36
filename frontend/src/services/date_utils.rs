use chrono::{Datelike, Local, NaiveDate};

/// Current date in the client's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date for display (e.g., "January 15, 2025")
pub fn format_display(date: NaiveDate) -> String {
    let month_name = match date.month() {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    };
    format!("{} {}, {}", month_name, date.day(), date.year())
}
