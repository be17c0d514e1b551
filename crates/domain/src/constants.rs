//! Bridge constants
//!
//! Centralized location for provider URIs, permission names and the fixed
//! error messages delivered to callers.

// Provider addressing
pub const CALENDAR_AUTHORITY: &str = "com.android.calendar";
pub const CALENDARS_CONTENT_URI: &str = "content://com.android.calendar/calendars";
pub const EVENTS_CONTENT_URI: &str = "content://com.android.calendar/events";

// Permissions that must both be held before touching the store
pub const READ_CALENDAR_PERMISSION: &str = "android.permission.READ_CALENDAR";
pub const WRITE_CALENDAR_PERMISSION: &str = "android.permission.WRITE_CALENDAR";

// Fixed error messages
pub const CALENDAR_ID_INVALID_ARGUMENT_NOT_A_NUMBER_MESSAGE: &str =
    "Calendar ID is not a number";
pub const EVENT_ID_INVALID_ARGUMENT_NOT_A_NUMBER_MESSAGE: &str = "Event ID is not a number";
pub const EVENTS_START_DATE_LARGER_THAN_END_DATE_MESSAGE: &str =
    "Start date must occur before end date";
pub const CREATE_EVENT_ARGUMENTS_NOT_VALID_MESSAGE: &str =
    "Some of the event arguments are not valid";
pub const DELETING_RECURRING_EVENT_NOT_SUPPORTED_MESSAGE: &str =
    "Deleting recurring events is not supported";
pub const REQUEST_CODES_EXHAUSTED_MESSAGE: &str = "No permission request codes left to allocate";

// Defaults
pub const DEFAULT_TIME_ZONE: &str = "UTC";
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
