//! Macro for implementing Display and FromStr for method-name enums
//!
//! Method names crossing the runtime boundary are case-sensitive
//! (`retrieveCalendars`, not `retrievecalendars`), so parsing is exact.
//!
//! # Example
//!
//! ```rust
//! use calbridge_domain::impl_method_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Method {
//!     List,
//!     Delete,
//! }
//!
//! impl_method_name_conversions!(Method {
//!     List => "listThings",
//!     Delete => "deleteThing",
//! });
//!
//! assert_eq!("listThings".parse::<Method>(), Ok(Method::List));
//! assert_eq!(Method::Delete.to_string(), "deleteThing");
//! ```

/// Implements Display and FromStr traits for method-name enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their wire names
#[macro_export]
macro_rules! impl_method_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Unknown {} value: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
