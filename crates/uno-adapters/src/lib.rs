//! Adapters that make office automation objects feel like Rust.
//!
//! - [`containers`]: list/map/iterator views over `XIndexAccess`,
//!   `XNameAccess` and `XEnumerationAccess`
//! - [`dates`]: chrono date-times to and from `com.sun.star.util.Date`
//!   and `DateTime`
//! - [`properties`]: `PropertyValue` sequences from name/value pairs
//! - [`runner`]: start the office, connect with retries, shut it down
//!
//! The office side (remote objects, the URP bridge) is supplied by the
//! caller through the traits in [`containers`] and [`runner`].
//!
//! # Example
//!
//! ```rust
//! use chrono::Duration;
//! use uno_adapters::{DateConverter, UnoDate};
//!
//! # fn example() -> uno_adapters::error::Result<()> {
//! let due = DateConverter::from_ymd(2013, 10, 16)? + Duration::days(-1);
//! assert_eq!(due.to_uno_date()?, UnoDate::new(15, 10, 2013));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod containers;
pub mod dates;
pub mod error;
pub mod properties;
pub mod runner;

pub use containers::{ContainerKind, EnumerationIter, IndexList, NameMap};
pub use dates::{DateConverter, UnoDate, UnoDateTime};
pub use error::{AdapterError, ResolveError, RunnerError};
pub use properties::{properties, PropertyValue};
pub use runner::{OfficeRunner, RunnerConfig, SofficeLauncher, StartedDesktops, UnoUrl};
