pub mod dates;
pub mod errors;
pub mod layout;
pub mod staging;
pub mod style;

pub use dates::{date_range, monday_indices, monday_ticks, DateAxis, TickTimezone};
pub use errors::{ChartError, Result};
pub use layout::Layout;
pub use staging::StagedFile;
