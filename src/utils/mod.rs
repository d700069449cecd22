pub mod dates;

pub use dates::{normalize_date, CanonicalDate};
