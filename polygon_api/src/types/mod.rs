mod page;
pub use self::page::{TickerRecord, TickersPage};
