pub mod game;
pub mod search_page;
pub mod time_bucket;

pub use game::{Game, GameStats, Interval, Weight};
pub use search_page::{SearchPage, SearchRequest};
pub use time_bucket::{TimeBucket, TIME_BUCKETS};
