mod context;
mod ids;
mod track;

pub use context::TrackContext;
pub use ids::{TrackId, UserId};
pub use track::{split_tags, Track};
