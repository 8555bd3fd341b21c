pub mod descriptor;
pub mod item;

pub use descriptor::{FeedDescriptor, RawFeedPayload};
pub use item::{FeedCollection, FeedItem};
