//! [`ModelAdmin`](crate::ModelAdmin) implementations for every managed
//! table.

mod categories;
mod photos;
mod posts;
mod signups;
mod subscribers;
mod tags;

pub use categories::CategoryAdmin;
pub use photos::PhotoAdmin;
pub use posts::PostAdmin;
pub use signups::SignupAdmin;
pub use subscribers::SubscriberAdmin;
pub use tags::TagAdmin;
