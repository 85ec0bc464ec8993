mod ids;

pub use ids::{ClassId, DocumentId, UserId};
