//! Content repository models.

pub mod author;
pub mod content_type;
pub mod item;
pub mod taxonomy;

pub use author::Author;
pub use content_type::{ATTACHMENT_TYPE, ContentType};
pub use item::{Item, STATUS_PUBLISH};
pub use taxonomy::{Taxonomy, TaxonomyRole, Term};
