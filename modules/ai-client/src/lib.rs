pub mod claude;
pub mod schema;
pub mod util;

pub use claude::{Claude, ImageInput};
pub use schema::StructuredOutput;
