//! The building blocks of the document tree: names, values, attributes and tags.
mod name;
pub use name::*;

mod value;
pub use value::*;

mod attribute;
pub use attribute::*;

mod tag;
pub use tag::*;
