pub mod conversion;
pub mod field;
pub mod form;
pub mod raw;
pub mod rule;

pub use conversion::*;
pub use field::*;
pub use form::*;
pub use rule::*;
