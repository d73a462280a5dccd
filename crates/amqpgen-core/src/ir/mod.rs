pub mod layout;
pub mod methods;
pub mod types;

pub use layout::*;
pub use methods::*;
pub use types::{IrClass, IrInfo, IrProtocol, NormalizedName, PrimitiveType, UNKNOWN_METHOD};
