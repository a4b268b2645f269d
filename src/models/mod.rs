pub mod common;
pub mod design;
pub mod image;
pub mod room;

pub use self::common::*;
pub use self::design::*;
pub use self::image::*;
pub use self::room::*;
