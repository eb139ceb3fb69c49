pub mod depth;
pub mod io;
pub mod label;
pub mod traits;

pub use self::depth::DepthMap;
pub use self::label::LabelMap;
pub use self::traits::{ImageView, Rows};
