pub mod bridge;
pub mod styled;

pub use bridge::{ChangeNotification, StyledBuffer, TextStore};
pub use styled::{Run, StyledText};
