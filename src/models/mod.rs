pub mod birth;
pub mod dasha;
pub mod kundli;
pub mod place;
pub mod zodiac;

pub use birth::*;
pub use dasha::*;
pub use kundli::*;
pub use place::*;
pub use zodiac::*;
