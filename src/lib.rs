/// Administrative-division tables backing addresses and issuing authorities
pub mod area;

mod canvas;
pub use canvas::*;

mod card;
pub use card::*;

mod colour;
pub use colour::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod idno;
pub use idno::*;

/// Constrained-width text layout for the card canvas
pub mod layout;

/// Random synthetic particulars: names, addresses, ID numbers
pub mod mock;

mod units;
pub use units::*;

mod validity;
pub use validity::*;
