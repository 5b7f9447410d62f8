pub mod appointment;
pub mod audit;
pub mod enums;
pub mod medication;
pub mod reminder;
pub mod senior;

pub use appointment::*;
pub use audit::*;
pub use enums::*;
pub use medication::*;
pub use reminder::*;
pub use senior::*;
