pub mod alert;
pub mod price;
pub mod token;

pub use alert::PriceAlert;
pub use price::{HourlyPrice, PriceSample};
pub use token::Token;
