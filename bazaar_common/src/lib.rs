mod helpers;
mod paise;
mod secret;

pub mod op;

pub use helpers::parse_boolean_flag;
pub use paise::{Paise, PaiseConversionError, INR_CURRENCY_CODE, INR_CURRENCY_CODE_LOWER};
pub use secret::Secret;
