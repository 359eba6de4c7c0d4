mod handler;
mod model;

pub use handler::{
    create_currency, delete_currency, get_active_currencies, get_all_currencies, update_currency,
};
pub use model::{CurrencyPayload, CustomCurrency, SYSTEM_CURRENCIES, normalize_code};
