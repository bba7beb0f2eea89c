pub mod catalog;
pub mod conditions;
pub mod dashboard;
pub mod intent;
pub mod language;
pub mod models;
pub mod payment;

pub use intent::{builtin_rules, IntentClassifier, IntentRule};
pub use language::{LanguagePack, LanguagePackError, LanguagePackRegistry, Resolution};
pub use models::*;
pub use payment::{process_payment, PaymentError, PaymentReceipt, PaymentRequest};
