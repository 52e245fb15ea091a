//! Language codes and original-language resolution

pub mod code;
pub mod resolver;

pub use code::LanguageCode;
pub use resolver::{LanguageResolver, OriginalLanguage};
