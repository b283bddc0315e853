#![doc = include_str!("../README.md")]

mod account_id;
pub use account_id::AccountId;

mod events;
pub use events::{Event, FormatError, ParseErrorKind};

mod line;
pub use line::{KeyValue, LineContext, LineKind, Position, RULER_MIN_LEN, classify, is_ruler};

mod options;
pub use options::{DuplicateKeys, ParseMode, ParseOptions, Syntax};

mod parser;
pub use parser::{Parser, StrLines};

mod values;
pub use values::{Value, split_values};
