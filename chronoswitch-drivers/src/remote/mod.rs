//! Remote-control transmitters

pub mod pt2262;

pub use pt2262::{code_word, Pt2262Config, Pt2262Transmitter, Trit, CODE_WORD_LEN};
