pub mod openaq;

pub use openaq::OpenAqSource;
