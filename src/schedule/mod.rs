pub mod countdown;
pub mod index;
pub mod model;
pub mod parser;
pub mod time_codec;
