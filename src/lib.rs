pub mod generate;
pub mod parser;
pub mod render;
pub mod schema;
pub mod synth;
pub mod writer;
