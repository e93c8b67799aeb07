pub mod callback;
pub mod error;
pub mod node;
pub mod parser;
pub mod raws;
pub mod result;
pub mod span;
pub mod stringifier;
pub mod tree;
