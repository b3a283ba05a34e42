pub mod demo;
pub mod matcher;
pub mod tree;
