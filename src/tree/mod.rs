pub mod ast;
pub mod sref;
pub mod traverse;
pub mod variant;
