//! Text rendering of trees.
//!
//! The format is fixed: `Int` renders its value, `Mem` renders `Mem(<exp>)` and `Move` renders
//! `Move(<dst>,<src>)`, with no whitespace anywhere.

use std::fmt;
use crate::tree::ast::{Int,Mem,Move,Node,NodeKind};
use crate::tree::sref::{Kind,Ref};

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.val)
    }
}

impl fmt::Display for Mem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Mem({})", self.exp)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Move({},{})", self.dst, self.src)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Int(x) => fmt::Display::fmt(x, f),
            Node::Mem(x) => fmt::Display::fmt(x, f),
            Node::Move(x) => fmt::Display::fmt(x, f),
        }
    }
}

/// Renders the node pointed to. Panics on a null reference, like any other dereference.
impl<T: Kind + fmt::Display> fmt::Display for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
