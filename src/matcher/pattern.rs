use std::fmt;
use crate::tree::ast::{Node,NodeKind};
use crate::tree::sref::Ref;
use crate::tree::variant::Alt;

/// The shape of tree a rule applies to.
///
/// Patterns constrain node kinds down to some depth and say nothing about integer values.
#[derive(Clone,PartialEq,Eq,Hash,Debug)]
pub enum Pattern {
    /// Anything at all. This is what the fallback rule uses.
    Any,
    Int,
    Mem(Box<Pattern>),
    Move(Box<Pattern>,Box<Pattern>),
    /// A Move whose dst and src have the same shape.
    MoveAlike,
}

/// How much a pattern pins down. Bigger is more specific.
///
/// Deeper constraints always win over shallower ones; among patterns of equal depth, the one with
/// more constrained positions wins. Patterns with equal specificity are tied and are tried in
/// registration order.
#[derive(Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Debug)]
pub struct Specificity {
    pub depth: usize,
    pub constraints: usize,
}

impl Pattern {
    pub fn mem(exp: Pattern) -> Self {
        Pattern::Mem(Box::new(exp))
    }

    pub fn mov(dst: Pattern, src: Pattern) -> Self {
        Pattern::Move(Box::new(dst), Box::new(src))
    }

    /// The kind of node this pattern can match at its root, or None for `Any`.
    pub fn tag(&self) -> Option<NodeKind> {
        match self {
            Pattern::Any => None,
            Pattern::Int => Some(NodeKind::Int),
            Pattern::Mem(_) => Some(NodeKind::Mem),
            Pattern::Move(_,_) | Pattern::MoveAlike => Some(NodeKind::Move),
        }
    }

    pub fn is_universal(&self) -> bool {
        *self == Pattern::Any
    }

    pub fn specificity(&self) -> Specificity {
        Specificity {
            depth: self.depth(),
            constraints: self.constraints(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Pattern::Any => 0,
            Pattern::Int | Pattern::MoveAlike => 1,
            Pattern::Mem(p) => 1 + p.depth(),
            Pattern::Move(p,q) => 1 + p.depth().max(q.depth()),
        }
    }

    fn constraints(&self) -> usize {
        match self {
            Pattern::Any => 0,
            Pattern::Int => 1,
            Pattern::MoveAlike => 2,
            Pattern::Mem(p) => 1 + p.constraints(),
            Pattern::Move(p,q) => 1 + p.constraints() + q.constraints(),
        }
    }

    pub fn matches(&self, alt: &Alt) -> bool {
        alt.node().map_or(false, |n| self.matches_node(n))
    }

    pub fn matches_node(&self, node: &Node) -> bool {
        match (self, node) {
            (Pattern::Any, _) => true,
            (Pattern::Int, Node::Int(_)) => true,
            (Pattern::Mem(p), Node::Mem(m)) => p.matches_ref(&m.exp),
            (Pattern::Move(p,q), Node::Move(m)) => p.matches_ref(&m.dst) && q.matches_ref(&m.src),
            (Pattern::MoveAlike, Node::Move(m)) => m.dst.same_shape(&m.src),
            _ => false,
        }
    }

    fn matches_ref(&self, r: &Ref<Node>) -> bool {
        r.node().map_or(false, |n| self.matches_node(n))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pattern::Any => write!(f, "_"),
            Pattern::Int => write!(f, "Int"),
            Pattern::Mem(p) => write!(f, "Mem({})", p),
            Pattern::Move(p,q) => write!(f, "Move({},{})", p, q),
            Pattern::MoveAlike => write!(f, "Move(T,T)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ast::{int,mem,mov};

    fn mem_any() -> Pattern {
        Pattern::mem(Pattern::Any)
    }

    fn mem_mem() -> Pattern {
        Pattern::mem(mem_any())
    }

    #[test]
    fn nested_constraint_outranks_outer_kind() {
        assert!(mem_mem().specificity() > mem_any().specificity());
        assert!(mem_any().specificity() > Pattern::Any.specificity());
        assert!(Pattern::mov(Pattern::Int, Pattern::Any).specificity() > Pattern::MoveAlike.specificity());
        assert!(Pattern::MoveAlike.specificity() > Pattern::mov(Pattern::Any, Pattern::Any).specificity());
    }

    #[test]
    fn mirrored_constraints_tie() {
        let a = Pattern::mov(Pattern::Int, Pattern::Any);
        let b = Pattern::mov(Pattern::Any, Pattern::Int);
        assert_eq!(a.specificity(), b.specificity());
    }

    #[test]
    fn matching_follows_children() {
        let tree = mem(mem(int(42))).project().unwrap();
        assert!(mem_mem().matches(&tree));
        assert!(mem_any().matches(&tree));
        assert!(Pattern::Any.matches(&tree));
        assert!(!Pattern::mem(Pattern::Int).matches(&tree));
        assert!(!Pattern::Int.matches(&tree));

        let shallow = mem(int(42)).project().unwrap();
        assert!(!mem_mem().matches(&shallow));
        assert!(Pattern::mem(Pattern::Int).matches(&shallow));
    }

    #[test]
    fn move_alike_compares_shapes() {
        let alike = mov(mem(int(1)), mem(int(2))).project().unwrap();
        let unlike = mov(int(21), mem(int(42))).project().unwrap();
        assert!(Pattern::MoveAlike.matches(&alike));
        assert!(!Pattern::MoveAlike.matches(&unlike));
        assert!(Pattern::mov(Pattern::Int, mem_any()).matches(&unlike));
        assert!(!Pattern::MoveAlike.matches(&int(1).project().unwrap()));
    }

    #[test]
    fn tags() {
        assert_eq!(Pattern::Any.tag(), None);
        assert_eq!(mem_mem().tag(), Some(NodeKind::Mem));
        assert_eq!(Pattern::MoveAlike.tag(), Some(NodeKind::Move));
        assert!(Pattern::Any.is_universal());
        assert!(!Pattern::Int.is_universal());
    }

    #[test]
    fn display() {
        assert_eq!(mem_mem().to_string(), "Mem(Mem(_))");
        assert_eq!(Pattern::mov(Pattern::Int, Pattern::MoveAlike).to_string(), "Move(Int,Move(T,T))");
    }
}
