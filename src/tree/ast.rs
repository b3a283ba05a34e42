use crate::tree::sref::Ref;

/// The closed node grammar.
///
/// Nodes are immutable once built. Children are always fully built before their parent, which
/// keeps every tree acyclic.
///
/// Rendering, shape comparison and dropping all recurse once per level, so tree depth is bounded
/// by the thread's stack: chains some tens of thousands of nodes deep can overflow it.
#[derive(Debug)]
pub enum Node {
    Int(Int),
    Mem(Mem),
    Move(Move),
}

#[derive(Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord,Debug)]
pub enum NodeKind {
    Int,
    Mem,
    Move,
}

/// Int is a leaf, it represents an immediate value.
#[derive(Debug)]
pub struct Int {
    pub val: i64,
}

/// Mem is a node with one child, it represents a memory access.
#[derive(Debug)]
pub struct Mem {
    pub exp: Ref<Node>,
}

/// Move is a node with two children, it represents an assembly move.
#[derive(Debug)]
pub struct Move {
    pub dst: Ref<Node>,
    pub src: Ref<Node>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Int(_) => NodeKind::Int,
            Node::Mem(_) => NodeKind::Mem,
            Node::Move(_) => NodeKind::Move,
        }
    }

    /// Children in left to right order (`dst` before `src`).
    pub fn children(&self) -> Vec<&Ref<Node>> {
        match self {
            Node::Int(_) => vec![],
            Node::Mem(m) => vec![&m.exp],
            Node::Move(m) => vec![&m.dst, &m.src],
        }
    }

    /// True if both trees are built from the same kinds in the same places. Integer values are
    /// ignored, so Move(1,Mem(2)) and Move(3,Mem(4)) have the same shape.
    pub fn same_shape(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Int(_), Node::Int(_)) => true,
            (Node::Mem(a), Node::Mem(b)) => a.exp.same_shape(&b.exp),
            (Node::Move(a), Node::Move(b)) => a.dst.same_shape(&b.dst) && a.src.same_shape(&b.src),
            _ => false,
        }
    }
}

impl NodeKind {
    pub fn arity(&self) -> usize {
        match self {
            NodeKind::Int => 0,
            NodeKind::Mem => 1,
            NodeKind::Move => 2,
        }
    }
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Int => "Int",
            NodeKind::Mem => "Mem",
            NodeKind::Move => "Move",
        }
    }
}

impl Int {
    pub fn new(val: i64) -> Self {
        Int { val }
    }
}

impl Mem {
    /// Panics if `exp` is null: a container must never hold a dangling child.
    pub fn new(exp: Ref<Node>) -> Self {
        assert!(!exp.is_null(), "Mem built with a null child");
        Mem { exp }
    }
}

impl Move {
    /// Panics if either child is null.
    pub fn new(dst: Ref<Node>, src: Ref<Node>) -> Self {
        assert!(!dst.is_null(), "Move built with a null dst");
        assert!(!src.is_null(), "Move built with a null src");
        Move { dst, src }
    }
}

pub fn int(val: i64) -> Ref<Int> {
    Ref::new(Int::new(val))
}

pub fn mem(exp: impl Into<Ref<Node>>) -> Ref<Mem> {
    Ref::new(Mem::new(exp.into()))
}

pub fn mov(dst: impl Into<Ref<Node>>, src: impl Into<Ref<Node>>) -> Ref<Move> {
    Ref::new(Move::new(dst.into(), src.into()))
}
