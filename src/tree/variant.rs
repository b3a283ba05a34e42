use std::fmt;
use log::trace;
use crate::tree::ast::{Int,Mem,Move,Node,NodeKind};
use crate::tree::sref::{Kind,Ref,RefError};

/// A node seen through its concrete kind.
///
/// This is the bridge between `Ref<Node>` storage and code that wants to match on kinds. The tag
/// always agrees with the node's run-time kind, because `project` reads it off the node instead of
/// guessing and casting.
#[derive(Clone,PartialEq,Eq,Debug)]
pub enum Alt {
    Int(Ref<Int>),
    Mem(Ref<Mem>),
    Move(Ref<Move>),
}

pub fn project(r: &Ref<Node>) -> Result<Alt, RefError> {
    r.project()
}

impl<T: Kind> Ref<T> {
    pub fn project(&self) -> Result<Alt, RefError> {
        let node = self.node().ok_or(RefError::NullReference(T::NAME))?;
        trace!("Projecting {} as {}", T::NAME, node.kind());
        // The kind has just been read off the node, so the unchecked casts can't come back null.
        Ok(match node {
            Node::Int(_) => Alt::Int(self.cast_or_null()),
            Node::Mem(_) => Alt::Mem(self.cast_or_null()),
            Node::Move(_) => Alt::Move(self.cast_or_null()),
        })
    }
}

impl Alt {
    pub fn tag(&self) -> NodeKind {
        match self {
            Alt::Int(_) => NodeKind::Int,
            Alt::Mem(_) => NodeKind::Mem,
            Alt::Move(_) => NodeKind::Move,
        }
    }

    pub fn upcast(&self) -> Ref<Node> {
        match self {
            Alt::Int(r) => r.upcast(),
            Alt::Mem(r) => r.upcast(),
            Alt::Move(r) => r.upcast(),
        }
    }

    pub fn node(&self) -> Option<&Node> {
        match self {
            Alt::Int(r) => r.node(),
            Alt::Mem(r) => r.node(),
            Alt::Move(r) => r.node(),
        }
    }

    pub fn children(&self) -> Result<Vec<Alt>, RefError> {
        match self {
            Alt::Int(_) => Ok(vec![]),
            Alt::Mem(m) => Ok(vec![m.get()?.exp.project()?]),
            Alt::Move(m) => {
                let m = m.get()?;
                Ok(vec![m.dst.project()?, m.src.project()?])
            }
        }
    }
}

impl fmt::Display for Alt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Alt::Int(r) => fmt::Display::fmt(r, f),
            Alt::Mem(r) => fmt::Display::fmt(r, f),
            Alt::Move(r) => fmt::Display::fmt(r, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ast::{int,mem,mov};

    #[test]
    fn tag_follows_runtime_kind() {
        let trees: Vec<Ref<Node>> = vec![
            int(42).into(),
            mem(int(42)).into(),
            mem(mem(int(42))).into(),
            mov(int(21), mem(int(42))).into(),
        ];
        for t in &trees {
            let alt = project(t).unwrap();
            assert_eq!(Some(alt.tag()), t.kind());
            assert_eq!(alt.upcast(), *t);
        }
    }

    #[test]
    fn typed_handles_project_too() {
        let m = mem(int(42));
        assert_eq!(m.project().unwrap(), Alt::Mem(m.clone()));
    }

    #[test]
    fn children_are_projected_in_order() {
        let src = mem(int(42));
        let tree = mov(int(21), src.clone());
        let kids = tree.project().unwrap().children().unwrap();
        let tags: Vec<_> = kids.iter().map(Alt::tag).collect();
        assert_eq!(tags, vec![NodeKind::Int, NodeKind::Mem]);
        assert_eq!(kids[1], Alt::Mem(src));
        assert!(kids[0].children().unwrap().is_empty());
    }

    #[test]
    fn null_does_not_project() {
        assert_eq!(project(&Ref::null()), Err(RefError::NullReference("Node")));
    }

    #[test]
    fn renders_like_the_node() {
        let tree = mov(int(21), mem(int(42)));
        assert_eq!(tree.project().unwrap().to_string(), "Move(21,Mem(42))");
    }
}
