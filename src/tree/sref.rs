use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;
use log::debug;
use crate::tree::ast::{Int,Mem,Move,Node,NodeKind};

/// `BadCast` is the recoverable one: an optimistic `cast` that didn't pan out, including a cast
/// of a null reference (`from: None`). `NullReference` means something needed the node itself.
#[derive(Clone,PartialEq,Eq,Debug)]
pub enum RefError {
    BadCast { from: Option<NodeKind>, to: &'static str },
    NullReference(&'static str),
}

/// Something a `Ref` can point at: either the abstract `Node` or one of its concrete kinds.
pub trait Kind: Sized {
    const NAME: &'static str;

    /// Views the node as this kind, if it is one. The abstract `Node` accepts every node.
    fn narrow(node: &Node) -> Option<&Self>;

    fn into_node(self) -> Node;
}

impl Kind for Node {
    const NAME: &'static str = "Node";
    fn narrow(node: &Node) -> Option<&Self> {
        Some(node)
    }
    fn into_node(self) -> Node {
        self
    }
}

macro_rules! concrete_kind {
    ($t:ident) => {
        impl Kind for $t {
            const NAME: &'static str = stringify!($t);
            fn narrow(node: &Node) -> Option<&Self> {
                if let Node::$t(x) = node {
                    Some(x)
                } else {
                    None
                }
            }
            fn into_node(self) -> Node {
                Node::$t(self)
            }
        }

        impl From<Ref<$t>> for Ref<Node> {
            fn from(r: Ref<$t>) -> Self {
                Ref { node: r.node, kind: PhantomData }
            }
        }
    };
}

concrete_kind!(Int);
concrete_kind!(Mem);
concrete_kind!(Move);

/// A shared, reference-counted handle to a node.
///
/// The type parameter is the static kind the handle was obtained as. The underlying node always
/// has that kind (or, for `Ref<Node>`, any kind), so moving between kinds goes through `cast`,
/// `cast_or_null` or `upcast`.
///
/// A reference is either null or points to a live node. Null references must be `reset` before
/// being dereferenced.
pub struct Ref<T: Kind> {
    node: Option<Arc<Node>>,
    kind: PhantomData<fn() -> T>,
}

impl<T: Kind> Ref<T> {
    /// Takes ownership of a freshly built node.
    pub fn new(value: T) -> Self {
        Ref {
            node: Some(Arc::new(value.into_node())),
            kind: PhantomData,
        }
    }

    pub fn null() -> Self {
        Ref { node: None, kind: PhantomData }
    }

    pub fn is_null(&self) -> bool {
        self.node.is_none()
    }

    /// Drops this handle's share of the old node (if any) and points it at a new one.
    pub fn reset(&mut self, value: T) {
        *self = Ref::new(value);
    }

    pub fn node(&self) -> Option<&Node> {
        self.node.as_deref()
    }

    pub fn get(&self) -> Result<&T, RefError> {
        let node = self.node().ok_or(RefError::NullReference(T::NAME))?;
        T::narrow(node).ok_or(RefError::BadCast { from: Some(node.kind()), to: T::NAME })
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.node().map(Node::kind)
    }

    /// Number of handles currently sharing the node. Zero for a null reference.
    pub fn holders(&self) -> usize {
        self.node.as_ref().map_or(0, Arc::strong_count)
    }

    pub fn upcast(&self) -> Ref<Node> {
        Ref { node: self.node.clone(), kind: PhantomData }
    }

    /// Checked downcast. Shares the node on success. A null reference can't be cast to anything.
    pub fn cast<U: Kind>(&self) -> Result<Ref<U>, RefError> {
        match self.node() {
            Some(node) if U::narrow(node).is_some() => Ok(Ref { node: self.node.clone(), kind: PhantomData }),
            Some(node) => {
                debug!("Bad cast from {} to {}", node.kind(), U::NAME);
                Err(RefError::BadCast { from: Some(node.kind()), to: U::NAME })
            }
            None => {
                debug!("Bad cast from null {} to {}", T::NAME, U::NAME);
                Err(RefError::BadCast { from: None, to: U::NAME })
            }
        }
    }

    /// Like `cast`, but yields a null reference on mismatch. For callers that have already
    /// established the kind some other way.
    pub fn cast_or_null<U: Kind>(&self) -> Ref<U> {
        match self.node() {
            Some(node) if U::narrow(node).is_some() => Ref { node: self.node.clone(), kind: PhantomData },
            _ => Ref::null(),
        }
    }

    pub fn is_a<U: Kind>(&self) -> bool {
        self.node().map_or(false, |n| U::narrow(n).is_some())
    }

    pub fn same_shape<U: Kind>(&self, other: &Ref<U>) -> bool {
        match (self.node(), other.node()) {
            (Some(a), Some(b)) => a.same_shape(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Kind> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Ref { node: self.node.clone(), kind: PhantomData }
    }
}

impl<T: Kind> Default for Ref<T> {
    fn default() -> Self {
        Ref::null()
    }
}

impl<T: Kind> From<&Ref<T>> for Ref<Node> {
    fn from(r: &Ref<T>) -> Self {
        r.upcast()
    }
}

/// Identity, not structure: two separately built Int(42) are different nodes.
impl<T: Kind, U: Kind> PartialEq<Ref<U>> for Ref<T> {
    fn eq(&self, other: &Ref<U>) -> bool {
        match (&self.node, &other.node) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Kind> Eq for Ref<T> {}

/// Dereferencing a null reference is a programming error, hence the panic.
impl<T: Kind> Deref for Ref<T> {
    type Target = T;
    fn deref(&self) -> &T {
        match self.get() {
            Ok(x) => x,
            Err(e) => panic!("dereferenced an invalid reference: {:?}", e),
        }
    }
}

impl<T: Kind> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.node() {
            Some(node) => write!(f, "Ref<{}>({})", T::NAME, node),
            None => write!(f, "Ref<{}>(null)", T::NAME),
        }
    }
}
