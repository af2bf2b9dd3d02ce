/// A position in the recency list.
///
/// The two sentinels are their own variants rather than reserved slot
/// indices, so any walk over the list has to say what it does at the
/// boundaries before it can reach a node's key or value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Ptr {
    Head,
    Tail,
    Node(usize),
}

impl Ptr {
    pub(crate) fn node(self) -> Option<usize> {
        match self {
            Ptr::Node(index) => Some(index),
            Ptr::Head | Ptr::Tail => None,
        }
    }
}

/// The backward and forward links of a node or sentinel.
///
/// `prev` points towards the head (more recently used), `next` towards the
/// tail (less recently used).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Links {
    pub(crate) prev: Ptr,
    pub(crate) next: Ptr,
}

impl Links {
    /// Links of a sentinel in an empty list: head and tail point at each
    /// other in both directions.
    pub(crate) fn empty() -> Self {
        Links {
            prev: Ptr::Head,
            next: Ptr::Tail,
        }
    }

    pub(crate) fn between(prev: Ptr, next: Ptr) -> Self {
        Links { prev, next }
    }
}
