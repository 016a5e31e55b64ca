use std::cmp::Ordering;

/// Total order over `T`.
///
/// The tree assumes the order is consistent (transitive, antisymmetric) for
/// the lifetime of the structure; `Ordering::Equal` is the only notion of
/// equality the tree knows about.
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The default comparator: `Ord`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
