//! Composable member predicates

use std::fmt;
use std::sync::Arc;

/// A boolean test over one member
///
/// Combinators build new predicates; the operands are left untouched.
pub struct Predicate<M: ?Sized> {
    test: Arc<dyn Fn(&M) -> bool + Send + Sync>,
}

impl<M: ?Sized + 'static> Predicate<M> {
    /// Wrap a test function
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&M) -> bool + Send + Sync + 'static,
    {
        Self { test: Arc::new(test) }
    }

    /// Always true
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Always false
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    /// Evaluate against a member
    pub fn test(&self, member: &M) -> bool {
        (self.test)(member)
    }

    /// Both must hold; short-circuits
    pub fn and(&self, other: &Predicate<M>) -> Self {
        let (a, b) = (self.test.clone(), other.test.clone());
        Self::new(move |m| a(m) && b(m))
    }

    /// Either must hold; short-circuits
    pub fn or(&self, other: &Predicate<M>) -> Self {
        let (a, b) = (self.test.clone(), other.test.clone());
        Self::new(move |m| a(m) || b(m))
    }

    /// Negation
    pub fn not(&self) -> Self {
        let a = self.test.clone();
        Self::new(move |m| !a(m))
    }

    /// Conjunction of all predicates (true when empty)
    pub fn all(predicates: impl IntoIterator<Item = Predicate<M>>) -> Self {
        let tests: Vec<_> = predicates.into_iter().map(|p| p.test).collect();
        Self::new(move |m| tests.iter().all(|t| t(m)))
    }

    /// Disjunction of all predicates (false when empty)
    pub fn any(predicates: impl IntoIterator<Item = Predicate<M>>) -> Self {
        let tests: Vec<_> = predicates.into_iter().map(|p| p.test).collect();
        Self::new(move |m| tests.iter().any(|t| t(m)))
    }
}

impl<M: ?Sized> Clone for Predicate<M> {
    fn clone(&self) -> Self {
        Self {
            test: self.test.clone(),
        }
    }
}

impl<M: ?Sized> fmt::Debug for Predicate<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

impl<M: ?Sized + 'static> std::ops::BitAnd for Predicate<M> {
    type Output = Predicate<M>;

    fn bitand(self, rhs: Self) -> Self::Output {
        Predicate::and(&self, &rhs)
    }
}

impl<M: ?Sized + 'static> std::ops::BitOr for Predicate<M> {
    type Output = Predicate<M>;

    fn bitor(self, rhs: Self) -> Self::Output {
        Predicate::or(&self, &rhs)
    }
}

impl<M: ?Sized + 'static> std::ops::Not for Predicate<M> {
    type Output = Predicate<M>;

    fn not(self) -> Self::Output {
        Predicate::not(&self)
    }
}
