use std::rc::Rc;

use crate::kernel::{Morphism, Ty};

// A context records the values bound by enclosing lambdas as a right-nested
// chain: the root binds nothing, each Extend pairs the parent with one more
// bound type. Context identity is node identity, so two chains built
// separately never unify, even if structurally equal.
#[derive(Debug, Clone)]
pub struct Ctx(Rc<CtxNode>);

#[derive(Debug)]
enum CtxNode {
    Root,
    Extend { parent: Ctx, bound: Ty },
}

impl PartialEq for Ctx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    pub use_site: Ty,
    pub definition_site: Ty,
}

impl Ctx {
    pub fn root() -> Self {
        Ctx(Rc::new(CtxNode::Root))
    }

    pub fn extend(&self, bound: Ty) -> Self {
        Ctx(Rc::new(CtxNode::Extend {
            parent: self.clone(),
            bound,
        }))
    }

    pub fn parent(&self) -> Option<&Ctx> {
        match &*self.0 {
            CtxNode::Root => None,
            CtxNode::Extend { parent, .. } => Some(parent),
        }
    }

    pub fn bound(&self) -> Option<&Ty> {
        match &*self.0 {
            CtxNode::Root => None,
            CtxNode::Extend { bound, .. } => Some(bound),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(&*self.0, CtxNode::Root)
    }

    pub fn depth(&self) -> usize {
        match &*self.0 {
            CtxNode::Root => 0,
            CtxNode::Extend { parent, .. } => parent.depth() + 1,
        }
    }

    /// The object this context denotes: Unit for the root, a right-nested
    /// product for each binding on top of it.
    pub fn ty(&self) -> Ty {
        match &*self.0 {
            CtxNode::Root => Ty::Unit,
            CtxNode::Extend { parent, bound } => Ty::prod(parent.ty(), bound.clone()),
        }
    }

    /// Derive the projection from this context down to `outer`.
    ///
    /// Exactly one case applies at each step: either the two contexts are
    /// the same node (identity), or this one discards its newest binding
    /// and recurses. A root that is not `outer` itself has nowhere left to
    /// project, so resolution fails there. The derivation is pure and
    /// rebuilt at every call, never cached.
    pub fn resolve_to(&self, outer: &Ctx) -> Result<Morphism, ResolveError> {
        self.resolve_inner(outer).ok_or_else(|| ResolveError {
            use_site: self.ty(),
            definition_site: outer.ty(),
        })
    }

    fn resolve_inner(&self, outer: &Ctx) -> Option<Morphism> {
        if self == outer {
            return Some(Morphism::Identity(self.ty()));
        }
        match &*self.0 {
            CtxNode::Extend { parent, bound } => {
                let drop_newest = Morphism::Fst(parent.ty(), bound.clone());
                let rest = parent.resolve_inner(outer)?;
                Some(Morphism::Compose(Box::new(drop_newest), Box::new(rest)))
            }
            CtxNode::Root => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Value;

    #[test]
    fn resolving_a_context_to_itself_is_identity() {
        let ctx = Ctx::root().extend(Ty::Nat).extend(Ty::Bool);
        assert_eq!(
            ctx.resolve_to(&ctx).unwrap(),
            Morphism::Identity(ctx.ty())
        );
    }

    #[test]
    fn two_extensions_resolve_to_two_projections() {
        let outer = Ctx::root();
        let mid = outer.extend(Ty::Nat);
        let inner = mid.extend(Ty::Bool);
        assert_eq!(inner.depth(), 2);
        assert_eq!(inner.bound(), Some(&Ty::Bool));

        let expected = Morphism::Compose(
            Box::new(Morphism::Fst(mid.ty(), Ty::Bool)),
            Box::new(Morphism::Compose(
                Box::new(Morphism::Fst(outer.ty(), Ty::Nat)),
                Box::new(Morphism::Identity(outer.ty())),
            )),
        );
        assert_eq!(inner.resolve_to(&outer).unwrap(), expected);
    }

    #[test]
    fn derived_projection_discards_the_newer_bindings() {
        let outer = Ctx::root();
        let inner = outer.extend(Ty::Nat).extend(Ty::Bool);
        let adapter = inner.resolve_to(&outer).unwrap();

        let env = Value::pair(
            Value::pair(Value::Unit, Value::Nat(7)),
            Value::Bool(true),
        );
        assert_eq!(adapter.eval(env).unwrap(), Value::Unit);
    }

    #[test]
    fn resolution_is_referentially_transparent() {
        let outer = Ctx::root().extend(Ty::Nat);
        let inner = outer.extend(Ty::Bool).extend(Ty::Nat);
        assert_eq!(
            inner.resolve_to(&outer).unwrap(),
            inner.resolve_to(&outer).unwrap()
        );
    }

    #[test]
    fn sibling_roots_do_not_resolve() {
        // structurally equal chains, but grown from different roots
        let first = Ctx::root().extend(Ty::Nat);
        let second = Ctx::root().extend(Ty::Nat);
        let err = second.extend(Ty::Bool).resolve_to(&first).unwrap_err();
        assert_eq!(err.definition_site, first.ty());
    }

    #[test]
    fn extending_never_unifies_with_an_unrelated_chain() {
        let ctx = Ctx::root().extend(Ty::Nat);
        let unrelated = Ctx::root().extend(Ty::Nat);
        assert!(ctx.resolve_to(&unrelated).is_err());
        assert!(unrelated.resolve_to(&ctx).is_err());
    }
}
