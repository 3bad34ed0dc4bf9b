use crate::kernel::{KernelError, Morphism, Ty, Value};
use crate::resolver::{Ctx, ResolveError};

// Term construction on top of the kernel and the resolver. A Term is a
// morphism out of the object its context denotes; every constructor
// checks types up front, so an ill-formed expression is rejected when it
// is written down, not when it runs.

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    ctx: Ctx,
    ty: Ty,
    morphism: Morphism,
}

/// A lambda-bound name. It remembers the context its binder introduced
/// and can be re-stated, via `at`, in any context extending that one.
/// Each use site triggers its own independent resolution.
#[derive(Debug, Clone)]
pub struct Binding {
    intro: Ctx,
    ty: Ty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermError {
    Kernel(KernelError),
    Resolve(ResolveError),
    // the two sides of an operation live in different context nodes
    ContextMismatch { left: Ty, right: Ty },
    NotAFunction(Ty),
    NotAPair(Ty),
    ArgumentMismatch { expected: Ty, found: Ty },
    BranchMismatch { then_ty: Ty, else_ty: Ty },
    NotABool(Ty),
    NotAPoint(Ty),
    OpenTerm(Ty),
}

impl From<KernelError> for TermError {
    fn from(err: KernelError) -> Self {
        TermError::Kernel(err)
    }
}

impl From<ResolveError> for TermError {
    fn from(err: ResolveError) -> Self {
        TermError::Resolve(err)
    }
}

impl Binding {
    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    /// The bound name as a term at `use_site`: project the use site down
    /// to the introduction context, then select the newest binding.
    pub fn at(&self, use_site: &Ctx) -> Result<Term, TermError> {
        let adapter = use_site.resolve_to(&self.intro)?;
        let parent_ty = match self.intro.parent() {
            Some(parent) => parent.ty(),
            // a Binding is only ever created by extending a context
            None => Ty::Unit,
        };
        let select = Morphism::Snd(parent_ty, self.ty.clone());
        Ok(Term {
            ctx: use_site.clone(),
            ty: self.ty.clone(),
            morphism: Morphism::Compose(Box::new(adapter), Box::new(select)),
        })
    }
}

impl Term {
    pub fn ctx(&self) -> &Ctx {
        &self.ctx
    }

    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    pub fn morphism(&self) -> &Morphism {
        &self.morphism
    }

    /// Introduce a lambda. The body builder receives the bound name and
    /// the extended context, and must produce a term in that context.
    pub fn lam<E, F>(ctx: &Ctx, param: Ty, body: F) -> Result<Term, E>
    where
        E: From<TermError>,
        F: FnOnce(Binding, &Ctx) -> Result<Term, E>,
    {
        let inner = ctx.extend(param.clone());
        let bound = Binding {
            intro: inner.clone(),
            ty: param.clone(),
        };
        let body_term = body(bound, &inner)?;
        if body_term.ctx != inner {
            return Err(TermError::ContextMismatch {
                left: inner.ty(),
                right: body_term.ctx.ty(),
            }
            .into());
        }
        Ok(Term {
            ctx: ctx.clone(),
            ty: Ty::arrow(param, body_term.ty),
            morphism: Morphism::Curry(Box::new(body_term.morphism)),
        })
    }

    /// Apply a function term to an argument term in the same context.
    pub fn apply(self, arg: Term) -> Result<Term, TermError> {
        if self.ctx != arg.ctx {
            return Err(TermError::ContextMismatch {
                left: self.ctx.ty(),
                right: arg.ctx.ty(),
            });
        }
        let (param, ret) = match self.ty {
            Ty::Arrow(param, ret) => (param, ret),
            other => return Err(TermError::NotAFunction(other)),
        };
        if *param != arg.ty {
            return Err(TermError::ArgumentMismatch {
                expected: *param,
                found: arg.ty,
            });
        }
        let paired = self.morphism.pair(arg.morphism)?;
        let morphism = paired.then(Morphism::Apply(*param, (*ret).clone()))?;
        Ok(Term {
            ctx: self.ctx,
            ty: *ret,
            morphism,
        })
    }

    pub fn pair(self, other: Term) -> Result<Term, TermError> {
        if self.ctx != other.ctx {
            return Err(TermError::ContextMismatch {
                left: self.ctx.ty(),
                right: other.ctx.ty(),
            });
        }
        let morphism = self.morphism.pair(other.morphism)?;
        Ok(Term {
            ctx: self.ctx,
            ty: Ty::prod(self.ty, other.ty),
            morphism,
        })
    }

    pub fn fst(self) -> Result<Term, TermError> {
        let (left, right) = match self.ty {
            Ty::Prod(left, right) => (left, right),
            other => return Err(TermError::NotAPair(other)),
        };
        let morphism = self
            .morphism
            .then(Morphism::Fst((*left).clone(), *right))?;
        Ok(Term {
            ctx: self.ctx,
            ty: *left,
            morphism,
        })
    }

    pub fn snd(self) -> Result<Term, TermError> {
        let (left, right) = match self.ty {
            Ty::Prod(left, right) => (left, right),
            other => return Err(TermError::NotAPair(other)),
        };
        let morphism = self
            .morphism
            .then(Morphism::Snd(*left, (*right).clone()))?;
        Ok(Term {
            ctx: self.ctx,
            ty: *right,
            morphism,
        })
    }

    /// Lift an arbitrary kernel morphism into a function-valued term, so
    /// existing categorical structure can be reused as a DSL primitive.
    pub fn lift(ctx: &Ctx, raw: Morphism) -> Result<Term, TermError> {
        let (src, tgt) = raw.typecheck()?;
        let discard_ctx = Morphism::Snd(ctx.ty(), src.clone());
        let body = discard_ctx.then(raw)?;
        Ok(Term {
            ctx: ctx.clone(),
            ty: Ty::arrow(src, tgt),
            morphism: Morphism::Curry(Box::new(body)),
        })
    }

    /// A point (a morphism out of Unit) as a term in any context.
    pub fn constant(ctx: &Ctx, point: Morphism) -> Result<Term, TermError> {
        let (src, tgt) = point.typecheck()?;
        if src != Ty::Unit {
            return Err(TermError::NotAPoint(src));
        }
        let morphism = Morphism::Terminal(ctx.ty()).then(point)?;
        Ok(Term {
            ctx: ctx.clone(),
            ty: tgt,
            morphism,
        })
    }

    /// Conditional: branches must agree in type, the condition must be a Bool.
    pub fn branch(cond: Term, then_t: Term, else_t: Term) -> Result<Term, TermError> {
        if cond.ctx != then_t.ctx || cond.ctx != else_t.ctx {
            return Err(TermError::ContextMismatch {
                left: then_t.ctx.ty(),
                right: else_t.ctx.ty(),
            });
        }
        if cond.ty != Ty::Bool {
            return Err(TermError::NotABool(cond.ty));
        }
        if then_t.ty != else_t.ty {
            return Err(TermError::BranchMismatch {
                then_ty: then_t.ty,
                else_ty: else_t.ty,
            });
        }
        let ty = then_t.ty.clone();
        let branches = then_t.morphism.pair(else_t.morphism)?;
        let morphism = cond
            .morphism
            .pair(branches)?
            .then(Morphism::Branch(ty.clone()))?;
        Ok(Term {
            ctx: cond.ctx,
            ty,
            morphism,
        })
    }

    /// Evaluate a term whose context is a root (nothing bound yet).
    pub fn run_closed(&self) -> Result<Value, TermError> {
        if !self.ctx.is_root() {
            return Err(TermError::OpenTerm(self.ctx.ty()));
        }
        Ok(self.morphism.eval(Value::Unit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // fun x: Nat => fun y: Bool => x, with x resolved through y's binder
    #[test]
    fn outer_binding_is_visible_under_a_nested_binder() {
        let root = Ctx::root();
        let constant = Term::lam::<TermError, _>(&root, Ty::Nat, |x, outer| {
            assert_eq!(x.ty(), &Ty::Nat);
            Term::lam(outer, Ty::Bool, |_y, inner| x.at(inner))
        })
        .unwrap();

        assert!(constant.ctx().is_root());
        assert_eq!(
            constant.ty(),
            &Ty::arrow(Ty::Nat, Ty::arrow(Ty::Bool, Ty::Nat))
        );

        let three = Term::constant(&root, nat(3)).unwrap();
        let tru = Term::constant(&root, Morphism::Tru).unwrap();
        let applied = constant.apply(three).unwrap().apply(tru).unwrap();
        assert_eq!(applied.run_closed().unwrap(), Value::Nat(3));
    }

    #[test]
    fn each_use_site_resolves_independently() {
        // fun x: Nat => (x, fun y: Bool => x): the two x's get different adapters
        let root = Ctx::root();
        let term = Term::lam::<TermError, _>(&root, Ty::Nat, |x, outer| {
            let shallow = x.at(outer)?;
            let deep = Term::lam(outer, Ty::Bool, |_y, inner| x.at(inner))?;
            shallow.pair(deep)
        })
        .unwrap();
        assert_eq!(
            term.ty(),
            &Ty::arrow(
                Ty::Nat,
                Ty::prod(Ty::Nat, Ty::arrow(Ty::Bool, Ty::Nat))
            )
        );
    }

    #[test]
    fn binding_from_a_foreign_root_is_rejected() {
        let root = Ctx::root();
        let mut escaped: Option<Binding> = None;
        let _ = Term::lam::<TermError, _>(&root, Ty::Nat, |x, inner| {
            escaped = Some(x.clone());
            x.at(inner)
        })
        .unwrap();

        let other = Ctx::root().extend(Ty::Bool);
        let err = escaped.unwrap().at(&other).unwrap_err();
        assert!(matches!(err, TermError::Resolve(_)));
    }

    #[test]
    fn application_checks_argument_type() {
        let root = Ctx::root();
        let is_zero = Term::lift(&root, Morphism::IsZero).unwrap();
        let tru = Term::constant(&root, Morphism::Tru).unwrap();
        assert_eq!(
            is_zero.apply(tru).unwrap_err(),
            TermError::ArgumentMismatch {
                expected: Ty::Nat,
                found: Ty::Bool,
            }
        );
    }

    #[test]
    fn lifted_primitives_behave_like_functions() {
        let root = Ctx::root();
        let succ = Term::lift(&root, Morphism::Succ).unwrap();
        let two = Term::constant(&root, nat(2)).unwrap();
        let three = succ.apply(two).unwrap();
        assert_eq!(three.run_closed().unwrap(), Value::Nat(3));
    }

    #[test]
    fn terms_under_a_binder_are_not_closed() {
        let root = Ctx::root();
        let mut inner_term: Option<Term> = None;
        let _ = Term::lam::<TermError, _>(&root, Ty::Nat, |x, inner| {
            let t = x.at(inner)?;
            inner_term = Some(t.clone());
            Ok(t)
        })
        .unwrap();
        assert!(matches!(
            inner_term.unwrap().run_closed().unwrap_err(),
            TermError::OpenTerm(_)
        ));
    }

    fn nat(n: u64) -> Morphism {
        let mut m = Morphism::Zero;
        for _ in 0..n {
            m = Morphism::Compose(Box::new(m), Box::new(Morphism::Succ));
        }
        m
    }
}
