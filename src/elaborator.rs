use crate::dsl::{Binding, Term, TermError};
use crate::kernel::{Morphism, Ty};
use crate::resolver::Ctx;
use crate::surface::{TermAST, TypeAST};

// Compiles surface expressions into categorical terms. The scope stack
// maps each name to the Binding its fun introduced; a reference deep
// inside nested binders just asks that Binding for itself at the current
// context, and the resolver derives the projection chain.

#[derive(Debug, Clone, PartialEq)]
pub enum ElabError {
    UnboundIdentifier(String),
    CondMismatch { found: Ty },
    OperandMismatch { expected: Ty, found: Ty },
    Term(TermError),
}

impl From<TermError> for ElabError {
    fn from(err: TermError) -> Self {
        ElabError::Term(err)
    }
}

pub struct Elaborator {
    scope: Vec<(String, Binding)>,
}

impl Elaborator {
    pub fn new() -> Self {
        Elaborator { scope: Vec::new() }
    }

    pub fn elab_type(&self, ty: &TypeAST) -> Ty {
        match ty {
            TypeAST::UnitAST => Ty::Unit,
            TypeAST::BoolAST => Ty::Bool,
            TypeAST::NatAST => Ty::Nat,
            TypeAST::Arrow(param, ret) => {
                Ty::arrow(self.elab_type(param), self.elab_type(ret))
            }
            TypeAST::Prod(left, right) => {
                Ty::prod(self.elab_type(left), self.elab_type(right))
            }
        }
    }

    pub fn elab_expr(&mut self, ctx: &Ctx, expr: &TermAST) -> Result<Term, ElabError> {
        match expr {
            TermAST::TrueAST => Ok(Term::constant(ctx, Morphism::Tru)?),
            TermAST::FalseAST => Ok(Term::constant(ctx, Morphism::Fls)?),
            TermAST::Nat(n) => {
                let mut point = Morphism::Zero;
                for _ in 0..*n {
                    point = Morphism::Compose(Box::new(point), Box::new(Morphism::Succ));
                }
                Ok(Term::constant(ctx, point)?)
            }
            TermAST::Succ(arg) => self.elab_primitive(ctx, Morphism::Succ, arg),
            TermAST::Pred(arg) => self.elab_primitive(ctx, Morphism::Pred, arg),
            TermAST::IsZero(arg) => self.elab_primitive(ctx, Morphism::IsZero, arg),
            TermAST::Identifier(name) => {
                // innermost binding of that name wins
                let binding = self
                    .scope
                    .iter()
                    .rev()
                    .find(|(bound_name, _)| bound_name == name)
                    .map(|(_, binding)| binding.clone())
                    .ok_or_else(|| ElabError::UnboundIdentifier(name.clone()))?;
                Ok(binding.at(ctx)?)
            }
            TermAST::Abs {
                param,
                param_type,
                body,
            } => {
                let param_ty = self.elab_type(param_type);
                let result = Term::lam(ctx, param_ty, |binding, inner| {
                    self.scope.push((param.clone(), binding));
                    let body_term = self.elab_expr(inner, body);
                    self.scope.pop();
                    body_term
                })?;
                Ok(result)
            }
            TermAST::App { func, arg } => {
                let func_term = self.elab_expr(ctx, func)?;
                let arg_term = self.elab_expr(ctx, arg)?;
                Ok(func_term.apply(arg_term)?)
            }
            TermAST::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond_term = self.elab_expr(ctx, cond)?;
                if cond_term.ty() != &Ty::Bool {
                    return Err(ElabError::CondMismatch {
                        found: cond_term.ty().clone(),
                    });
                }
                let then_term = self.elab_expr(ctx, then_branch)?;
                let else_term = self.elab_expr(ctx, else_branch)?;
                Ok(Term::branch(cond_term, then_term, else_term)?)
            }
            TermAST::Pair(left, right) => {
                let left_term = self.elab_expr(ctx, left)?;
                let right_term = self.elab_expr(ctx, right)?;
                Ok(left_term.pair(right_term)?)
            }
            TermAST::First(arg) => Ok(self.elab_expr(ctx, arg)?.fst()?),
            TermAST::Second(arg) => Ok(self.elab_expr(ctx, arg)?.snd()?),
        }
    }

    fn elab_primitive(
        &mut self,
        ctx: &Ctx,
        raw: Morphism,
        arg: &TermAST,
    ) -> Result<Term, ElabError> {
        let arg_term = self.elab_expr(ctx, arg)?;
        if arg_term.ty() != &Ty::Nat {
            return Err(ElabError::OperandMismatch {
                expected: Ty::Nat,
                found: arg_term.ty().clone(),
            });
        }
        let lifted = Term::lift(ctx, raw)?;
        Ok(lifted.apply(arg_term)?)
    }
}

impl Default for Elaborator {
    fn default() -> Self {
        Elaborator::new()
    }
}

/// Compile a surface expression at a fresh root context.
pub fn compile(expr: &TermAST) -> Result<Term, ElabError> {
    let root = Ctx::root();
    Elaborator::new().elab_expr(&root, expr)
}
