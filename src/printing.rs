use std::fmt::Display;

use crate::{
    dsl::TermError,
    elaborator::ElabError,
    kernel::{KernelError, Morphism, Ty, Value},
    resolver::ResolveError,
    surface::{TermAST, TypeAST},
};

impl Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ty::Unit => write!(f, "Unit"),
            Ty::Bool => write!(f, "Bool"),
            Ty::Nat => write!(f, "Nat"),
            Ty::Prod(left, right) => write!(f, "({} * {})", left, right),
            Ty::Arrow(param, ret) => write!(f, "({} -> {})", param, ret),
        }
    }
}

impl Display for Morphism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Morphism::Identity(_) => write!(f, "id"),
            Morphism::Compose(first, second) => write!(f, "({} ; {})", first, second),
            Morphism::Terminal(_) => write!(f, "!"),
            Morphism::Fst(_, _) => write!(f, "fst"),
            Morphism::Snd(_, _) => write!(f, "snd"),
            Morphism::Pair(left, right) => write!(f, "<{}, {}>", left, right),
            Morphism::Curry(inner) => write!(f, "curry({})", inner),
            Morphism::Apply(_, _) => write!(f, "apply"),
            Morphism::Tru => write!(f, "true"),
            Morphism::Fls => write!(f, "false"),
            Morphism::Zero => write!(f, "zero"),
            Morphism::Succ => write!(f, "succ"),
            Morphism::Pred => write!(f, "pred"),
            Morphism::IsZero => write!(f, "iszero"),
            Morphism::Branch(_) => write!(f, "branch"),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nat(n) => write!(f, "{}", n),
            Value::Pair(left, right) => write!(f, "({}, {})", left, right),
            Value::Closure { .. } => write!(f, "<closure>"),
        }
    }
}

impl Display for TypeAST {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeAST::UnitAST => write!(f, "Unit"),
            TypeAST::BoolAST => write!(f, "Bool"),
            TypeAST::NatAST => write!(f, "Nat"),
            TypeAST::Arrow(param, ret) => write!(f, "({} -> {})", param, ret),
            TypeAST::Prod(left, right) => write!(f, "({} * {})", left, right),
        }
    }
}

impl Display for TermAST {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TermAST::TrueAST => write!(f, "True"),
            TermAST::FalseAST => write!(f, "False"),
            TermAST::If {
                cond,
                then_branch,
                else_branch,
            } => {
                write!(f, "if {} then {} else {}", cond, then_branch, else_branch)
            }
            TermAST::Nat(n) => write!(f, "{}", n),
            TermAST::Succ(term) => write!(f, "Succ {}", term),
            TermAST::Pred(term) => write!(f, "Pred {}", term),
            TermAST::IsZero(term) => write!(f, "IsZero {}", term),
            TermAST::Identifier(name) => write!(f, "{}", name),
            TermAST::Abs {
                param,
                param_type,
                body,
            } => {
                write!(f, "fun ({}: {}) => {}", param, param_type, body)
            }
            TermAST::App { func, arg } => write!(f, "({} {})", func, arg),
            TermAST::Pair(left, right) => write!(f, "({}, {})", left, right),
            TermAST::First(term) => write!(f, "First {}", term),
            TermAST::Second(term) => write!(f, "Second {}", term),
        }
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Mismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            KernelError::NotAProduct(ty) => write!(f, "{} is not a product", ty),
            KernelError::IllTypedValue { morphism, value } => {
                write!(f, "{} cannot consume the value {}", morphism, value)
            }
        }
    }
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no derivable adapter from context {} to context {}",
            self.use_site, self.definition_site
        )
    }
}

impl Display for TermError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TermError::Kernel(err) => write!(f, "{}", err),
            TermError::Resolve(err) => write!(f, "{}", err),
            TermError::ContextMismatch { left, right } => {
                write!(f, "terms live in different contexts: {} and {}", left, right)
            }
            TermError::NotAFunction(ty) => write!(f, "{} is not a function type", ty),
            TermError::NotAPair(ty) => write!(f, "{} is not a pair type", ty),
            TermError::ArgumentMismatch { expected, found } => {
                write!(f, "argument mismatch: expected {}, found {}", expected, found)
            }
            TermError::BranchMismatch { then_ty, else_ty } => {
                write!(
                    f,
                    "branches disagree: then is {}, else is {}",
                    then_ty, else_ty
                )
            }
            TermError::NotABool(ty) => write!(f, "condition must be Bool, found {}", ty),
            TermError::NotAPoint(ty) => {
                write!(f, "constants must start from Unit, found {}", ty)
            }
            TermError::OpenTerm(ty) => {
                write!(f, "term still depends on bound values of context {}", ty)
            }
        }
    }
}

impl Display for ElabError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElabError::UnboundIdentifier(name) => write!(f, "unbound identifier {}", name),
            ElabError::CondMismatch { found } => {
                write!(f, "if condition must be Bool, found {}", found)
            }
            ElabError::OperandMismatch { expected, found } => {
                write!(f, "operand mismatch: expected {}, found {}", expected, found)
            }
            ElabError::Term(err) => write!(f, "{}", err),
        }
    }
}
