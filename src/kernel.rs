// Cartesian closed kernel: object types, morphisms between them, and a
// big-step evaluator. Morphisms are first-order data so they can be
// compared, printed and replayed; each constructor carries the type
// annotations needed to recover its source and target.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    Unit,
    Bool,
    Nat,
    Prod(Box<Ty>, Box<Ty>),
    Arrow(Box<Ty>, Box<Ty>),
}

impl Ty {
    pub fn prod(left: Ty, right: Ty) -> Ty {
        Ty::Prod(Box::new(left), Box::new(right))
    }
    pub fn arrow(param: Ty, ret: Ty) -> Ty {
        Ty::Arrow(Box::new(param), Box::new(ret))
    }
}

// Compose(f, g) runs f first, then g.
// Curry(f) requires f: C×A -> B and yields C -> (A => B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Morphism {
    Identity(Ty),
    Compose(Box<Morphism>, Box<Morphism>),
    Terminal(Ty),
    Fst(Ty, Ty),
    Snd(Ty, Ty),
    Pair(Box<Morphism>, Box<Morphism>),
    Curry(Box<Morphism>),
    Apply(Ty, Ty),
    // primitive arrows, usable as DSL primitives via lifting
    Tru,
    Fls,
    Zero,
    Succ,
    Pred,
    IsZero,
    // Bool × (A × A) -> A, selecting the first component on true
    Branch(Ty),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    Mismatch { expected: Ty, found: Ty },
    NotAProduct(Ty),
    IllTypedValue { morphism: Morphism, value: Value },
}

impl Morphism {
    /// Validate the morphism and return its (source, target) pair.
    pub fn typecheck(&self) -> Result<(Ty, Ty), KernelError> {
        match self {
            Morphism::Identity(a) => Ok((a.clone(), a.clone())),
            Morphism::Compose(f, g) => {
                let (f_src, f_tgt) = f.typecheck()?;
                let (g_src, g_tgt) = g.typecheck()?;
                if f_tgt == g_src {
                    Ok((f_src, g_tgt))
                } else {
                    Err(KernelError::Mismatch {
                        expected: f_tgt,
                        found: g_src,
                    })
                }
            }
            Morphism::Terminal(a) => Ok((a.clone(), Ty::Unit)),
            Morphism::Fst(a, b) => Ok((Ty::prod(a.clone(), b.clone()), a.clone())),
            Morphism::Snd(a, b) => Ok((Ty::prod(a.clone(), b.clone()), b.clone())),
            Morphism::Pair(f, g) => {
                let (f_src, f_tgt) = f.typecheck()?;
                let (g_src, g_tgt) = g.typecheck()?;
                if f_src == g_src {
                    Ok((f_src, Ty::prod(f_tgt, g_tgt)))
                } else {
                    Err(KernelError::Mismatch {
                        expected: f_src,
                        found: g_src,
                    })
                }
            }
            Morphism::Curry(f) => {
                let (f_src, f_tgt) = f.typecheck()?;
                match f_src {
                    Ty::Prod(ctx, param) => Ok((*ctx, Ty::arrow(*param, f_tgt))),
                    other => Err(KernelError::NotAProduct(other)),
                }
            }
            Morphism::Apply(a, b) => Ok((
                Ty::prod(Ty::arrow(a.clone(), b.clone()), a.clone()),
                b.clone(),
            )),
            Morphism::Tru | Morphism::Fls => Ok((Ty::Unit, Ty::Bool)),
            Morphism::Zero => Ok((Ty::Unit, Ty::Nat)),
            Morphism::Succ | Morphism::Pred => Ok((Ty::Nat, Ty::Nat)),
            Morphism::IsZero => Ok((Ty::Nat, Ty::Bool)),
            Morphism::Branch(a) => Ok((
                Ty::prod(Ty::Bool, Ty::prod(a.clone(), a.clone())),
                a.clone(),
            )),
        }
    }

    /// Sequence `self` before `after`, checking that the types meet.
    pub fn then(self, after: Morphism) -> Result<Morphism, KernelError> {
        let (_, mid) = self.typecheck()?;
        let (after_src, _) = after.typecheck()?;
        if mid == after_src {
            Ok(Morphism::Compose(Box::new(self), Box::new(after)))
        } else {
            Err(KernelError::Mismatch {
                expected: mid,
                found: after_src,
            })
        }
    }

    /// Product introduction: both components must share a source.
    pub fn pair(self, other: Morphism) -> Result<Morphism, KernelError> {
        let (self_src, _) = self.typecheck()?;
        let (other_src, _) = other.typecheck()?;
        if self_src == other_src {
            Ok(Morphism::Pair(Box::new(self), Box::new(other)))
        } else {
            Err(KernelError::Mismatch {
                expected: self_src,
                found: other_src,
            })
        }
    }

    /// Curry a morphism out of a product source.
    pub fn curry(self) -> Result<Morphism, KernelError> {
        let (src, _) = self.typecheck()?;
        if let Ty::Prod(_, _) = src {
            Ok(Morphism::Curry(Box::new(self)))
        } else {
            Err(KernelError::NotAProduct(src))
        }
    }

    pub fn eval(&self, input: Value) -> Result<Value, KernelError> {
        match self {
            Morphism::Identity(_) => Ok(input),
            Morphism::Compose(f, g) => {
                let mid = f.eval(input)?;
                g.eval(mid)
            }
            Morphism::Terminal(_) => Ok(Value::Unit),
            Morphism::Fst(_, _) => match input {
                Value::Pair(left, _) => Ok(*left),
                other => Err(self.bad_value(other)),
            },
            Morphism::Snd(_, _) => match input {
                Value::Pair(_, right) => Ok(*right),
                other => Err(self.bad_value(other)),
            },
            Morphism::Pair(f, g) => {
                let left = f.eval(input.clone())?;
                let right = g.eval(input)?;
                Ok(Value::pair(left, right))
            }
            Morphism::Curry(f) => Ok(Value::Closure {
                body: (**f).clone(),
                env: Box::new(input),
            }),
            Morphism::Apply(_, _) => match input {
                Value::Pair(func, arg) => match *func {
                    Value::Closure { body, env } => body.eval(Value::Pair(env, arg)),
                    other => Err(self.bad_value(other)),
                },
                other => Err(self.bad_value(other)),
            },
            Morphism::Tru => Ok(Value::Bool(true)),
            Morphism::Fls => Ok(Value::Bool(false)),
            Morphism::Zero => Ok(Value::Nat(0)),
            Morphism::Succ => match input {
                Value::Nat(n) => Ok(Value::Nat(n + 1)),
                other => Err(self.bad_value(other)),
            },
            Morphism::Pred => match input {
                Value::Nat(n) => Ok(Value::Nat(n.saturating_sub(1))),
                other => Err(self.bad_value(other)),
            },
            Morphism::IsZero => match input {
                Value::Nat(n) => Ok(Value::Bool(n == 0)),
                other => Err(self.bad_value(other)),
            },
            Morphism::Branch(_) => match input {
                Value::Pair(cond, branches) => match (*cond, *branches) {
                    (Value::Bool(b), Value::Pair(then_v, else_v)) => {
                        Ok(if b { *then_v } else { *else_v })
                    }
                    (cond, branches) => Err(self.bad_value(Value::pair(cond, branches))),
                },
                other => Err(self.bad_value(other)),
            },
        }
    }

    fn bad_value(&self, value: Value) -> KernelError {
        KernelError::IllTypedValue {
            morphism: self.clone(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Unit,
    Bool(bool),
    Nat(u64),
    Pair(Box<Value>, Box<Value>),
    Closure { body: Morphism, env: Box<Value> },
}

impl Value {
    pub fn pair(left: Value, right: Value) -> Value {
        Value::Pair(Box::new(left), Box::new(right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_then_succ_evaluates() {
        let two = Morphism::Zero
            .then(Morphism::Succ)
            .unwrap()
            .then(Morphism::Succ)
            .unwrap();
        assert_eq!(two.eval(Value::Unit).unwrap(), Value::Nat(2));
        assert_eq!(two.typecheck().unwrap(), (Ty::Unit, Ty::Nat));
    }

    #[test]
    fn iszero_cannot_feed_succ() {
        assert_eq!(
            Morphism::IsZero.then(Morphism::Succ).unwrap_err(),
            KernelError::Mismatch {
                expected: Ty::Bool,
                found: Ty::Nat,
            }
        );
    }

    #[test]
    fn curry_and_apply_round_trip() {
        // curry(snd): Unit -> (Nat => Nat) is the identity function on Nat
        let snd = Morphism::Snd(Ty::Unit, Ty::Nat);
        let lifted = snd.curry().unwrap();
        let closure = lifted.eval(Value::Unit).unwrap();
        let apply = Morphism::Apply(Ty::Nat, Ty::Nat);
        let result = apply.eval(Value::pair(closure, Value::Nat(3))).unwrap();
        assert_eq!(result, Value::Nat(3));
    }

    #[test]
    fn branch_selects_on_condition() {
        let branch = Morphism::Branch(Ty::Nat);
        let input = Value::pair(
            Value::Bool(false),
            Value::pair(Value::Nat(1), Value::Nat(2)),
        );
        assert_eq!(branch.eval(input).unwrap(), Value::Nat(2));
    }

    #[test]
    fn curry_requires_product_source() {
        assert_eq!(
            Morphism::Succ.curry().unwrap_err(),
            KernelError::NotAProduct(Ty::Nat)
        );
    }
}
