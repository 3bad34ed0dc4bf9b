#[derive(Debug, Clone)]
pub enum TypeAST {
    UnitAST,
    BoolAST,
    NatAST,
    Arrow(Box<TypeAST>, Box<TypeAST>),
    Prod(Box<TypeAST>, Box<TypeAST>),
}

#[derive(Debug, Clone)]
pub enum TermAST {
    TrueAST,
    FalseAST,
    If {
        cond: Box<TermAST>,
        then_branch: Box<TermAST>,
        else_branch: Box<TermAST>,
    },
    Nat(u64),
    Succ(Box<TermAST>),
    Pred(Box<TermAST>),
    IsZero(Box<TermAST>),
    // a name bound by an enclosing fun
    Identifier(String),
    Abs {
        param: String,
        param_type: TypeAST,
        body: Box<TermAST>,
    },
    App {
        func: Box<TermAST>,
        arg: Box<TermAST>,
    },
    Pair(Box<TermAST>, Box<TermAST>),
    First(Box<TermAST>),
    Second(Box<TermAST>),
}
