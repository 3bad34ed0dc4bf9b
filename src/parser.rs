use crate::surface::{TermAST, TypeAST};
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\n\f]+")]
pub enum Token {
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    // type level
    #[token("->")]
    Arrow,
    #[token("*")]
    Star,
    #[token("Nat")]
    NatType,
    #[token("Bool")]
    BoolType,
    #[token("Unit")]
    UnitType,
    // term level
    #[regex(r"[a-z_][a-zA-Z0-9_]*")]
    Identifier,
    #[token("fun")]
    Fun,
    #[token("=>")]
    DoubleArrow,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("if")]
    If,
    #[regex(r"[0-9]+")]
    Number,
    #[token("Succ")]
    Succ,
    #[token("Pred")]
    Pred,
    #[token("IsZero")]
    IsZero,
    #[token("First")]
    First,
    #[token("Second")]
    Second,
}

#[derive(Debug, Clone)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub slice: &'a str,
    pub span: std::ops::Range<usize>,
}

pub fn lex<'a>(input: &'a str) -> Result<Vec<SpannedToken<'a>>, String> {
    let mut lexer = Token::lexer(input);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        let token =
            token.map_err(|_| format!("Unexpected token at position {}", lexer.span().start))?;
        let span = lexer.span();
        let slice = &input[span.clone()];
        tokens.push(SpannedToken { token, slice, span });
    }

    Ok(tokens)
}

#[derive(Debug)]
pub struct Parser<'a> {
    tokens: &'a [SpannedToken<'a>],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [SpannedToken<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn next(&mut self) -> Option<&SpannedToken<'a>> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn bump_if(&mut self, expected: Token) -> bool {
        if let Some(token) = self.peek()
            && *token == expected
        {
            self.next();
            return true;
        }
        false
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        if let Some(token) = self.next() {
            if token.token == expected {
                Ok(())
            } else {
                Err(format!(
                    "Expected {:?}, found {:?} at position {}",
                    expected, token.token, token.span.start
                ))
            }
        } else {
            Err(format!("Expected {:?}, but reached end of input", expected))
        }
    }

    fn expect_ident(&mut self) -> Result<String, String> {
        if let Some(token) = self.next() {
            if let Token::Identifier = token.token {
                Ok(token.slice.to_string())
            } else {
                Err(format!(
                    "Expected identifier, found {:?} at position {}",
                    token.token, token.span.start
                ))
            }
        } else {
            Err("Expected identifier, but reached end of input".to_string())
        }
    }

    // <type> := <prod-type> ("->" <type>)?
    // A -> B -> C is parsed as A -> (B -> C)
    pub fn parse_type(&mut self) -> Result<TypeAST, String> {
        let left = self.parse_prod_type()?;
        if self.bump_if(Token::Arrow) {
            let right = self.parse_type()?;
            Ok(TypeAST::Arrow(Box::new(left), Box::new(right)))
        } else {
            Ok(left)
        }
    }

    // <prod-type> := <atom-type> ("*" <atom-type>)*
    // A * B * C is parsed as (A * B) * C
    fn parse_prod_type(&mut self) -> Result<TypeAST, String> {
        let mut ty = self.parse_atom_type()?;
        while self.bump_if(Token::Star) {
            let right = self.parse_atom_type()?;
            ty = TypeAST::Prod(Box::new(ty), Box::new(right));
        }
        Ok(ty)
    }

    fn parse_atom_type(&mut self) -> Result<TypeAST, String> {
        match self.peek() {
            Some(Token::NatType) => {
                self.next();
                Ok(TypeAST::NatAST)
            }
            Some(Token::BoolType) => {
                self.next();
                Ok(TypeAST::BoolAST)
            }
            Some(Token::UnitType) => {
                self.next();
                Ok(TypeAST::UnitAST)
            }
            Some(Token::LParen) => {
                self.next(); // consume '('
                let inner = self.parse_type()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            _ => Err(format!(
                "Expected type at position {}",
                self.tokens.get(self.pos).map(|t| t.span.start).unwrap_or(0)
            )),
        }
    }

    pub fn parse_atom(&mut self) -> Result<TermAST, String> {
        match self.peek() {
            Some(Token::True) => {
                self.next();
                Ok(TermAST::TrueAST)
            }
            Some(Token::False) => {
                self.next();
                Ok(TermAST::FalseAST)
            }
            Some(Token::If) => self.parse_if(),
            Some(Token::Number) => Ok(TermAST::Nat(self.parse_number()?)),
            Some(Token::Fun) => self.parse_function(),
            Some(Token::Succ) => {
                self.next();
                Ok(TermAST::Succ(Box::new(self.parse_atom()?)))
            }
            Some(Token::Pred) => {
                self.next();
                Ok(TermAST::Pred(Box::new(self.parse_atom()?)))
            }
            Some(Token::IsZero) => {
                self.next();
                Ok(TermAST::IsZero(Box::new(self.parse_atom()?)))
            }
            Some(Token::First) => {
                self.next();
                Ok(TermAST::First(Box::new(self.parse_atom()?)))
            }
            Some(Token::Second) => {
                self.next();
                Ok(TermAST::Second(Box::new(self.parse_atom()?)))
            }
            Some(Token::Identifier) => Ok(TermAST::Identifier(self.expect_ident()?)),
            Some(Token::LParen) => self.parse_parenthesized(),
            _ => Err(format!(
                "Unexpected token at position {}",
                self.tokens.get(self.pos).map(|t| t.span.start).unwrap_or(0)
            )),
        }
    }

    pub fn parse_exp(&mut self) -> Result<TermAST, String> {
        let mut exp = self.parse_atom()?;
        loop {
            let save_pos = self.pos;
            if let Ok(arg) = self.parse_atom() {
                exp = TermAST::App {
                    func: Box::new(exp),
                    arg: Box::new(arg),
                };
            } else {
                self.pos = save_pos; // backtrack
                break;
            }
        }
        Ok(exp)
    }

    fn parse_if(&mut self) -> Result<TermAST, String> {
        self.next(); // consume 'if'
        let cond = self.parse_exp()?;
        self.expect(Token::Then)?;
        let then_branch = self.parse_exp()?;
        self.expect(Token::Else)?;
        let else_branch = self.parse_exp()?;
        Ok(TermAST::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn parse_number(&mut self) -> Result<u64, String> {
        if let Some(token) = self.next() {
            if let Token::Number = token.token {
                let num = token.slice.parse::<u64>().map_err(|e| e.to_string())?;
                Ok(num)
            } else {
                Err("Expected a number".to_string())
            }
        } else {
            Err("Unexpected end of input".to_string())
        }
    }

    // "fun" <ident> ":" <type> "=>" <exp>
    fn parse_function(&mut self) -> Result<TermAST, String> {
        self.next(); // consume 'fun'
        let param = self.expect_ident()?;
        self.expect(Token::Colon)?;
        let param_type = self.parse_type()?;
        self.expect(Token::DoubleArrow)?;
        let body = self.parse_exp()?;

        Ok(TermAST::Abs {
            param,
            param_type,
            body: Box::new(body),
        })
    }

    // "(" <exp> ")" | "(" <exp> "," <exp> ")"
    fn parse_parenthesized(&mut self) -> Result<TermAST, String> {
        self.next(); // consume '('
        let exp = self.parse_exp()?;
        if self.bump_if(Token::Comma) {
            let second = self.parse_exp()?;
            self.expect(Token::RParen)?;
            return Ok(TermAST::Pair(Box::new(exp), Box::new(second)));
        }
        self.expect(Token::RParen)?;
        Ok(exp)
    }
}

pub fn parse(input: &str) -> Result<TermAST, String> {
    let tokens = lex(input)?;
    let mut parser = Parser::new(&tokens);
    let exp = parser.parse_exp()?;
    if let Some(token) = parser.peek() {
        return Err(format!(
            "Unexpected {:?} after expression at position {}",
            token,
            parser
                .tokens
                .get(parser.pos)
                .map(|t| t.span.start)
                .unwrap_or(0)
        ));
    }
    Ok(exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_parse_test() {
        fn print_and_unwrap(input: &str) {
            let tokens = lex(input).unwrap();
            let mut parser = Parser::new(&tokens);
            let ty = parser.parse_type().unwrap();
            println!("{:?}", ty);
        }
        print_and_unwrap("Nat -> Bool -> Nat");
        print_and_unwrap("(Nat -> Bool) -> Nat");
        print_and_unwrap("Nat * Bool -> Nat");
        print_and_unwrap("Nat -> (Bool -> Nat)");
    }

    #[test]
    fn application_is_left_associative() {
        let ast = parse("f x y").unwrap();
        let TermAST::App { func, .. } = ast else {
            panic!("expected application");
        };
        assert!(matches!(*func, TermAST::App { .. }));
    }

    #[test]
    fn nested_functions_parse() {
        let ast = parse("fun x: Nat => fun y: Bool => x").unwrap();
        let TermAST::Abs { param, body, .. } = ast else {
            panic!("expected function");
        };
        assert_eq!(param, "x");
        assert!(matches!(*body, TermAST::Abs { .. }));
    }

    #[test]
    fn pairs_and_projections_parse() {
        let ast = parse("First (1, True)").unwrap();
        let TermAST::First(inner) = ast else {
            panic!("expected First");
        };
        assert!(matches!(*inner, TermAST::Pair(_, _)));
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        assert!(parse("x )").is_err());
    }
}
