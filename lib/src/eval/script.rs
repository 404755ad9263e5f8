//! Sandboxed interpreter for bookmark code bodies.
//!
//! The language is deliberately small: `;`-separated statements, `echo`
//! (or `print`) writing expressions to the capture sink, and `$name = expr`
//! assignments. Expressions cover string literals (single- or double-quoted
//! with escapes), integer literals, variables, `.` concatenation, `+`/`-`
//! integer arithmetic and parentheses. There are no loops and no host
//! access, so every program terminates and touches nothing outside its own
//! output buffer.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use super::{CodeEvaluator, EvalError};

pub struct ScriptEvaluator;

impl ScriptEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScriptEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeEvaluator for ScriptEvaluator {
    fn name(&self) -> &'static str {
        "script"
    }

    fn execute(&self, source: &str) -> Result<String, EvalError> {
        let tokens = lex(source)?;
        let program = Parser::new(&tokens).parse_program()?;
        run(&program)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Echo,
    Print,
    Var(String),
    Str(String),
    Int(i64),
    Assign,
    Semi,
    Comma,
    Dot,
    Plus,
    Minus,
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    line: usize,
}

fn parse_err(line: usize, message: impl Into<String>) -> EvalError {
    EvalError::Parse {
        line,
        message: message.into(),
    }
}

fn lex(source: &str) -> Result<Vec<Spanned>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1usize;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => skip_line_comment(&mut chars, &mut line),
            '/' => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    skip_line_comment(&mut chars, &mut line);
                } else {
                    return Err(parse_err(line, "unexpected character '/'"));
                }
            }
            ';' => {
                chars.next();
                tokens.push(Spanned { token: Token::Semi, line });
            }
            ',' => {
                chars.next();
                tokens.push(Spanned { token: Token::Comma, line });
            }
            '.' => {
                chars.next();
                tokens.push(Spanned { token: Token::Dot, line });
            }
            '+' => {
                chars.next();
                tokens.push(Spanned { token: Token::Plus, line });
            }
            '-' => {
                chars.next();
                tokens.push(Spanned { token: Token::Minus, line });
            }
            '(' => {
                chars.next();
                tokens.push(Spanned { token: Token::LParen, line });
            }
            ')' => {
                chars.next();
                tokens.push(Spanned { token: Token::RParen, line });
            }
            '=' => {
                chars.next();
                tokens.push(Spanned { token: Token::Assign, line });
            }
            '$' => {
                chars.next();
                let name = read_ident(&mut chars);
                if name.is_empty() {
                    return Err(parse_err(line, "expected variable name after '$'"));
                }
                tokens.push(Spanned { token: Token::Var(name), line });
            }
            '\'' | '"' => {
                let value = read_string(&mut chars, &mut line)?;
                tokens.push(Spanned { token: Token::Str(value), line });
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = digits
                    .parse::<i64>()
                    .map_err(|_| parse_err(line, format!("integer literal '{}' out of range", digits)))?;
                tokens.push(Spanned { token: Token::Int(value), line });
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let word = read_ident(&mut chars);
                let token = match word.as_str() {
                    "echo" => Token::Echo,
                    "print" => Token::Print,
                    _ => return Err(parse_err(line, format!("unknown keyword '{}'", word))),
                };
                tokens.push(Spanned { token, line });
            }
            other => {
                return Err(parse_err(line, format!("unexpected character '{}'", other)));
            }
        }
    }
    Ok(tokens)
}

fn skip_line_comment(chars: &mut Peekable<Chars>, line: &mut usize) {
    for c in chars.by_ref() {
        if c == '\n' {
            *line += 1;
            break;
        }
    }
}

fn read_ident(chars: &mut Peekable<Chars>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

fn read_string(chars: &mut Peekable<Chars>, line: &mut usize) -> Result<String, EvalError> {
    let quote = chars.next().unwrap_or('\'');
    let start_line = *line;
    let mut value = String::new();

    loop {
        match chars.next() {
            None => return Err(parse_err(start_line, "unterminated string literal")),
            Some(c) if c == quote => return Ok(value),
            Some('\\') => match chars.next() {
                None => return Err(parse_err(start_line, "unterminated string literal")),
                Some('\\') => value.push('\\'),
                Some(c) if c == quote => value.push(c),
                // Double-quoted strings understand a few more escapes;
                // unknown escapes keep their backslash verbatim.
                Some('n') if quote == '"' => value.push('\n'),
                Some('t') if quote == '"' => value.push('\t'),
                Some('r') if quote == '"' => value.push('\r'),
                Some('$') if quote == '"' => value.push('$'),
                Some(other) => {
                    value.push('\\');
                    value.push(other);
                    if other == '\n' {
                        *line += 1;
                    }
                }
            },
            Some('\n') => {
                *line += 1;
                value.push('\n');
            }
            Some(c) => value.push(c),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Str(String),
    Int(i64),
    Var(String),
    Concat(Box<Expr>, Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
enum Stmt {
    Echo(Vec<Expr>),
    Assign(String, Expr),
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let spanned = self.tokens.get(self.pos);
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn current_line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.line)
            .unwrap_or(1)
    }

    fn parse_program(&mut self) -> Result<Vec<Stmt>, EvalError> {
        let mut stmts = Vec::new();
        loop {
            // Empty statements are tolerated, including a trailing ';'.
            while matches!(self.peek().map(|s| &s.token), Some(Token::Semi)) {
                self.advance();
            }
            if self.peek().is_none() {
                break;
            }
            stmts.push(self.parse_stmt()?);
            match self.peek().map(|s| &s.token) {
                None => break,
                Some(Token::Semi) => {
                    self.advance();
                }
                Some(_) => {
                    return Err(parse_err(self.current_line(), "expected ';' after statement"));
                }
            }
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, EvalError> {
        let line = self.current_line();
        match self.peek().map(|s| s.token.clone()) {
            Some(Token::Echo) | Some(Token::Print) => {
                self.advance();
                let mut exprs = vec![self.parse_expr()?];
                while matches!(self.peek().map(|s| &s.token), Some(Token::Comma)) {
                    self.advance();
                    exprs.push(self.parse_expr()?);
                }
                Ok(Stmt::Echo(exprs))
            }
            Some(Token::Var(name)) => {
                self.advance();
                match self.advance().map(|s| &s.token) {
                    Some(Token::Assign) => {}
                    _ => return Err(parse_err(line, format!("expected '=' after '${}'", name))),
                }
                let expr = self.parse_expr()?;
                Ok(Stmt::Assign(name, expr))
            }
            Some(_) => Err(parse_err(line, "expected 'echo', 'print' or an assignment")),
            None => Err(parse_err(line, "unexpected end of input")),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek().map(|s| &s.token) {
                Some(Token::Dot) => Token::Dot,
                Some(Token::Plus) => Token::Plus,
                Some(Token::Minus) => Token::Minus,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = match op {
                Token::Dot => Expr::Concat(Box::new(left), Box::new(right)),
                Token::Plus => Expr::Add(Box::new(left), Box::new(right)),
                _ => Expr::Sub(Box::new(left), Box::new(right)),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let line = self.current_line();
        match self.advance().map(|s| s.token.clone()) {
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::Int(n)) => Ok(Expr::Int(n)),
            Some(Token::Var(name)) => Ok(Expr::Var(name)),
            Some(Token::Minus) => Ok(Expr::Neg(Box::new(self.parse_term()?))),
            Some(Token::LParen) => {
                let expr = self.parse_expr()?;
                match self.advance().map(|s| &s.token) {
                    Some(Token::RParen) => Ok(expr),
                    _ => Err(parse_err(line, "expected ')'")),
                }
            }
            _ => Err(parse_err(line, "expected an expression")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Str(String),
}

impl Value {
    fn render(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Str(s) => s.clone(),
        }
    }

    fn as_int(&self) -> Result<i64, EvalError> {
        match self {
            Value::Int(n) => Ok(*n),
            Value::Str(_) => Err(EvalError::Runtime(
                "arithmetic on a string value".to_string(),
            )),
        }
    }
}

fn eval_expr(expr: &Expr, vars: &HashMap<String, Value>) -> Result<Value, EvalError> {
    match expr {
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Int(n) => Ok(Value::Int(*n)),
        Expr::Var(name) => vars
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::Runtime(format!("undefined variable '${}'", name))),
        Expr::Concat(a, b) => {
            let mut s = eval_expr(a, vars)?.render();
            s.push_str(&eval_expr(b, vars)?.render());
            Ok(Value::Str(s))
        }
        Expr::Add(a, b) => {
            let result = eval_expr(a, vars)?
                .as_int()?
                .checked_add(eval_expr(b, vars)?.as_int()?)
                .ok_or_else(|| EvalError::Runtime("integer overflow".to_string()))?;
            Ok(Value::Int(result))
        }
        Expr::Sub(a, b) => {
            let result = eval_expr(a, vars)?
                .as_int()?
                .checked_sub(eval_expr(b, vars)?.as_int()?)
                .ok_or_else(|| EvalError::Runtime("integer overflow".to_string()))?;
            Ok(Value::Int(result))
        }
        Expr::Neg(inner) => {
            let result = eval_expr(inner, vars)?
                .as_int()?
                .checked_neg()
                .ok_or_else(|| EvalError::Runtime("integer overflow".to_string()))?;
            Ok(Value::Int(result))
        }
    }
}

fn run(program: &[Stmt]) -> Result<String, EvalError> {
    let mut vars: HashMap<String, Value> = HashMap::new();
    let mut out = String::new();

    for stmt in program {
        match stmt {
            Stmt::Echo(exprs) => {
                for expr in exprs {
                    out.push_str(&eval_expr(expr, &vars)?.render());
                }
            }
            Stmt::Assign(name, expr) => {
                let value = eval_expr(expr, &vars)?;
                vars.insert(name.clone(), value);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn eval(source: &str) -> Result<String, EvalError> {
        ScriptEvaluator::new().execute(source)
    }

    #[rstest]
    #[case("echo 'Hi';", "Hi")]
    #[case("echo 'Hi'", "Hi")] // trailing terminator optional
    #[case("echo \"Hi\";", "Hi")]
    #[case("echo 'a', 'b', 'c';", "abc")]
    #[case("print 'Hi';", "Hi")]
    #[case("echo 'a'; echo 'b';", "ab")]
    #[case("echo 1 + 2;", "3")]
    #[case("echo 10 - 4 - 1;", "5")]
    #[case("echo -(2 + 3);", "-5")]
    #[case("echo 'n=' . (1 + 2);", "n=3")]
    #[case("$x = 'world'; echo 'hello ' . $x;", "hello world")]
    #[case("$n = 2; $n = $n + 1; echo $n;", "3")]
    #[case("echo \"line\\n\";", "line\n")]
    #[case("echo 'it\\'s';", "it's")]
    #[case("echo '\\n';", "\\n")] // single quotes keep escapes verbatim
    #[case("", "")]
    #[case(";;;", "")]
    #[case("# comment only\necho 'x';", "x")]
    #[case("echo 'x'; // trailing comment", "x")]
    fn test_execute(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(eval(source).unwrap(), expected);
    }

    #[rstest]
    #[case("echo 'unterminated")]
    #[case("echo ;")]
    #[case("bogus 'Hi';")]
    #[case("echo 'a' 'b';")]
    #[case("$x 'Hi';")]
    #[case("echo (1 + 2;")]
    #[case("echo 99999999999999999999;")]
    fn test_parse_errors(#[case] source: &str) {
        assert!(matches!(eval(source), Err(EvalError::Parse { .. })));
    }

    #[rstest]
    #[case("echo $missing;")]
    #[case("echo 'a' + 1;")]
    fn test_runtime_errors(#[case] source: &str) {
        assert!(matches!(eval(source), Err(EvalError::Runtime(_))));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = eval("echo 'ok';\nbogus;").unwrap_err();
        match err {
            EvalError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_variables_do_not_leak_between_executions() {
        let evaluator = ScriptEvaluator::new();
        evaluator.execute("$x = 'once';").unwrap();
        let err = evaluator.execute("echo $x;").unwrap_err();
        assert!(matches!(err, EvalError::Runtime(_)));
    }
}
