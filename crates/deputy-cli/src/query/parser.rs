//! Lexer and recursive-descent parser for the filter language.
//!
//! Precedence, loosest first: `|`, `,`, `or`, `and`, comparisons, then
//! postfix paths (`.a`, `[0]`, `[1:3]`, `[]`, `?`).

use serde_json::Value;

/// Parsed filter expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// `.`
    Identity,
    /// Number, string, boolean, or `null`.
    Literal(Value),
    /// `.name` applied to the inner result.
    Field(Box<Filter>, String),
    /// `.[n]`; negative counts from the end.
    Index(Box<Filter>, i64),
    /// `.[a:b]` with either bound optional.
    Slice(Box<Filter>, Option<i64>, Option<i64>),
    /// `.[]`
    Iterate(Box<Filter>),
    /// `f?`: errors become no output.
    Try(Box<Filter>),
    /// `f | g`
    Pipe(Box<Filter>, Box<Filter>),
    /// `f, g`
    Comma(Box<Filter>, Box<Filter>),
    /// `f == g` and friends.
    Compare(Box<Filter>, CmpOp, Box<Filter>),
    /// `f and g`
    And(Box<Filter>, Box<Filter>),
    /// `f or g`
    Or(Box<Filter>, Box<Filter>),
    /// `[f]`, or `[]` when empty.
    Array(Option<Box<Filter>>),
    /// A zero-argument builtin.
    Builtin(Builtin),
    /// `select(f)`
    Select(Box<Filter>),
    /// `map(f)`
    Map(Box<Filter>),
}

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// Zero-argument builtins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    /// Length of a string, array, or object; absolute value of a number.
    Length,
    /// Sorted object keys, or array indices.
    Keys,
    /// First array element.
    First,
    /// Last array element.
    Last,
    /// Boolean negation by truthiness.
    Not,
    /// No output.
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Dot,
    /// `.name` or `."name"` with no space after the dot.
    Field(String),
    Ident(String),
    Str(String),
    Num(f64),
    LBracket,
    RBracket,
    LParen,
    RParen,
    Pipe,
    Comma,
    Colon,
    Question,
    Op(CmpOp),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Dot => "'.'".into(),
            Self::Field(name) => format!("'.{name}'"),
            Self::Ident(name) => format!("'{name}'"),
            Self::Str(s) => format!("string \"{s}\""),
            Self::Num(n) => format!("number {n}"),
            Self::LBracket => "'['".into(),
            Self::RBracket => "']'".into(),
            Self::LParen => "'('".into(),
            Self::RParen => "')'".into(),
            Self::Pipe => "'|'".into(),
            Self::Comma => "','".into(),
            Self::Colon => "':'".into(),
            Self::Question => "'?'".into(),
            Self::Op(op) => format!("'{}'", op.symbol()),
        }
    }
}

impl CmpOp {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Deepest expression tree the parser will build.
pub const MAX_DEPTH: usize = 128;

/// Parse an expression into a [`Filter`], or describe why it is malformed.
pub fn parse(source: &str) -> Result<Filter, String> {
    let tokens = lex(source)?;
    if tokens.is_empty() {
        return Err("empty expression".into());
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let filter = parser.pipe()?;
    match parser.peek() {
        None => Ok(filter),
        Some(tok) => Err(format!("unexpected {} at token {}", tok.describe(), parser.pos + 1)),
    }
}

fn lex(source: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while let Some(&c) = chars.get(i) {
        match c {
            c if c.is_whitespace() => i += 1,
            '.' => match chars.get(i + 1) {
                Some('"') => {
                    let (name, next) = lex_string(&chars, i + 1)?;
                    tokens.push(Token::Field(name));
                    i = next;
                },
                Some(ch) if ch.is_ascii_alphabetic() || *ch == '_' => {
                    let (name, next) = lex_ident(&chars, i + 1);
                    tokens.push(Token::Field(name));
                    i = next;
                },
                _ => {
                    tokens.push(Token::Dot);
                    i += 1;
                },
            },
            '[' => {
                tokens.push(Token::LBracket);
                i += 1;
            },
            ']' => {
                tokens.push(Token::RBracket);
                i += 1;
            },
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            },
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            },
            '|' => {
                tokens.push(Token::Pipe);
                i += 1;
            },
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            },
            ':' => {
                tokens.push(Token::Colon);
                i += 1;
            },
            '?' => {
                tokens.push(Token::Question);
                i += 1;
            },
            '=' | '!' | '<' | '>' => {
                let next_is_eq = chars.get(i + 1) == Some(&'=');
                let op = match (c, next_is_eq) {
                    ('=', true) => CmpOp::Eq,
                    ('!', true) => CmpOp::Ne,
                    ('<', true) => CmpOp::Le,
                    ('>', true) => CmpOp::Ge,
                    ('<', false) => CmpOp::Lt,
                    ('>', false) => CmpOp::Gt,
                    _ => return Err(format!("unexpected character '{c}' at position {i}")),
                };
                tokens.push(Token::Op(op));
                i += if next_is_eq { 2 } else { 1 };
            },
            '"' => {
                let (s, next) = lex_string(&chars, i)?;
                tokens.push(Token::Str(s));
                i = next;
            },
            c if c.is_ascii_digit()
                || (c == '-' && chars.get(i + 1).is_some_and(char::is_ascii_digit)) =>
            {
                let start = i;
                i += 1;
                while chars
                    .get(i)
                    .is_some_and(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == 'e' || *ch == 'E')
                {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let n = text
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number '{text}' at position {start}"))?;
                tokens.push(Token::Num(n));
            },
            c if c.is_ascii_alphabetic() || c == '_' => {
                let (name, next) = lex_ident(&chars, i);
                tokens.push(Token::Ident(name));
                i = next;
            },
            other => return Err(format!("unexpected character '{other}' at position {i}")),
        }
    }
    Ok(tokens)
}

fn lex_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while chars
        .get(end)
        .is_some_and(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
    {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn lex_string(chars: &[char], open: usize) -> Result<(String, usize), String> {
    let mut out = String::new();
    let mut i = open + 1;
    loop {
        match chars.get(i) {
            None => return Err(format!("unterminated string starting at position {open}")),
            Some('"') => return Ok((out, i + 1)),
            Some('\\') => {
                let escaped = match chars.get(i + 1) {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some(&ch) if matches!(ch, '"' | '\\' | '/') => ch,
                    Some(other) => return Err(format!("invalid escape '\\{other}' in string")),
                    None => return Err(format!("unterminated string starting at position {open}")),
                };
                out.push(escaped);
                i += 2;
            },
            Some(&ch) => {
                out.push(ch);
                i += 1;
            },
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Nesting of the tree under construction; recursion and chained
    /// operators both count.
    depth: usize,
}

impl Parser {
    fn descend(&mut self) -> Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(format!("expression nested too deeply (limit {MAX_DEPTH})"));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(name)) if name == word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        match self.next() {
            Some(tok) if &tok == expected => Ok(()),
            Some(tok) => Err(format!(
                "expected {} but found {}",
                expected.describe(),
                tok.describe()
            )),
            None => Err(format!("expected {} but reached end of input", expected.describe())),
        }
    }

    fn pipe(&mut self) -> Result<Filter, String> {
        self.descend()?;
        let left = self.comma()?;
        let filter = if self.eat(&Token::Pipe) {
            let right = self.pipe()?;
            Filter::Pipe(Box::new(left), Box::new(right))
        } else {
            left
        };
        self.depth -= 1;
        Ok(filter)
    }

    fn comma(&mut self) -> Result<Filter, String> {
        let base = self.depth;
        let mut left = self.or()?;
        while self.eat(&Token::Comma) {
            self.descend()?;
            let right = self.or()?;
            left = Filter::Comma(Box::new(left), Box::new(right));
        }
        self.depth = base;
        Ok(left)
    }

    fn or(&mut self) -> Result<Filter, String> {
        let base = self.depth;
        let mut left = self.and()?;
        while self.eat_keyword("or") {
            self.descend()?;
            let right = self.and()?;
            left = Filter::Or(Box::new(left), Box::new(right));
        }
        self.depth = base;
        Ok(left)
    }

    fn and(&mut self) -> Result<Filter, String> {
        let base = self.depth;
        let mut left = self.comparison()?;
        while self.eat_keyword("and") {
            self.descend()?;
            let right = self.comparison()?;
            left = Filter::And(Box::new(left), Box::new(right));
        }
        self.depth = base;
        Ok(left)
    }

    fn comparison(&mut self) -> Result<Filter, String> {
        let left = self.postfix()?;
        if let Some(Token::Op(op)) = self.peek().cloned() {
            self.pos += 1;
            let right = self.postfix()?;
            return Ok(Filter::Compare(Box::new(left), op, Box::new(right)));
        }
        Ok(left)
    }

    fn postfix(&mut self) -> Result<Filter, String> {
        let base = self.depth;
        let mut term = self.primary()?;
        loop {
            match self.peek().cloned() {
                Some(Token::Field(name)) => {
                    self.pos += 1;
                    self.descend()?;
                    term = Filter::Field(Box::new(term), name);
                },
                Some(Token::Dot) => {
                    self.pos += 1;
                    self.descend()?;
                    self.expect(&Token::LBracket)?;
                    term = self.bracket(term)?;
                },
                Some(Token::LBracket) => {
                    self.pos += 1;
                    self.descend()?;
                    term = self.bracket(term)?;
                },
                Some(Token::Question) => {
                    self.pos += 1;
                    self.descend()?;
                    term = Filter::Try(Box::new(term));
                },
                _ => {
                    self.depth = base;
                    return Ok(term);
                },
            }
        }
    }

    /// Parse the inside of `[...]` applied to `target`; the `[` is consumed.
    fn bracket(&mut self, target: Filter) -> Result<Filter, String> {
        let target = Box::new(target);
        if self.eat(&Token::RBracket) {
            return Ok(Filter::Iterate(target));
        }
        if let Some(Token::Str(name)) = self.peek().cloned() {
            self.pos += 1;
            self.expect(&Token::RBracket)?;
            return Ok(Filter::Field(target, name));
        }

        let start = self.integer()?;
        if self.eat(&Token::Colon) {
            let end = self.integer()?;
            self.expect(&Token::RBracket)?;
            if start.is_none() && end.is_none() {
                return Err("slice needs a start or an end".into());
            }
            return Ok(Filter::Slice(target, start, end));
        }
        self.expect(&Token::RBracket)?;
        start
            .map(|index| Filter::Index(target, index))
            .ok_or_else(|| "expected index, slice, or string inside '[ ]'".into())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn integer(&mut self) -> Result<Option<i64>, String> {
        match self.peek() {
            Some(Token::Num(n)) => {
                let n = *n;
                self.pos += 1;
                if n.fract() != 0.0 || !n.is_finite() {
                    return Err(format!("index must be an integer, found {n}"));
                }
                Ok(Some(n as i64))
            },
            _ => Ok(None),
        }
    }

    fn primary(&mut self) -> Result<Filter, String> {
        match self.next() {
            Some(Token::Dot) => {
                if self.eat(&Token::LBracket) {
                    return self.bracket(Filter::Identity);
                }
                Ok(Filter::Identity)
            },
            Some(Token::Field(name)) => Ok(Filter::Field(Box::new(Filter::Identity), name)),
            Some(Token::Num(n)) => serde_json::Number::from_f64(n)
                .map(|num| Filter::Literal(number_value(n, num)))
                .ok_or_else(|| format!("invalid number {n}")),
            Some(Token::Str(s)) => Ok(Filter::Literal(Value::String(s))),
            Some(Token::LParen) => {
                let inner = self.pipe()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            },
            Some(Token::LBracket) => {
                if self.eat(&Token::RBracket) {
                    return Ok(Filter::Array(None));
                }
                let inner = self.pipe()?;
                self.expect(&Token::RBracket)?;
                Ok(Filter::Array(Some(Box::new(inner))))
            },
            Some(Token::Ident(name)) => self.named(&name),
            Some(tok) => Err(format!("unexpected {}", tok.describe())),
            None => Err("unexpected end of input".into()),
        }
    }

    fn named(&mut self, name: &str) -> Result<Filter, String> {
        let builtin = match name {
            "true" => return Ok(Filter::Literal(Value::Bool(true))),
            "false" => return Ok(Filter::Literal(Value::Bool(false))),
            "null" => return Ok(Filter::Literal(Value::Null)),
            "select" | "map" => {
                self.expect(&Token::LParen)?;
                let arg = Box::new(self.pipe()?);
                self.expect(&Token::RParen)?;
                return Ok(if name == "select" {
                    Filter::Select(arg)
                } else {
                    Filter::Map(arg)
                });
            },
            "length" => Builtin::Length,
            "keys" => Builtin::Keys,
            "first" => Builtin::First,
            "last" => Builtin::Last,
            "not" => Builtin::Not,
            "empty" => Builtin::Empty,
            other => return Err(format!("unknown function '{other}'")),
        };
        Ok(Filter::Builtin(builtin))
    }
}

/// Keep integral literals as integers so `1` prints as `1`, not `1.0`.
#[allow(clippy::cast_possible_truncation)]
fn number_value(n: f64, fallback: serde_json::Number) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return Value::from(n as i64);
    }
    Value::Number(fallback)
}
