//! Free-text search grammar for the `q` parameter.
//!
//! ```text
//! expr     := and_expr ("OR" and_expr)*
//! and_expr := primary ("AND" primary)*
//! primary  := "(" expr ")" | term
//! term     := (word | "quoted phrase")+
//! ```
//!
//! Keywords are case-insensitive. Adjacent words form a single search term, so
//! `q=hello world` searches for the phrase `hello world`. Quoting turns keywords
//! into plain words: `q="rock AND roll"`.

use super::expression::Expression;
use crate::config::QueryConfig;
use crate::errors::QueryError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    And,
    Or,
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '"' => {
                chars.next();
                let mut phrase = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => phrase.push(c),
                        None => return Err("unterminated quote".to_string()),
                    }
                }
                tokens.push(Token::Word(phrase));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '"') {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(if word.eq_ignore_ascii_case("and") {
                    Token::And
                } else if word.eq_ignore_ascii_case("or") {
                    Token::Or
                } else {
                    Token::Word(word)
                });
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<Expression, String> {
        let mut children = vec![self.and_expr()?];
        while self.eat(&Token::Or) {
            children.push(self.and_expr()?);
        }
        Ok(group(children, Expression::Or))
    }

    fn and_expr(&mut self) -> Result<Expression, String> {
        let mut children = vec![self.primary()?];
        while self.eat(&Token::And) {
            children.push(self.primary()?);
        }
        Ok(group(children, Expression::And))
    }

    fn primary(&mut self) -> Result<Expression, String> {
        if self.eat(&Token::Open) {
            if self.depth == self.max_depth {
                return Err(format!("parentheses nested deeper than {}", self.max_depth));
            }
            self.depth += 1;
            let inner = self.expr()?;
            self.depth -= 1;
            if !self.eat(&Token::Close) {
                return Err("missing closing parenthesis".to_string());
            }
            return Ok(inner);
        }

        let mut words = Vec::new();
        while let Some(Token::Word(word)) = self.peek() {
            words.push(word.clone());
            self.pos += 1;
        }
        if words.is_empty() {
            return Err(match self.peek() {
                Some(Token::Close) => "unexpected ')'".to_string(),
                Some(_) => "expected a search term before operator".to_string(),
                None => "expected a search term at end of query".to_string(),
            });
        }
        Ok(Expression::search(words.join(" ")))
    }
}

fn group(mut children: Vec<Expression>, build: fn(Vec<Expression>) -> Expression) -> Expression {
    if children.len() == 1 {
        children.remove(0)
    } else {
        build(children)
    }
}

/// Parse the `q` parameter into an expression over search terms.
///
/// A blank query parses to `SEARCH("")`, which [`Expression::purge`] removes.
///
/// # Errors
///
/// Returns [`QueryError::ValueTooLong`] when `q` exceeds the configured limit and
/// [`QueryError::MalformedSearch`] for syntax errors, including parentheses nested
/// deeper than [`QueryConfig::max_search_depth`].
pub fn parse_search(query: &str, config: &QueryConfig) -> Result<Expression, QueryError> {
    if query.len() > config.max_search_length {
        return Err(QueryError::ValueTooLong {
            parameter: "q".to_string(),
            max: config.max_search_length,
        });
    }

    let malformed = |reason: String| QueryError::MalformedSearch {
        query: query.to_string(),
        reason,
    };

    let tokens = tokenize(query).map_err(malformed)?;
    if tokens.is_empty() {
        return Ok(Expression::search(""));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth: config.max_search_depth,
    };
    let expression = parser.expr().map_err(malformed)?;
    if parser.pos < parser.tokens.len() {
        return Err(malformed(match parser.peek() {
            Some(Token::Close) => "unexpected ')'".to_string(),
            _ => "unexpected trailing input".to_string(),
        }));
    }
    Ok(expression)
}
