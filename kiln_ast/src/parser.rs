//! Recursive-descent parser for the supported JS/JSX subset.
//!
//! Covers module items (imports, exports, variable declarations,
//! expression statements) and the expression grammar the styling pass
//! works with: literals, template literals, objects, arrays, arrow
//! functions, calls, member access, conditionals and JSX. Arrow parameter
//! lists are disambiguated from parenthesized expressions by backtracking.

use std::fmt;

use crate::ast::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub col: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}:{}: {}", self.line, self.col, self.message)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses one full module.
pub fn parse_module(src: &str) -> ParseResult<Module> {
    let mut parser = Parser::new(src);
    let mut body = Vec::new();
    parser.skip_trivia();
    while !parser.at_end() {
        body.push(parser.parse_item()?);
        parser.skip_trivia();
    }
    Ok(Module { body })
}

/// Parses a single expression spanning the whole input.
pub fn parse_expr(src: &str) -> ParseResult<Expr> {
    let mut parser = Parser::new(src);
    let expr = parser.parse_expr()?;
    parser.skip_trivia();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser { src, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let col = consumed
            .rsplit_once('\n')
            .map(|(_, tail)| tail.chars().count())
            .unwrap_or_else(|| consumed.chars().count())
            + 1;
        ParseError {
            line,
            col,
            message: message.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();
            if trimmed.starts_with("//") {
                match trimmed.find('\n') {
                    Some(idx) => self.pos += idx + 1,
                    None => self.pos = self.src.len(),
                }
            } else if trimmed.starts_with("/*") {
                match trimmed[2..].find("*/") {
                    Some(idx) => self.pos += idx + 4,
                    None => self.pos = self.src.len(),
                }
            } else {
                return;
            }
        }
    }

    /// Skips trivia and tests for a literal token.
    fn at(&mut self, token: &str) -> bool {
        self.skip_trivia();
        self.rest().starts_with(token)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.at(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> ParseResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", token)))
        }
    }

    /// Tests for a keyword (the following char must not continue an
    /// identifier).
    fn at_keyword(&mut self, keyword: &str) -> bool {
        if !self.at(keyword) {
            return false;
        }
        !self.rest()[keyword.len()..]
            .starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn parse_ident(&mut self) -> ParseResult<String> {
        self.skip_trivia();
        let rest = self.rest();
        let mut len = 0;
        for c in rest.chars() {
            let valid = if len == 0 {
                c.is_ascii_alphabetic() || c == '_' || c == '$'
            } else {
                c.is_ascii_alphanumeric() || c == '_' || c == '$'
            };
            if !valid {
                break;
            }
            len += c.len_utf8();
        }
        if len == 0 {
            return Err(self.error("expected identifier"));
        }
        self.pos += len;
        Ok(rest[..len].to_string())
    }

    // ---- items ----

    fn parse_item(&mut self) -> ParseResult<Item> {
        if self.at_keyword("import") {
            return self.parse_import().map(Item::Import);
        }
        if self.eat_keyword("export") {
            if self.eat_keyword("default") {
                let expr = self.parse_expr()?;
                self.eat(";");
                return Ok(Item::ExportDefault(expr));
            }
            let decl = self.parse_var_decl()?;
            return Ok(Item::ExportVar(decl));
        }
        if self.at_keyword("const") || self.at_keyword("let") || self.at_keyword("var") {
            return self.parse_var_decl().map(Item::Var);
        }
        let expr = self.parse_expr()?;
        self.eat(";");
        Ok(Item::Expr(expr))
    }

    fn parse_import(&mut self) -> ParseResult<ImportDecl> {
        self.expect("import")?;
        let mut specifiers = Vec::new();
        self.skip_trivia();
        if !matches!(self.peek(), Some(b'"') | Some(b'\'')) {
            if self.eat("*") {
                self.expect("as")?;
                specifiers.push(ImportSpecifier::Namespace {
                    local: self.parse_ident()?,
                });
            } else if self.at("{") {
                self.parse_named_specifiers(&mut specifiers)?;
            } else {
                specifiers.push(ImportSpecifier::Default {
                    local: self.parse_ident()?,
                });
                if self.eat(",") {
                    if self.eat("*") {
                        self.expect("as")?;
                        specifiers.push(ImportSpecifier::Namespace {
                            local: self.parse_ident()?,
                        });
                    } else {
                        self.parse_named_specifiers(&mut specifiers)?;
                    }
                }
            }
            self.expect("from")?;
        }
        let source = self.parse_string_literal()?;
        self.eat(";");
        Ok(ImportDecl { specifiers, source })
    }

    fn parse_named_specifiers(&mut self, out: &mut Vec<ImportSpecifier>) -> ParseResult<()> {
        self.expect("{")?;
        loop {
            if self.eat("}") {
                return Ok(());
            }
            let imported = self.parse_ident()?;
            let local = if self.eat_keyword("as") {
                self.parse_ident()?
            } else {
                imported.clone()
            };
            out.push(ImportSpecifier::Named { imported, local });
            if !self.eat(",") {
                self.expect("}")?;
                return Ok(());
            }
        }
    }

    fn parse_var_decl(&mut self) -> ParseResult<VarDecl> {
        let kind = if self.eat_keyword("const") {
            VarKind::Const
        } else if self.eat_keyword("let") {
            VarKind::Let
        } else if self.eat_keyword("var") {
            VarKind::Var
        } else {
            return Err(self.error("expected variable declaration"));
        };
        let name = self.parse_ident()?;
        self.expect("=")?;
        let init = self.parse_expr()?;
        self.eat(";");
        Ok(VarDecl { kind, name, init })
    }

    // ---- expressions ----

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let test = self.parse_binary(0)?;
        if self.at("?.") || !self.eat("?") {
            return Ok(test);
        }
        let cons = self.parse_expr()?;
        self.expect(":")?;
        let alt = self.parse_expr()?;
        Ok(Expr::Cond {
            test: Box::new(test),
            cons: Box::new(cons),
            alt: Box::new(alt),
        })
    }

    fn peek_binary_op(&mut self) -> Option<(&'static str, u8)> {
        const OPS: &[(&str, u8)] = &[
            ("||", 1),
            ("&&", 2),
            ("===", 3),
            ("!==", 3),
            ("==", 3),
            ("!=", 3),
            ("<=", 4),
            (">=", 4),
            ("<", 4),
            (">", 4),
            ("+", 5),
            ("-", 5),
            ("*", 6),
            ("/", 6),
            ("%", 6),
        ];
        self.skip_trivia();
        let rest = self.rest();
        OPS.iter()
            .find(|(op, _)| rest.starts_with(op))
            .map(|&(op, prec)| (op, prec))
    }

    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        while let Some((op, prec)) = self.peek_binary_op() {
            if prec < min_prec {
                break;
            }
            self.pos += op.len();
            let right = self.parse_binary(prec + 1)?;
            left = Expr::Binary {
                op: op.to_string(),
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = if self.eat_keyword("typeof") {
            Some("typeof")
        } else if self.eat("!") {
            Some("!")
        } else if self.eat("-") {
            Some("-")
        } else {
            None
        };
        match op {
            Some(op) => Ok(Expr::Unary {
                op: op.to_string(),
                expr: Box::new(self.parse_unary()?),
            }),
            None => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.at("...") {
                return Err(self.error("unexpected `...`"));
            }
            if self.at("?.") {
                return Err(self.error("optional chaining is not supported"));
            }
            if self.eat(".") {
                let prop = self.parse_ident()?;
                expr = Expr::Member {
                    obj: Box::new(expr),
                    prop,
                };
            } else if self.at("(") {
                self.expect("(")?;
                let mut args = Vec::new();
                loop {
                    if self.eat(")") {
                        break;
                    }
                    args.push(self.parse_expr()?);
                    if !self.eat(",") {
                        self.expect(")")?;
                        break;
                    }
                }
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else if self.eat("[") {
                let index = self.parse_expr()?;
                self.expect("]")?;
                expr = Expr::Index {
                    obj: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.at("`") {
                let quasi = self.parse_template()?;
                expr = Expr::TaggedTemplate {
                    tag: Box::new(expr),
                    quasi,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        self.skip_trivia();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'(') => {
                let save = self.pos;
                match self.parse_paren_arrow() {
                    Ok(expr) => Ok(expr),
                    Err(_) => {
                        self.pos = save;
                        self.expect("(")?;
                        let inner = self.parse_expr()?;
                        self.expect(")")?;
                        Ok(Expr::Paren(Box::new(inner)))
                    }
                }
            }
            Some(b'{') => self.parse_object(),
            Some(b'[') => {
                self.expect("[")?;
                let mut items = Vec::new();
                loop {
                    if self.eat("]") {
                        break;
                    }
                    items.push(self.parse_expr()?);
                    if !self.eat(",") {
                        self.expect("]")?;
                        break;
                    }
                }
                Ok(Expr::Array(items))
            }
            Some(b'"') | Some(b'\'') => Ok(Expr::Str(self.parse_string_literal()?)),
            Some(b'`') => Ok(Expr::Template(self.parse_template()?)),
            Some(b'<') => Ok(Expr::Jsx(Box::new(self.parse_jsx_element()?))),
            Some(c) if c.is_ascii_digit() => self.parse_number(),
            Some(b'.') if self.rest()[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                self.parse_number()
            }
            _ => {
                if self.eat_keyword("true") {
                    return Ok(Expr::Bool(true));
                }
                if self.eat_keyword("false") {
                    return Ok(Expr::Bool(false));
                }
                if self.eat_keyword("null") {
                    return Ok(Expr::Null);
                }
                let name = self.parse_ident()?;
                if self.eat("=>") {
                    let body = self.parse_arrow_body()?;
                    return Ok(Expr::Arrow(Box::new(ArrowFn {
                        params: vec![Pat::Ident(name)],
                        body,
                    })));
                }
                Ok(Expr::Ident(name))
            }
        }
    }

    fn parse_paren_arrow(&mut self) -> ParseResult<Expr> {
        self.expect("(")?;
        let mut params = Vec::new();
        if !self.at(")") {
            loop {
                params.push(self.parse_pat()?);
                if !self.eat(",") {
                    break;
                }
            }
        }
        self.expect(")")?;
        self.expect("=>")?;
        let body = self.parse_arrow_body()?;
        Ok(Expr::Arrow(Box::new(ArrowFn { params, body })))
    }

    fn parse_pat(&mut self) -> ParseResult<Pat> {
        if self.eat("{") {
            let mut props = Vec::new();
            let mut rest = None;
            loop {
                if self.eat("}") {
                    break;
                }
                if self.eat("...") {
                    rest = Some(self.parse_ident()?);
                    self.eat(",");
                    self.expect("}")?;
                    break;
                }
                let key = self.parse_ident()?;
                let alias = if self.eat(":") {
                    Some(self.parse_ident()?)
                } else {
                    None
                };
                let default = if self.eat("=") {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                props.push(PatProp { key, alias, default });
                if !self.eat(",") {
                    self.expect("}")?;
                    break;
                }
            }
            Ok(Pat::Object { props, rest })
        } else {
            Ok(Pat::Ident(self.parse_ident()?))
        }
    }

    fn parse_arrow_body(&mut self) -> ParseResult<ArrowBody> {
        if self.eat("{") {
            let mut stmts = Vec::new();
            loop {
                if self.eat("}") {
                    break;
                }
                if self.eat_keyword("return") {
                    if self.eat(";") {
                        stmts.push(BlockStmt::Return(None));
                        continue;
                    }
                    if self.at("}") {
                        stmts.push(BlockStmt::Return(None));
                        continue;
                    }
                    let expr = self.parse_expr()?;
                    self.eat(";");
                    stmts.push(BlockStmt::Return(Some(expr)));
                } else if self.at_keyword("const")
                    || self.at_keyword("let")
                    || self.at_keyword("var")
                {
                    stmts.push(BlockStmt::Var(self.parse_var_decl()?));
                } else {
                    let expr = self.parse_expr()?;
                    self.eat(";");
                    stmts.push(BlockStmt::Expr(expr));
                }
            }
            Ok(ArrowBody::Block(stmts))
        } else {
            Ok(ArrowBody::Expr(Box::new(self.parse_expr()?)))
        }
    }

    fn parse_object(&mut self) -> ParseResult<Expr> {
        self.expect("{")?;
        let mut entries = Vec::new();
        loop {
            if self.eat("}") {
                break;
            }
            if self.eat("...") {
                entries.push(ObjectEntry::Spread(self.parse_expr()?));
            } else {
                self.skip_trivia();
                let key = match self.peek() {
                    Some(b'"') | Some(b'\'') => PropKey::Str(self.parse_string_literal()?),
                    _ => PropKey::Ident(self.parse_ident()?),
                };
                if self.eat(":") {
                    let value = self.parse_expr()?;
                    entries.push(ObjectEntry::Prop { key, value });
                } else {
                    match key {
                        PropKey::Ident(name) => entries.push(ObjectEntry::Shorthand(name)),
                        PropKey::Str(_) => {
                            return Err(self.error("string key requires a value"));
                        }
                    }
                }
            }
            if !self.eat(",") {
                self.expect("}")?;
                break;
            }
        }
        Ok(Expr::Object(entries))
    }

    fn parse_string_literal(&mut self) -> ParseResult<String> {
        self.skip_trivia();
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error("expected string literal")),
        };
        self.pos += 1;
        let bytes = self.src.as_bytes();
        let mut value = String::new();
        while self.pos < self.src.len() {
            let b = bytes[self.pos];
            if b == quote {
                self.pos += 1;
                return Ok(value);
            }
            if b == b'\\' {
                self.pos += 1;
                let escaped = bytes.get(self.pos).copied().unwrap_or(b'\\');
                value.push(match escaped {
                    b'n' => '\n',
                    b't' => '\t',
                    other => other as char,
                });
                self.pos += 1;
                continue;
            }
            let c = self.rest().chars().next().unwrap();
            value.push(c);
            self.pos += c.len_utf8();
        }
        Err(self.error("unterminated string literal"))
    }

    fn parse_template(&mut self) -> ParseResult<Template> {
        self.expect("`")?;
        let mut quasis = Vec::new();
        let mut exprs = Vec::new();
        let mut current = String::new();
        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with('`') {
                self.pos += 1;
                quasis.push(current);
                return Ok(Template { quasis, exprs });
            }
            if rest.starts_with("${") {
                self.pos += 2;
                quasis.push(std::mem::take(&mut current));
                exprs.push(self.parse_expr()?);
                self.expect("}")?;
                continue;
            }
            if rest.starts_with('\\') {
                let mut chars = rest.chars();
                current.push(chars.next().unwrap());
                if let Some(c) = chars.next() {
                    current.push(c);
                    self.pos += 1 + c.len_utf8();
                } else {
                    self.pos += 1;
                }
                continue;
            }
            let c = rest.chars().next().unwrap();
            current.push(c);
            self.pos += c.len_utf8();
        }
        Err(self.error("unterminated template literal"))
    }

    fn parse_number(&mut self) -> ParseResult<Expr> {
        self.skip_trivia();
        let rest = self.rest();
        let mut len = 0;
        let bytes = rest.as_bytes();
        while len < bytes.len() && bytes[len].is_ascii_digit() {
            len += 1;
        }
        if len < bytes.len() && bytes[len] == b'.' {
            len += 1;
            while len < bytes.len() && bytes[len].is_ascii_digit() {
                len += 1;
            }
        }
        if len < bytes.len() && (bytes[len] == b'e' || bytes[len] == b'E') {
            let mut exp = len + 1;
            if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
                exp += 1;
            }
            if exp < bytes.len() && bytes[exp].is_ascii_digit() {
                len = exp;
                while len < bytes.len() && bytes[len].is_ascii_digit() {
                    len += 1;
                }
            }
        }
        let text = &rest[..len];
        let value: f64 = text
            .parse()
            .map_err(|_| self.error(format!("invalid number `{}`", text)))?;
        self.pos += len;
        Ok(Expr::Num(value))
    }

    // ---- JSX ----

    fn parse_jsx_element(&mut self) -> ParseResult<JsxElement> {
        self.expect("<")?;
        let name = self.parse_jsx_name()?;
        let mut attrs = Vec::new();
        loop {
            if self.eat("/>") {
                return Ok(JsxElement {
                    name,
                    attrs,
                    children: Vec::new(),
                    self_closing: true,
                });
            }
            if self.eat(">") {
                break;
            }
            if self.at("{") {
                self.expect("{")?;
                self.expect("...")?;
                let expr = self.parse_expr()?;
                self.expect("}")?;
                attrs.push(JsxAttr::Spread(expr));
                continue;
            }
            let attr_name = self.parse_jsx_attr_name()?;
            let value = if self.eat("=") {
                self.skip_trivia();
                match self.peek() {
                    Some(b'"') | Some(b'\'') => Some(JsxAttrValue::Str(self.parse_string_literal()?)),
                    Some(b'{') => {
                        self.expect("{")?;
                        if self.eat("}") {
                            Some(JsxAttrValue::Expr(None))
                        } else {
                            let expr = self.parse_expr()?;
                            self.expect("}")?;
                            Some(JsxAttrValue::Expr(Some(expr)))
                        }
                    }
                    _ => return Err(self.error("expected JSX attribute value")),
                }
            } else {
                None
            };
            attrs.push(JsxAttr::Named {
                name: attr_name,
                value,
            });
        }

        let mut children = Vec::new();
        loop {
            if self.pos >= self.src.len() {
                return Err(self.error("unterminated JSX element"));
            }
            let rest = self.rest();
            if rest.starts_with("</") {
                self.pos += 2;
                let closing = self.parse_jsx_name()?;
                if closing != name {
                    return Err(self.error("mismatched JSX closing tag"));
                }
                self.expect(">")?;
                return Ok(JsxElement {
                    name,
                    attrs,
                    children,
                    self_closing: false,
                });
            }
            if rest.starts_with('<') {
                children.push(JsxChild::Element(self.parse_jsx_element()?));
                continue;
            }
            if rest.starts_with('{') {
                self.pos += 1;
                self.skip_trivia();
                if self.eat("}") {
                    children.push(JsxChild::Expr(None));
                } else {
                    let expr = self.parse_expr()?;
                    self.expect("}")?;
                    children.push(JsxChild::Expr(Some(expr)));
                }
                continue;
            }
            let end = rest
                .find(|c: char| c == '<' || c == '{')
                .unwrap_or(rest.len());
            let words: Vec<&str> = rest[..end].split_whitespace().collect();
            if !words.is_empty() {
                children.push(JsxChild::Text(words.join(" ")));
            }
            self.pos += end;
        }
    }

    fn parse_jsx_name(&mut self) -> ParseResult<JsxName> {
        let first = self.parse_ident()?;
        if !self.at(".") {
            return Ok(JsxName::Ident(first));
        }
        let mut parts = vec![first];
        while self.eat(".") {
            parts.push(self.parse_ident()?);
        }
        Ok(JsxName::Member(parts))
    }

    fn parse_jsx_attr_name(&mut self) -> ParseResult<String> {
        self.skip_trivia();
        let rest = self.rest();
        let mut len = 0;
        for c in rest.chars() {
            let valid = if len == 0 {
                c.is_ascii_alphabetic() || c == '_'
            } else {
                c.is_ascii_alphanumeric() || c == '_' || c == '-'
            };
            if !valid {
                break;
            }
            len += c.len_utf8();
        }
        if len == 0 {
            return Err(self.error("expected JSX attribute name"));
        }
        self.pos += len;
        Ok(rest[..len].to_string())
    }
}
