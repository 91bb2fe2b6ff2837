//! The style evaluator.
//!
//! Partially evaluates a style expression into [`CssOutput`]: raw CSS
//! text plus the dynamic CSS-variable bindings the emitter must wire up
//! at runtime. The policy is conservative: anything that cannot be
//! resolved to static CSS text becomes a `var(--…)` reference backed by
//! the original expression.

use std::collections::HashMap;

use kiln_ast::{ArrowBody, ArrowFn, Expr, ObjectEntry, Pat, PropKey, Template, print_expr};
use kiln_css::props::{kebab_case, with_px};
use kiln_hash::hash_str;

use crate::ModuleResolver;
use crate::error::{CompileError, CompileResult};
use crate::html::is_valid_attribute;
use crate::state::Bindings;

/// Raw CSS text and the runtime bindings for every `var(--…)` in it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CssOutput {
    pub css: String,
    pub variables: Vec<(String, Expr)>,
}

impl CssOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables coalesce by name; the first occurrence wins.
    pub fn push_variable(&mut self, name: String, expr: Expr) {
        if !self.variables.iter().any(|(existing, _)| *existing == name) {
            self.variables.push((name, expr));
        }
    }

    fn append_raw(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let tail = self.css.trim_end();
        if !tail.is_empty() && !matches!(tail.chars().last(), Some(';' | '{' | '}')) {
            self.css.push(';');
        }
        self.css.push_str(text);
    }

    fn append_decl(&mut self, prop: &str, value: &str) {
        self.append_raw(&format!("{}:{};", prop, value));
    }

    pub fn absorb(&mut self, other: CssOutput) {
        self.append_raw(&other.css);
        for (name, expr) in other.variables {
            self.push_variable(name, expr);
        }
    }
}

/// Prop names a styled component reads for dynamic CSS. The emitter
/// destructures these out of the forwarded rest so they never reach the
/// DOM.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PropsUsage {
    pub destructured: Vec<String>,
}

impl PropsUsage {
    fn record(&mut self, name: &str) {
        if !self.destructured.iter().any(|existing| existing == name) {
            self.destructured.push(name.to_string());
        }
    }
}

/// The custom-property name for a dynamic expression, derived from its
/// printed source text so identical expressions share one variable.
pub fn css_variable_name(expr: &Expr) -> String {
    format!("--kln-{:x}", hash_str(&print_expr(expr)))
}

enum Inline {
    Text(String),
    Block(CssOutput),
}

pub struct Evaluator<'a> {
    bindings: &'a Bindings,
    resolver: Option<&'a dyn ModuleResolver>,
    /// Whether arrows over props are meaningful (styled call sites only).
    styled: bool,
    pub usage: PropsUsage,
    arrow_params: Vec<String>,
    /// Destructured prop locals in scope, alias -> original prop name.
    prop_locals: HashMap<String, String>,
}

struct ArrowScope {
    pushed_param: bool,
    locals: Vec<String>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        bindings: &'a Bindings,
        resolver: Option<&'a dyn ModuleResolver>,
        styled: bool,
    ) -> Self {
        Evaluator {
            bindings,
            resolver,
            styled,
            usage: PropsUsage::default(),
            arrow_params: Vec::new(),
            prop_locals: HashMap::new(),
        }
    }

    /// Evaluates a root style expression.
    pub fn evaluate(&mut self, expr: &Expr) -> CompileResult<CssOutput> {
        match unwrap_parens(expr) {
            Expr::Str(text) => {
                let mut out = CssOutput::new();
                out.append_raw(text);
                Ok(out)
            }
            Expr::Template(template) => self.eval_template(template),
            Expr::TaggedTemplate { quasi, .. } => self.eval_template(quasi),
            Expr::Object(entries) => self.eval_entries(entries),
            Expr::Array(items) => {
                let mut out = CssOutput::new();
                for item in items {
                    let piece = self.evaluate(item)?;
                    out.absorb(piece);
                }
                Ok(out)
            }
            Expr::Arrow(arrow) if self.styled => {
                let body = match &arrow.body {
                    ArrowBody::Expr(body) => (**body).clone(),
                    ArrowBody::Block(_) => {
                        return Err(CompileError::UnsupportedStyled {
                            detail: "styled arrow function with a block body".into(),
                        });
                    }
                };
                let scope = self.enter_arrow(&arrow.params);
                let out = self.evaluate(&body);
                self.exit_arrow(scope);
                out
            }
            Expr::Ident(name) => {
                if let Some(init) = self.bindings.local(name) {
                    return self.evaluate(init);
                }
                if let Some(resolver) = self.resolver
                    && let Some((source, imported)) = self.bindings.import(name)
                    && let Some(resolved) = resolver.resolve(source, imported)
                {
                    return self.evaluate(&resolved);
                }
                Err(CompileError::UnsupportedStyled {
                    detail: format!("unresolvable style reference `{}`", name),
                })
            }
            other => Err(CompileError::UnsupportedStyled {
                detail: format!("expression `{}` is not a style", print_expr(other)),
            }),
        }
    }

    fn eval_template(&mut self, template: &Template) -> CompileResult<CssOutput> {
        let mut out = CssOutput::new();
        let mut quasis = template.quasis.clone();
        for i in 0..template.exprs.len() {
            out.css.push_str(&quasis[i]);
            let expr = unwrap_parens(&template.exprs[i]);
            match self.try_inline(expr)? {
                Some(Inline::Text(text)) => {
                    let text = if is_number(&text) && !starts_with_unit(&quasis[i + 1]) {
                        match current_property(&out.css) {
                            Some(prop) => with_px(&prop, &text),
                            None => text,
                        }
                    } else {
                        text
                    };
                    out.css.push_str(&text);
                }
                Some(Inline::Block(block)) => out.absorb(block),
                None => {
                    let name = css_variable_name(expr);
                    let value = self.dynamic_expr(expr)?;
                    let value = match take_unit(&mut quasis[i + 1]) {
                        Some(unit) => wrap_with_unit(value, unit),
                        None => value,
                    };
                    out.css.push_str(&format!("var({})", name));
                    out.push_variable(name, value);
                }
            }
        }
        out.css.push_str(&quasis[template.exprs.len()]);
        Ok(out)
    }

    fn eval_entries(&mut self, entries: &[ObjectEntry]) -> CompileResult<CssOutput> {
        let mut out = CssOutput::new();
        self.eval_entries_into(entries, &mut out)?;
        Ok(out)
    }

    fn eval_entries_into(
        &mut self,
        entries: &[ObjectEntry],
        out: &mut CssOutput,
    ) -> CompileResult<()> {
        for entry in entries {
            match entry {
                ObjectEntry::Shorthand(name) => {
                    let prop = kebab_case(name);
                    self.dynamic_declaration(out, &prop, &Expr::Ident(name.clone()))?;
                }
                ObjectEntry::Prop { key, value } => {
                    let key_text = match key {
                        PropKey::Ident(text) | PropKey::Str(text) => text.clone(),
                    };
                    if matches!(key, PropKey::Str(_)) && is_selector_key(&key_text) {
                        match unwrap_parens(value) {
                            Expr::Object(inner) => {
                                let block = self.eval_entries(inner)?;
                                out.append_raw(&format!("{}{{{}}}", key_text, block.css));
                                for (name, expr) in block.variables {
                                    out.push_variable(name, expr);
                                }
                            }
                            _ => {
                                return Err(CompileError::UnsupportedStyled {
                                    detail: format!(
                                        "selector key `{}` requires an object value",
                                        key_text
                                    ),
                                });
                            }
                        }
                    } else {
                        let prop = if key_text.starts_with("--") {
                            key_text
                        } else {
                            kebab_case(&key_text)
                        };
                        self.eval_declaration_value(out, &prop, unwrap_parens(value))?;
                    }
                }
                ObjectEntry::Spread(expr) => {
                    let flattened = self.resolve_spread(unwrap_parens(expr))?;
                    self.eval_entries_into(&flattened, out)?;
                }
            }
        }
        Ok(())
    }

    fn eval_declaration_value(
        &mut self,
        out: &mut CssOutput,
        prop: &str,
        value: &Expr,
    ) -> CompileResult<()> {
        match value {
            Expr::Str(text) => out.append_decl(prop, text),
            Expr::Num(number) => out.append_decl(prop, &with_px(prop, &format_number(*number))),
            Expr::Bool(flag) => out.append_decl(prop, &flag.to_string()),
            Expr::Template(template) if template.exprs.is_empty() => {
                out.append_decl(prop, template.quasis[0].trim());
            }
            Expr::Template(template) => {
                let text = self.eval_value_template(template, prop, out)?;
                out.append_decl(prop, &text);
            }
            other => self.dynamic_declaration(out, prop, other)?,
        }
        Ok(())
    }

    /// A template literal in value position: static pieces splice in,
    /// dynamic pieces become variables scoped to this declaration.
    fn eval_value_template(
        &mut self,
        template: &Template,
        prop: &str,
        out: &mut CssOutput,
    ) -> CompileResult<String> {
        let mut text = String::new();
        let mut quasis = template.quasis.clone();
        for i in 0..template.exprs.len() {
            text.push_str(&quasis[i]);
            let expr = unwrap_parens(&template.exprs[i]);
            match self.try_inline(expr)? {
                Some(Inline::Text(piece)) => {
                    let piece = if is_number(&piece) && !starts_with_unit(&quasis[i + 1]) {
                        with_px(prop, &piece)
                    } else {
                        piece
                    };
                    text.push_str(&piece);
                }
                _ => {
                    let name = css_variable_name(expr);
                    let value = self.dynamic_expr(expr)?;
                    let value = match take_unit(&mut quasis[i + 1]) {
                        Some(unit) => wrap_with_unit(value, unit),
                        None => value,
                    };
                    text.push_str(&format!("var({})", name));
                    out.push_variable(name, value);
                }
            }
        }
        text.push_str(&quasis[template.exprs.len()]);
        Ok(text)
    }

    fn dynamic_declaration(
        &mut self,
        out: &mut CssOutput,
        prop: &str,
        expr: &Expr,
    ) -> CompileResult<()> {
        let name = css_variable_name(expr);
        let value = self.dynamic_expr(expr)?;
        out.append_decl(prop, &format!("var({})", name));
        out.push_variable(name, value);
        Ok(())
    }

    /// The runtime expression backing a variable. Arrows over props are
    /// stripped down to the bare access; everything else is kept as-is
    /// with in-scope prop references rewritten.
    fn dynamic_expr(&mut self, expr: &Expr) -> CompileResult<Expr> {
        if let Expr::Arrow(arrow) = expr {
            if !self.styled {
                return Err(CompileError::UnsupportedStyled {
                    detail: "arrow function outside a styled component".into(),
                });
            }
            return self.strip_arrow(arrow);
        }
        Ok(self.rewrite_props(expr))
    }

    fn strip_arrow(&mut self, arrow: &ArrowFn) -> CompileResult<Expr> {
        let body = match &arrow.body {
            ArrowBody::Expr(body) => (**body).clone(),
            ArrowBody::Block(_) => {
                return Err(CompileError::UnsupportedStyled {
                    detail: "arrow function with a block body in a style value".into(),
                });
            }
        };
        let scope = self.enter_arrow(&arrow.params);
        let stripped = self.rewrite_props(&body);
        self.exit_arrow(scope);
        Ok(stripped)
    }

    fn enter_arrow(&mut self, params: &[Pat]) -> ArrowScope {
        let mut scope = ArrowScope {
            pushed_param: false,
            locals: Vec::new(),
        };
        match params.first() {
            Some(Pat::Ident(name)) => {
                self.arrow_params.push(name.clone());
                scope.pushed_param = true;
            }
            Some(Pat::Object { props, .. }) => {
                for prop in props {
                    let local = prop.alias.clone().unwrap_or_else(|| prop.key.clone());
                    self.usage.record(&prop.key);
                    self.prop_locals.insert(local.clone(), prop.key.clone());
                    scope.locals.push(local);
                }
            }
            None => {}
        }
        scope
    }

    fn exit_arrow(&mut self, scope: ArrowScope) {
        if scope.pushed_param {
            self.arrow_params.pop();
        }
        for local in scope.locals {
            self.prop_locals.remove(&local);
        }
    }

    fn rewrite_props(&mut self, expr: &Expr) -> Expr {
        match expr {
            Expr::Member { obj, prop } => {
                if let Expr::Ident(name) = &**obj
                    && self.arrow_params.iter().any(|param| param == name)
                {
                    return if is_valid_attribute(prop) {
                        Expr::member(Expr::ident("props"), prop.clone())
                    } else {
                        self.usage.record(prop);
                        Expr::Ident(prop.clone())
                    };
                }
                Expr::Member {
                    obj: Box::new(self.rewrite_props(obj)),
                    prop: prop.clone(),
                }
            }
            Expr::Ident(name) => {
                if self.arrow_params.iter().any(|param| param == name) {
                    return Expr::ident("props");
                }
                if let Some(key) = self.prop_locals.get(name) {
                    return Expr::Ident(key.clone());
                }
                expr.clone()
            }
            Expr::Template(template) => Expr::Template(Template {
                quasis: template.quasis.clone(),
                exprs: template
                    .exprs
                    .iter()
                    .map(|inner| self.rewrite_props(inner))
                    .collect(),
            }),
            Expr::Call { callee, args } => Expr::Call {
                callee: Box::new(self.rewrite_props(callee)),
                args: args.iter().map(|arg| self.rewrite_props(arg)).collect(),
            },
            Expr::Index { obj, index } => Expr::Index {
                obj: Box::new(self.rewrite_props(obj)),
                index: Box::new(self.rewrite_props(index)),
            },
            Expr::Unary { op, expr } => Expr::Unary {
                op: op.clone(),
                expr: Box::new(self.rewrite_props(expr)),
            },
            Expr::Binary { op, left, right } => Expr::Binary {
                op: op.clone(),
                left: Box::new(self.rewrite_props(left)),
                right: Box::new(self.rewrite_props(right)),
            },
            Expr::Cond { test, cons, alt } => Expr::Cond {
                test: Box::new(self.rewrite_props(test)),
                cons: Box::new(self.rewrite_props(cons)),
                alt: Box::new(self.rewrite_props(alt)),
            },
            Expr::Paren(inner) => Expr::Paren(Box::new(self.rewrite_props(inner))),
            _ => expr.clone(),
        }
    }

    /// The focused three-rule resolver: literals substitute, zero-arg
    /// arrows substitute their body, everything else stays dynamic.
    fn try_inline(&mut self, expr: &Expr) -> CompileResult<Option<Inline>> {
        match expr {
            Expr::Str(text) => Ok(Some(Inline::Text(text.clone()))),
            Expr::Num(number) => Ok(Some(Inline::Text(format_number(*number)))),
            Expr::Template(template) if template.exprs.is_empty() => {
                Ok(Some(Inline::Text(template.quasis[0].clone())))
            }
            Expr::Template(template) => {
                let mut text = String::new();
                for i in 0..template.exprs.len() {
                    text.push_str(&template.quasis[i]);
                    match self.try_inline(unwrap_parens(&template.exprs[i]))? {
                        Some(Inline::Text(piece)) => text.push_str(&piece),
                        _ => return Ok(None),
                    }
                }
                text.push_str(&template.quasis[template.exprs.len()]);
                Ok(Some(Inline::Text(text)))
            }
            Expr::Ident(name) => {
                if self.arrow_params.iter().any(|param| param == name)
                    || self.prop_locals.contains_key(name)
                {
                    return Ok(None);
                }
                if let Some(init) = self.bindings.local(name) {
                    return self.inline_binding(init);
                }
                if let Some(resolver) = self.resolver
                    && let Some((source, imported)) = self.bindings.import(name)
                    && let Some(resolved) = resolver.resolve(source, imported)
                {
                    return self.inline_binding(&resolved);
                }
                Ok(None)
            }
            Expr::Paren(inner) => self.try_inline(inner),
            _ => Ok(None),
        }
    }

    fn inline_binding(&mut self, init: &Expr) -> CompileResult<Option<Inline>> {
        match init {
            Expr::Str(_) | Expr::Num(_) | Expr::Template(_) | Expr::Ident(_) => {
                self.try_inline(init)
            }
            Expr::Object(entries) => {
                let block = self.eval_entries(entries)?;
                if block.variables.is_empty() {
                    Ok(Some(Inline::Block(block)))
                } else {
                    Ok(None)
                }
            }
            Expr::Arrow(arrow) => match &arrow.body {
                ArrowBody::Expr(body) if arrow.params.is_empty() => self.inline_binding(body),
                _ => Ok(None),
            },
            Expr::Paren(inner) => self.inline_binding(inner),
            _ => Ok(None),
        }
    }

    fn resolve_spread(&mut self, expr: &Expr) -> CompileResult<Vec<ObjectEntry>> {
        match expr {
            Expr::Object(entries) => Ok(entries.clone()),
            Expr::Ident(name) => {
                if let Some(init) = self.bindings.local(name)
                    && let Expr::Object(entries) = unwrap_parens(init)
                {
                    return Ok(entries.clone());
                }
                if let Some(resolver) = self.resolver
                    && let Some((source, imported)) = self.bindings.import(name)
                    && let Some(Expr::Object(entries)) = resolver.resolve(source, imported)
                {
                    return Ok(entries);
                }
                Err(CompileError::UnsupportedStyled {
                    detail: format!("spread of unresolvable value `{}`", name),
                })
            }
            other => Err(CompileError::UnsupportedStyled {
                detail: format!("spread of `{}` in a style object", print_expr(other)),
            }),
        }
    }
}

fn unwrap_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(inner) => unwrap_parens(inner),
        _ => expr,
    }
}

fn is_selector_key(key: &str) -> bool {
    matches!(
        key.chars().next(),
        Some(':' | '&' | '[' | '@' | '>' | '~' | '+' | '.' | '#' | '*')
    ) || key.contains(' ')
}

fn is_number(text: &str) -> bool {
    text.parse::<f64>().is_ok()
}

fn starts_with_unit(quasi: &str) -> bool {
    quasi.starts_with(|c: char| c.is_ascii_alphabetic() || c == '%')
}

const UNITS: &[&str] = &[
    "ch", "cm", "deg", "em", "ex", "fr", "grad", "in", "mm", "ms", "pc", "pt", "px", "rad", "rem",
    "s", "turn", "vh", "vmax", "vmin", "vw", "%",
];

/// Splits a leading CSS unit off the quasi following a dynamic
/// interpolation, so `` `font-size: ${f}px` `` keeps the emitted
/// `var(--…)` reference well-formed.
fn take_unit(quasi: &mut String) -> Option<String> {
    let end = quasi
        .bytes()
        .position(|b| !(b.is_ascii_alphabetic() || b == b'%'))
        .unwrap_or(quasi.len());
    if end == 0 {
        return None;
    }
    let candidate = &quasi[..end];
    if !UNITS.contains(&candidate) {
        return None;
    }
    let unit = candidate.to_string();
    quasi.replace_range(..end, "");
    Some(unit)
}

/// `expr` -> `` `${expr}unit` ``.
fn wrap_with_unit(expr: Expr, unit: String) -> Expr {
    Expr::Template(Template {
        quasis: vec![String::new(), unit],
        exprs: vec![expr],
    })
}

/// The declaration property currently open in a raw CSS buffer, used to
/// decide px suffixing for static template interpolations.
fn current_property(css: &str) -> Option<String> {
    let tail_start = css
        .rfind(|c: char| matches!(c, ';' | '{' | '}'))
        .map(|i| i + 1)
        .unwrap_or(0);
    let tail = &css[tail_start..];
    let colon = tail.find(':')?;
    let prop = tail[..colon].trim();
    if prop.is_empty() || prop.starts_with("--") {
        return None;
    }
    Some(prop.to_string())
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.is_finite() && number.abs() < 1e15 {
        (number as i64).to_string()
    } else {
        number.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_ast::parse_expr;
    use pretty_assertions::assert_eq;

    fn eval(src: &str, styled: bool) -> CssOutput {
        let bindings = Bindings::collect(&kiln_ast::parse_module("").unwrap());
        let mut evaluator = Evaluator::new(&bindings, None, styled);
        evaluator.evaluate(&parse_expr(src).unwrap()).unwrap()
    }

    fn eval_in(module_src: &str, src: &str, styled: bool) -> (CssOutput, PropsUsage) {
        let bindings = Bindings::collect(&kiln_ast::parse_module(module_src).unwrap());
        let mut evaluator = Evaluator::new(&bindings, None, styled);
        let out = evaluator.evaluate(&parse_expr(src).unwrap()).unwrap();
        (out, evaluator.usage)
    }

    #[test]
    fn test_object_declarations() {
        let out = eval(r#"{ fontSize: 20, color: "blue" }"#, false);
        assert_eq!(out.css, "font-size:20px;color:blue;");
        assert!(out.variables.is_empty());
    }

    #[test]
    fn test_unitless_number_value() {
        let out = eval("{ lineHeight: 1.5, zIndex: 10 }", false);
        assert_eq!(out.css, "line-height:1.5;z-index:10;");
    }

    #[test]
    fn test_nested_selector_key() {
        let out = eval(r#"{ ":hover": { color: "red" } }"#, false);
        assert_eq!(out.css, ":hover{color:red;}");
    }

    #[test]
    fn test_shorthand_becomes_variable() {
        let out = eval("{ color }", false);
        let name = css_variable_name(&Expr::ident("color"));
        assert_eq!(out.css, format!("color:var({});", name));
        assert_eq!(out.variables, vec![(name, Expr::ident("color"))]);
    }

    #[test]
    fn test_spread_flattens_in_source_order() {
        let (out, _) = eval_in(
            r#"const base = { margin: 0, color: "red" };"#,
            r#"{ ...base, color: "blue" }"#,
            false,
        );
        assert_eq!(out.css, "margin:0px;color:red;color:blue;");
    }

    #[test]
    fn test_template_inlines_local_const() {
        let (out, _) = eval_in(
            r#"const color = "blue";"#,
            r#"`color: ${color};`"#,
            false,
        );
        assert_eq!(out.css, "color: blue;");
        assert!(out.variables.is_empty());
    }

    #[test]
    fn test_template_inlines_zero_arg_arrow() {
        let (out, _) = eval_in(
            r#"const accent = () => "purple";"#,
            r#"`color: ${accent};`"#,
            false,
        );
        assert_eq!(out.css, "color: purple;");
    }

    #[test]
    fn test_template_unresolved_becomes_variable() {
        let (out, _) = eval_in("", r#"`color: ${theme};`"#, false);
        let name = css_variable_name(&Expr::ident("theme"));
        assert_eq!(out.css, format!("color: var({});", name));
        assert_eq!(out.variables, vec![(name, Expr::ident("theme"))]);
    }

    #[test]
    fn test_duplicate_variables_coalesce() {
        let (out, _) = eval_in("", r#"`color: ${c}; border-color: ${c};`"#, false);
        assert_eq!(out.variables.len(), 1);
    }

    #[test]
    fn test_static_number_interpolation_gets_px() {
        let (out, _) = eval_in(r#"const gap = 8;"#, r#"`margin: ${gap};`"#, false);
        assert_eq!(out.css, "margin: 8px;");
    }

    #[test]
    fn test_number_before_unit_is_untouched() {
        let (out, _) = eval_in(r#"const gap = 8;"#, r#"`margin: ${gap}em;`"#, false);
        assert_eq!(out.css, "margin: 8em;");
    }

    #[test]
    fn test_dynamic_interpolation_absorbs_unit() {
        let (out, usage) = eval_in("", "`font-size: ${p => p.size}px;`", true);
        assert_eq!(out.variables.len(), 1);
        let (name, value) = &out.variables[0];
        assert_eq!(out.css, format!("font-size: var({});", name));
        assert_eq!(kiln_ast::print_expr(value), "`${size}px`");
        assert_eq!(usage.destructured, vec!["size".to_string()]);
    }

    #[test]
    fn test_props_arrow_valid_attribute_stays_on_rest() {
        let (out, usage) = eval_in("", "`cursor: ${p => p.title};`", true);
        assert!(usage.destructured.is_empty());
        assert_eq!(kiln_ast::print_expr(&out.variables[0].1), "props.title");
    }

    #[test]
    fn test_styled_arrow_over_object() {
        let (out, usage) = eval_in("", "(p) => ({ color: p.tone })", true);
        let (name, value) = &out.variables[0];
        assert_eq!(out.css, format!("color:var({});", name));
        assert_eq!(kiln_ast::print_expr(value), "tone");
        assert_eq!(usage.destructured, vec!["tone".to_string()]);
    }

    #[test]
    fn test_destructured_props_param() {
        let (out, usage) = eval_in("", "({ size }) => ({ width: size })", true);
        assert_eq!(usage.destructured, vec!["size".to_string()]);
        assert_eq!(kiln_ast::print_expr(&out.variables[0].1), "size");
        assert!(out.css.starts_with("width:var(--kln-"));
    }

    #[test]
    fn test_array_concatenates() {
        let out = eval(r#"[{ color: "red" }, "font-weight: 700"]"#, false);
        assert_eq!(out.css, "color:red;font-weight: 700");
    }

    #[test]
    fn test_arrow_rejected_outside_styled() {
        let bindings = Bindings::collect(&kiln_ast::parse_module("").unwrap());
        let mut evaluator = Evaluator::new(&bindings, None, false);
        let err = evaluator
            .evaluate(&parse_expr("{ color: p => p.tone }").unwrap())
            .unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedStyled { .. }));
    }

    #[test]
    fn test_empty_object_is_empty_output() {
        let out = eval("{}", false);
        assert_eq!(out, CssOutput::new());
    }
}
