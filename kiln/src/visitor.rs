//! The entry visitor.
//!
//! Walks one module in source order: detects and rewrites the runtime
//! import, dispatches styled and css-prop call sites to the evaluator and
//! emitter, injects the React namespace import when missing, and inserts
//! the hoisted sheet constants.

use kiln_ast::{
    ArrowBody, BlockStmt, Expr, ImportDecl, ImportSpecifier, Item, JsxAttr, JsxAttrValue,
    JsxChild, JsxElement, JsxName, Module,
};
use kiln_css::atomize_with;

use crate::emit::{self, Tag};
use crate::error::{CompileError, CompileResult};
use crate::eval::{CssOutput, Evaluator};
use crate::hoist;
use crate::state::{Bindings, ModuleState, RUNTIME_MODULE, RuntimeImport};

pub fn run(module: &mut Module, state: &mut ModuleState) -> CompileResult<bool> {
    if !rewrite_imports(module, state) {
        return Ok(false);
    }
    let bindings = Bindings::collect(module);
    for item in &mut module.body {
        match item {
            Item::Var(decl) | Item::ExportVar(decl) => {
                visit_expr(&mut decl.init, state, &bindings)?;
            }
            Item::ExportDefault(expr) | Item::Expr(expr) => visit_expr(expr, state, &bindings)?,
            Item::Import(_) => {}
        }
    }
    if !bindings.has("React") {
        module.body.insert(
            0,
            Item::Import(ImportDecl {
                specifiers: vec![ImportSpecifier::Namespace {
                    local: "React".into(),
                }],
                source: "react".into(),
            }),
        );
    }
    hoist::insert_hoisted(module, state);
    Ok(true)
}

/// Marks the module opted in when it imports the runtime package. The
/// `styled` specifier is removed (recording its local name) and the
/// runtime helpers are appended; they are tree-shakeable downstream.
fn rewrite_imports(module: &mut Module, state: &mut ModuleState) -> bool {
    for item in &mut module.body {
        let Item::Import(import) = item else { continue };
        if import.source != RUNTIME_MODULE || state.runtime_import.is_some() {
            continue;
        }
        let mut styled_local = None;
        import.specifiers.retain(|spec| match spec {
            ImportSpecifier::Named { imported, local } if imported == "styled" => {
                styled_local = Some(local.clone());
                false
            }
            _ => true,
        });
        for helper in ["ax", "CC", "CS"] {
            let present = import.specifiers.iter().any(|spec| {
                matches!(spec, ImportSpecifier::Named { imported, .. } if imported == helper)
            });
            if !present {
                import.specifiers.push(ImportSpecifier::Named {
                    imported: helper.into(),
                    local: helper.into(),
                });
            }
        }
        tracing::trace!(source = RUNTIME_MODULE, "rewrote runtime import");
        state.runtime_import = Some(RuntimeImport { styled_local });
    }
    state.runtime_import.is_some()
}

fn visit_expr(expr: &mut Expr, state: &mut ModuleState, bindings: &Bindings) -> CompileResult<()> {
    if let Some((tag, styles)) = match_styled(expr, state) {
        *expr = transform_styled(&tag, &styles, state, bindings)?;
        return Ok(());
    }
    match expr {
        Expr::Jsx(element) => {
            visit_element(element, state, bindings)?;
            if element.attr("css").is_some() {
                let Expr::Jsx(boxed) = std::mem::replace(expr, Expr::Null) else {
                    unreachable!()
                };
                *expr = Expr::Jsx(Box::new(transform_css_prop(*boxed, state, bindings)?));
            }
            Ok(())
        }
        Expr::Template(template) => {
            for inner in &mut template.exprs {
                visit_expr(inner, state, bindings)?;
            }
            Ok(())
        }
        Expr::TaggedTemplate { tag, quasi } => {
            visit_expr(tag, state, bindings)?;
            for inner in &mut quasi.exprs {
                visit_expr(inner, state, bindings)?;
            }
            Ok(())
        }
        Expr::Object(entries) => {
            for entry in entries {
                match entry {
                    kiln_ast::ObjectEntry::Prop { value, .. } => {
                        visit_expr(value, state, bindings)?;
                    }
                    kiln_ast::ObjectEntry::Spread(value) => visit_expr(value, state, bindings)?,
                    kiln_ast::ObjectEntry::Shorthand(_) => {}
                }
            }
            Ok(())
        }
        Expr::Array(items) => {
            for item in items {
                visit_expr(item, state, bindings)?;
            }
            Ok(())
        }
        Expr::Arrow(arrow) => {
            match &mut arrow.body {
                ArrowBody::Expr(body) => visit_expr(body, state, bindings)?,
                ArrowBody::Block(stmts) => {
                    for stmt in stmts {
                        match stmt {
                            BlockStmt::Var(decl) => visit_expr(&mut decl.init, state, bindings)?,
                            BlockStmt::Return(Some(value)) | BlockStmt::Expr(value) => {
                                visit_expr(value, state, bindings)?;
                            }
                            BlockStmt::Return(None) => {}
                        }
                    }
                }
            }
            Ok(())
        }
        Expr::Call { callee, args } => {
            visit_expr(callee, state, bindings)?;
            for arg in args {
                visit_expr(arg, state, bindings)?;
            }
            Ok(())
        }
        Expr::Member { obj, .. } => visit_expr(obj, state, bindings),
        Expr::Index { obj, index } => {
            visit_expr(obj, state, bindings)?;
            visit_expr(index, state, bindings)
        }
        Expr::Unary { expr: inner, .. } => visit_expr(inner, state, bindings),
        Expr::Binary { left, right, .. } => {
            visit_expr(left, state, bindings)?;
            visit_expr(right, state, bindings)
        }
        Expr::Cond { test, cons, alt } => {
            visit_expr(test, state, bindings)?;
            visit_expr(cons, state, bindings)?;
            visit_expr(alt, state, bindings)
        }
        Expr::Paren(inner) => visit_expr(inner, state, bindings),
        Expr::Str(_) | Expr::Num(_) | Expr::Bool(_) | Expr::Null | Expr::Ident(_) => Ok(()),
    }
}

fn visit_element(
    element: &mut JsxElement,
    state: &mut ModuleState,
    bindings: &Bindings,
) -> CompileResult<()> {
    for attr in &mut element.attrs {
        match attr {
            JsxAttr::Named {
                name,
                value: Some(JsxAttrValue::Expr(Some(value))),
            } if name != "css" => visit_expr(value, state, bindings)?,
            JsxAttr::Spread(value) => visit_expr(value, state, bindings)?,
            _ => {}
        }
    }
    for child in &mut element.children {
        match child {
            JsxChild::Element(nested) => {
                visit_element(nested, state, bindings)?;
                if nested.attr("css").is_some() {
                    let owned = std::mem::replace(nested, placeholder_element());
                    *nested = transform_css_prop(owned, state, bindings)?;
                }
            }
            JsxChild::Expr(Some(value)) => visit_expr(value, state, bindings)?,
            _ => {}
        }
    }
    Ok(())
}

fn placeholder_element() -> JsxElement {
    JsxElement {
        name: JsxName::Ident(String::new()),
        attrs: Vec::new(),
        children: Vec::new(),
        self_closing: true,
    }
}

fn match_styled(expr: &Expr, state: &ModuleState) -> Option<(Tag, Vec<Expr>)> {
    let styled_local = state.styled_local()?;
    match expr {
        Expr::TaggedTemplate { tag, quasi } => {
            let tag = styled_tag(tag, styled_local)?;
            Some((tag, vec![Expr::Template(quasi.clone())]))
        }
        Expr::Call { callee, args } => {
            let tag = styled_tag(callee, styled_local)?;
            Some((tag, args.clone()))
        }
        _ => None,
    }
}

/// `styled.div`, `styled("div")` and `styled(Component)` callee shapes.
fn styled_tag(expr: &Expr, styled_local: &str) -> Option<Tag> {
    match expr {
        Expr::Member { obj, prop } => match &**obj {
            Expr::Ident(name) if name == styled_local => Some(Tag::InBuilt(prop.clone())),
            _ => None,
        },
        Expr::Call { callee, args } => {
            let Expr::Ident(name) = &**callee else {
                return None;
            };
            if name != styled_local || args.len() != 1 {
                return None;
            }
            match &args[0] {
                Expr::Ident(component) => Some(Tag::UserDefined(component.clone())),
                Expr::Str(tag) => Some(Tag::InBuilt(tag.clone())),
                _ => None,
            }
        }
        _ => None,
    }
}

fn transform_styled(
    tag: &Tag,
    styles: &[Expr],
    state: &mut ModuleState,
    bindings: &Bindings,
) -> CompileResult<Expr> {
    let resolver = state.options.resolver.as_deref();
    let mut evaluator = Evaluator::new(bindings, resolver, true);
    let mut output = CssOutput::new();
    for style in styles {
        let piece = evaluator.evaluate(style)?;
        output.absorb(piece);
    }
    let atomized = atomize_with(&output.css, &mut state.class_names);
    let idents = hoist::idents_for(state, &atomized.sheets);
    state.styled_sites += 1;
    Ok(emit::styled_component(
        tag,
        &atomized.class_names,
        &idents,
        output.variables,
        &evaluator.usage.destructured,
        state.options.nonce.as_deref(),
    ))
}

fn transform_css_prop(
    mut element: JsxElement,
    state: &mut ModuleState,
    bindings: &Bindings,
) -> CompileResult<JsxElement> {
    let context = format!("css prop on <{}>", jsx_name_text(&element.name));
    let value = match element.remove_attr("css") {
        Some(JsxAttr::Named { value, .. }) => value,
        _ => None,
    };
    let style_expr = match value {
        Some(JsxAttrValue::Expr(Some(expr))) => expr,
        Some(JsxAttrValue::Str(text)) => Expr::Str(text),
        Some(JsxAttrValue::Expr(None)) | None => {
            return Err(CompileError::EmptyExpression { context });
        }
    };
    let resolver = state.options.resolver.as_deref();
    let mut evaluator = Evaluator::new(bindings, resolver, false);
    let output = evaluator.evaluate(&style_expr)?;
    let atomized = atomize_with(&output.css, &mut state.class_names);
    let idents = hoist::idents_for(state, &atomized.sheets);
    state.css_prop_sites += 1;
    Ok(emit::css_prop_element(
        element,
        &atomized.class_names,
        &idents,
        output.variables,
        state.options.nonce.as_deref(),
    ))
}

fn jsx_name_text(name: &JsxName) -> String {
    match name {
        JsxName::Ident(ident) => ident.clone(),
        JsxName::Member(parts) => parts.join("."),
    }
}
