//! Deterministic compact code printer.
//!
//! Output is a pure function of the tree: one statement per line, single
//! spaces inside braces, double-quoted strings. Running a transform twice
//! over identical input therefore prints byte-identical modules.

use crate::ast::*;

pub fn print_module(module: &Module) -> String {
    let mut out = String::new();
    for item in &module.body {
        print_item(item, &mut out);
        out.push('\n');
    }
    out
}

pub fn print_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(expr, &mut out);
    out
}

fn print_item(item: &Item, out: &mut String) {
    match item {
        Item::Import(import) => write_import(import, out),
        Item::Var(decl) => write_var(decl, out),
        Item::ExportVar(decl) => {
            out.push_str("export ");
            write_var(decl, out);
        }
        Item::ExportDefault(expr) => {
            out.push_str("export default ");
            write_expr(expr, out);
            out.push(';');
        }
        Item::Expr(expr) => {
            write_expr(expr, out);
            out.push(';');
        }
    }
}

fn write_import(import: &ImportDecl, out: &mut String) {
    out.push_str("import ");
    if import.specifiers.is_empty() {
        write_str_literal(&import.source, out);
        out.push(';');
        return;
    }
    let mut named_open = false;
    for (i, spec) in import.specifiers.iter().enumerate() {
        match spec {
            ImportSpecifier::Default { local } => {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(local);
            }
            ImportSpecifier::Namespace { local } => {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str("* as ");
                out.push_str(local);
            }
            ImportSpecifier::Named { imported, local } => {
                if named_open {
                    out.push_str(", ");
                } else {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str("{ ");
                    named_open = true;
                }
                out.push_str(imported);
                if local != imported {
                    out.push_str(" as ");
                    out.push_str(local);
                }
            }
        }
    }
    if named_open {
        out.push_str(" }");
    }
    out.push_str(" from ");
    write_str_literal(&import.source, out);
    out.push(';');
}

fn write_var(decl: &VarDecl, out: &mut String) {
    out.push_str(match decl.kind {
        VarKind::Const => "const ",
        VarKind::Let => "let ",
        VarKind::Var => "var ",
    });
    out.push_str(&decl.name);
    out.push_str(" = ");
    write_expr(&decl.init, out);
    out.push(';');
}

fn write_expr(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Str(value) => write_str_literal(value, out),
        Expr::Num(value) => write_num(*value, out),
        Expr::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
        Expr::Null => out.push_str("null"),
        Expr::Ident(name) => out.push_str(name),
        Expr::Template(template) => write_template(template, out),
        Expr::TaggedTemplate { tag, quasi } => {
            write_expr(tag, out);
            write_template(quasi, out);
        }
        Expr::Object(entries) => write_object(entries, out),
        Expr::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(item, out);
            }
            out.push(']');
        }
        Expr::Arrow(arrow) => write_arrow(arrow, out),
        Expr::Call { callee, args } => {
            let wrap = matches!(**callee, Expr::Arrow(_) | Expr::Cond { .. } | Expr::Binary { .. });
            if wrap {
                out.push('(');
            }
            write_expr(callee, out);
            if wrap {
                out.push(')');
            }
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(arg, out);
            }
            out.push(')');
        }
        Expr::Member { obj, prop } => {
            let wrap = matches!(
                **obj,
                Expr::Arrow(_) | Expr::Cond { .. } | Expr::Binary { .. } | Expr::Object(_) | Expr::Num(_)
            );
            if wrap {
                out.push('(');
            }
            write_expr(obj, out);
            if wrap {
                out.push(')');
            }
            out.push('.');
            out.push_str(prop);
        }
        Expr::Index { obj, index } => {
            write_expr(obj, out);
            out.push('[');
            write_expr(index, out);
            out.push(']');
        }
        Expr::Unary { op, expr } => {
            out.push_str(op);
            if op.chars().all(|c| c.is_ascii_alphabetic()) {
                out.push(' ');
            }
            write_expr(expr, out);
        }
        Expr::Binary { op, left, right } => {
            write_expr(left, out);
            out.push(' ');
            out.push_str(op);
            out.push(' ');
            write_expr(right, out);
        }
        Expr::Cond { test, cons, alt } => {
            write_expr(test, out);
            out.push_str(" ? ");
            write_expr(cons, out);
            out.push_str(" : ");
            write_expr(alt, out);
        }
        Expr::Paren(inner) => {
            out.push('(');
            write_expr(inner, out);
            out.push(')');
        }
        Expr::Jsx(element) => write_jsx(element, out),
    }
}

fn write_object(entries: &[ObjectEntry], out: &mut String) {
    if entries.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{ ");
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match entry {
            ObjectEntry::Prop { key, value } => {
                match key {
                    PropKey::Ident(name) => out.push_str(name),
                    PropKey::Str(name) => write_str_literal(name, out),
                }
                out.push_str(": ");
                write_expr(value, out);
            }
            ObjectEntry::Shorthand(name) => out.push_str(name),
            ObjectEntry::Spread(expr) => {
                out.push_str("...");
                write_expr(expr, out);
            }
        }
    }
    out.push_str(" }");
}

fn write_arrow(arrow: &ArrowFn, out: &mut String) {
    out.push('(');
    for (i, param) in arrow.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_pat(param, out);
    }
    out.push_str(") => ");
    match &arrow.body {
        ArrowBody::Expr(expr) => {
            // An object-literal body needs parens to not read as a block.
            if matches!(**expr, Expr::Object(_)) {
                out.push('(');
                write_expr(expr, out);
                out.push(')');
            } else {
                write_expr(expr, out);
            }
        }
        ArrowBody::Block(stmts) => {
            out.push('{');
            for stmt in stmts {
                out.push(' ');
                match stmt {
                    BlockStmt::Var(decl) => write_var(decl, out),
                    BlockStmt::Return(None) => out.push_str("return;"),
                    BlockStmt::Return(Some(expr)) => {
                        out.push_str("return ");
                        write_expr(expr, out);
                        out.push(';');
                    }
                    BlockStmt::Expr(expr) => {
                        write_expr(expr, out);
                        out.push(';');
                    }
                }
            }
            out.push_str(" }");
        }
    }
}

fn write_pat(pat: &Pat, out: &mut String) {
    match pat {
        Pat::Ident(name) => out.push_str(name),
        Pat::Object { props, rest } => {
            out.push_str("{ ");
            let mut first = true;
            for prop in props {
                if !first {
                    out.push_str(", ");
                }
                first = false;
                out.push_str(&prop.key);
                if let Some(alias) = &prop.alias {
                    out.push_str(": ");
                    out.push_str(alias);
                }
                if let Some(default) = &prop.default {
                    out.push_str(" = ");
                    write_expr(default, out);
                }
            }
            if let Some(rest) = rest {
                if !first {
                    out.push_str(", ");
                }
                out.push_str("...");
                out.push_str(rest);
            }
            out.push_str(" }");
        }
    }
}

fn write_template(template: &Template, out: &mut String) {
    out.push('`');
    for (i, quasi) in template.quasis.iter().enumerate() {
        out.push_str(quasi);
        if i < template.exprs.len() {
            out.push_str("${");
            write_expr(&template.exprs[i], out);
            out.push('}');
        }
    }
    out.push('`');
}

fn write_jsx(element: &JsxElement, out: &mut String) {
    out.push('<');
    write_jsx_name(&element.name, out);
    for attr in &element.attrs {
        out.push(' ');
        match attr {
            JsxAttr::Named { name, value } => {
                out.push_str(name);
                match value {
                    None => {}
                    Some(JsxAttrValue::Str(text)) => {
                        out.push_str("=\"");
                        out.push_str(text);
                        out.push('"');
                    }
                    Some(JsxAttrValue::Expr(None)) => out.push_str("={}"),
                    Some(JsxAttrValue::Expr(Some(expr))) => {
                        out.push_str("={");
                        write_expr(expr, out);
                        out.push('}');
                    }
                }
            }
            JsxAttr::Spread(expr) => {
                out.push_str("{...");
                write_expr(expr, out);
                out.push('}');
            }
        }
    }
    if element.self_closing {
        out.push_str(" />");
        return;
    }
    out.push('>');
    for child in &element.children {
        match child {
            JsxChild::Element(nested) => write_jsx(nested, out),
            JsxChild::Text(text) => out.push_str(text),
            JsxChild::Expr(None) => out.push_str("{}"),
            JsxChild::Expr(Some(expr)) => {
                out.push('{');
                write_expr(expr, out);
                out.push('}');
            }
        }
    }
    out.push_str("</");
    write_jsx_name(&element.name, out);
    out.push('>');
}

fn write_jsx_name(name: &JsxName, out: &mut String) {
    match name {
        JsxName::Ident(ident) => out.push_str(ident),
        JsxName::Member(parts) => out.push_str(&parts.join(".")),
    }
}

fn write_str_literal(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

fn write_num(value: f64, out: &mut String) {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        out.push_str(&(value as i64).to_string());
    } else {
        out.push_str(&value.to_string());
    }
}
