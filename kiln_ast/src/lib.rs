//! AST, parser and printer for the JS/JSX subset the kiln compiler
//! transforms.
//!
//! The compiler pass in `kiln` consumes and mutates [`Module`] trees;
//! this crate owns the node types, module-scope lookups, a
//! recursive-descent parser and a deterministic printer.

pub mod ast;
pub mod parser;
pub mod printer;

pub use ast::*;
pub use parser::{ParseError, parse_expr, parse_module};
pub use printer::{print_expr, print_module};

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn print_stable(src: &str) -> String {
        let first = print_module(&parse_module(src).unwrap());
        let second = print_module(&parse_module(&first).unwrap());
        assert_eq!(first, second);
        first
    }

    #[test]
    fn test_parse_imports() {
        let module = parse_module(indoc! {r#"
            import * as React from 'react';
            import Default, { styled as s, css } from "@kiln/runtime";
            import "./side-effect";
        "#})
        .unwrap();
        assert_eq!(module.body.len(), 3);
        assert!(module.has_binding("React"));
        assert!(module.has_binding("s"));
        assert!(!module.has_binding("styled"));
        assert_eq!(module.leading_imports(), 3);
    }

    #[test]
    fn test_parse_var_and_lookup() {
        let module = parse_module(r#"const color = "blue"; let size = 12;"#).unwrap();
        let decl = module.lookup_var("color").unwrap();
        assert_eq!(decl.init, Expr::Str("blue".into()));
        assert_eq!(module.lookup_var("size").unwrap().init, Expr::Num(12.0));
    }

    #[test]
    fn test_parse_object_literal() {
        let expr = parse_expr(r#"{ fontSize: 20, "color": primary, nested, ...rest }"#).unwrap();
        let Expr::Object(entries) = expr else {
            panic!("expected object");
        };
        assert_eq!(entries.len(), 4);
        assert_eq!(
            entries[0],
            ObjectEntry::Prop {
                key: PropKey::Ident("fontSize".into()),
                value: Expr::Num(20.0),
            }
        );
        assert_eq!(entries[2], ObjectEntry::Shorthand("nested".into()));
        assert_eq!(entries[3], ObjectEntry::Spread(Expr::ident("rest")));
    }

    #[test]
    fn test_parse_template_with_interpolations() {
        let expr = parse_expr("`font-size: ${size}px;`").unwrap();
        let Expr::Template(template) = expr else {
            panic!("expected template");
        };
        assert_eq!(template.quasis, vec!["font-size: ", "px;"]);
        assert_eq!(template.exprs, vec![Expr::ident("size")]);
    }

    #[test]
    fn test_parse_arrow_forms() {
        let single = parse_expr("p => p.size").unwrap();
        let Expr::Arrow(arrow) = single else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.params, vec![Pat::Ident("p".into())]);

        let destructured = parse_expr("({ size, as: C = \"div\", ...rest }) => size").unwrap();
        let Expr::Arrow(arrow) = destructured else {
            panic!("expected arrow");
        };
        let Pat::Object { props, rest } = &arrow.params[0] else {
            panic!("expected object pattern");
        };
        assert_eq!(props.len(), 2);
        assert_eq!(props[1].alias.as_deref(), Some("C"));
        assert_eq!(props[1].default, Some(Expr::Str("div".into())));
        assert_eq!(rest.as_deref(), Some("rest"));
    }

    #[test]
    fn test_paren_object_is_not_a_pattern() {
        let expr = parse_expr("(p) => ({ color: p.color })").unwrap();
        let Expr::Arrow(arrow) = expr else {
            panic!("expected arrow");
        };
        assert!(matches!(arrow.body, ArrowBody::Expr(ref body) if matches!(**body, Expr::Object(_))));
    }

    #[test]
    fn test_parse_tagged_template() {
        let expr = parse_expr("styled.div`color: red;`").unwrap();
        let Expr::TaggedTemplate { tag, .. } = expr else {
            panic!("expected tagged template");
        };
        assert_eq!(*tag, Expr::member(Expr::ident("styled"), "div"));
    }

    #[test]
    fn test_parse_jsx() {
        let expr = parse_expr(r#"<div css={{ color: "blue" }} id="a">hello {name}</div>"#).unwrap();
        let Expr::Jsx(element) = expr else {
            panic!("expected JSX");
        };
        assert_eq!(element.name, JsxName::Ident("div".into()));
        assert_eq!(element.attrs.len(), 2);
        assert!(element.attr("css").is_some());
        assert_eq!(element.children.len(), 2);
        assert_eq!(element.children[0], JsxChild::Text("hello".into()));
    }

    #[test]
    fn test_parse_jsx_spread_and_member_name() {
        let expr = parse_expr("<Theme.Provider {...props} value={1} />").unwrap();
        let Expr::Jsx(element) = expr else {
            panic!("expected JSX");
        };
        assert_eq!(
            element.name,
            JsxName::Member(vec!["Theme".into(), "Provider".into()])
        );
        assert!(element.self_closing);
        assert_eq!(element.attrs[0], JsxAttr::Spread(Expr::ident("props")));
    }

    #[test]
    fn test_empty_jsx_expression_container() {
        let expr = parse_expr("<div css={} />").unwrap();
        let Expr::Jsx(element) = expr else {
            panic!("expected JSX");
        };
        let JsxAttr::Named { value, .. } = element.attr("css").unwrap() else {
            panic!("expected named attr");
        };
        assert_eq!(value, &Some(JsxAttrValue::Expr(None)));
    }

    #[test]
    fn test_print_is_stable() {
        let printed = print_stable(indoc! {r#"
            import { styled } from "@kiln/runtime";
            const color = 'blue';
            export const Button = styled.div`
              font-size: ${p => p.size}px;
              color: ${color};
            `;
            export default <Button size={12}>go</Button>;
        "#});
        assert!(printed.contains("export const Button = styled.div`"));
        assert!(printed.contains("${(p) => p.size}px"));
    }

    #[test]
    fn test_print_shapes() {
        let module = parse_module(
            r#"const x = cond ? { a: 1 } : [1, 2]; <CS nonce={n}>{[_s0]}</CS>;"#,
        )
        .unwrap();
        let printed = print_module(&module);
        assert_eq!(
            printed,
            "const x = cond ? { a: 1 } : [1, 2];\n<CS nonce={n}>{[_s0]}</CS>;\n"
        );
    }

    #[test]
    fn test_comments_are_trivia() {
        let module = parse_module(indoc! {r#"
            // leading comment
            const a = 1; /* inline */ const b = 2;
        "#})
        .unwrap();
        assert_eq!(module.body.len(), 2);
    }

    #[test]
    fn test_parse_error_carries_location() {
        let err = parse_module("const x = ;").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.to_string().contains("parse error"));
    }
}
