//! Builds the output JSX for styled components and css-prop call sites.

use kiln_ast::{
    ArrowBody, ArrowFn, Expr, JsxAttr, JsxAttrValue, JsxChild, JsxElement, JsxName, ObjectEntry,
    Pat, PatProp, PropKey,
};

/// What a styled component renders when no `as` prop overrides it.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// An HTML element, emitted as a string-literal tag default.
    InBuilt(String),
    /// A referenced component, emitted as an identifier default.
    UserDefined(String),
}

fn tag_expr(tag: &Tag) -> Expr {
    match tag {
        Tag::InBuilt(name) => Expr::str(name.clone()),
        Tag::UserDefined(name) => Expr::ident(name.clone()),
    }
}

fn ax_call(parts: Vec<Expr>) -> Expr {
    Expr::call(Expr::ident("ax"), vec![Expr::Array(parts)])
}

fn cs_element(sheet_idents: &[String], nonce: Option<&str>) -> JsxElement {
    let mut attrs = Vec::new();
    if let Some(nonce) = nonce {
        attrs.push(JsxAttr::Named {
            name: "nonce".into(),
            value: Some(JsxAttrValue::Expr(Some(Expr::ident(nonce)))),
        });
    }
    let sheets = Expr::Array(
        sheet_idents
            .iter()
            .map(|ident| Expr::ident(ident.clone()))
            .collect(),
    );
    JsxElement {
        name: JsxName::Ident("CS".into()),
        attrs,
        children: vec![JsxChild::Expr(Some(sheets))],
        self_closing: false,
    }
}

fn cc_wrapper(sheet_idents: &[String], nonce: Option<&str>, element: JsxElement) -> JsxElement {
    let mut children = Vec::new();
    if !sheet_idents.is_empty() {
        children.push(JsxChild::Element(cs_element(sheet_idents, nonce)));
    }
    children.push(JsxChild::Element(element));
    JsxElement {
        name: JsxName::Ident("CC".into()),
        attrs: Vec::new(),
        children,
        self_closing: false,
    }
}

/// Emits the forwardRef wrapper for a styled call site:
///
/// ```jsx
/// React.forwardRef(({ as: C = TAG, style, SIZE…, ...props }, ref) => (
///   <CC>
///     <CS>{[_s0…]}</CS>
///     <C {...props} style={…} ref={ref} className={ax([…])} />
///   </CC>
/// ))
/// ```
pub fn styled_component(
    tag: &Tag,
    class_names: &[String],
    sheet_idents: &[String],
    variables: Vec<(String, Expr)>,
    destructured: &[String],
    nonce: Option<&str>,
) -> Expr {
    let mut pat_props = vec![
        PatProp {
            key: "as".into(),
            alias: Some("C".into()),
            default: Some(tag_expr(tag)),
        },
        PatProp {
            key: "style".into(),
            alias: None,
            default: None,
        },
    ];
    for name in destructured {
        pat_props.push(PatProp {
            key: name.clone(),
            alias: None,
            default: None,
        });
    }
    let params = vec![
        Pat::Object {
            props: pat_props,
            rest: Some("props".into()),
        },
        Pat::Ident("ref".into()),
    ];

    let style_value = if variables.is_empty() {
        Expr::ident("style")
    } else {
        let mut entries = vec![ObjectEntry::Spread(Expr::ident("style"))];
        for (name, expr) in variables {
            entries.push(ObjectEntry::Prop {
                key: PropKey::Str(name),
                value: expr,
            });
        }
        Expr::Object(entries)
    };

    let mut class_parts: Vec<Expr> = class_names
        .iter()
        .map(|class| Expr::str(class.clone()))
        .collect();
    class_parts.push(Expr::member(Expr::ident("props"), "className"));

    let inner = JsxElement {
        name: JsxName::Ident("C".into()),
        attrs: vec![
            JsxAttr::Spread(Expr::ident("props")),
            JsxAttr::Named {
                name: "style".into(),
                value: Some(JsxAttrValue::Expr(Some(style_value))),
            },
            JsxAttr::Named {
                name: "ref".into(),
                value: Some(JsxAttrValue::Expr(Some(Expr::ident("ref")))),
            },
            JsxAttr::Named {
                name: "className".into(),
                value: Some(JsxAttrValue::Expr(Some(ax_call(class_parts)))),
            },
        ],
        children: Vec::new(),
        self_closing: true,
    };

    let wrapper = cc_wrapper(sheet_idents, nonce, inner);
    let render = Expr::Arrow(Box::new(ArrowFn {
        params,
        body: ArrowBody::Expr(Box::new(Expr::Jsx(Box::new(wrapper)))),
    }));
    Expr::call(Expr::member(Expr::ident("React"), "forwardRef"), vec![render])
}

/// Rewrites a css-prop element: merges class names, merges the style
/// attribute when variables exist, and wraps in `<CC>`/`<CS>` when the
/// site produced sheets or variables. A site with neither only rewrites
/// `className`.
pub fn css_prop_element(
    mut element: JsxElement,
    class_names: &[String],
    sheet_idents: &[String],
    variables: Vec<(String, Expr)>,
    nonce: Option<&str>,
) -> JsxElement {
    let has_variables = !variables.is_empty();

    let existing_class = match element.remove_attr("className") {
        Some(JsxAttr::Named { value, .. }) => match value {
            Some(JsxAttrValue::Str(text)) => Some(Expr::Str(text)),
            Some(JsxAttrValue::Expr(Some(expr))) => Some(expr),
            _ => None,
        },
        _ => None,
    };

    if has_variables {
        let existing_style = match element.remove_attr("style") {
            Some(JsxAttr::Named { value, .. }) => match value {
                Some(JsxAttrValue::Expr(Some(expr))) => Some(expr),
                _ => None,
            },
            _ => None,
        };
        // Original entries come first so declaration order is preserved.
        let mut entries = match existing_style {
            Some(Expr::Object(props)) => props,
            Some(other) => vec![ObjectEntry::Spread(other)],
            None => Vec::new(),
        };
        for (name, expr) in variables {
            entries.push(ObjectEntry::Prop {
                key: PropKey::Str(name),
                value: expr,
            });
        }
        element.attrs.push(JsxAttr::Named {
            name: "style".into(),
            value: Some(JsxAttrValue::Expr(Some(Expr::Object(entries)))),
        });
    }

    let mut class_parts: Vec<Expr> = class_names
        .iter()
        .map(|class| Expr::str(class.clone()))
        .collect();
    if let Some(existing) = existing_class {
        class_parts.push(existing);
    }
    if !class_parts.is_empty() {
        let value = match class_parts.as_slice() {
            [Expr::Str(single)] => JsxAttrValue::Str(single.clone()),
            _ => JsxAttrValue::Expr(Some(ax_call(class_parts))),
        };
        element.attrs.push(JsxAttr::Named {
            name: "className".into(),
            value: Some(value),
        });
    }

    if sheet_idents.is_empty() && !has_variables {
        return element;
    }
    cc_wrapper(sheet_idents, nonce, element)
}
