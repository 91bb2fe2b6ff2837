//! Node types for the supported JS/JSX subset.
//!
//! The tree is deliberately small: module items, the expression forms a
//! styling pass has to understand, and JSX. Everything derives `PartialEq`
//! so transforms can be asserted structurally.

/// One parsed module.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub body: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Import(ImportDecl),
    Var(VarDecl),
    ExportVar(VarDecl),
    ExportDefault(Expr),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    Default { local: String },
    Namespace { local: String },
    Named { imported: String, local: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub name: String,
    pub init: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    Ident(String),
    Template(Template),
    TaggedTemplate { tag: Box<Expr>, quasi: Template },
    Object(Vec<ObjectEntry>),
    Array(Vec<Expr>),
    Arrow(Box<ArrowFn>),
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Member { obj: Box<Expr>, prop: String },
    Index { obj: Box<Expr>, index: Box<Expr> },
    Unary { op: String, expr: Box<Expr> },
    Binary { op: String, left: Box<Expr>, right: Box<Expr> },
    Cond { test: Box<Expr>, cons: Box<Expr>, alt: Box<Expr> },
    Paren(Box<Expr>),
    Jsx(Box<JsxElement>),
}

/// A template literal: `quasis` always has one more element than `exprs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub quasis: Vec<String>,
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    Prop { key: PropKey, value: Expr },
    Shorthand(String),
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Ident(String),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFn {
    pub params: Vec<Pat>,
    pub body: ArrowBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block(Vec<BlockStmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockStmt {
    Var(VarDecl),
    Return(Option<Expr>),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pat {
    Ident(String),
    Object { props: Vec<PatProp>, rest: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatProp {
    pub key: String,
    pub alias: Option<String>,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    pub name: JsxName,
    pub attrs: Vec<JsxAttr>,
    pub children: Vec<JsxChild>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxName {
    Ident(String),
    /// A dotted component reference such as `Theme.Provider`.
    Member(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttr {
    Named { name: String, value: Option<JsxAttrValue> },
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttrValue {
    Str(String),
    /// An expression container; `None` is the empty container `{}`.
    Expr(Option<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxChild {
    Element(JsxElement),
    Text(String),
    /// An expression container child; `None` is the empty container.
    Expr(Option<Expr>),
}

impl Module {
    /// Looks up a module-level variable declaration by name.
    pub fn lookup_var(&self, name: &str) -> Option<&VarDecl> {
        self.body.iter().find_map(|item| match item {
            Item::Var(decl) | Item::ExportVar(decl) if decl.name == name => Some(decl),
            _ => None,
        })
    }

    /// Whether any module-level binding (import local or variable) uses
    /// this name.
    pub fn has_binding(&self, name: &str) -> bool {
        self.body.iter().any(|item| match item {
            Item::Import(import) => import.specifiers.iter().any(|spec| match spec {
                ImportSpecifier::Default { local }
                | ImportSpecifier::Namespace { local }
                | ImportSpecifier::Named { local, .. } => local == name,
            }),
            Item::Var(decl) | Item::ExportVar(decl) => decl.name == name,
            _ => false,
        })
    }

    /// Number of leading import declarations; hoisted constants are
    /// inserted at this index.
    pub fn leading_imports(&self) -> usize {
        self.body
            .iter()
            .take_while(|item| matches!(item, Item::Import(_)))
            .count()
    }
}

impl Expr {
    pub fn str(value: impl Into<String>) -> Expr {
        Expr::Str(value.into())
    }

    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Ident(name.into())
    }

    pub fn member(obj: Expr, prop: impl Into<String>) -> Expr {
        Expr::Member {
            obj: Box::new(obj),
            prop: prop.into(),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }
}

impl JsxElement {
    pub fn attr(&self, name: &str) -> Option<&JsxAttr> {
        self.attrs.iter().find(|attr| match attr {
            JsxAttr::Named { name: attr_name, .. } => attr_name == name,
            JsxAttr::Spread(_) => false,
        })
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<JsxAttr> {
        let index = self.attrs.iter().position(|attr| match attr {
            JsxAttr::Named { name: attr_name, .. } => attr_name == name,
            JsxAttr::Spread(_) => false,
        })?;
        Some(self.attrs.remove(index))
    }
}
