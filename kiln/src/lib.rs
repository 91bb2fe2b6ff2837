//! kiln — build-time CSS-in-JS extraction.
//!
//! A single-pass compiler over one JSX module: recognises the `styled`
//! factory and the `css` prop, partially evaluates style expressions into
//! static atomic CSS plus runtime CSS-variable bindings, and rewrites the
//! tree to reference hoisted rule constants and the runtime helpers
//! (`ax`, `CC`, `CS`). Modules that do not import the runtime package are
//! left untouched.
//!
//! ```
//! use kiln::{TransformOptions, transform_module};
//! use kiln_ast::{parse_module, print_module};
//!
//! let mut module = parse_module(
//!     r#"import "@kiln/runtime"; <div css={{ color: "blue" }} />;"#,
//! )
//! .unwrap();
//! transform_module(&mut module, &TransformOptions::default()).unwrap();
//! assert!(print_module(&module).contains("className"));
//! ```

use serde::{Deserialize, Serialize};

pub mod emit;
pub mod error;
pub mod eval;
mod hoist;
mod html;
mod state;
mod visitor;

pub use error::{CompileError, CompileResult};
pub use eval::{CssOutput, css_variable_name};
pub use state::RUNTIME_MODULE;

pub mod ast {
    pub use kiln_ast::*;
}

pub mod css {
    pub use kiln_css::*;
}

/// Resolves an import to the expression it would evaluate to, enabling
/// cross-module inlining in full-program mode. Without one, imported
/// bindings degrade to CSS variables.
pub trait ModuleResolver {
    fn resolve(&self, source: &str, imported: &str) -> Option<kiln_ast::Expr>;
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Identifier threaded onto every emitted `<CS>` as `nonce={…}`.
    pub nonce: Option<String>,
    #[serde(skip)]
    pub resolver: Option<Box<dyn ModuleResolver>>,
}

/// Transforms one module in place. Returns whether the module opted in
/// (and was therefore changed).
pub fn transform_module(
    module: &mut kiln_ast::Module,
    options: &TransformOptions,
) -> CompileResult<bool> {
    let mut state = state::ModuleState::new(options);
    let changed = visitor::run(module, &mut state)?;
    if changed {
        tracing::debug!(
            styled = state.styled_sites,
            css_props = state.css_prop_sites,
            sheets = state.sheets.len(),
            "extracted styles from module"
        );
    }
    Ok(changed)
}
