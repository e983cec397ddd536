//! Assembles the generated source file around the tree walk's output.

use quote::quote;

use crate::code_writer::CodeWriter;
use crate::config::CompilerConfig;
use crate::directives::Directives;
use crate::error::CompileError;
use crate::sfc::Sfc;
use crate::template_ast::Fragment;
use crate::template_codegen::{node_literal, write_tree};

pub const GENERATED_HEADER: &str = "// Code generated by weft. DO NOT EDIT.";

const RUNTIME_IMPORTS: &str = "use weft_dom::{Atom, Attribute, BuildOutput, CaptureBorrowed as _, CaptureOwned as _, DomEvent, DomEventHandler, HandlerIdentity as _, NodeRef, NodeType, VNode};";

/// Unformatted program text for a classified fragment.
///
/// The impl lives in a private module that glob-imports its parent, so the
/// runtime imports shadow rather than collide with whatever the embedded
/// code imports itself.
pub fn emit_program(fragment: &Fragment, sfc: &Sfc, config: &CompilerConfig) -> Result<String, CompileError> {
    let comp_ty = parse_type("component", &config.component_type)?;
    parse_type("data", &config.data_type)?;
    let embedded = sfc.embedded_code(fragment)?;

    let mut w = CodeWriter::new();
    w.line(GENERATED_HEADER);
    w.blank();

    if let Some(code) = embedded {
        w.verbatim(code.trim_matches('\n'));
        w.blank();
    }

    let assertion = quote! {
        const _: fn() = || {
            fn assert_component<T: ?Sized + weft_dom::Component>() {}
            assert_component::<#comp_ty>();
        };
    };
    w.line(assertion.to_string());
    w.blank();

    w.line("#[allow(unused_imports, non_snake_case)]");
    w.open(format!("mod {} {{", module_name(&config.component_type)));
    w.line("use super::*;");
    w.line(RUNTIME_IMPORTS);
    w.blank();

    w.open(format!("impl weft_dom::BuildVdom for {} {{", config.component_type));
    w.line("#[allow(unused_variables, unused_mut, unused_assignments, unused_braces, clippy::all)]");
    w.open(
        "fn build_vdom(&self, data_i: &dyn ::std::any::Any) -> ::std::result::Result<BuildOutput, weft_dom::BuildError> {",
    );
    write_preamble(&mut w, &config.data_type);

    if let Some((style, text)) = sfc.style_text(fragment) {
        let style = fragment.node(style);
        let attrs = Directives::extract(style).static_attrs;
        w.line(format!("let style = {};", node_literal(style, &attrs)));
        w.line(format!("style.append_child(&{});", node_literal(fragment.node(text), &[])));
        w.line("css = Some(style);");
        w.blank();
    }

    w.line("let mut n: NodeRef;");
    write_tree(fragment, sfc.root, &mut w)?;
    w.blank();
    w.line("Ok(BuildOutput { vdom, css })");

    w.close(); // fn
    w.close(); // impl
    w.close(); // mod
    debug_assert_eq!(w.depth(), 0);
    Ok(w.finish())
}

fn write_preamble(w: &mut CodeWriter, data_ty: &str) {
    w.line("let comp = self;");
    w.line(format!(
        "let data = data_i.downcast_ref::<{data_ty}>().ok_or_else(weft_dom::BuildError::data_type::<{data_ty}>)?;"
    ));
    w.line("let _ = (comp, data);");
    // handlers are type-checked against this; the real event arrives at dispatch
    w.line("let event = &DomEvent::stub();");
    w.line("let _ = event;");
    w.blank();
    w.line("let mut vdom: Option<NodeRef> = None;");
    w.line("let mut css: Option<NodeRef> = None;");
    w.blank();
}

fn parse_type(what: &str, ty: &str) -> Result<syn::Type, CompileError> {
    syn::parse_str(ty).map_err(|e| CompileError::Config(format!("{what} type {ty:?}: {e}")))
}

fn module_name(component_ty: &str) -> String {
    let mut name = String::from("__weft_vdom_");
    let mut prev_underscore = true;
    for c in component_ty.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
            prev_underscore = false;
        } else if !prev_underscore {
            name.push('_');
            prev_underscore = true;
        }
    }
    name.trim_end_matches('_').to_string()
}
