use weft_sfc::{Compiler, CompilerConfig, GENERATED_HEADER};

fn generate(src: &str) -> String {
    Compiler::new(CompilerConfig::default()).generate(src).unwrap()
}

#[test]
fn codegen_div_with_text() {
    let rs = generate("<div>hi</div>");
    assert!(rs.starts_with(GENERATED_HEADER));
    assert!(rs.contains("impl weft_dom::BuildVdom for Root {"));
    assert!(rs.contains("downcast_ref::<RootData>()"));
    assert!(rs.contains(r#"VNode::new(NodeType::Element, "div""#));
    assert!(rs.contains(r#"VNode::new(NodeType::Text, "hi""#));
    assert!(rs.contains("vdom = Some(n.clone());"));
    assert!(rs.contains("parent.append_child(&n);"));
    assert!(rs.trim_end().ends_with('}'));
    syn::parse_file(&rs).expect("generated program parses");
}

#[test]
fn plain_template_has_no_control_flow() {
    let rs = generate(r#"<ul class="list"><li>a</li><li>b</li></ul>"#);
    let control = rs
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("if ") || l.starts_with("for "))
        .count();
    assert_eq!(control, 0);
    assert!(!rs.contains("set_dom_event_handler"));
    assert!(rs.contains(r#"Attribute::new("", "class", "list")"#));
}

#[test]
fn output_is_deterministic() {
    let src = r#"<div :b="data.b" :a="data.a" @mouseover="comp.hover()" @click="comp.click()">x</div>"#;
    assert_eq!(generate(src), generate(src));
}

#[test]
fn props_are_sorted_by_name() {
    let rs = generate(r#"<div :zeta="data.z" :alpha="data.a" :mid="1"></div>"#);
    let alpha = rs.find(r#""alpha" => data.a,"#).unwrap();
    let mid = rs.find(r#""mid" => 1,"#).unwrap();
    let zeta = rs.find(r#""zeta" => data.z,"#).unwrap();
    assert!(alpha < mid && mid < zeta);
    assert!(rs.contains("n.set_props(weft_dom::props! {"));
}

#[test]
fn directive_attributes_are_not_static() {
    let rs = generate(r#"<p v-if="data.on" :title="data.t" @click="comp.c()" id="k"></p>"#);
    assert!(rs.contains(r#"vec![Attribute::new("", "id", "k")]"#));
    assert!(!rs.contains(r#""v-if""#));
    assert!(!rs.contains(r#"":title""#));
}

#[test]
fn inner_html_uses_display() {
    let rs = generate(r#"<div v-html="data.body"></div>"#);
    assert!(rs.contains(r#"n.set_inner_html(format!("{}", data.body));"#));
}

#[test]
fn style_node_becomes_css() {
    let rs = generate("<div></div><style>.a { color: red; }</style>");
    assert!(rs.contains(r#"let style = NodeRef::new(VNode::new(NodeType::Element, "style""#));
    assert!(rs.contains(".a { color: red; }"));
    assert!(rs.contains("css = Some(style);"));
    let css_at = rs.find("css = Some(style);").unwrap();
    let walk_at = rs.find("let mut n: NodeRef;").unwrap();
    assert!(css_at < walk_at);
}

#[test]
fn style_node_keeps_only_static_attributes() {
    let rs = generate(r#"<div></div><style v-if="data.dark" :scoped="true" media="screen">.a {}</style>"#);
    let style_line = rs.lines().find(|l| l.contains("let style = ")).unwrap();
    assert!(style_line.contains(r#"Attribute::new("", "media", "screen")"#), "{style_line}");
    assert!(!style_line.contains("v-if"));
    assert!(!style_line.contains(":scoped"));
    syn::parse_file(&rs).unwrap();
}

#[test]
fn embedded_code_is_spliced_before_the_impl() {
    let src = "<div></div>\n<script type=\"application/x-rust\">\npub struct Root;\npub struct RootData;\n</script>";
    let rs = generate(src);
    let code_at = rs.find("pub struct Root;").unwrap();
    let impl_at = rs.find("impl weft_dom::BuildVdom").unwrap();
    assert!(code_at < impl_at);
    assert!(rs.replace(' ', "").contains("assert_component::<Root>();"));
}

#[test]
fn configured_types_are_used() {
    let config = CompilerConfig::default()
        .with_component_type("crate::ui::Board")
        .with_data_type("crate::ui::BoardData");
    let rs = Compiler::new(config).generate("<div></div>").unwrap();
    assert!(rs.contains("impl weft_dom::BuildVdom for crate::ui::Board {"));
    assert!(rs.contains("downcast_ref::<crate::ui::BoardData>()"));
}

#[test]
fn invalid_type_is_a_config_error() {
    let config = CompilerConfig::default().with_data_type("Root Data");
    let err = Compiler::new(config).generate("<div></div>").unwrap_err();
    assert!(matches!(err, weft_sfc::CompileError::Config(_)));
}
