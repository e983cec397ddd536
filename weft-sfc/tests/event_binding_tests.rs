use weft_sfc::{CompileError, Compiler, CompilerConfig, EventBinding};

#[test]
fn method_call_is_decomposed() {
    let b = EventBinding::parse("comp.on_click(event, row)").unwrap();
    assert_eq!(b.receiver.as_deref(), Some("comp"));
    assert_eq!(b.method, "on_click");
    assert_eq!(b.args, "event, row");
    assert_eq!(b.call_expr(), "comp.on_click(event, row)");
    assert_eq!(b.function_hash(), None);
}

#[test]
fn receiver_may_be_a_path_expression() {
    let b = EventBinding::parse("data.rows[i].toggle()").unwrap();
    assert_eq!(b.receiver.as_deref(), Some("data.rows[i]"));
    assert_eq!(b.method, "toggle");
    assert_eq!(b.args, "");
}

#[test]
fn free_function_has_static_hash() {
    let b = EventBinding::parse("handlers::reset(event)").unwrap();
    assert_eq!(b.receiver, None);
    assert_eq!(b.method, "handlers::reset");
    assert_eq!(b.function_hash(), Some(weft_dom::function_hash("handlers::reset")));
}

#[test]
fn garbage_is_rejected() {
    assert!(EventBinding::parse("???").is_err());
    assert!(EventBinding::parse("comp.on_click").is_err());
    assert!(EventBinding::parse("comp.(x)").is_err());
    assert!(EventBinding::parse("(a + b)").is_err());
}

#[test]
fn handler_emission_shape() {
    let rs = Compiler::new(CompilerConfig::default())
        .generate(r#"<button @click="comp.on_click(event)">go</button>"#)
        .unwrap();
    assert!(rs.contains("// @click = { comp.on_click(event) }"));
    let check_at = rs.find("let _ = comp.on_click(event);").unwrap();
    let handler_at = rs.find(r#"n.set_dom_event_handler("click""#).unwrap();
    assert!(check_at < handler_at, "type check precedes the handler");
    assert!(rs.contains("let receiver_words_ = (comp).receiver_words();"));
    assert!(rs.contains(r#"let method_words_ = (comp).method_words("on_click");"#));
    let call_at = rs.rfind("let _ = comp.on_click(event);").unwrap();
    assert!(handler_at < call_at, "the closure calls the live component");
    assert!(!rs.contains("receiver_ ="), "the component is never copied");
    syn::parse_file(&rs).unwrap();
}

#[test]
fn component_handler_dispatches_to_live_component() {
    let rs = Compiler::new(CompilerConfig::default())
        .generate(r#"<button @click="comp.form.submit()">go</button>"#)
        .unwrap();
    let closure_at = rs.find("move |component_: &dyn ::std::any::Any, event: &DomEvent| {").unwrap();
    let downcast_at = rs
        .find("let comp = component_.downcast_ref::<Self>().ok_or_else(weft_dom::BuildError::component_type::<Self>)?;")
        .unwrap();
    let call_at = rs.rfind("let _ = comp.form.submit();").unwrap();
    assert!(closure_at < downcast_at && downcast_at < call_at);
    assert!(!rs.contains("receiver_ ="));
    syn::parse_file(&rs).unwrap();
}

#[test]
fn borrowed_arguments_are_captured_before_the_closure() {
    let rs = Compiler::new(CompilerConfig::default())
        .generate(r#"<ul><li v-for="row in data.rows.iter()"><a @click="comp.pick(row, event, data.rows.len())">x</a></li></ul>"#)
        .unwrap();
    let row_at = rs.find("let arg_0_ = (&weft_dom::Arg(&(row))).capture();").unwrap();
    let len_at = rs.find("let arg_2_ = (&weft_dom::Arg(&(data.rows.len()))).capture();").unwrap();
    let closure_at = rs.find("move |component_").unwrap();
    assert!(row_at < closure_at && len_at < closure_at);
    assert!(rs.contains("let _ = comp.pick(arg_0_.get(), event, arg_2_.get());"));
    assert!(!rs.contains("arg_1_"), "event is taken from the dispatch");
    syn::parse_file(&rs).unwrap();
}

#[test]
fn arguments_split_at_top_level_commas() {
    let b = EventBinding::parse(r#"comp.on(f(a, b), [c, d], "e,f", event)"#).unwrap();
    assert_eq!(b.arg_list(), vec!["f(a, b)", "[c, d]", r#""e,f""#, "event"]);
    assert!(EventBinding::parse("comp.on()").unwrap().arg_list().is_empty());
}

#[test]
fn other_receivers_are_snapshotted() {
    let rs = Compiler::new(CompilerConfig::default())
        .generate(r#"<ul><li v-for="row in data.rows.iter()"><a @click="row.open(event)">x</a></li></ul>"#)
        .unwrap();
    assert!(rs.contains("let receiver_ = (&weft_dom::Arg(&(row))).capture();"));
    assert!(rs.contains("move |_component: &dyn ::std::any::Any, event: &DomEvent| {"));
    assert!(rs.contains("let _ = receiver_.get().open(event);"));
    syn::parse_file(&rs).unwrap();
}

#[test]
fn self_receiver_is_rebound_to_the_component() {
    let rs = Compiler::new(CompilerConfig::default())
        .generate(r#"<button @click="self.reset()">go</button>"#)
        .unwrap();
    let compact = rs.replace(' ', "");
    assert!(compact.contains("let_=comp.reset();"), "{rs}");
    assert!(rs.contains("downcast_ref::<Self>()"));
}

#[test]
fn free_function_emission_uses_literal_hash() {
    let rs = Compiler::new(CompilerConfig::default())
        .generate(r#"<button @click="reset(event)">go</button>"#)
        .unwrap();
    let hash = format!("{:#018x}_u64", weft_dom::function_hash("reset"));
    assert!(rs.contains(&hash));
    assert!(!rs.contains("receiver_words"));
    assert!(rs.contains("move |_component: &dyn ::std::any::Any, event: &DomEvent| {"));
    assert!(rs.contains("let _ = reset(event);"));
}

#[test]
fn events_are_emitted_in_name_order() {
    let rs = Compiler::new(CompilerConfig::default())
        .generate(r#"<div @mouseover="comp.a()" @click="comp.b()"></div>"#)
        .unwrap();
    let click = rs.find(r#"set_dom_event_handler("click""#).unwrap();
    let over = rs.find(r#"set_dom_event_handler("mouseover""#).unwrap();
    assert!(click < over);
}

#[test]
fn bad_handler_aborts_compilation() {
    let err = Compiler::new(CompilerConfig::default())
        .generate(r#"<div><a @click="???">x</a></div>"#)
        .unwrap_err();
    match err {
        CompileError::Directive(e) => assert_eq!(e.expr, "???"),
        other => panic!("unexpected error {other:?}"),
    }
}
