use serde::Deserialize;
use serde_json::json;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::handlers::views::parse_params;
use crate::ipc::types::{AppState, Request};
use crate::shell::ClassShell;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenParams {
    class_id: String,
}

#[derive(Debug, Deserialize)]
struct TabParams {
    tab: String,
}

fn no_class_open() -> HandlerErr {
    HandlerErr::new("class_not_open", "open a class first")
}

fn handle_classes_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    respond(&req.id, Ok(json!({ "classes": state.classes })))
}

fn handle_class_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let result = parse_params::<OpenParams>(&req.params).and_then(|p| {
        let shell = ClassShell::open(&state.classes, &p.class_id)?;
        let out = shell.to_json();
        tracing::debug!(class_id = %p.class_id, "class opened");
        state.class_shell = Some(shell);
        Ok(out)
    });
    respond(&req.id, result)
}

fn handle_class_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let result = state
        .class_shell
        .as_ref()
        .map(ClassShell::to_json)
        .ok_or_else(no_class_open);
    respond(&req.id, result)
}

fn handle_class_select_tab(state: &mut AppState, req: &Request) -> serde_json::Value {
    let result = parse_params::<TabParams>(&req.params).and_then(|p| {
        let shell = state.class_shell.as_mut().ok_or_else(no_class_open)?;
        shell.select_tab(&p.tab)?;
        Ok(shell.to_json())
    });
    respond(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.list" => Some(handle_classes_list(state, req)),
        "class.open" => Some(handle_class_open(state, req)),
        "class.get" => Some(handle_class_get(state, req)),
        "class.selectTab" => Some(handle_class_select_tab(state, req)),
        _ => None,
    }
}
