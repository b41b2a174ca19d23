use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::SqlRecord;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::{AppState, Pages, Request};
use crate::listview::{CategoryFilter, ListRecord, ListViewController, SortDirection};
use crate::records::Attachment;
use crate::store::{Backend, MemoryTable};

/// A record type every store backend can hold and the wire can carry.
pub trait PageRecord: ListRecord + SqlRecord + MemoryTable + Serialize {}

impl<T: ListRecord + SqlRecord + MemoryTable + Serialize> PageRecord for T {}

/// One portal page: its method prefix and where its state lives.
pub struct Page<R: ListRecord> {
    pub name: &'static str,
    pub slot: fn(&mut Pages) -> &mut Option<ListViewController<R>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ViewQuery {
    category: Option<String>,
    search: Option<String>,
    sort_direction: Option<SortDirection>,
}

impl ViewQuery {
    fn apply<R: ListRecord>(self, ctrl: &mut ListViewController<R>) {
        if let Some(c) = self.category {
            ctrl.set_category_filter(CategoryFilter::parse(&c));
        }
        if let Some(s) = self.search {
            ctrl.set_search_query(s);
        }
        if let Some(d) = self.sort_direction {
            ctrl.set_sort_direction(d);
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdParams {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UpdateParams<P> {
    id: String,
    #[serde(flatten)]
    patch: P,
}

#[derive(Debug, Deserialize)]
struct NameParams {
    name: String,
}

/// Missing params deserialize as an empty object.
pub fn parse_params<T: DeserializeOwned>(params: &serde_json::Value) -> Result<T, HandlerErr> {
    let raw = if params.is_null() {
        json!({})
    } else {
        params.clone()
    };
    serde_json::from_value(raw).map_err(|e| HandlerErr::bad_params(e.to_string()))
}

pub fn view_json<R: PageRecord>(ctrl: &ListViewController<R>) -> serde_json::Value {
    let records = ctrl.derive_view();
    json!({
        "records": records,
        "shown": records.len(),
        "total": ctrl.len(),
        "criteria": {
            "category": ctrl.category_filter().as_str(),
            "search": ctrl.search_query(),
            "sortDirection": ctrl.sort_direction(),
        },
        "form": {
            "open": ctrl.form().is_open(),
            "attachments": ctrl.form().attachments(),
        },
    })
}

/// Runs `f` against a mounted page and the active store.
pub fn with_page<R: PageRecord, T>(
    state: &mut AppState,
    page: &Page<R>,
    f: impl FnOnce(&mut ListViewController<R>, &mut Backend<'_>) -> Result<T, HandlerErr>,
) -> Result<T, HandlerErr> {
    let (mut backend, pages) = state.split();
    let Some(ctrl) = (page.slot)(pages).as_mut() else {
        return Err(HandlerErr::new(
            "view_not_open",
            format!("{} is not open", page.name),
        ));
    };
    f(ctrl, &mut backend)
}

pub fn handle_open<R: PageRecord>(
    state: &mut AppState,
    req: &Request,
    page: &Page<R>,
) -> serde_json::Value {
    let result = parse_params::<ViewQuery>(&req.params).and_then(|query| {
        let (backend, pages) = state.split();
        let mut ctrl = ListViewController::<R>::mount(&backend)?;
        query.apply(&mut ctrl);
        let view = view_json(&ctrl);
        *(page.slot)(pages) = Some(ctrl);
        tracing::debug!(page = page.name, "page opened");
        Ok(view)
    });
    respond(&req.id, result)
}

pub fn handle_close<R: PageRecord>(
    state: &mut AppState,
    req: &Request,
    page: &Page<R>,
) -> serde_json::Value {
    let was_open = (page.slot)(&mut state.pages).take().is_some();
    respond(&req.id, Ok(json!({ "closed": was_open })))
}

pub fn handle_view<R: PageRecord>(
    state: &mut AppState,
    req: &Request,
    page: &Page<R>,
) -> serde_json::Value {
    let result = parse_params::<ViewQuery>(&req.params).and_then(|query| {
        with_page(state, page, |ctrl, _| {
            query.apply(ctrl);
            Ok(view_json(ctrl))
        })
    });
    respond(&req.id, result)
}

/// Creates a record from an already parsed draft and returns it with the
/// refreshed view.
pub fn create_record<R: PageRecord>(
    state: &mut AppState,
    page: &Page<R>,
    build_draft: impl FnOnce(&ListViewController<R>) -> R::Draft,
) -> Result<serde_json::Value, HandlerErr> {
    with_page(state, page, |ctrl, store| {
        let draft = build_draft(ctrl);
        let created = ctrl.create(store, draft)?;
        Ok(json!({ "record": created, "view": view_json(ctrl) }))
    })
}

pub fn handle_create<R: PageRecord>(
    state: &mut AppState,
    req: &Request,
    page: &Page<R>,
) -> serde_json::Value
where
    R::Draft: DeserializeOwned,
{
    let result = parse_params::<R::Draft>(&req.params)
        .and_then(|draft| create_record(state, page, move |_| draft));
    respond(&req.id, result)
}

pub fn handle_update<R: PageRecord>(
    state: &mut AppState,
    req: &Request,
    page: &Page<R>,
) -> serde_json::Value
where
    R::Patch: DeserializeOwned,
{
    let result = parse_params::<UpdateParams<R::Patch>>(&req.params).and_then(|p| {
        with_page(state, page, |ctrl, store| {
            let updated = ctrl.update(store, &p.id, p.patch)?;
            Ok(json!({ "record": updated, "view": view_json(ctrl) }))
        })
    });
    respond(&req.id, result)
}

pub fn handle_delete<R: PageRecord>(
    state: &mut AppState,
    req: &Request,
    page: &Page<R>,
) -> serde_json::Value {
    let result = parse_params::<IdParams>(&req.params).and_then(|p| {
        with_page(state, page, |ctrl, store| {
            let removed = ctrl.delete(store, &p.id)?;
            Ok(json!({
                "deleted": removed.is_some(),
                "record": removed,
                "view": view_json(ctrl),
            }))
        })
    });
    respond(&req.id, result)
}

pub fn handle_form_open<R: PageRecord>(
    state: &mut AppState,
    req: &Request,
    page: &Page<R>,
) -> serde_json::Value {
    let result = with_page(state, page, |ctrl, _| {
        ctrl.open_form();
        Ok(view_json(ctrl))
    });
    respond(&req.id, result)
}

pub fn handle_form_cancel<R: PageRecord>(
    state: &mut AppState,
    req: &Request,
    page: &Page<R>,
) -> serde_json::Value {
    let result = with_page(state, page, |ctrl, _| {
        ctrl.cancel_form();
        Ok(view_json(ctrl))
    });
    respond(&req.id, result)
}

pub fn handle_form_attach<R: PageRecord>(
    state: &mut AppState,
    req: &Request,
    page: &Page<R>,
) -> serde_json::Value {
    let result = parse_params::<Attachment>(&req.params).and_then(|file| {
        with_page(state, page, |ctrl, _| {
            ctrl.attach(file)?;
            Ok(view_json(ctrl))
        })
    });
    respond(&req.id, result)
}

pub fn handle_form_detach<R: PageRecord>(
    state: &mut AppState,
    req: &Request,
    page: &Page<R>,
) -> serde_json::Value {
    let result = parse_params::<NameParams>(&req.params).and_then(|p| {
        with_page(state, page, |ctrl, _| {
            let removed = ctrl.detach(&p.name);
            Ok(json!({ "removed": removed, "view": view_json(ctrl) }))
        })
    });
    respond(&req.id, result)
}
