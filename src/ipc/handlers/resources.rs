use crate::ipc::error::respond;
use crate::ipc::handlers::views::{self, Page};
use crate::ipc::types::{AppState, Pages, Request};
use crate::listview::ListViewController;
use crate::records::{Resource, ResourceDraft};

fn lecturer_slot(pages: &mut Pages) -> &mut Option<ListViewController<Resource>> {
    &mut pages.lecturer_resources
}

fn student_slot(pages: &mut Pages) -> &mut Option<ListViewController<Resource>> {
    &mut pages.student_resources
}

const LECTURER: Page<Resource> = Page {
    name: "lecturer.resources",
    slot: lecturer_slot,
};

// Students browse the same collection read-only.
const STUDENT: Page<Resource> = Page {
    name: "student.resources",
    slot: student_slot,
};

/// Files selected in the open form are attached to the new resource.
fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let result = views::parse_params::<ResourceDraft>(&req.params).and_then(|mut draft| {
        views::create_record(state, &LECTURER, move |ctrl| {
            for file in ctrl.form().attachments() {
                if !draft.files.iter().any(|f| f.name == file.name) {
                    draft.files.push(file.clone());
                }
            }
            draft
        })
    });
    respond(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "lecturer.resources.open" => Some(views::handle_open(state, req, &LECTURER)),
        "lecturer.resources.close" => Some(views::handle_close(state, req, &LECTURER)),
        "lecturer.resources.view" => Some(views::handle_view(state, req, &LECTURER)),
        "lecturer.resources.create" => Some(handle_create(state, req)),
        "lecturer.resources.update" => Some(views::handle_update(state, req, &LECTURER)),
        "lecturer.resources.delete" => Some(views::handle_delete(state, req, &LECTURER)),
        "lecturer.resources.form.open" => Some(views::handle_form_open(state, req, &LECTURER)),
        "lecturer.resources.form.cancel" => {
            Some(views::handle_form_cancel(state, req, &LECTURER))
        }
        "lecturer.resources.form.attach" => {
            Some(views::handle_form_attach(state, req, &LECTURER))
        }
        "lecturer.resources.form.detach" => {
            Some(views::handle_form_detach(state, req, &LECTURER))
        }
        "student.resources.open" => Some(views::handle_open(state, req, &STUDENT)),
        "student.resources.close" => Some(views::handle_close(state, req, &STUDENT)),
        "student.resources.view" => Some(views::handle_view(state, req, &STUDENT)),
        _ => None,
    }
}
