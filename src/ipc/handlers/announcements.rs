use crate::ipc::handlers::views::{self, Page};
use crate::ipc::types::{AppState, Pages, Request};
use crate::listview::ListViewController;
use crate::records::Announcement;

fn slot(pages: &mut Pages) -> &mut Option<ListViewController<Announcement>> {
    &mut pages.announcements
}

const PAGE: Page<Announcement> = Page {
    name: "announcements",
    slot,
};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "announcements.open" => Some(views::handle_open(state, req, &PAGE)),
        "announcements.close" => Some(views::handle_close(state, req, &PAGE)),
        "announcements.view" => Some(views::handle_view(state, req, &PAGE)),
        "announcements.create" => Some(views::handle_create(state, req, &PAGE)),
        "announcements.update" => Some(views::handle_update(state, req, &PAGE)),
        "announcements.delete" => Some(views::handle_delete(state, req, &PAGE)),
        "announcements.form.open" => Some(views::handle_form_open(state, req, &PAGE)),
        "announcements.form.cancel" => Some(views::handle_form_cancel(state, req, &PAGE)),
        _ => None,
    }
}
