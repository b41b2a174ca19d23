use crate::calc;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::handlers::views::{self, Page};
use crate::ipc::types::{AppState, Pages, Request};
use crate::listview::ListViewController;
use crate::records::Grade;

fn slot(pages: &mut Pages) -> &mut Option<ListViewController<Grade>> {
    &mut pages.grades
}

const PAGE: Page<Grade> = Page {
    name: "grades",
    slot,
};

/// Weighted total over every grade on the page, independent of the current
/// filter.
fn handle_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let result = views::with_page(state, &PAGE, |ctrl, _| {
        let summary = calc::grade_summary(ctrl.records());
        if !summary.weights_complete {
            tracing::debug!(weight_sum = summary.weight_sum, "grade weights do not sum to 100");
        }
        serde_json::to_value(summary)
            .map_err(|e| HandlerErr::new("serialize_failed", e.to_string()))
    });
    respond(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.open" => Some(views::handle_open(state, req, &PAGE)),
        "grades.close" => Some(views::handle_close(state, req, &PAGE)),
        "grades.view" => Some(views::handle_view(state, req, &PAGE)),
        "grades.summary" => Some(handle_summary(state, req)),
        _ => None,
    }
}
