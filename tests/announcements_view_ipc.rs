mod test_support;

use serde_json::json;
use test_support::{error_code, record_ids, request, request_ok, spawn_sidecar};

#[test]
fn announcements_sort_filter_and_search() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let closed = request(&mut stdin, &mut reader, "1", "announcements.view", json!({}));
    assert_eq!(error_code(&closed), "view_not_open");

    let opened = request_ok(&mut stdin, &mut reader, "2", "announcements.open", json!({}));
    assert_eq!(opened["total"], 5);
    assert_eq!(opened["criteria"]["category"], "all");
    assert_eq!(opened["criteria"]["sortDirection"], "desc");
    // ann-2 and ann-5 share a timestamp and keep their seed order.
    assert_eq!(
        record_ids(&opened),
        vec!["ann-4", "ann-3", "ann-2", "ann-5", "ann-1"]
    );

    let asc = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "announcements.view",
        json!({ "sortDirection": "asc" }),
    );
    assert_eq!(
        record_ids(&asc),
        vec!["ann-1", "ann-2", "ann-5", "ann-3", "ann-4"]
    );

    let academic = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "announcements.view",
        json!({ "category": "Academic", "sortDirection": "desc" }),
    );
    assert_eq!(record_ids(&academic), vec!["ann-2", "ann-5"]);
    assert_eq!(academic["shown"], 2);
    assert_eq!(academic["total"], 5);

    let searched = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "announcements.view",
        json!({ "search": "DEADLINE" }),
    );
    assert_eq!(record_ids(&searched), vec!["ann-5"]);

    // Search also covers the author field; category filter still applies.
    let by_author = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "announcements.view",
        json!({ "category": "all", "search": "library services" }),
    );
    assert_eq!(record_ids(&by_author), vec!["ann-3"]);

    let reset = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "announcements.view",
        json!({ "search": "" }),
    );
    assert_eq!(reset["shown"], 5);

    let bad = request(
        &mut stdin,
        &mut reader,
        "8",
        "announcements.view",
        json!({ "sortDirection": "sideways" }),
    );
    assert_eq!(error_code(&bad), "bad_params");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn announcements_create_update_delete() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(&mut stdin, &mut reader, "1", "announcements.open", json!({}));

    let _ = request_ok(&mut stdin, &mut reader, "2", "announcements.form.open", json!({}));
    let invalid = request(
        &mut stdin,
        &mut reader,
        "3",
        "announcements.create",
        json!({ "title": "Room change", "content": "", "category": "General" }),
    );
    assert_eq!(error_code(&invalid), "validation_failed");
    assert_eq!(invalid["error"]["details"]["field"], "content");

    let still_open = request_ok(&mut stdin, &mut reader, "4", "announcements.view", json!({}));
    assert_eq!(still_open["form"]["open"], true);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "announcements.create",
        json!({
            "title": "Room change",
            "content": "CS101 moves to B-310 this week.",
            "category": "urgent",
            "date": "2024-03-05T08:00:00"
        }),
    );
    let new_id = created["record"]["id"].as_str().expect("new id").to_string();
    assert!(!new_id.is_empty());
    assert_eq!(created["record"]["category"], "Urgent");
    assert_eq!(created["record"]["author"], "Lecturer");
    assert_eq!(created["view"]["form"]["open"], false);
    assert_eq!(created["view"]["total"], 6);
    assert_eq!(record_ids(&created["view"])[0], new_id);

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "announcements.update",
        json!({ "id": new_id, "title": "Room change (CS101)", "pinned": true }),
    );
    assert_eq!(updated["record"]["title"], "Room change (CS101)");
    assert_eq!(updated["record"]["pinned"], true);

    let missing = request(
        &mut stdin,
        &mut reader,
        "7",
        "announcements.update",
        json!({ "id": "ann-404", "title": "x" }),
    );
    assert_eq!(error_code(&missing), "not_found");

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "announcements.delete",
        json!({ "id": new_id }),
    );
    assert_eq!(deleted["deleted"], true);
    assert_eq!(deleted["view"]["total"], 5);

    let again = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "announcements.delete",
        json!({ "id": new_id }),
    );
    assert_eq!(again["deleted"], false);
    assert_eq!(again["view"]["total"], 5);

    let no_id = request(&mut stdin, &mut reader, "10", "announcements.delete", json!({}));
    assert_eq!(error_code(&no_id), "bad_params");

    drop(stdin);
    let _ = child.wait();
}
