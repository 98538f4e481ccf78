mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use campus_cms::services::EntityKind;
use serde_json::{json, Value};

use common::column_text;

async fn seed_topics(app: &common::TestApp, count: usize) -> Result<()> {
    for i in 1..=count {
        app.seed(EntityKind::Topics, json!({ "name": format!("Tema {:02}", i), "slug": format!("tema-{:02}", i) }))
            .await?;
    }
    Ok(())
}

async fn admin_list(app: &common::TestApp, uri: &str) -> Result<Value> {
    let res = app.admin(Method::GET, uri, None).await?;
    assert_eq!(res.status, StatusCode::OK, "{}: {}", uri, res.body);
    Ok(res.body)
}

#[tokio::test]
async fn list_renders_a_table_view() -> Result<()> {
    let app = common::TestApp::new();
    seed_topics(&app, 3).await?;

    let body = admin_list(&app, "/api/admin/topics").await?;
    let table = &body["data"]["table"];

    assert_eq!(table["title"], "Topics");
    assert_eq!(table["add_button"]["href"], "/api/admin/topics");
    assert_eq!(table["header"][0]["label"], "Name");
    assert_eq!(table["header"][0]["sort_indicator"], "asc");
    assert!(table["header"][1]["sort_indicator"].is_null());
    assert_eq!(table["filters"][0]["type"], "switch");
    assert_eq!(table["filters"][0]["checked"], false);
    assert!(table["pager"].is_null(), "one page needs no pager");

    assert_eq!(column_text(&body, 0), vec!["Tema 01", "Tema 02", "Tema 03"]);
    let actions = &table["body"]["rows"][0]["cells"][4]["actions"];
    assert_eq!(actions[2]["kind"], "delete");
    assert_eq!(actions[2]["method"], "DELETE");
    Ok(())
}

#[tokio::test]
async fn deleted_rows_follow_the_switch() -> Result<()> {
    let app = common::TestApp::new();
    seed_topics(&app, 2).await?;
    app.seed_deleted(EntityKind::Topics, json!({ "name": "Archivado", "slug": "archivado" }))
        .await?;

    let live = admin_list(&app, "/api/admin/topics").await?;
    assert_eq!(column_text(&live, 0), vec!["Tema 01", "Tema 02"]);

    let deleted = admin_list(&app, "/api/admin/topics?f.is_deleted=true").await?;
    assert_eq!(column_text(&deleted, 0), vec!["Archivado"]);
    assert_eq!(column_text(&deleted, 3), vec!["Deleted"]);
    assert_eq!(deleted["data"]["table"]["body"]["rows"][0]["cells"][4]["actions"][2]["kind"], "restore");

    let everything = admin_list(&app, "/api/admin/topics?f.is_deleted=all").await?;
    assert_eq!(column_text(&everything, 0).len(), 3);
    Ok(())
}

#[tokio::test]
async fn sort_search_and_paging_come_from_the_query() -> Result<()> {
    let app = common::TestApp::new();
    seed_topics(&app, 12).await?;

    let body = admin_list(&app, "/api/admin/topics?sort=name&dir=desc&page=2").await?;
    let table = &body["data"]["table"];
    assert_eq!(table["header"][0]["sort_indicator"], "desc");
    assert_eq!(column_text(&body, 0), vec!["Tema 02", "Tema 01"]);

    let pager = &table["pager"];
    assert_eq!(pager["current_page"], 2);
    assert_eq!(pager["total_pages"], 2);
    assert_eq!(pager["summary"], "Showing 11–12 of 12");
    assert_eq!(pager["has_next"], false);
    assert_eq!(pager["previous_page"], 1);

    let query = body["data"]["query"].as_str().unwrap();
    assert!(query.contains("sort=name"));
    assert!(query.contains("dir=desc"));
    assert!(query.contains("page=2"));

    let body = admin_list(&app, "/api/admin/topics?search=tema%2011").await?;
    assert_eq!(column_text(&body, 0), vec!["Tema 11"]);
    assert_eq!(body["data"]["table"]["search"]["show_clear"], true);

    let body = admin_list(&app, "/api/admin/topics?search=nada").await?;
    assert_eq!(body["data"]["table"]["body"]["kind"], "empty");
    assert_eq!(body["data"]["table"]["body"]["empty"]["title"], "No results");
    Ok(())
}

#[tokio::test]
async fn page_size_is_capped_by_config() -> Result<()> {
    let app = common::TestApp::new();
    seed_topics(&app, 3).await?;

    let body = admin_list(&app, "/api/admin/topics?page_size=5000").await?;
    let max = app.config.table.max_page_size;
    let query = body["data"]["query"].as_str().unwrap();
    assert!(query.contains(&format!("page_size={}", max)), "{}", query);
    Ok(())
}

#[tokio::test]
async fn invalid_table_queries_are_bad_requests() -> Result<()> {
    let app = common::TestApp::new();

    for uri in [
        "/api/admin/people?sort=bio",
        "/api/admin/people?dir=sideways",
        "/api/admin/people?page=0",
        "/api/admin/people?f.shoe_size=42",
        "/api/admin/people?f.role=principal",
        "/api/admin/people?f.is_deleted=maybe",
    ] {
        let res = app.admin(Method::GET, uri, None).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(res.body["error"]["code"], "BAD_REQUEST");
    }
    Ok(())
}

#[tokio::test]
async fn select_filters_narrow_people() -> Result<()> {
    let app = common::TestApp::new();
    for (name, role) in [("Ana", "student"), ("Bruno", "teacher"), ("Carla", "student")] {
        app.seed(EntityKind::People, json!({ "full_name": name, "email": format!("{}@x.org", name), "role": role }))
            .await?;
    }

    let body = admin_list(&app, "/api/admin/people?f.role=student").await?;
    assert_eq!(column_text(&body, 0), vec!["Ana", "Carla"]);
    assert_eq!(body["data"]["table"]["filters"][0]["value"], "student");
    assert_eq!(body["data"]["table"]["filters"][0]["options"][0]["value"], "all");
    Ok(())
}

#[tokio::test]
async fn pages_past_the_end_render_an_empty_window() -> Result<()> {
    let app = common::TestApp::new();
    seed_topics(&app, 12).await?;

    for page in ["3", "18446744073709551615"] {
        let body = admin_list(&app, &format!("/api/admin/topics?page={}", page)).await?;
        let table = &body["data"]["table"];
        assert_eq!(table["body"]["kind"], "empty", "page {}", page);
        assert_eq!(table["pager"]["summary"], "Showing 0–0 of 12");
        assert_eq!(table["pager"]["has_next"], false);
        assert_eq!(table["pager"]["previous_page"], 2);
    }
    Ok(())
}
