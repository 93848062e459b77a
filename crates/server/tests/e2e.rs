use std::net::SocketAddr;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let app = server::startup::build_app(&AppConfig::default());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = server::startup::serve(listener, app, std::future::pending()).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create(c: &reqwest::Client, app: &TestApp, body: Value) -> anyhow::Result<Value> {
    let res = c.post(app.url("/items")).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn e2e_root_and_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(app.url("/")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"message": "CRUD API is running!"}));

    let res = c.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_lifecycle_scenario() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let first = create(&c, &app, json!({"title": "A", "description": "d"})).await?;
    assert_eq!(first, json!({"id": 1, "title": "A", "description": "d", "done": false}));

    let second = create(&c, &app, json!({"title": "A2", "description": "d"})).await?;
    assert_eq!(second["id"], 2);

    let res = c.delete(app.url("/items/1")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"message": "Item deleted successfully"}));

    let res = c.get(app.url("/items/1")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"detail": "Item not found"}));

    let res = c.get(app.url("/items/2")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .put(app.url("/items/2"))
        .json(&json!({"title": "B", "description": "d2", "done": true}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(app.url("/items/2")).send().await?;
    assert_eq!(
        res.json::<Value>().await?,
        json!({"id": 2, "title": "B", "description": "d2", "done": true})
    );
    Ok(())
}

#[tokio::test]
async fn e2e_ids_never_reused_and_list_keeps_order() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for t in ["a", "b", "c"] {
        create(&c, &app, json!({"title": t, "description": "x"})).await?;
    }
    let res = c.delete(app.url("/items/3")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // client id is ignored
    let d = create(&c, &app, json!({"id": 3, "title": "d", "description": "x"})).await?;
    assert_eq!(d["id"], 4);

    let list = c.get(app.url("/items")).send().await?.json::<Vec<Value>>().await?;
    let ids: Vec<i64> = list.iter().filter_map(|v| v["id"].as_i64()).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    Ok(())
}

#[tokio::test]
async fn e2e_empty_list() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/items")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn e2e_update_is_full_replacement() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    create(&c, &app, json!({"title": "A", "description": "d", "done": true})).await?;
    let res = c
        .put(app.url("/items/1"))
        .json(&json!({"id": 50, "title": "A", "description": "d"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"id": 1, "title": "A", "description": "d", "done": false})
    );

    let res = c.get(app.url("/items/50")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_missing_items_are_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(app.url("/items/7")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c
        .put(app.url("/items/7"))
        .json(&json!({"title": "x", "description": "y"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(app.url("/items/7")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["detail"], "Item not found");

    // failed update must not create anything
    let list = c.get(app.url("/items")).send().await?.json::<Vec<Value>>().await?;
    assert!(list.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_invalid_input_is_422() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.post(app.url("/items")).json(&json!({"title": "only title"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.json::<Value>().await?["detail"].is_string());

    let res = c
        .post(app.url("/items"))
        .json(&json!({"title": "t", "description": "d", "done": "maybe"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

    let res = c
        .post(app.url("/items"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

    let res = c.get(app.url("/items/abc")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

    let res = c.delete(app.url("/items/1.5")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

    // nothing was stored, so the next id is still 1
    let first = create(&c, &app, json!({"title": "A", "description": "d"})).await?;
    assert_eq!(first["id"], 1);
    Ok(())
}

#[tokio::test]
async fn e2e_body_without_content_type_is_parsed_as_json() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.post(app.url("/items")).body(r#"{"title":"A","description":"d"}"#).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"id": 1, "title": "A", "description": "d", "done": false})
    );

    let res = c
        .put(app.url("/items/1"))
        .body(r#"{"title":"B","description":"d2","done":true}"#)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["done"], true);

    // still 422 when the untyped body is not valid JSON
    let res = c.post(app.url("/items")).body("title=A").send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.json::<Value>().await?["detail"].is_string());

    // and when the declared content type is not JSON
    let res = c
        .post(app.url("/items"))
        .header("content-type", "text/plain")
        .body(r#"{"title":"A","description":"d"}"#)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

    let list = c.get(app.url("/items")).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(list.len(), 1);
    Ok(())
}

#[tokio::test]
async fn e2e_loose_field_encodings_are_accepted() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let item = create(&c, &app, json!({"id": "9", "title": "A", "description": "d", "done": 1})).await?;
    assert_eq!(item, json!({"id": 1, "title": "A", "description": "d", "done": true}));

    let item = create(&c, &app, json!({"title": "B", "description": "d", "done": "false"})).await?;
    assert_eq!(item["done"], false);

    let res = c
        .post(app.url("/items"))
        .json(&json!({"title": "C", "description": "d", "done": 2}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn e2e_out_of_range_id_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/items/99999999999999999999")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"detail": "Item not found"}));
    Ok(())
}

#[tokio::test]
async fn e2e_wrong_method_is_json_405() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .patch(app.url("/items/1"))
        .json(&json!({"title": "x"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::METHOD_NOT_ALLOWED);
    assert!(res.headers().get("allow").is_some());
    assert_eq!(res.json::<Value>().await?, json!({"detail": "Method Not Allowed"}));
    Ok(())
}

#[tokio::test]
async fn e2e_trailing_slash_redirects() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let res = c.get(app.url("/items/")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers().get("location").and_then(|v| v.to_str().ok()), Some("/items"));

    let res = c.delete(app.url("/items/4/?x=1")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers().get("location").and_then(|v| v.to_str().ok()), Some("/items/4?x=1"));

    let res = c.get(app.url("/nope/")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_unknown_route_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/nope")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"detail": "Not Found"}));
    Ok(())
}

#[tokio::test]
async fn e2e_cors_is_permissive() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let origin = "http://frontend.example";

    let res = c
        .request(reqwest::Method::OPTIONS, app.url("/items/1"))
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "PUT")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await?;
    assert!(res.status().is_success());
    let headers = res.headers();
    assert_eq!(headers.get("access-control-allow-origin").and_then(|v| v.to_str().ok()), Some(origin));
    assert_eq!(headers.get("access-control-allow-credentials").and_then(|v| v.to_str().ok()), Some("true"));

    let res = c.get(app.url("/items")).header("Origin", origin).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(
        res.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some(origin)
    );
    Ok(())
}

#[tokio::test]
async fn e2e_openapi_document() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/openapi.json")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let doc = res.json::<Value>().await?;
    assert_eq!(doc["info"]["title"], "CRUD API");
    assert_eq!(doc["info"]["version"], "1.0.0");
    assert!(doc["paths"]["/items"].is_object());
    assert!(doc["paths"]["/items/{id}"]["put"].is_object());
    Ok(())
}
