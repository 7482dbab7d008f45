use actix_cors::Cors;
use actix_web::{
    error::InternalError, get, post, web, App, HttpResponse, HttpServer, Responder,
    Result as ActixResult,
};
use canvascore::{PersistenceError, SaveWorkflowRequest, WorkflowListing, WorkflowStore};
use canvasruntime::{MemoryWorkflowStore, ToolRegistry, ALL_CATEGORIES};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
struct AppState {
    store: Arc<MemoryWorkflowStore>,
    registry: Arc<ToolRegistry>,
}

/// Error body, `{detail}` like the tool endpoints send
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    detail: String,
}

#[derive(Debug, Deserialize)]
struct ToolQuery {
    category: Option<String>,
}

fn database_error(e: PersistenceError) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        detail: format!("Database error: {}", e),
    })
}

/// Service status
#[get("/")]
async fn status(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "tools": data.registry.len(),
    }))
}

/// Upsert a workflow
#[post("/api/workflows/save")]
async fn save_workflow(
    data: web::Data<AppState>,
    request: web::Json<SaveWorkflowRequest>,
) -> ActixResult<impl Responder> {
    let request = request.into_inner();
    info!(
        "Saving workflow: {} ({}) for {}",
        request.name, request.id, request.user_id
    );

    match data.store.save(&request).await {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "message": "Workflow saved successfully."
        }))),
        Err(e) => {
            error!("Failed to save workflow {}: {}", request.id, e);
            Ok(database_error(e))
        }
    }
}

/// Saved workflows of one user, newest first
#[get("/api/workflows/{user_id}")]
async fn list_workflows(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();

    match data.store.list(&user_id).await {
        Ok(workflows) => Ok(HttpResponse::Ok().json(WorkflowListing { workflows })),
        Err(e) => {
            error!("Failed to list workflows for {}: {}", user_id, e);
            Ok(database_error(e))
        }
    }
}

/// Name and nodes of one workflow
#[get("/api/workflow-data/{id}")]
async fn load_workflow(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let workflow_id = path.into_inner();

    match data.store.fetch(&workflow_id).await {
        Ok(snapshot) => Ok(HttpResponse::Ok().json(snapshot)),
        Err(PersistenceError::NotFound(_)) => Ok(HttpResponse::NotFound().json(ErrorResponse {
            detail: "Workflow not found.".to_string(),
        })),
        Err(e) => {
            error!("Failed to load workflow {}: {}", workflow_id, e);
            Ok(database_error(e))
        }
    }
}

/// Built-in tool catalog, optionally narrowed to one category
#[get("/api/tools")]
async fn list_tools(
    data: web::Data<AppState>,
    query: web::Query<ToolQuery>,
) -> ActixResult<impl Responder> {
    let category = query.category.as_deref().unwrap_or(ALL_CATEGORIES);
    let tools = data.registry.list_by_category(category);
    Ok(HttpResponse::Ok().json(tools))
}

/// Malformed bodies get a 422 with `{detail}` instead of actix's plain text
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        InternalError::from_response(
            err,
            HttpResponse::UnprocessableEntity().json(ErrorResponse { detail }),
        )
        .into()
    })
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(status)
        .service(save_workflow)
        .service(list_workflows)
        .service(load_workflow)
        .service(list_tools);
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚀 Starting Canvas Persistence Server");

    let registry = canvastools::builtin_registry()?;
    info!("✅ Catalog loaded with {} tools", registry.len());

    let app_state = web::Data::new(AppState {
        store: Arc::new(MemoryWorkflowStore::new()),
        registry: Arc::new(registry),
    });

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    info!("🌐 Server starting on http://{}", bind_address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(app_state.clone())
            .app_data(json_config())
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .configure(routes)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use canvascore::{Node, Position, ToolDescriptor, WorkflowSnapshot};
    use serde_json::Value;

    fn app_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            store: Arc::new(MemoryWorkflowStore::new()),
            registry: Arc::new(canvastools::builtin_registry().unwrap()),
        })
    }

    fn save_body(id: &str, user: &str, name: &str, nodes: usize) -> Value {
        let nodes: Vec<Node> = (0..nodes)
            .map(|i| {
                Node::new(
                    format!("node_{}", i),
                    "summarizer",
                    Position::new(i as f64 * 30.0, 100.0),
                )
            })
            .collect();
        serde_json::json!({ "id": id, "user_id": user, "name": name, "nodes": nodes })
    }

    macro_rules! init_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .app_data(json_config())
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn status_reports_online() {
        let app = init_app!(app_state());

        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "online");
        assert_eq!(body["tools"], 14);
    }

    #[actix_web::test]
    async fn save_list_and_load() {
        let state = app_state();
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/workflows/save")
            .set_json(save_body("flow_1", "user_42", "Research Flow", 2))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "success");

        let req = test::TestRequest::get()
            .uri("/api/workflows/user_42")
            .to_request();
        let listing: WorkflowListing = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listing.workflows.len(), 1);
        assert_eq!(listing.workflows[0].id, "flow_1");
        assert_eq!(listing.workflows[0].name, "Research Flow");

        let req = test::TestRequest::get()
            .uri("/api/workflow-data/flow_1")
            .to_request();
        let snapshot: WorkflowSnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot.name, "Research Flow");
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.nodes[1].position, Position::new(30.0, 100.0));
    }

    #[actix_web::test]
    async fn save_existing_id_updates_in_place() {
        let state = app_state();
        let app = init_app!(state);

        for (name, nodes) in [("Draft", 1), ("Final", 3)] {
            let req = test::TestRequest::post()
                .uri("/api/workflows/save")
                .set_json(save_body("flow_1", "user_42", name, nodes))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        assert_eq!(state.store.len().await, 1);
        let snapshot = state.store.fetch("flow_1").await.unwrap();
        assert_eq!(snapshot.name, "Final");
        assert_eq!(snapshot.nodes.len(), 3);
    }

    #[actix_web::test]
    async fn save_without_name_uses_default() {
        let state = app_state();
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/workflows/save")
            .set_json(serde_json::json!({ "id": "flow_9", "user_id": "u", "nodes": [] }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let snapshot = state.store.fetch("flow_9").await.unwrap();
        assert_eq!(snapshot.name, "Untitled Workflow");
    }

    #[actix_web::test]
    async fn malformed_save_is_unprocessable() {
        let app = init_app!(app_state());

        let req = test::TestRequest::post()
            .uri("/api/workflows/save")
            .set_json(serde_json::json!({ "id": "flow_1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(!body.detail.is_empty());
    }

    #[actix_web::test]
    async fn unknown_workflow_is_not_found() {
        let app = init_app!(app_state());

        let req = test::TestRequest::get()
            .uri("/api/workflow-data/flow_missing")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.detail, "Workflow not found.");
    }

    #[actix_web::test]
    async fn empty_history_is_valid() {
        let app = init_app!(app_state());

        let req = test::TestRequest::get()
            .uri("/api/workflows/nobody")
            .to_request();
        let listing: WorkflowListing = test::call_and_read_body_json(&app, req).await;

        assert!(listing.workflows.is_empty());
    }

    #[actix_web::test]
    async fn history_is_scoped_to_owner() {
        let state = app_state();
        let app = init_app!(state);

        for (id, user) in [("flow_a", "alice"), ("flow_b", "bob"), ("flow_c", "alice")] {
            let req = test::TestRequest::post()
                .uri("/api/workflows/save")
                .set_json(save_body(id, user, id, 0))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri("/api/workflows/alice")
            .to_request();
        let listing: WorkflowListing = test::call_and_read_body_json(&app, req).await;

        let ids: Vec<&str> = listing.workflows.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["flow_c", "flow_a"]);
        assert!(listing
            .workflows
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }

    #[actix_web::test]
    async fn tools_filter_by_category() {
        let app = init_app!(app_state());

        let req = test::TestRequest::get().uri("/api/tools").to_request();
        let all: Vec<ToolDescriptor> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.len(), 14);

        let req = test::TestRequest::get()
            .uri("/api/tools?category=Creative")
            .to_request();
        let creative: Vec<ToolDescriptor> = test::call_and_read_body_json(&app, req).await;
        let ids: Vec<&str> = creative.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["image", "tts-gen", "vision-api"]);
    }
}
