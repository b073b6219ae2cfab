use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::form_urlencoded;

/// Minimal stand-in for the payment provider's checkout endpoints.
#[derive(Clone, Default)]
struct StubState {
    forms: Arc<Mutex<Vec<HashMap<String, String>>>>,
    products: Arc<Mutex<HashMap<String, String>>>,
}

pub struct StubGateway {
    pub base_url: String,
    state: StubState,
}

async fn create_session(State(state): State<StubState>, body: String) -> Json<Value> {
    let form: HashMap<String, String> = form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect();

    let mut forms = state.forms.lock().unwrap();
    let id = format!("cs_stub_{}", forms.len() + 1);
    if let Some(product) = form.get("line_items[0][price_data][product_data][name]") {
        state
            .products
            .lock()
            .unwrap()
            .insert(id.clone(), product.clone());
    }
    forms.push(form);

    Json(json!({ "id": id, "url": format!("https://checkout.test/{id}") }))
}

async fn line_items(State(state): State<StubState>, Path(id): Path<String>) -> Json<Value> {
    let data = state
        .products
        .lock()
        .unwrap()
        .get(&id)
        .map(|product| vec![json!({ "description": product })])
        .unwrap_or_default();
    Json(json!({ "object": "list", "data": data }))
}

impl StubGateway {
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = Router::new()
            .route("/v1/checkout/sessions", post(create_session))
            .route("/v1/checkout/sessions/{id}/line_items", get(line_items))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn checkout_forms(&self) -> Vec<HashMap<String, String>> {
        self.state.forms.lock().unwrap().clone()
    }
}
