//! Servidor web Axum para identificação de lugares: formulário HTML, upload de
//! arquivo, API JSON e WebSocket com os eventos do pipeline em tempo real.

use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use anyhow::Context;
use askama::Template;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use place_core::{
    corpus::{demo_gazetteer, demo_texts},
    EngineConfig, Gazetteer, HighlightMode, HighlightedText, IdentifiedPlace, PipelineEvent,
    PlaceEngine, Scorer, Segment, TokenizerMode,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "place-web",
    about = "Servidor web para identificação de nomes de lugares em texto"
)]
struct Args {
    /// Endereço de escuta
    #[arg(long, env = "PLACE_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// CSV com as colunas Country, State e City (usa o dataset embutido se ausente)
    #[arg(long, env = "PLACE_GAZETTEER")]
    gazetteer: Option<PathBuf>,

    /// Configuração do motor em JSON
    #[arg(long, env = "PLACE_CONFIG")]
    config: Option<PathBuf>,

    /// standard | conservative
    #[arg(long)]
    tokenizer_mode: Option<TokenizerMode>,

    /// spans | replace_all
    #[arg(long)]
    highlight_mode: Option<HighlightMode>,

    /// ratio | levenshtein | jaro_winkler
    #[arg(long)]
    scorer: Option<Scorer>,

    /// Capitaliza cada token antes do POS tagging
    #[arg(long)]
    capitalize_tokens: bool,

    /// Tamanho máximo do corpo da requisição (texto ou upload)
    #[arg(long, env = "PLACE_MAX_INPUT_BYTES", default_value_t = 1024 * 1024)]
    max_input_bytes: usize,
}

impl Args {
    /// Arquivo de configuração (se houver) com as opções da linha de comando por cima.
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_path(path)
                .with_context(|| format!("lendo configuração {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(mode) = self.tokenizer_mode {
            config.tokenizer_mode = mode;
        }
        if let Some(mode) = self.highlight_mode {
            config.highlight_mode = mode;
        }
        if let Some(scorer) = self.scorer {
            config.scorer = scorer;
        }
        if self.capitalize_tokens {
            config.capitalize_tokens = true;
        }
        Ok(config)
    }

    fn load_gazetteer(&self) -> anyhow::Result<Gazetteer> {
        match &self.gazetteer {
            Some(path) => Gazetteer::from_csv_path(path)
                .with_context(|| format!("carregando gazetteer {}", path.display())),
            None => demo_gazetteer().context("carregando gazetteer embutido"),
        }
    }
}

/// Estado compartilhado da aplicação
struct AppState {
    engine: PlaceEngine,
}

#[derive(Deserialize)]
struct IdentifyRequest {
    text: String,
}

/// Mensagem WebSocket recebida do cliente
#[derive(Deserialize)]
struct WsRequest {
    text: String,
}

#[derive(Serialize)]
struct IdentifyResponse {
    /// Texto com os marcadores `<span style="color: ...">` (sem escape)
    highlighted: String,
    segments: Vec<Segment>,
    places: Vec<IdentifiedPlace>,
    total_tokens: usize,
    processing_ms: u64,
}

struct DemoText {
    domain: &'static str,
    text: &'static str,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    demo_texts: Vec<DemoText>,
}

#[derive(Template)]
#[template(path = "result.html")]
struct ResultTemplate {
    source: &'static str,
    highlighted: HighlightedText,
    places: Vec<IdentifiedPlace>,
    processing_ms: u64,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    error_message: String,
}

/// Falhas de requisição: entrada inválida (400) ou falha interna do servidor (500).
#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        warn!(%status, "{}", message);

        let page = ErrorTemplate {
            error_message: message.clone(),
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, message).into_response(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.engine_config()?;
    let gazetteer = Arc::new(args.load_gazetteer()?);
    info!(rows = gazetteer.len(), ?config, "motor de identificação pronto");

    let state = Arc::new(AppState {
        engine: PlaceEngine::new(gazetteer, config),
    });
    let app = app(state, args.max_input_bytes);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("escutando em {}", args.bind))?;
    info!("🚀 Servidor de lugares iniciado em http://{}", args.bind);
    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: Arc<AppState>, max_input_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/identify", post(identify_form_handler))
        .route("/api/identify", post(identify_api_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(DefaultBodyLimit::max(max_input_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Resultado completo de uma identificação (conteúdo do evento `Done`).
struct EngineOutcome {
    highlighted: HighlightedText,
    places: Vec<IdentifiedPlace>,
    total_tokens: usize,
    processing_ms: u64,
}

impl From<EngineOutcome> for IdentifyResponse {
    fn from(outcome: EngineOutcome) -> Self {
        Self {
            highlighted: outcome.highlighted.to_string(),
            segments: outcome.highlighted.segments().to_vec(),
            places: outcome.places,
            total_tokens: outcome.total_tokens,
            processing_ms: outcome.processing_ms,
        }
    }
}

/// Executa o pipeline fora do runtime assíncrono e devolve o evento `Done`.
async fn run_engine(state: Arc<AppState>, text: String) -> Result<EngineOutcome, AppError> {
    let outcome = tokio::task::spawn_blocking(move || {
        let (tx, rx) = mpsc::channel();
        state.engine.identify_streaming(&text, tx);
        rx.into_iter().find_map(|event| match event {
            PipelineEvent::Done {
                highlighted,
                places,
                total_tokens,
                processing_ms,
            } => Some(EngineOutcome {
                highlighted,
                places,
                total_tokens,
                processing_ms,
            }),
            _ => None,
        })
    })
    .await
    .map_err(|e| AppError::Internal(format!("falha no pipeline: {e}")))?;

    outcome.ok_or_else(|| AppError::Internal("pipeline terminou sem resultado".into()))
}

/// Retorna a página principal HTML
async fn index_handler() -> Result<Html<String>, AppError> {
    let page = IndexTemplate {
        demo_texts: demo_texts()
            .into_iter()
            .map(|(domain, text)| DemoText { domain, text })
            .collect(),
    };
    page.render()
        .map(Html)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Formulário HTML: um arquivo enviado tem prioridade sobre o campo `sentence`
async fn identify_form_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut sentence = None;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("formulário inválido: {e}")))?
    {
        let name = field.name().map(str::to_string);
        let has_file_name = field.file_name().map(|n| !n.is_empty()).unwrap_or(false);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("falha ao ler o arquivo: {e}")))?;
                if has_file_name {
                    upload = Some(decode_latin1(&bytes));
                }
            }
            Some("sentence") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("campo 'sentence' inválido: {e}")))?;
                sentence = Some(text);
            }
            _ => {}
        }
    }

    let (source, text) = match (upload, sentence) {
        (Some(text), _) => ("upload", text),
        (None, Some(text)) => ("sentence", text),
        (None, None) => {
            return Err(AppError::BadRequest(
                "envie um arquivo ou preencha o campo 'sentence'".into(),
            ))
        }
    };
    info!(source, chars = text.len(), "identificando via formulário");

    let outcome = run_engine(state, text).await?;
    let page = ResultTemplate {
        source,
        highlighted: outcome.highlighted,
        places: outcome.places,
        processing_ms: outcome.processing_ms,
    };
    page.render()
        .map(Html)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Identificação via HTTP POST com JSON
async fn identify_api_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdentifyRequest>,
) -> Response {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Texto vazio"})),
        )
            .into_response();
    }

    match run_engine(state, req.text).await {
        Ok(outcome) => Json(IdentifyResponse::from(outcome)).into_response(),
        Err(AppError::BadRequest(message)) => {
            (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": message}))).into_response()
        }
        Err(AppError::Internal(message)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": message})),
        )
            .into_response(),
    }
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(domain, text)| {
            serde_json::json!({
                "domain": domain,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe texto, executa pipeline e envia eventos em tempo real
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // Tenta parsear como JSON {text}; senão usa como texto puro
                let text_str = match serde_json::from_str::<WsRequest>(&text) {
                    Ok(req) => req.text,
                    Err(_) => text,
                };
                if text_str.trim().is_empty() {
                    continue;
                }

                info!("Identificando via WebSocket: {} chars", text_str.len());

                // O pipeline é síncrono: roda em thread bloqueante e os eventos
                // são coletados depois que ele termina
                let (tx_std, rx_std) = mpsc::channel::<PipelineEvent>();
                let engine_state = Arc::clone(&state);
                let handle = tokio::task::spawn_blocking(move || {
                    engine_state.engine.identify_streaming(&text_str, tx_std);
                });
                if handle.await.is_err() {
                    warn!("pipeline interrompido");
                    continue;
                }

                let events: Vec<PipelineEvent> = rx_std.try_iter().collect();
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pequena pausa para animação visual (passo a passo)
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

/// ISO-8859-1: cada byte é o code point de mesmo valor, nunca falha
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    const BOUNDARY: &str = "place-web-test-boundary";

    fn test_app() -> Router {
        let gazetteer = Arc::new(demo_gazetteer().unwrap());
        let state = Arc::new(AppState {
            engine: PlaceEngine::new(gazetteer, EngineConfig::default()),
        });
        app(state, 1024 * 1024)
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn multipart_request(parts: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/identify")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(parts))
            .unwrap()
    }

    fn text_part(name: &str, value: &str) -> Vec<u8> {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .into_bytes()
    }

    fn file_part(file_name: &str, content: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n"
        )
        .into_bytes();
        part.extend_from_slice(content);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn closing() -> Vec<u8> {
        format!("--{BOUNDARY}--\r\n").into_bytes()
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("action=\"/identify\""));
        assert!(html.contains("name=\"sentence\""));
        assert!(html.contains("name=\"file\""));
    }

    #[tokio::test]
    async fn test_demo_texts() {
        let response = test_app()
            .oneshot(Request::builder().uri("/demo-texts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 6);
        assert!(items.iter().all(|item| item["domain"].is_string() && item["text"].is_string()));
    }

    #[tokio::test]
    async fn test_api_identify_paris() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/identify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"text": "I love Paris in the spring."}"#))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            json["highlighted"],
            "I love <span style=\"color: green\">Paris</span> in the spring."
        );
        let places = json["places"].as_array().unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0]["canonical_name"], "Paris");
        assert_eq!(places[0]["score"], 100);
        assert!(json["total_tokens"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_api_rejects_empty_text() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/identify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"text": "   "}"#))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["error"], "Texto vazio");
    }

    #[tokio::test]
    async fn test_form_sentence() {
        let mut body = text_part("sentence", "I love Paris in the spring.");
        body.extend(closing());
        let response = test_app().oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("<span style=\"color: green\">Paris</span>"));
        assert!(html.contains("Fonte: sentence"));
    }

    #[tokio::test]
    async fn test_form_upload_wins_and_is_latin1() {
        // "Visited Paris in Été." em ISO-8859-1
        let content = b"Visited Paris in \xC9t\xE9.";
        let mut body = text_part("sentence", "Nothing here.");
        body.extend(file_part("notes.txt", content));
        body.extend(closing());
        let response = test_app().oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Fonte: upload"));
        assert!(html.contains("<span style=\"color: green\">Paris</span>"));
        assert!(html.contains("Été"));
    }

    #[tokio::test]
    async fn test_form_without_input() {
        let response = test_app().oneshot(multipart_request(closing())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_latin1(b"S\xE3o Paulo"), "São Paulo");
        assert_eq!(decode_latin1(b""), "");
    }
}
