use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

/// Canned response for one path on the stub server.
#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Route {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.into().into_bytes(),
        }
    }

    pub fn audio(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: "audio/mpeg",
            body: body.to_vec(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: b"stub error".to_vec(),
        }
    }
}

pub struct PlaylistStub {
    pub base_url: String,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    hits: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PlaylistStub {
    /// Serves routes keyed by request path (query included). Unknown paths
    /// get 404.
    pub fn spawn() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start playlist stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let routes = Arc::new(Mutex::new(HashMap::<String, Route>::new()));
        let server_routes = Arc::clone(&routes);
        let hits = Arc::new(Mutex::new(Vec::new()));
        let server_hits = Arc::clone(&hits);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let path = request.url().to_string();
                server_hits
                    .lock()
                    .expect("lock stub hits")
                    .push(path.clone());

                let route = server_routes
                    .lock()
                    .expect("lock stub routes")
                    .get(&path)
                    .cloned()
                    .unwrap_or_else(|| Route::status(404));

                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    route.content_type.as_bytes(),
                )
                .expect("build header");
                let response = tiny_http::Response::from_data(route.body)
                    .with_status_code(route.status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            routes,
            hits,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn route(&self, path: &str, route: Route) {
        self.routes
            .lock()
            .expect("lock stub routes")
            .insert(path.to_owned(), route);
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    #[allow(dead_code)]
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().expect("lock stub hits").clone()
    }
}

impl Drop for PlaylistStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Builds a playlist JSON array from audio URLs; `""` means no audio.
pub fn playlist_json(audio_urls: &[String]) -> String {
    let chapters = audio_urls
        .iter()
        .enumerate()
        .map(|(idx, audio)| {
            serde_json::json!({
                "title": format!("Chapter {}", idx + 1),
                "subtitle": "",
                "audio": audio,
                "buyUrl": "",
                "downloadUrl": "",
                "downloadFilename": "",
                "cover": "",
                "lyrics": "",
            })
        })
        .collect::<Vec<_>>();
    serde_json::Value::Array(chapters).to_string()
}
