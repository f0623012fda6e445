//! Backend service contract.
//!
//! Three endpoints, consumed as an opaque service: player profile, round
//! start, round completion. Prompt selection, drawing classification and all
//! progression rules live server-side; this module only maps JSON.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, Window};

/// `GET /api/player/{id}`: the subset of the profile the client acts on.
#[derive(Clone, Debug, Deserialize)]
pub struct PlayerProfile {
    pub level: u32,
    pub xp: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub brushes_unlocked: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StartRequest<'a> {
    pub player_id: &'a str,
    pub difficulty: &'a str,
    pub surprise_mode: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StartResponse {
    pub session_id: String,
    pub prompt: PromptInfo,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PromptInfo {
    pub text: String,
    /// Seconds.
    pub time_limit: u32,
}

#[derive(Debug, Serialize)]
pub struct CompleteRequest {
    pub session_id: String,
    /// The raster as a PNG data URI.
    pub drawing_data: String,
    pub time_spent: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CompleteResponse {
    pub correct: bool,
    #[serde(default)]
    pub feedback: String,
    /// Ranked, best first.
    pub guesses: Vec<String>,
    /// Confidence in the top guess, 0-100.
    pub confidence: u32,
    pub score: i64,
    pub xp_gained: i64,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub level_up: bool,
    #[serde(default)]
    pub new_level: Option<u32>,
    pub player_stats: PlayerStats,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Achievement {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub xp: u32,
    pub streak: u32,
}

#[derive(Clone, Debug)]
pub struct Api {
    pub player_id: String,
}

impl Api {
    /// Player identity comes from the `?player_id=` query parameter the game
    /// page is opened with; anonymous otherwise.
    pub fn from_window(window: &Window) -> Api {
        let player_id = window
            .location()
            .search()
            .ok()
            .and_then(|s| web_sys::UrlSearchParams::new_with_str(&s).ok())
            .and_then(|p| p.get("player_id"))
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| "anonymous".to_string());
        Api { player_id }
    }

    pub async fn fetch_player(&self) -> Result<PlayerProfile, JsValue> {
        let url = format!("/api/player/{}", self.player_id);
        request_json("GET", &url, None).await
    }

    pub async fn start_session(&self) -> Result<StartResponse, JsValue> {
        let body = serde_json::to_string(&StartRequest {
            player_id: &self.player_id,
            difficulty: "medium",
            surprise_mode: true,
        })
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        request_json("POST", "/api/session/start", Some(body)).await
    }

    pub async fn complete_session(&self, req: &CompleteRequest) -> Result<CompleteResponse, JsValue> {
        let body = serde_json::to_string(req).map_err(|e| JsValue::from_str(&e.to_string()))?;
        request_json("POST", "/api/session/complete", Some(body)).await
    }
}

async fn request_json<T: DeserializeOwned>(
    method: &str,
    url: &str,
    body: Option<String>,
) -> Result<T, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let init = RequestInit::new();
    init.set_method(method);
    if let Some(body) = &body {
        init.set_body(&JsValue::from_str(body));
    }
    let request = Request::new_with_str_and_init(url, &init)?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "{} {} failed with status {}",
            method,
            url,
            response.status()
        )));
    }
    let text = JsFuture::from(response.text()?).await?;
    let text = text
        .as_string()
        .ok_or_else(|| JsValue::from_str("non-text response body"))?;
    serde_json::from_str(&text)
        .map_err(|e| JsValue::from_str(&format!("malformed response from {url}: {e}")))
}
