//! In-memory wish API used by the test suites
//!
//! Mirrors the remote routes closely enough to drive the issuer, repository,
//! cache and commands: soft/hard delete, restore, order patches, per-request
//! delays, failure injection and call counting.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use super::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use crate::domain::{Wish, WishId};

pub const FAKE_BASE: &str = "http://fake.test/api/v1";

/// Shape used when answering list calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    Bare,
    Wrapped,
    Unexpected,
}

struct FakeState {
    wishes: Vec<Wish>,
    hard_deleted: HashSet<String>,
    next_id: u32,
    tick: i64,
    calls: Vec<(Method, String)>,
    seen_auth: Vec<Option<String>>,
    seen_content_types: Vec<Option<String>>,
    list_shape: ListShape,
    list_includes_deleted: bool,
    list_delay: Duration,
    order_delays: HashMap<String, Duration>,
    failing_orders: HashSet<String>,
    required_token: Option<String>,
    unreachable: bool,
    failing_lists: bool,
}

pub struct FakeWishServer {
    state: Mutex<FakeState>,
}

impl Default for FakeWishServer {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWishServer {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                wishes: Vec::new(),
                hard_deleted: HashSet::new(),
                next_id: 1,
                tick: 0,
                calls: Vec::new(),
                seen_auth: Vec::new(),
                seen_content_types: Vec::new(),
                list_shape: ListShape::Wrapped,
                list_includes_deleted: false,
                list_delay: Duration::ZERO,
                order_delays: HashMap::new(),
                failing_orders: HashSet::new(),
                required_token: None,
                unreachable: false,
                failing_lists: false,
            }),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// Insert a wish directly, bypassing the API
    pub fn seed(&self, organization_id: &str, title: &str, order_no: i64) -> WishId {
        self.with_state(|s| {
            let wish = s.new_wish(organization_id, title, "", order_no);
            let id = wish.id.clone();
            s.wishes.push(wish);
            id
        })
    }

    pub fn set_list_shape(&self, shape: ListShape) {
        self.with_state(|s| s.list_shape = shape);
    }

    pub fn set_list_includes_deleted(&self, include: bool) {
        self.with_state(|s| s.list_includes_deleted = include);
    }

    pub fn set_list_delay(&self, delay: Duration) {
        self.with_state(|s| s.list_delay = delay);
    }

    pub fn set_order_delay(&self, id: &WishId, delay: Duration) {
        self.with_state(|s| {
            s.order_delays.insert(id.as_str().to_string(), delay);
        });
    }

    pub fn fail_order_for(&self, id: &WishId) {
        self.with_state(|s| {
            s.failing_orders.insert(id.as_str().to_string());
        });
    }

    pub fn require_token(&self, token: &str) {
        self.with_state(|s| s.required_token = Some(token.to_string()));
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.with_state(|s| s.unreachable = unreachable);
    }

    /// List routes answer 503 while set; id-addressed routes keep working
    pub fn fail_lists(&self, fail: bool) {
        self.with_state(|s| s.failing_lists = fail);
    }

    /// Stored state of a wish, including soft-deleted ones
    pub fn stored(&self, id: &WishId) -> Option<Wish> {
        self.with_state(|s| s.wishes.iter().find(|w| &w.id == id).cloned())
    }

    pub fn call_count(&self, method: Method, path: &str) -> usize {
        self.with_state(|s| {
            s.calls
                .iter()
                .filter(|(m, p)| *m == method && p == path)
                .count()
        })
    }

    pub fn total_calls(&self) -> usize {
        self.with_state(|s| s.calls.len())
    }

    /// Authorization header value seen on each call, in order
    pub fn seen_auth(&self) -> Vec<Option<String>> {
        self.with_state(|s| s.seen_auth.clone())
    }

    /// Content-Type header value seen on each call, in order
    pub fn seen_content_types(&self) -> Vec<Option<String>> {
        self.with_state(|s| s.seen_content_types.clone())
    }
}

impl FakeState {
    fn now(&mut self) -> DateTime<Utc> {
        self.tick += 1;
        let base = Utc.timestamp_opt(1_714_557_600, 0).unwrap();
        base + ChronoDuration::seconds(self.tick)
    }

    fn new_wish(&mut self, organization_id: &str, title: &str, note: &str, order_no: i64) -> Wish {
        let id = WishId::new(format!("w-{}", self.next_id));
        self.next_id += 1;
        let now = self.now();
        Wish {
            id,
            organization_id: organization_id.to_string(),
            title: title.to_string(),
            note: note.to_string(),
            order_no,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.wishes.iter().position(|w| w.id.as_str() == id)
    }

    fn delay_for(&self, method: &Method, path: &str) -> Duration {
        if *method == Method::GET && path.ends_with("/wishes") {
            return self.list_delay;
        }
        if *method == Method::PATCH {
            if let Some(id) = order_target(path) {
                return self.order_delays.get(id).copied().unwrap_or_default();
            }
        }
        Duration::ZERO
    }

    fn route(&mut self, method: &Method, path: &str, body: Option<&str>) -> HttpResponse {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let body: Value = body
            .and_then(|b| serde_json::from_str(b).ok())
            .unwrap_or(Value::Null);

        match (method.as_str(), segments.as_slice()) {
            ("GET", ["organizations", org, "wishes"]) => {
                let org = org.to_string();
                self.list(|w| w.organization_id == org)
            }
            ("GET", ["wishes"]) => self.list(|_| true),
            ("POST", ["wishes"]) | ("POST", ["wish"]) => self.create(&body),
            ("GET", ["wishes", id]) => match self.position(id) {
                Some(i) => ok_json(json!(self.wishes[i])),
                None => not_found(id),
            },
            ("PUT", ["wishes", id]) => self.update(id, &body),
            ("DELETE", ["wishes", id]) => match self.position(id) {
                Some(i) => {
                    self.wishes.remove(i);
                    self.hard_deleted.insert(id.to_string());
                    no_content()
                }
                None => not_found(id),
            },
            ("POST", ["wishes", id, "soft-delete"]) => match self.position(id) {
                Some(i) if self.wishes[i].deleted_at.is_some() => HttpResponse {
                    status: 409,
                    body: r#"{"error":"already deleted"}"#.to_string(),
                },
                Some(i) => {
                    let now = self.now();
                    self.wishes[i].deleted_at = Some(now);
                    self.wishes[i].updated_at = now;
                    no_content()
                }
                None => not_found(id),
            },
            ("POST", ["wishes", id, "restore"]) => match self.position(id) {
                Some(i) => {
                    let now = self.now();
                    self.wishes[i].deleted_at = None;
                    self.wishes[i].updated_at = now;
                    no_content()
                }
                None if self.hard_deleted.contains(*id) => HttpResponse {
                    status: 410,
                    body: r#"{"error":"gone"}"#.to_string(),
                },
                None => not_found(id),
            },
            ("PATCH", ["wishes", id, "order"]) => {
                if self.failing_orders.contains(*id) {
                    return HttpResponse {
                        status: 500,
                        body: r#"{"error":"order update failed"}"#.to_string(),
                    };
                }
                let Some(order_no) = body.get("order_no").and_then(Value::as_i64) else {
                    return bad_request("order_no is required");
                };
                match self.position(id) {
                    Some(i) => {
                        let now = self.now();
                        self.wishes[i].order_no = order_no;
                        self.wishes[i].updated_at = now;
                        no_content()
                    }
                    None => not_found(id),
                }
            }
            _ => HttpResponse {
                status: 405,
                body: format!("no route for {} {}", method, path),
            },
        }
    }

    fn list(&self, filter: impl Fn(&Wish) -> bool) -> HttpResponse {
        if self.failing_lists {
            return HttpResponse {
                status: 503,
                body: r#"{"error":"list unavailable"}"#.to_string(),
            };
        }
        let wishes: Vec<&Wish> = self
            .wishes
            .iter()
            .filter(|w| filter(w))
            .filter(|w| self.list_includes_deleted || w.deleted_at.is_none())
            .collect();
        match self.list_shape {
            ListShape::Bare => ok_json(json!(wishes)),
            ListShape::Wrapped => ok_json(json!({ "wishes": wishes })),
            ListShape::Unexpected => ok_json(json!({ "items": wishes })),
        }
    }

    fn create(&mut self, body: &Value) -> HttpResponse {
        let Some(title) = body.get("title").and_then(Value::as_str) else {
            return bad_request("title is required");
        };
        let organization_id = body
            .get("organization_id")
            .and_then(Value::as_str)
            .unwrap_or("default")
            .to_string();
        let note = body.get("note").and_then(Value::as_str).unwrap_or("").to_string();
        let order_no = match body.get("order_no").and_then(Value::as_i64) {
            Some(order_no) => order_no,
            None => {
                self.wishes
                    .iter()
                    .filter(|w| w.deleted_at.is_none())
                    .map(|w| w.order_no)
                    .max()
                    .unwrap_or(0)
                    + 1
            }
        };
        let wish = self.new_wish(&organization_id, title, &note, order_no);
        self.wishes.push(wish.clone());
        HttpResponse {
            status: 201,
            body: json!(wish).to_string(),
        }
    }

    fn update(&mut self, id: &str, body: &Value) -> HttpResponse {
        let Some(i) = self.position(id).filter(|&i| self.wishes[i].deleted_at.is_none()) else {
            return not_found(id);
        };
        let now = self.now();
        let wish = &mut self.wishes[i];
        if let Some(title) = body.get("title").and_then(Value::as_str) {
            wish.title = title.to_string();
        }
        if let Some(note) = body.get("note").and_then(Value::as_str) {
            wish.note = note.to_string();
        }
        if let Some(order_no) = body.get("order_no").and_then(Value::as_i64) {
            wish.order_no = order_no;
        }
        wish.updated_at = now;
        ok_json(json!(wish))
    }
}

fn order_target(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("/wishes/")?;
    rest.strip_suffix("/order")
}

fn ok_json(value: Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        body: value.to_string(),
    }
}

fn no_content() -> HttpResponse {
    HttpResponse {
        status: 204,
        body: String::new(),
    }
}

fn not_found(id: &str) -> HttpResponse {
    HttpResponse {
        status: 404,
        body: format!(r#"{{"error":"wish {} not found"}}"#, id),
    }
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse {
        status: 400,
        body: format!(r#"{{"error":"{}"}}"#, message),
    }
}

#[async_trait]
impl HttpTransport for FakeWishServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request
            .url
            .strip_prefix(FAKE_BASE)
            .unwrap_or(request.url.as_str())
            .to_string();

        let (delay, unreachable) = self.with_state(|s| {
            s.calls.push((request.method.clone(), path.clone()));
            s.seen_auth
                .push(request.header("Authorization").map(str::to_string));
            s.seen_content_types
                .push(request.header("Content-Type").map(str::to_string));
            (s.delay_for(&request.method, &path), s.unreachable)
        });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if unreachable {
            return Err(TransportError("connection refused".to_string()));
        }

        Ok(self.with_state(|s| {
            if let Some(token) = &s.required_token {
                let expected = format!("Bearer {}", token);
                if request.header("Authorization") != Some(expected.as_str()) {
                    return HttpResponse {
                        status: 401,
                        body: r#"{"error":"unauthorized"}"#.to_string(),
                    };
                }
            }
            s.route(&request.method, &path, request.body.as_deref())
        }))
    }
}
