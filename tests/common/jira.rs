//! In-process stand-in for the Jira REST API.
//!
//! Serves one issue plus its transitions, applies transition POSTs to the
//! issue's status, and records every request so tests can count writes.

use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use serde_json::{Value, json};

/// A request as seen by the server: method, path (query stripped), body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Debug, Clone)]
struct State {
    key: String,
    summary: String,
    description: String,
    issue_type: String,
    status: String,
    /// `(id, name, target status)`
    transitions: Vec<(String, String, String)>,
}

pub struct FakeJira {
    server: Arc<tiny_http::Server>,
    state: Arc<Mutex<State>>,
    requests: Arc<Mutex<Vec<Request>>>,
    handle: Option<JoinHandle<()>>,
}

impl FakeJira {
    /// Serve `key` with the given summary and status, typed `Task`.
    ///
    /// Transitions: `11` Start → In Progress, `21` Review → In Review,
    /// `31` Test → Testing, `41` Resolve → Done.
    pub fn start(key: &str, summary: &str, status: &str) -> Self {
        let state = State {
            key: key.to_string(),
            summary: summary.to_string(),
            description: String::new(),
            issue_type: "Task".to_string(),
            status: status.to_string(),
            transitions: [
                ("11", "Start", "In Progress"),
                ("21", "Review", "In Review"),
                ("31", "Test", "Testing"),
                ("41", "Resolve", "Done"),
            ]
            .iter()
            .map(|(id, name, to)| (id.to_string(), name.to_string(), to.to_string()))
            .collect(),
        };

        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").unwrap());
        let state = Arc::new(Mutex::new(state));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            let requests = Arc::clone(&requests);
            std::thread::spawn(move || {
                for mut request in server.incoming_requests() {
                    let mut body = String::new();
                    request.as_reader().read_to_string(&mut body).unwrap();
                    let path = request
                        .url()
                        .split_once('?')
                        .map_or(request.url(), |(path, _)| path)
                        .to_string();
                    let method = request.method().to_string();
                    requests.lock().unwrap().push(Request {
                        method: method.clone(),
                        path: path.clone(),
                        body: body.clone(),
                    });

                    let (status, reply) = respond(&mut state.lock().unwrap(), &method, &path, &body);
                    let response = tiny_http::Response::from_string(reply)
                        .with_status_code(status)
                        .with_header(
                            "Content-Type: application/json"
                                .parse::<tiny_http::Header>()
                                .unwrap(),
                        );
                    let _ = request.respond(response);
                }
            })
        };

        Self {
            server,
            state,
            requests,
            handle: Some(handle),
        }
    }

    pub fn with_description(self, description: &str) -> Self {
        self.state.lock().unwrap().description = description.to_string();
        self
    }

    pub fn with_issue_type(self, issue_type: &str) -> Self {
        self.state.lock().unwrap().issue_type = issue_type.to_string();
        self
    }

    pub fn url(&self) -> String {
        let port = self.server.server_addr().to_ip().unwrap().port();
        format!("http://127.0.0.1:{port}")
    }

    /// Point `cmd` at this server with dummy credentials.
    pub fn configure(&self, cmd: &mut Command) {
        cmd.env("JIRA_URL", self.url());
        cmd.env("JIRA_USER", "dev@example.com");
        cmd.env("JIRA_TOKEN", "secret");
    }

    /// Current status of the served issue.
    pub fn status(&self) -> String {
        self.state.lock().unwrap().status.clone()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Parsed bodies of every transition POST received so far.
    ///
    /// Compared as JSON values since the client may pretty-print.
    pub fn transition_posts(&self) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST" && r.path.ends_with("/transitions"))
            .map(|r| serde_json::from_str(&r.body).unwrap_or(Value::Null))
            .collect()
    }
}

impl Drop for FakeJira {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond(state: &mut State, method: &str, path: &str, body: &str) -> (u16, String) {
    let issue_path = format!("/rest/api/2/issue/{}", state.key);
    let transitions_path = format!("{issue_path}/transitions");

    match (method, path) {
        ("GET", p) if p == issue_path => (200, issue_json(state).to_string()),
        ("GET", p) if p == transitions_path => {
            let transitions: Vec<Value> = state
                .transitions
                .iter()
                .map(|(id, name, to)| json!({"id": id, "name": name, "to": {"name": to}}))
                .collect();
            (200, json!({"transitions": transitions}).to_string())
        }
        ("POST", p) if p == transitions_path => {
            let request: Value = serde_json::from_str(body).unwrap_or(Value::Null);
            let id = request["transition"]["id"].as_str().unwrap_or_default();
            match state.transitions.iter().find(|(tid, _, _)| tid == id) {
                Some((_, _, to)) => {
                    state.status = to.clone();
                    (204, String::new())
                }
                None => (400, json!({"errorMessages": ["bad transition"]}).to_string()),
            }
        }
        _ => (
            404,
            json!({"errorMessages": ["Issue does not exist or you do not have permission to see it."]})
                .to_string(),
        ),
    }
}

fn issue_json(state: &State) -> Value {
    let description = if state.description.is_empty() {
        Value::Null
    } else {
        Value::String(state.description.clone())
    };
    json!({
        "key": state.key,
        "fields": {
            "summary": state.summary,
            "description": description,
            "status": {"name": state.status},
            "issuetype": {"name": state.issue_type},
            "comment": {"comments": [
                {
                    "author": {"displayName": "Ada"},
                    "body": "Repro attached",
                    "created": "2025-01-02T03:04:05.000+0000"
                }
            ]}
        }
    })
}
