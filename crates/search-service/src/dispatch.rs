//! Protocol method dispatch.
//!
//! The five `org.gnome.Shell.SearchProvider2` operations are declared in a
//! static table from method name to typed handler, validated once at
//! startup. The serve loop speaks newline-delimited JSON on stdio; the host
//! bus adapter owns the actual message-bus connection and forwards calls
//! here verbatim.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use anyhow::{Context, bail};
use provider_core::SearchProvider;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::apps::CommandLauncher;

/// All providers of this process, keyed by object path.
pub type ProviderMap = HashMap<String, SearchProvider<CommandLauncher>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    InitialResultSet,
    SubsearchResultSet,
    ResultMetas,
    ActivateResult,
    LaunchSearch,
}

/// One protocol method: wire name, input/output signatures, typed handler.
#[derive(Debug, Clone, Copy)]
pub struct MethodSpec {
    pub name: &'static str,
    pub inputs: &'static str,
    pub outputs: &'static str,
    pub handler: Handler,
}

/// The full protocol surface. Signatures follow the search provider
/// interface contract.
pub const METHODS: &[MethodSpec] = &[
    MethodSpec {
        name: "GetInitialResultSet",
        inputs: "as",
        outputs: "as",
        handler: Handler::InitialResultSet,
    },
    MethodSpec {
        name: "GetSubsearchResultSet",
        inputs: "asas",
        outputs: "as",
        handler: Handler::SubsearchResultSet,
    },
    MethodSpec {
        name: "GetResultMetas",
        inputs: "as",
        outputs: "aa{sv}",
        handler: Handler::ResultMetas,
    },
    MethodSpec {
        name: "ActivateResult",
        inputs: "sasu",
        outputs: "",
        handler: Handler::ActivateResult,
    },
    MethodSpec {
        name: "LaunchSearch",
        inputs: "asu",
        outputs: "",
        handler: Handler::LaunchSearch,
    },
];

/// Check the dispatch table once at startup instead of trusting it on every
/// call: every handler declared exactly once, no duplicate wire names.
pub fn validate_dispatch_table() -> anyhow::Result<()> {
    let mut names = Vec::new();
    let mut handlers = Vec::new();
    for method in METHODS {
        if names.contains(&method.name) {
            bail!("duplicate dispatch table entry for {}", method.name);
        }
        names.push(method.name);
        if handlers.contains(&method.handler) {
            bail!("handler {:?} declared twice", method.handler);
        }
        handlers.push(method.handler);
    }
    if METHODS.len() != 5 {
        bail!(
            "dispatch table must declare all five protocol methods, found {}",
            METHODS.len()
        );
    }
    Ok(())
}

fn method_by_name(name: &str) -> Option<&'static MethodSpec> {
    METHODS.iter().find(|method| method.name == name)
}

/// One request from the bus adapter.
#[derive(Debug, Deserialize)]
pub struct Request {
    /// Object path of the target provider.
    pub path: String,
    /// Protocol method name, e.g. `GetInitialResultSet`.
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    Ok { ok: bool, result: Value },
    Err { ok: bool, error: String },
}

impl Response {
    fn success(result: Value) -> Self {
        Response::Ok { ok: true, result }
    }

    fn failure(error: impl Into<String>) -> Self {
        Response::Err {
            ok: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InitialResultSetParams {
    terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SubsearchResultSetParams {
    previous_results: Vec<String>,
    terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ResultMetasParams {
    identifiers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ActivateResultParams {
    identifier: String,
    terms: Vec<String>,
    timestamp: u32,
}

#[derive(Debug, Deserialize)]
struct LaunchSearchParams {
    terms: Vec<String>,
    timestamp: u32,
}

/// Route one request to its provider and handler.
///
/// Errors (unknown path, unknown method, bad parameters, a failed refresh)
/// fail that request only; the loop keeps serving.
pub fn handle_request(providers: &mut ProviderMap, request: Request) -> Response {
    let Some(method) = method_by_name(&request.method) else {
        warn!(method = request.method, "unknown protocol method");
        return Response::failure(format!("unknown method {}", request.method));
    };
    let Some(provider) = providers.get_mut(&request.path) else {
        warn!(path = request.path, "no provider at object path");
        return Response::failure(format!("no provider at {}", request.path));
    };

    debug!(method = method.name, path = request.path, "dispatching request");
    match dispatch(provider, method.handler, request.params) {
        Ok(result) => Response::success(result),
        Err(error) => Response::failure(format!("{error:#}")),
    }
}

fn dispatch(
    provider: &mut SearchProvider<CommandLauncher>,
    handler: Handler,
    params: Value,
) -> anyhow::Result<Value> {
    match handler {
        Handler::InitialResultSet => {
            let params: InitialResultSetParams =
                serde_json::from_value(params).context("invalid GetInitialResultSet parameters")?;
            let ids = provider.initial_search(&params.terms)?;
            Ok(json!(ids))
        }
        Handler::SubsearchResultSet => {
            let params: SubsearchResultSetParams = serde_json::from_value(params)
                .context("invalid GetSubsearchResultSet parameters")?;
            let ids = provider.refine_search(&params.previous_results, &params.terms);
            Ok(json!(ids))
        }
        Handler::ResultMetas => {
            let params: ResultMetasParams =
                serde_json::from_value(params).context("invalid GetResultMetas parameters")?;
            let metas = provider.result_metas(&params.identifiers);
            Ok(serde_json::to_value(metas)?)
        }
        Handler::ActivateResult => {
            let params: ActivateResultParams =
                serde_json::from_value(params).context("invalid ActivateResult parameters")?;
            provider.activate(&params.identifier, &params.terms, params.timestamp);
            Ok(Value::Null)
        }
        Handler::LaunchSearch => {
            let params: LaunchSearchParams =
                serde_json::from_value(params).context("invalid LaunchSearch parameters")?;
            provider.launch_search(&params.terms, params.timestamp);
            Ok(Value::Null)
        }
    }
}

/// Serve requests line by line until EOF, which is a graceful shutdown.
pub fn serve(
    providers: &mut ProviderMap,
    input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(providers, request),
            Err(error) => Response::failure(format!("malformed request: {error}")),
        };
        serde_json::to_writer(&mut output, &response).context("failed to write response")?;
        output.write_all(b"\n").context("failed to write response")?;
        output.flush().context("failed to flush response")?;
    }
    debug!("input closed, shutting down");
    Ok(())
}
