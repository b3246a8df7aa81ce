//! Compile plan: what to emit, computed once per document.
//!
//! Grouping by namespace, security partitioning, parameter selection and
//! used-import sets are the same no matter which target renders them, so
//! they are worked out here and the emitters only decide how the result
//! is written down.

use std::collections::BTreeSet;

use tracing::warn;

use crate::model::{ApexDocument, HttpVerb};

/// Namespace group for an endpoint path: the first segment after the
/// `/api/` prefix, or `root` when there is no distinguishable segment.
pub fn namespace(path: &str) -> String {
    let rest = match path.strip_prefix("/api/") {
        Some(rest) => rest,
        None => return "root".to_string(),
    };
    match rest.split('/').find(|seg| !seg.is_empty()) {
        Some(seg) => seg.to_string(),
        None => "root".to_string(),
    }
}

/// Where a client call's single parameter comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Query,
    Body,
}

/// One typed request function in the client artifact.
#[derive(Debug, Clone)]
pub struct ClientCall {
    pub name: String,
    pub verb: HttpVerb,
    pub endpoint: String,
    /// Schema name backing the sole parameter. Query wins over body when
    /// both are declared.
    pub param: Option<(ParamKind, String)>,
    pub response: Option<String>,
}

/// One entry in the query-bindings artifact. GET operations only.
#[derive(Debug, Clone)]
pub struct QueryBinding {
    pub name: String,
    pub query_schema: Option<String>,
}

/// One route registration.
#[derive(Debug, Clone)]
pub struct Route {
    pub verb: HttpVerb,
    pub path: String,
    pub handler: String,
}

/// Routes of one namespace, partitioned by security requirement.
#[derive(Debug, Clone)]
pub struct RouteGroup {
    pub namespace: String,
    pub open: Vec<Route>,
    pub secured: Vec<Route>,
}

/// One handler stub in the server artifact.
#[derive(Debug, Clone)]
pub struct HandlerSpec {
    pub name: String,
    pub verb: HttpVerb,
    pub endpoint: String,
    pub secured: bool,
    pub query_schema: Option<String>,
    /// Declared field names of the query schema, for string-only
    /// query-parameter binding. Empty when the schema is unknown.
    pub query_fields: Vec<String>,
    pub response: Option<String>,
}

/// Handler stubs of one namespace; rendered into one file per group.
#[derive(Debug, Clone)]
pub struct HandlerGroup {
    pub namespace: String,
    pub handlers: Vec<HandlerSpec>,
}

/// Everything the emitters need, derived once from the document.
#[derive(Debug, Clone)]
pub struct Plan {
    pub calls: Vec<ClientCall>,
    pub bindings: Vec<QueryBinding>,
    /// Namespace groups in first-appearance (declaration) order.
    pub route_groups: Vec<RouteGroup>,
    pub handler_groups: Vec<HandlerGroup>,
    /// HTTP verbs referenced by at least one operation, sorted.
    pub used_verbs: Vec<HttpVerb>,
    /// Schema names referenced by operations and actually declared,
    /// sorted. Anything outside this set resolves to the dynamic
    /// fallback and must never be imported.
    pub used_schemas: Vec<String>,
    /// All declared schema names.
    pub known: BTreeSet<String>,
}

impl Plan {
    pub fn build(doc: &ApexDocument) -> Plan {
        let known = doc.schema_names();
        let mut calls = Vec::new();
        let mut bindings = Vec::new();
        let mut route_groups: Vec<RouteGroup> = Vec::new();
        let mut handler_groups: Vec<HandlerGroup> = Vec::new();
        let mut used_verbs = BTreeSet::new();
        let mut used_schemas = BTreeSet::new();

        for op in &doc.operations {
            let verb = match HttpVerb::parse(&op.method) {
                Some(verb) => verb,
                None => {
                    warn!("operation {} has unknown method {:?}, skipping", op.name, op.method);
                    continue;
                }
            };

            used_verbs.insert(verb);
            for name in [op.query(), op.body(), op.response()].into_iter().flatten() {
                if known.contains(name) {
                    used_schemas.insert(name.to_string());
                }
            }

            let param = op
                .query()
                .map(|q| (ParamKind::Query, q.to_string()))
                .or_else(|| op.body().map(|b| (ParamKind::Body, b.to_string())));

            calls.push(ClientCall {
                name: op.name.clone(),
                verb,
                endpoint: op.endpoint.clone(),
                param,
                response: op.response().map(str::to_string),
            });

            if verb == HttpVerb::Get {
                bindings.push(QueryBinding {
                    name: op.name.clone(),
                    query_schema: op.query().map(str::to_string),
                });
            }

            let ns = namespace(&op.endpoint);
            let secured = doc.is_secured(&op.endpoint, &op.method);

            let idx = match route_groups.iter().position(|g| g.namespace == ns) {
                Some(idx) => idx,
                None => {
                    route_groups.push(RouteGroup {
                        namespace: ns.clone(),
                        open: Vec::new(),
                        secured: Vec::new(),
                    });
                    route_groups.len() - 1
                }
            };
            let route = Route {
                verb,
                path: op.endpoint.clone(),
                handler: op.name.clone(),
            };
            if secured {
                route_groups[idx].secured.push(route);
            } else {
                route_groups[idx].open.push(route);
            }

            let query_fields = op
                .query()
                .and_then(|q| doc.schema(q))
                .map(|schema| schema.fields.keys().cloned().collect())
                .unwrap_or_default();

            let idx = match handler_groups.iter().position(|g| g.namespace == ns) {
                Some(idx) => idx,
                None => {
                    handler_groups.push(HandlerGroup {
                        namespace: ns.clone(),
                        handlers: Vec::new(),
                    });
                    handler_groups.len() - 1
                }
            };
            handler_groups[idx].handlers.push(HandlerSpec {
                name: op.name.clone(),
                verb,
                endpoint: op.endpoint.clone(),
                secured,
                query_schema: op.query().map(str::to_string),
                query_fields,
                response: op.response().map(str::to_string),
            });
        }

        Plan {
            calls,
            bindings,
            route_groups,
            handler_groups,
            used_verbs: used_verbs.into_iter().collect(),
            used_schemas: used_schemas.into_iter().collect(),
            known,
        }
    }
}
